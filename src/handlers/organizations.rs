use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};

use crate::app::AppState;
use crate::database::models::{NewOrganization, Organization, OrganizationDetail, OrganizationFilter, OrganizationUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

/// GET /organizations
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<OrganizationFilter>, QueryRejection>,
) -> ApiResult<Vec<Organization>> {
    let Query(filter) = query?;
    validate(&filter)?;

    let organizations = state.organizations().find_all(&filter).await?;
    Ok(ApiResponse::success(organizations))
}

/// GET /organizations/:handle
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<OrganizationDetail> {
    let Path(handle) = path?;
    let detail = state.organizations().get(&handle).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /organizations
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewOrganization>, JsonRejection>,
) -> ApiResult<Organization> {
    let Json(data) = payload?;
    validate(&data)?;

    let organization = state.organizations().create(data).await?;
    Ok(ApiResponse::created(organization))
}

/// PATCH /organizations/:handle
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<OrganizationUpdate>, JsonRejection>,
) -> ApiResult<Organization> {
    let Path(handle) = path?;
    let Json(data) = payload?;
    validate(&data)?;

    let organization = state.organizations().update(&handle, &data).await?;
    Ok(ApiResponse::success(organization))
}

/// DELETE /organizations/:handle
pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let Path(handle) = path?;
    state.organizations().remove(&handle).await?;
    Ok(ApiResponse::no_content())
}
