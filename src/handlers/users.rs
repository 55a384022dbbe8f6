use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};

use crate::app::AppState;
use crate::database::models::{NewUser, User, UserUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.users().find_all().await?;
    Ok(ApiResponse::success(users))
}

pub async fn get(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> ApiResult<User> {
    let Path(username) = path?;
    let user = state.users().get(&username).await?;
    Ok(ApiResponse::success(user))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<User> {
    let Json(data) = payload?;
    validate(&data)?;

    let user = state.users().create(data).await?;
    Ok(ApiResponse::created(user))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<User> {
    let Path(username) = path?;
    let Json(data) = payload?;
    validate(&data)?;

    let user = state.users().update(&username, &data).await?;
    Ok(ApiResponse::success(user))
}

pub async fn remove(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> ApiResult<()> {
    let Path(username) = path?;
    state.users().remove(&username).await?;
    Ok(ApiResponse::no_content())
}
