use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};

use crate::app::AppState;
use crate::database::models::{NewPosting, Posting, PostingFilter, PostingUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PostingFilter>, QueryRejection>,
) -> ApiResult<Vec<Posting>> {
    let Query(filter) = query?;
    validate(&filter)?;

    let postings = state.postings().find_all(&filter).await?;
    Ok(ApiResponse::success(postings))
}

pub async fn get(State(state): State<AppState>, path: Result<Path<i32>, PathRejection>) -> ApiResult<Posting> {
    let Path(id) = path?;
    let posting = state.postings().get(id).await?;
    Ok(ApiResponse::success(posting))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPosting>, JsonRejection>,
) -> ApiResult<Posting> {
    let Json(data) = payload?;
    validate(&data)?;

    let posting = state.postings().create(data).await?;
    Ok(ApiResponse::created(posting))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<PostingUpdate>, JsonRejection>,
) -> ApiResult<Posting> {
    let Path(id) = path?;
    let Json(data) = payload?;
    validate(&data)?;

    let posting = state.postings().update(id, &data).await?;
    Ok(ApiResponse::success(posting))
}

pub async fn remove(State(state): State<AppState>, path: Result<Path<i32>, PathRejection>) -> ApiResult<()> {
    let Path(id) = path?;
    state.postings().remove(id).await?;
    Ok(ApiResponse::no_content())
}
