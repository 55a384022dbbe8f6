use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};

use crate::app::AppState;
use crate::database::models::{Application, NewApplication};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

/// GET /applications/:username: posting ids the user applied to
pub async fn list(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> ApiResult<Vec<i32>> {
    let Path(username) = path?;
    let ids = state.users().applications(&username).await?;
    Ok(ApiResponse::success(ids))
}

/// POST /applications/:username with `{"postingId": …}`
pub async fn apply(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<NewApplication>, JsonRejection>,
) -> ApiResult<Application> {
    let Path(username) = path?;
    let Json(data) = payload?;
    validate(&data)?;

    let application = state.users().apply(&username, data.posting_id).await?;
    Ok(ApiResponse::created(application))
}
