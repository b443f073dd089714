use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::store::models::Lead;
use crate::AppState;

pub async fn user_report(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<Lead>, AppError> {
    let lead = state
        .store
        .find_lead_by_phone(&phone)
        .await?
        .ok_or(AppError::NotFound("Lead"))?;
    Ok(Json(lead))
}
