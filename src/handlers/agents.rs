use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::store::models::{Agent, NewAgent};
use crate::AppState;

// --- Request types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

// --- Handlers ---

pub async fn create_agent(
    State(state): State<AppState>,
    Json(req): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Agent>), AppError> {
    let email = required("email", req.email)?;
    if !email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }

    let new = NewAgent {
        first_name: required("firstName", req.first_name)?,
        last_name: required("lastName", req.last_name)?,
        phone: required("phone", req.phone)?,
        email,
        website: req.website,
    };

    let agent = state.store.insert_agent(&new).await?;
    tracing::info!(agent_id = agent.agent_id, "onboarded agent");
    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
) -> Result<Json<Agent>, AppError> {
    let agent = state
        .store
        .find_agent(agent_id)
        .await?
        .ok_or(AppError::NotFound("Agent"))?;
    Ok(Json(agent))
}
