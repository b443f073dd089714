use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::slots;
use crate::error::AppError;
use crate::store::models::{CalendarEventMirror, EventMirrorPatch, OauthCredential};
use crate::AppState;

// --- Request / Response types ---

#[derive(Debug, Deserialize)]
pub struct OauthCallbackQuery {
    pub code: String,
    /// Carries the agent id through the provider round-trip.
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub summary: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub calendar_id: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub calendar_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub calendar_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedEventResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct BookedResponse {
    pub booked: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OpeningsResponse {
    pub open: Vec<String>,
}

fn parse_date(query: SlotQuery) -> Result<NaiveDate, AppError> {
    let date = query
        .date
        .ok_or_else(|| AppError::Validation("date query parameter is required".to_string()))?;
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {date}")))
}

// --- Handlers ---

pub async fn auth_url(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
) -> Result<Json<AuthUrlResponse>, AppError> {
    let url = state.oauth.authorization_url(agent_id)?;
    Ok(Json(AuthUrlResponse { url }))
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OauthCallbackQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let agent_id: i64 = query
        .state
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid state: {}", query.state)))?;

    let grant = state.oauth.exchange_code(&query.code).await?;
    let refresh_token = grant.refresh_token.ok_or_else(|| {
        AppError::BadRequest("OAuth provider did not return a refresh token".to_string())
    })?;

    let cred = OauthCredential {
        agent_id,
        access_token: grant.access_token,
        refresh_token,
        expires_at: Utc::now().naive_utc() + Duration::seconds(grant.expires_in),
    };
    state.store.upsert_credential(&cred).await?;

    tracing::info!(agent_id, "linked external calendar account");
    Ok(Json(serde_json::json!({ "status": "linked" })))
}

pub async fn add_event(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreatedEventResponse>), AppError> {
    let access_token = state.tokens.get_valid_access_token(agent_id).await?;

    // Remote first; the mirror is only written once the provider confirms.
    let event_id = state
        .calendar
        .create_event(
            &access_token,
            &req.calendar_id,
            &req.summary,
            req.description.as_deref(),
            req.start,
            req.end,
        )
        .await?;

    let mirror = CalendarEventMirror {
        external_event_id: event_id.clone(),
        agent_id,
        summary: req.summary,
        description: req.description,
        start_time: req.start,
        end_time: req.end,
    };
    state.store.upsert_event(&mirror).await?;

    if let Err(e) = state
        .notifier
        .schedule_follow_ups(&req.phone, req.start)
        .await
    {
        tracing::warn!(agent_id, "failed to schedule follow-ups: {e}");
    }

    Ok((StatusCode::CREATED, Json(CreatedEventResponse { id: event_id })))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path((agent_id, event_id)): Path<(i64, String)>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let access_token = state.tokens.get_valid_access_token(agent_id).await?;

    state
        .calendar
        .update_event(
            &access_token,
            &req.calendar_id,
            &event_id,
            req.summary.as_deref(),
            req.description.as_deref(),
            req.start,
            req.end,
        )
        .await?;

    let patch = EventMirrorPatch {
        summary: req.summary,
        description: req.description,
        start_time: req.start,
        end_time: req.end,
    };
    state.store.patch_event(&event_id, &patch).await?;

    Ok(Json(serde_json::json!({ "status": "updated" })))
}

pub async fn remove_event(
    State(state): State<AppState>,
    Path((agent_id, event_id)): Path<(i64, String)>,
    Json(req): Json<DeleteEventRequest>,
) -> Result<StatusCode, AppError> {
    let access_token = state.tokens.get_valid_access_token(agent_id).await?;

    state
        .calendar
        .delete_event(&access_token, &req.calendar_id, &event_id)
        .await?;
    state.store.remove_event(&event_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn booked(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<BookedResponse>, AppError> {
    let date = parse_date(query)?;
    let booked = slots::occupied_slots(state.store.as_ref(), agent_id, date).await?;
    Ok(Json(BookedResponse { booked }))
}

pub async fn openings(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<OpeningsResponse>, AppError> {
    let date = parse_date(query)?;
    let open = slots::open_slots(state.store.as_ref(), agent_id, date).await?;
    Ok(Json(OpeningsResponse { open }))
}
