use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::AppError;

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Client for the external calendar provider's event API. Callers supply a
/// valid access token (see `TokenManager`); non-2xx responses surface as
/// `RemoteCalendar` before any local state is touched.
#[derive(Clone)]
pub struct CalendarClient {
    api_base: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

fn date_time(t: NaiveDateTime) -> Value {
    json!({ "dateTime": t.format(TIMESTAMP_FMT).to_string() })
}

/// Google-style event payload; absent fields are omitted so PATCH bodies
/// only carry what changed.
fn event_body(
    summary: Option<&str>,
    description: Option<&str>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Value {
    let mut body = Map::new();
    if let Some(summary) = summary {
        body.insert("summary".to_string(), json!(summary));
    }
    if let Some(description) = description {
        body.insert("description".to_string(), json!(description));
    }
    if let Some(start) = start {
        body.insert("start".to_string(), date_time(start));
    }
    if let Some(end) = end {
        body.insert("end".to_string(), date_time(end));
    }
    Value::Object(body)
}

impl CalendarClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base: config.calendar_api_base.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(AppError::RemoteCalendar(format!("{status}: {body}")))
    }

    /// Creates the event remotely and returns the provider-assigned event id.
    pub async fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        summary: &str,
        description: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<String, AppError> {
        let url = format!("{}/calendars/{calendar_id}/events", self.api_base);
        let resp = self
            .http_client
            .post(url)
            .bearer_auth(access_token)
            .json(&event_body(Some(summary), description, Some(start), Some(end)))
            .send()
            .await
            .map_err(|e| AppError::RemoteCalendar(e.to_string()))?;
        let created: CreatedEvent = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| AppError::RemoteCalendar(format!("invalid create response: {e}")))?;
        Ok(created.id)
    }

    pub async fn update_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
        summary: Option<&str>,
        description: Option<&str>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<(), AppError> {
        let url = format!("{}/calendars/{calendar_id}/events/{event_id}", self.api_base);
        let resp = self
            .http_client
            .patch(url)
            .bearer_auth(access_token)
            .json(&event_body(summary, description, start, end))
            .send()
            .await
            .map_err(|e| AppError::RemoteCalendar(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn delete_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/calendars/{calendar_id}/events/{event_id}", self.api_base);
        let resp = self
            .http_client
            .delete(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::RemoteCalendar(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }
}
