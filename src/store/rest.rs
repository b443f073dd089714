use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::models::{
    Agent, BookedAppointment, CalendarEventMirror, EventMirrorPatch, Lead, NewAgent,
    OauthCredential,
};
use super::Datastore;
use crate::config::Config;
use crate::error::AppError;

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Datastore backed by a PostgREST-style row API. Every operation is a single
/// HTTP call against `{base}/rest/v1/{table}` with equality/range filters in
/// the query string.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    http_client: reqwest::Client,
}

fn ts(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FMT).to_string()
}

impl RestStore {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.datastore_api_key)
            .map_err(|e| AppError::Internal(format!("Invalid datastore API key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.datastore_api_key))
            .map_err(|e| AppError::Internal(format!("Invalid datastore API key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.datastore_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let resp = self
            .http_client
            .get(self.table_url(table))
            .query(filters)
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check(table, resp)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Datastore(format!("{table}: invalid response: {e}")))
    }

    async fn check(table: &str, resp: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(AppError::Datastore(format!("{table}: {status}: {body}")))
    }
}

#[async_trait]
impl Datastore for RestStore {
    async fn insert_agent(&self, new: &NewAgent) -> Result<Agent, AppError> {
        let resp = self
            .http_client
            .post(self.table_url("agent"))
            .header("Prefer", "return=representation")
            .json(new)
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        let rows: Vec<Agent> = Self::check("agent", resp)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Datastore(format!("agent: invalid response: {e}")))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Datastore("agent: insert returned no row".to_string()))
    }

    async fn find_agent(&self, agent_id: i64) -> Result<Option<Agent>, AppError> {
        let rows: Vec<Agent> = self
            .select("agent", &[("agent_id", format!("eq.{agent_id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, AppError> {
        let rows: Vec<Lead> = self
            .select("lead", &[("phone", format!("eq.{phone}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_credential(&self, cred: &OauthCredential) -> Result<(), AppError> {
        let resp = self
            .http_client
            .post(self.table_url("oauth_credential"))
            .query(&[("on_conflict", "agent_id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(cred)
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check("oauth_credential", resp).await?;
        Ok(())
    }

    async fn get_credential(&self, agent_id: i64) -> Result<Option<OauthCredential>, AppError> {
        let rows: Vec<OauthCredential> = self
            .select("oauth_credential", &[("agent_id", format!("eq.{agent_id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_credential_access(
        &self,
        agent_id: i64,
        access_token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<(), AppError> {
        let resp = self
            .http_client
            .patch(self.table_url("oauth_credential"))
            .query(&[("agent_id", format!("eq.{agent_id}"))])
            .json(&json!({
                "access_token": access_token,
                "expires_at": ts(expires_at),
            }))
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check("oauth_credential", resp).await?;
        Ok(())
    }

    async fn upsert_event(&self, event: &CalendarEventMirror) -> Result<(), AppError> {
        let resp = self
            .http_client
            .post(self.table_url("calendar_event_mirror"))
            .query(&[("on_conflict", "external_event_id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check("calendar_event_mirror", resp).await?;
        Ok(())
    }

    async fn patch_event(
        &self,
        external_event_id: &str,
        patch: &EventMirrorPatch,
    ) -> Result<(), AppError> {
        // An all-None patch would serialize to `{}`, which PostgREST rejects.
        if patch.is_empty() {
            return Ok(());
        }
        let resp = self
            .http_client
            .patch(self.table_url("calendar_event_mirror"))
            .query(&[("external_event_id", format!("eq.{external_event_id}"))])
            .json(patch)
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check("calendar_event_mirror", resp).await?;
        Ok(())
    }

    async fn remove_event(&self, external_event_id: &str) -> Result<(), AppError> {
        let resp = self
            .http_client
            .delete(self.table_url("calendar_event_mirror"))
            .query(&[("external_event_id", format!("eq.{external_event_id}"))])
            .send()
            .await
            .map_err(|e| AppError::Datastore(e.to_string()))?;
        Self::check("calendar_event_mirror", resp).await?;
        Ok(())
    }

    async fn booked_between(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<BookedAppointment>, AppError> {
        self.select(
            "booked_appointment",
            &[
                ("agent_id", format!("eq.{agent_id}")),
                ("appointment_time", format!("gte.{}", ts(start))),
                ("appointment_time", format!("lte.{}", ts(end))),
                ("select", "agent_id,appointment_time".to_string()),
            ],
        )
        .await
    }

    async fn events_overlapping(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEventMirror>, AppError> {
        self.select(
            "calendar_event_mirror",
            &[
                ("agent_id", format!("eq.{agent_id}")),
                ("start_time", format!("lte.{}", ts(end))),
                ("end_time", format!("gte.{}", ts(start))),
            ],
        )
        .await
    }
}
