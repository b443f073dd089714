pub mod memory;
pub mod models;
pub mod rest;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::AppError;
use models::{
    Agent, BookedAppointment, CalendarEventMirror, EventMirrorPatch, Lead, NewAgent,
    OauthCredential,
};

/// Row-level access to the managed datastore. Four logical tables back the
/// scheduling core (agent, oauth_credential, calendar_event_mirror,
/// booked_appointment) plus the read-only lead table.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn insert_agent(&self, new: &NewAgent) -> Result<Agent, AppError>;
    async fn find_agent(&self, agent_id: i64) -> Result<Option<Agent>, AppError>;

    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, AppError>;

    /// Replaces any existing credential row for the same agent.
    async fn upsert_credential(&self, cred: &OauthCredential) -> Result<(), AppError>;
    async fn get_credential(&self, agent_id: i64) -> Result<Option<OauthCredential>, AppError>;
    /// Rewrites only the access token and expiry; the refresh token is untouched.
    async fn update_credential_access(
        &self,
        agent_id: i64,
        access_token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<(), AppError>;

    async fn upsert_event(&self, event: &CalendarEventMirror) -> Result<(), AppError>;
    async fn patch_event(
        &self,
        external_event_id: &str,
        patch: &EventMirrorPatch,
    ) -> Result<(), AppError>;
    async fn remove_event(&self, external_event_id: &str) -> Result<(), AppError>;

    /// First-party bookings with `start <= appointment_time <= end`.
    async fn booked_between(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<BookedAppointment>, AppError>;

    /// Mirrored events overlapping the window:
    /// `start_time <= end AND end_time >= start`.
    async fn events_overlapping(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEventMirror>, AppError>;
}
