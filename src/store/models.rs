use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
}

/// Agent fields as submitted at onboarding; the datastore assigns the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewAgent {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
}

/// OAuth tokens for an agent's external calendar account. At most one live
/// row per agent; a re-authorization replaces the previous row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OauthCredential {
    pub agent_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: NaiveDateTime,
}

/// Local shadow of a remote calendar event, keyed by the provider's event id.
/// A cache of the remote source of truth, written only after the provider
/// confirms the corresponding mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarEventMirror {
    pub external_event_id: String,
    pub agent_id: i64,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Partial update of a mirrored event; `None` fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EventMirrorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
}

impl EventMirrorPatch {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// First-party booking, distinct from mirrored calendar events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub agent_id: i64,
    pub appointment_time: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lead {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
}
