use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::models::{
    Agent, BookedAppointment, CalendarEventMirror, EventMirrorPatch, Lead, NewAgent,
    OauthCredential,
};
use super::Datastore;
use crate::error::AppError;

/// In-process datastore for tests and local runs without a managed backend.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_agent_id: i64,
    agents: HashMap<i64, Agent>,
    leads: HashMap<String, Lead>,
    credentials: HashMap<i64, OauthCredential>,
    events: HashMap<String, CalendarEventMirror>,
    booked: Vec<BookedAppointment>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_lead(&self, lead: Lead) {
        let mut inner = self.inner.lock().unwrap();
        inner.leads.insert(lead.phone.clone(), lead);
    }

    pub fn seed_credential(&self, cred: OauthCredential) {
        let mut inner = self.inner.lock().unwrap();
        inner.credentials.insert(cred.agent_id, cred);
    }

    pub fn seed_booked(&self, booking: BookedAppointment) {
        let mut inner = self.inner.lock().unwrap();
        inner.booked.push(booking);
    }

    pub fn seed_event(&self, event: CalendarEventMirror) {
        let mut inner = self.inner.lock().unwrap();
        inner.events.insert(event.external_event_id.clone(), event);
    }

    pub fn event(&self, external_event_id: &str) -> Option<CalendarEventMirror> {
        let inner = self.inner.lock().unwrap();
        inner.events.get(external_event_id).cloned()
    }

    pub fn credential(&self, agent_id: i64) -> Option<OauthCredential> {
        let inner = self.inner.lock().unwrap();
        inner.credentials.get(&agent_id).cloned()
    }
}

#[async_trait]
impl Datastore for MemStore {
    async fn insert_agent(&self, new: &NewAgent) -> Result<Agent, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_agent_id += 1;
        let agent = Agent {
            agent_id: inner.next_agent_id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            website: new.website.clone(),
        };
        inner.agents.insert(agent.agent_id, agent.clone());
        Ok(agent)
    }

    async fn find_agent(&self, agent_id: i64) -> Result<Option<Agent>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.agents.get(&agent_id).cloned())
    }

    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.leads.get(phone).cloned())
    }

    async fn upsert_credential(&self, cred: &OauthCredential) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.credentials.insert(cred.agent_id, cred.clone());
        Ok(())
    }

    async fn get_credential(&self, agent_id: i64) -> Result<Option<OauthCredential>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.credentials.get(&agent_id).cloned())
    }

    async fn update_credential_access(
        &self,
        agent_id: i64,
        access_token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let cred = inner
            .credentials
            .get_mut(&agent_id)
            .ok_or(AppError::NotAuthorized)?;
        cred.access_token = access_token.to_string();
        cred.expires_at = expires_at;
        Ok(())
    }

    async fn upsert_event(&self, event: &CalendarEventMirror) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .events
            .insert(event.external_event_id.clone(), event.clone());
        Ok(())
    }

    async fn patch_event(
        &self,
        external_event_id: &str,
        patch: &EventMirrorPatch,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(event) = inner.events.get_mut(external_event_id) {
            if let Some(summary) = &patch.summary {
                event.summary = summary.clone();
            }
            if let Some(description) = &patch.description {
                event.description = Some(description.clone());
            }
            if let Some(start_time) = patch.start_time {
                event.start_time = start_time;
            }
            if let Some(end_time) = patch.end_time {
                event.end_time = end_time;
            }
        }
        Ok(())
    }

    async fn remove_event(&self, external_event_id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.remove(external_event_id);
        Ok(())
    }

    async fn booked_between(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<BookedAppointment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .booked
            .iter()
            .filter(|b| {
                b.agent_id == agent_id && b.appointment_time >= start && b.appointment_time <= end
            })
            .cloned()
            .collect())
    }

    async fn events_overlapping(
        &self,
        agent_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEventMirror>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .events
            .values()
            .filter(|e| e.agent_id == agent_id && e.start_time <= end && e.end_time >= start)
            .cloned()
            .collect())
    }
}
