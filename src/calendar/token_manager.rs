use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use super::oauth::OauthClient;
use crate::error::AppError;
use crate::store::Datastore;

/// Hands out a valid access token for an agent, refreshing through the OAuth
/// provider when the stored one has expired.
///
/// Refreshes are serialized per agent: the provider may invalidate a refresh
/// token when a second refresh races the first, so concurrent callers for the
/// same agent coalesce onto a single exchange and the late ones pick up the
/// refreshed row from the datastore.
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn Datastore>,
    oauth: OauthClient,
    refresh_locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn Datastore>, oauth: OauthClient) -> Self {
        Self {
            store,
            oauth,
            refresh_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn agent_lock(&self, agent_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        locks.entry(agent_id).or_default().clone()
    }

    async fn drop_agent_lock(&self, agent_id: i64) {
        let mut locks = self.refresh_locks.lock().await;
        locks.remove(&agent_id);
    }

    /// Number of agents currently tracked in the refresh-lock map.
    pub async fn lock_entries(&self) -> usize {
        self.refresh_locks.lock().await.len()
    }

    pub async fn get_valid_access_token(&self, agent_id: i64) -> Result<String, AppError> {
        // Unlinked ids never allocate a lock entry; the path segment is
        // caller-controlled and the map must not grow with it.
        if self.store.get_credential(agent_id).await?.is_none() {
            return Err(AppError::NotAuthorized);
        }

        let lock = self.agent_lock(agent_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: a concurrent caller may have just refreshed.
        let Some(cred) = self.store.get_credential(agent_id).await? else {
            // Credential vanished between the check and the lock.
            drop(_guard);
            self.drop_agent_lock(agent_id).await;
            return Err(AppError::NotAuthorized);
        };

        let now = Utc::now().naive_utc();
        if cred.expires_at > now {
            return Ok(cred.access_token);
        }

        let grant = self.oauth.refresh(&cred.refresh_token).await?;
        let expires_at = now + Duration::seconds(grant.expires_in);
        self.store
            .update_credential_access(agent_id, &grant.access_token, expires_at)
            .await?;

        tracing::debug!(agent_id, "refreshed calendar access token");
        Ok(grant.access_token)
    }
}
