use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::json;

use crate::config::Config;
use crate::error::AppError;

/// Downstream follow-up scheduling, triggered after a booking. Fire-and-forget
/// from the caller's perspective: failures are logged, never propagated.
#[async_trait]
pub trait FollowUpNotifier: Send + Sync {
    async fn schedule_follow_ups(
        &self,
        phone: &str,
        appointment_time: NaiveDateTime,
    ) -> Result<(), AppError>;
}

/// Posts the booking to a configured webhook.
pub struct WebhookNotifier {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FollowUpNotifier for WebhookNotifier {
    async fn schedule_follow_ups(
        &self,
        phone: &str,
        appointment_time: NaiveDateTime,
    ) -> Result<(), AppError> {
        let resp = self
            .http_client
            .post(&self.url)
            .json(&json!({
                "phone": phone,
                "appointment_time": appointment_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::Internal(format!(
                "follow-up webhook returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl FollowUpNotifier for NoopNotifier {
    async fn schedule_follow_ups(
        &self,
        phone: &str,
        appointment_time: NaiveDateTime,
    ) -> Result<(), AppError> {
        tracing::debug!(phone, %appointment_time, "follow-up scheduling skipped: no webhook configured");
        Ok(())
    }
}

pub fn from_config(config: &Config) -> Arc<dyn FollowUpNotifier> {
    match &config.follow_up_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(NoopNotifier),
    }
}
