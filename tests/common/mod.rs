#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use http_body_util::BodyExt;
use tower::ServiceExt;

use onboarding_service::config::Config;
use onboarding_service::error::AppError;
use onboarding_service::notify::FollowUpNotifier;
use onboarding_service::routes::create_router;
use onboarding_service::store::memory::MemStore;
use onboarding_service::AppState;

pub fn dt(s: &str) -> NaiveDateTime {
    s.parse().expect("valid timestamp literal")
}

// ─── TestResponse ────────────────────────────────────────────────────────────

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).to_string()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body_bytes).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response as {}: {e}\nBody: {}",
                std::any::type_name::<T>(),
                self.text()
            )
        })
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status {expected}, got {}. Body: {}",
            self.status,
            self.text()
        );
    }
}

// ─── RecordingNotifier ───────────────────────────────────────────────────────

/// Captures follow-up invocations instead of calling a webhook. Can be
/// switched to fail every call to exercise the logged-only error path.
#[derive(Default)]
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<(String, NaiveDateTime)>>,
    failing: std::sync::atomic::AtomicBool,
}

impl RecordingNotifier {
    pub fn set_failing(&self) {
        self.failing
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl FollowUpNotifier for RecordingNotifier {
    async fn schedule_follow_ups(
        &self,
        phone: &str,
        appointment_time: NaiveDateTime,
    ) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), appointment_time));
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Internal("follow-up scheduling is down".to_string()));
        }
        Ok(())
    }
}

// ─── TestApp ─────────────────────────────────────────────────────────────────

pub struct TestApp {
    router: Router,
    pub store: MemStore,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    /// App with external endpoints pointing nowhere; fine for tests that
    /// never leave the process.
    pub fn new() -> Self {
        Self::with_endpoints("http://127.0.0.1:1/token", "http://127.0.0.1:1")
    }

    /// App whose OAuth token endpoint and calendar API base are swapped for
    /// mock servers.
    pub fn with_endpoints(token_endpoint: &str, calendar_api_base: &str) -> Self {
        let config = Config {
            datastore_url: "http://datastore.invalid".to_string(),
            datastore_api_key: "test-key".to_string(),
            oauth_client_id: "test-client-id".to_string(),
            oauth_client_secret: "test-client-secret".to_string(),
            oauth_redirect_uri: "http://localhost:3000/calendar/oauth/callback".to_string(),
            oauth_scope: "https://www.googleapis.com/auth/calendar".to_string(),
            oauth_auth_endpoint: "https://provider.test/o/oauth2/auth".to_string(),
            oauth_token_endpoint: token_endpoint.to_string(),
            calendar_api_base: calendar_api_base.to_string(),
            follow_up_webhook_url: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
        };

        let store = MemStore::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(Arc::new(store.clone()), notifier.clone(), config);
        let router = create_router(state.clone());

        Self {
            router,
            store,
            state,
            notifier,
        }
    }

    pub async fn request(&self, req: Request<Body>) -> TestResponse {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot failed");

        let status = resp.status();
        let body_bytes = resp
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes()
            .to_vec();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: &serde_json::Value) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.request(req).await
    }

    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> TestResponse {
        self.send_json("POST", uri, body).await
    }

    pub async fn patch_json(&self, uri: &str, body: &serde_json::Value) -> TestResponse {
        self.send_json("PATCH", uri, body).await
    }

    pub async fn delete_json(&self, uri: &str, body: &serde_json::Value) -> TestResponse {
        self.send_json("DELETE", uri, body).await
    }
}
