pub mod calendar;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod routes;
pub mod store;

use std::sync::Arc;

use calendar::client::CalendarClient;
use calendar::oauth::OauthClient;
use calendar::token_manager::TokenManager;
use config::Config;
use notify::FollowUpNotifier;
use store::Datastore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub oauth: OauthClient,
    pub tokens: TokenManager,
    pub calendar: CalendarClient,
    pub notifier: Arc<dyn FollowUpNotifier>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Datastore>,
        notifier: Arc<dyn FollowUpNotifier>,
        config: Config,
    ) -> Self {
        let oauth = OauthClient::new(&config);
        let tokens = TokenManager::new(store.clone(), oauth.clone());
        let calendar = CalendarClient::new(&config);
        Self {
            store,
            oauth,
            tokens,
            calendar,
            notifier,
            config,
        }
    }
}
