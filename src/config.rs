use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub datastore_url: String,
    pub datastore_api_key: String,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub oauth_redirect_uri: String,
    pub oauth_scope: String,
    pub oauth_auth_endpoint: String,
    pub oauth_token_endpoint: String,
    pub calendar_api_base: String,
    pub follow_up_webhook_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            datastore_url: env::var("DATASTORE_URL")?,
            datastore_api_key: env::var("DATASTORE_API_KEY")?,
            oauth_client_id: env::var("OAUTH_CLIENT_ID")?,
            oauth_client_secret: env::var("OAUTH_CLIENT_SECRET")?,
            oauth_redirect_uri: env::var("OAUTH_REDIRECT_URI")?,
            oauth_scope: env::var("OAUTH_SCOPE")
                .unwrap_or_else(|_| "https://www.googleapis.com/auth/calendar".to_string()),
            oauth_auth_endpoint: env::var("OAUTH_AUTH_ENDPOINT")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            oauth_token_endpoint: env::var("OAUTH_TOKEN_ENDPOINT")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            calendar_api_base: env::var("CALENDAR_API_BASE")
                .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string()),
            follow_up_webhook_url: env::var("FOLLOW_UP_WEBHOOK_URL").ok(),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
