use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Agent onboarding
    let agent_routes = Router::new()
        .route("/", post(handlers::agents::create_agent))
        .route("/:id", get(handlers::agents::get_agent));

    // Calendar linking, event mutation, slot queries
    let calendar_routes = Router::new()
        .route("/oauth/callback", get(handlers::calendar::oauth_callback))
        .route("/oauth/:agent_id", get(handlers::calendar::auth_url))
        .route("/:agent_id/events", post(handlers::calendar::add_event))
        .route(
            "/:agent_id/events/:event_id",
            axum::routing::patch(handlers::calendar::update_event)
                .delete(handlers::calendar::remove_event),
        )
        .route("/:agent_id/booked", get(handlers::calendar::booked))
        .route("/:agent_id/openings", get(handlers::calendar::openings));

    Router::new()
        .nest("/realtor", agent_routes)
        .nest("/calendar", calendar_routes)
        .route("/userreport/:phone", get(handlers::leads::user_report))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}
