pub mod events;
pub mod health;
pub mod reaction_roles;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

// Re-exports for convenience
pub use events::ingest_gateway_event;
pub use health::{health, keep_alive};
pub use reaction_roles::{
    add_mapping, create_reaction_role, get_reaction_role, list_reaction_roles, remove_mapping,
};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(keep_alive))
        .route("/health", get(health))
        .route(
            "/reaction-roles",
            post(create_reaction_role).get(list_reaction_roles),
        )
        .route("/reaction-roles/{message_id}", get(get_reaction_role))
        .route("/reaction-roles/{message_id}/mappings", put(add_mapping))
        .route(
            "/reaction-roles/{message_id}/mappings/{emoji}",
            delete(remove_mapping),
        )
        .route("/events/reactions", post(ingest_gateway_event))
        .with_state(app_state)
        .fallback(handler_404)
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
