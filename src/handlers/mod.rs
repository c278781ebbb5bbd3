pub mod car;
pub mod engine;
pub mod health;
pub mod login;

use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_bearer;
use crate::state::AppState;

/// Full application router: public `/health` and `/login`, everything else behind a bearer token.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(car::router())
        .merge(engine::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .merge(health::router())
        .merge(login::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
