use anyhow::Context;
use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::json;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.credentials.matches(&req.username, &req.password) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state
        .tokens
        .issue(&req.username)
        .context("Failed to generate token")?;

    tracing::info!("{} Issued token for {}", API_NAME, req.username);
    Ok(Json(json!({ "token": token })))
}
