use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Engine, EngineRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/engines", post(create_engine))
        .route(
            "/engines/{id}",
            get(get_engine).put(update_engine).delete(delete_engine),
        )
}

async fn create_engine(
    State(state): State<AppState>,
    Json(req): Json<EngineRequest>,
) -> Result<(StatusCode, Json<Engine>), AppError> {
    let engine = state.engines.create_engine(&req).await?;
    Ok((StatusCode::CREATED, Json(engine)))
}

async fn get_engine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Engine>, AppError> {
    Ok(Json(state.engines.get_engine_by_id(id).await?))
}

async fn update_engine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EngineRequest>,
) -> Result<Json<Engine>, AppError> {
    Ok(Json(state.engines.update_engine(id, &req).await?))
}

async fn delete_engine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Engine>, AppError> {
    Ok(Json(state.engines.delete_engine(id).await?))
}
