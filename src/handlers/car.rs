use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{Car, CarRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BrandQuery {
    #[serde(default)]
    pub brand: String,
    #[serde(rename = "isEngine", default)]
    pub is_engine: Option<String>,
}

impl BrandQuery {
    /// Only the literal `true` asks for the engine join; any other value lists cars alone.
    pub fn include_engine(&self) -> bool {
        self.is_engine.as_deref() == Some("true")
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(get_cars_by_brand).post(create_car))
        .route("/cars/{id}", get(get_car).put(update_car).delete(delete_car))
}

async fn get_cars_by_brand(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> Result<Json<Vec<Car>>, AppError> {
    let include_engine = query.include_engine();
    let cars = state
        .cars
        .get_cars_by_brand(&query.brand, include_engine)
        .await?;
    tracing::info!(
        "{} Listed {} cars for brand '{}' (engine: {})",
        API_NAME,
        cars.len(),
        query.brand,
        include_engine
    );
    Ok(Json(cars))
}

async fn create_car(
    State(state): State<AppState>,
    Json(req): Json<CarRequest>,
) -> Result<(StatusCode, Json<Car>), AppError> {
    let car = state.cars.create_car(&req).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, AppError> {
    Ok(Json(state.cars.get_car_by_id(id).await?))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CarRequest>,
) -> Result<Json<Car>, AppError> {
    Ok(Json(state.cars.update_car(id, &req).await?))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, AppError> {
    Ok(Json(state.cars.delete_car(id).await?))
}
