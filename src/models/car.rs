use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Engine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub year: String,
    pub brand: String,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    pub engine: Engine,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Builds a freshly created car; both timestamps are set to `now`.
    pub fn new(id: Uuid, req: &CarRequest, engine: Engine, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: req.name.clone(),
            year: req.year.clone(),
            brand: req.brand.clone(),
            fuel_type: req.fuel_type.clone(),
            engine,
            price: req.price,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRequest {
    pub name: String,
    pub year: String,
    pub brand: String,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    pub engine: Engine,
    pub price: f64,
}
