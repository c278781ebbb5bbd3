use std::sync::Arc;

use uuid::Uuid;

use super::ServiceError;
use crate::constants::API_NAME;
use crate::models::{Car, CarRequest};
use crate::repository::CarStore;
use crate::validation::validate_car_request;

#[derive(Clone)]
pub struct CarService {
    store: Arc<dyn CarStore>,
}

impl CarService {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    pub async fn get_car_by_id(&self, id: Uuid) -> Result<Car, ServiceError> {
        Ok(self.store.get_by_id(id).await?)
    }

    pub async fn get_cars_by_brand(
        &self,
        brand: &str,
        include_engine: bool,
    ) -> Result<Vec<Car>, ServiceError> {
        Ok(self.store.get_by_brand(brand, include_engine).await?)
    }

    pub async fn create_car(&self, req: &CarRequest) -> Result<Car, ServiceError> {
        validate_car_request(req)?;
        let car = self.store.create(req).await?;
        tracing::info!("{} Car created: {} ({} {})", API_NAME, car.id, car.brand, car.name);
        Ok(car)
    }

    pub async fn update_car(&self, id: Uuid, req: &CarRequest) -> Result<Car, ServiceError> {
        validate_car_request(req)?;
        let car = self.store.update(id, req).await?;
        tracing::info!("{} Car updated: {}", API_NAME, id);
        Ok(car)
    }

    pub async fn delete_car(&self, id: Uuid) -> Result<Car, ServiceError> {
        let car = self.store.delete(id).await?;
        tracing::info!("{} Car deleted: {}", API_NAME, id);
        Ok(car)
    }
}
