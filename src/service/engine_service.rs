use std::sync::Arc;

use uuid::Uuid;

use super::ServiceError;
use crate::constants::API_NAME;
use crate::models::{Engine, EngineRequest};
use crate::repository::EngineStore;
use crate::validation::validate_engine_request;

#[derive(Clone)]
pub struct EngineService {
    store: Arc<dyn EngineStore>,
}

impl EngineService {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    pub async fn get_engine_by_id(&self, id: Uuid) -> Result<Engine, ServiceError> {
        Ok(self.store.get_by_id(id).await?)
    }

    pub async fn create_engine(&self, req: &EngineRequest) -> Result<Engine, ServiceError> {
        validate_engine_request(req)?;
        let engine = self.store.create(req).await?;
        tracing::info!("{} Engine created: {}", API_NAME, engine.engine_id);
        Ok(engine)
    }

    pub async fn update_engine(&self, id: Uuid, req: &EngineRequest) -> Result<Engine, ServiceError> {
        validate_engine_request(req)?;
        let engine = self.store.update(id, req).await?;
        tracing::info!("{} Engine updated: {}", API_NAME, id);
        Ok(engine)
    }

    pub async fn delete_engine(&self, id: Uuid) -> Result<Engine, ServiceError> {
        let engine = self.store.delete(id).await?;
        tracing::info!("{} Engine deleted: {}", API_NAME, id);
        Ok(engine)
    }
}
