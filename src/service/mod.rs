pub mod car_service;
pub mod engine_service;

pub use car_service::CarService;
pub use engine_service::EngineService;

use thiserror::Error;

use crate::repository::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
