pub mod car_repo;
pub mod engine_repo;
pub mod errors;

pub use car_repo::CarRepository;
pub use engine_repo::EngineRepository;
pub use errors::StoreError;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::constants::API_NAME;
use crate::models::{Car, CarRequest, Engine, EngineRequest};

/// Persistence for engines. Every operation runs in its own transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, StoreError>;

    async fn create(&self, req: &EngineRequest) -> Result<Engine, StoreError>;

    async fn update(&self, id: Uuid, req: &EngineRequest) -> Result<Engine, StoreError>;

    /// Fails with [`StoreError::EngineInUse`] while any car references the engine.
    async fn delete(&self, id: Uuid) -> Result<Engine, StoreError>;
}

/// Persistence for cars. Every operation runs in its own transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Fails with [`StoreError::EngineNotFound`] when `req.engine` names no engine row.
    async fn create(&self, req: &CarRequest) -> Result<Car, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Car, StoreError>;

    /// Cars of `brand` ordered by creation time. Without `include_engine` the
    /// engine sub-record only carries its id.
    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, StoreError>;

    async fn update(&self, id: Uuid, req: &CarRequest) -> Result<Car, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<Car, StoreError>;
}

/// Current time truncated to the microsecond precision of `TIMESTAMPTZ`, so a
/// value returned from a write equals the one read back later.
pub(crate) fn db_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Ends `tx` according to `result`: commit on `Ok`, roll back on `Err`.
///
/// A failed commit replaces the value with the commit error. A failed
/// rollback is logged and the original error is returned.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rb_err) = tx.rollback().await {
                tracing::error!("{} Could not roll back transaction: {}", API_NAME, rb_err);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_now_keeps_whole_microseconds() {
        for _ in 0..100 {
            assert_eq!(db_now().timestamp_subsec_nanos() % 1_000, 0);
        }
    }
}
