use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{finish, EngineStore, StoreError};
use crate::constants::API_NAME;
use crate::models::{Engine, EngineRequest};

#[derive(Clone)]
pub struct EngineRepository {
    pool: PgPool,
}

impl EngineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn fetch(conn: &mut PgConnection, id: Uuid) -> Result<Engine, StoreError> {
        sqlx::query_as::<_, Engine>(
            "SELECT id, displacement, no_of_cylinders, car_range FROM engine WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::EngineNotFound(id))
    }
}

#[async_trait]
impl EngineStore for EngineRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = Self::fetch(&mut tx, id).await;
        finish(tx, result).await
    }

    async fn create(&self, req: &EngineRequest) -> Result<Engine, StoreError> {
        let engine = Engine::from_request(Uuid::new_v4(), req);

        let mut tx = self.pool.begin().await?;
        let result = async {
            sqlx::query(
                "INSERT INTO engine (id, displacement, no_of_cylinders, car_range) VALUES ($1, $2, $3, $4)",
            )
            .bind(engine.engine_id)
            .bind(engine.displacement)
            .bind(engine.no_of_cylinders)
            .bind(engine.car_range)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::from_write(e, engine.engine_id))?;
            Ok::<_, StoreError>(engine)
        }
        .await;

        let engine = finish(tx, result).await?;
        tracing::debug!("{} Created engine: {}", API_NAME, engine.engine_id);
        Ok(engine)
    }

    async fn update(&self, id: Uuid, req: &EngineRequest) -> Result<Engine, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = async {
            let done = sqlx::query(
                "UPDATE engine SET displacement = $1, no_of_cylinders = $2, car_range = $3 WHERE id = $4",
            )
            .bind(req.displacement)
            .bind(req.no_of_cylinders)
            .bind(req.car_range)
            .bind(id)
            .execute(&mut *tx)
            .await?;

            if done.rows_affected() == 0 {
                return Err(StoreError::NotFound("no rows updated".to_string()));
            }
            Ok::<_, StoreError>(Engine::from_request(id, req))
        }
        .await;

        let engine = finish(tx, result).await?;
        tracing::debug!("{} Updated engine: {}", API_NAME, id);
        Ok(engine)
    }

    async fn delete(&self, id: Uuid) -> Result<Engine, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = async {
            let engine = Self::fetch(&mut tx, id).await?;

            let referenced: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM car WHERE engine_id = $1)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if referenced {
                return Err(StoreError::EngineInUse(id));
            }

            let done = sqlx::query("DELETE FROM engine WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                // a car inserted after the EXISTS check trips the foreign key
                .map_err(|e| match StoreError::from_write(e, id) {
                    StoreError::EngineNotFound(id) => StoreError::EngineInUse(id),
                    other => other,
                })?;
            if done.rows_affected() == 0 {
                return Err(StoreError::Inconsistency("no rows deleted".to_string()));
            }
            Ok::<_, StoreError>(engine)
        }
        .await;

        let engine = finish(tx, result).await?;
        tracing::debug!("{} Deleted engine: {}", API_NAME, id);
        Ok(engine)
    }
}
