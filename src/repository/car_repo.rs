use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_now, finish, CarStore, EngineRepository, StoreError};
use crate::constants::API_NAME;
use crate::models::{Car, CarRequest, Engine};

const CAR_WITH_ENGINE: &str = "SELECT c.id, c.name, c.year, c.brand, c.fuel_type, c.engine_id, c.price, \
     c.created_at, c.updated_at, e.displacement, e.no_of_cylinders, e.car_range \
     FROM car c LEFT JOIN engine e ON c.engine_id = e.id";

const CAR_ONLY: &str = "SELECT id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at FROM car";

/// Car columns plus the nullable side of the engine join.
#[derive(Debug, FromRow)]
struct CarRow {
    id: Uuid,
    name: String,
    year: String,
    brand: String,
    fuel_type: String,
    engine_id: Uuid,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(default)]
    displacement: Option<i64>,
    #[sqlx(default)]
    no_of_cylinders: Option<i64>,
    #[sqlx(default)]
    car_range: Option<i64>,
}

impl From<CarRow> for Car {
    // An engine removed out of band leaves the joined columns NULL; they read as zero.
    fn from(row: CarRow) -> Self {
        Car {
            id: row.id,
            name: row.name,
            year: row.year,
            brand: row.brand,
            fuel_type: row.fuel_type,
            engine: Engine {
                engine_id: row.engine_id,
                displacement: row.displacement.unwrap_or_default(),
                no_of_cylinders: row.no_of_cylinders.unwrap_or_default(),
                car_range: row.car_range.unwrap_or_default(),
            },
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for CarRepository {
    async fn create(&self, req: &CarRequest) -> Result<Car, StoreError> {
        let engine_id = req.engine.engine_id;

        let mut tx = self.pool.begin().await?;
        let result = async {
            let engine = EngineRepository::fetch(&mut tx, engine_id).await?;
            let car = Car::new(Uuid::new_v4(), req, engine, db_now());

            sqlx::query(
                "INSERT INTO car (id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(car.id)
            .bind(&car.name)
            .bind(&car.year)
            .bind(&car.brand)
            .bind(&car.fuel_type)
            .bind(car.engine.engine_id)
            .bind(car.price)
            .bind(car.created_at)
            .bind(car.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::from_write(e, engine_id))?;
            Ok::<_, StoreError>(car)
        }
        .await;

        let car = finish(tx, result).await?;
        tracing::debug!("{} Created car: {} (engine {})", API_NAME, car.id, engine_id);
        Ok(car)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Car, StoreError> {
        let query = format!("{} WHERE c.id = $1", CAR_WITH_ENGINE);

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::from)
            .and_then(|row| row.ok_or_else(|| StoreError::NotFound("car not found".to_string())));

        finish(tx, result).await.map(Car::from)
    }

    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, StoreError> {
        let query = if include_engine {
            format!("{} WHERE c.brand = $1 ORDER BY c.created_at, c.id", CAR_WITH_ENGINE)
        } else {
            format!("{} WHERE brand = $1 ORDER BY created_at, id", CAR_ONLY)
        };

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_as::<_, CarRow>(&query)
            .bind(brand)
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::from);

        let rows = finish(tx, result).await?;
        tracing::debug!("{} Found {} cars for brand {}", API_NAME, rows.len(), brand);
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn update(&self, id: Uuid, req: &CarRequest) -> Result<Car, StoreError> {
        let engine_id = req.engine.engine_id;

        let mut tx = self.pool.begin().await?;
        let result = async {
            let row = sqlx::query_as::<_, CarRow>(
                "WITH updated AS ( \
                     UPDATE car \
                     SET name = $2, year = $3, brand = $4, fuel_type = $5, engine_id = $6, price = $7, updated_at = $8 \
                     WHERE id = $1 \
                     RETURNING id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at \
                 ) \
                 SELECT u.id, u.name, u.year, u.brand, u.fuel_type, u.engine_id, u.price, \
                     u.created_at, u.updated_at, e.displacement, e.no_of_cylinders, e.car_range \
                 FROM updated u LEFT JOIN engine e ON u.engine_id = e.id",
            )
            .bind(id)
            .bind(&req.name)
            .bind(&req.year)
            .bind(&req.brand)
            .bind(&req.fuel_type)
            .bind(engine_id)
            .bind(req.price)
            .bind(db_now())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::from_write(e, engine_id))?
            .ok_or_else(|| StoreError::NotFound("car not found".to_string()))?;
            Ok::<_, StoreError>(Car::from(row))
        }
        .await;

        let car = finish(tx, result).await?;
        tracing::debug!("{} Updated car: {}", API_NAME, id);
        Ok(car)
    }

    async fn delete(&self, id: Uuid) -> Result<Car, StoreError> {
        // FOR UPDATE OF c: the engine row is on the nullable side of the join and stays unlocked.
        let select = format!("{} WHERE c.id = $1 FOR UPDATE OF c", CAR_WITH_ENGINE);

        let mut tx = self.pool.begin().await?;
        let result = async {
            let row = sqlx::query_as::<_, CarRow>(&select)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::NotFound("car not found".to_string()))?;

            let done = sqlx::query("DELETE FROM car WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if done.rows_affected() == 0 {
                return Err(StoreError::Inconsistency("no rows deleted".to_string()));
            }
            Ok::<_, StoreError>(Car::from(row))
        }
        .await;

        let car = finish(tx, result).await?;
        tracing::debug!("{} Deleted car: {}", API_NAME, id);
        Ok(car)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(displacement: Option<i64>) -> CarRow {
        CarRow {
            id: Uuid::new_v4(),
            name: "X".to_string(),
            year: "2020".to_string(),
            brand: "Acme".to_string(),
            fuel_type: "Diesel".to_string(),
            engine_id: Uuid::new_v4(),
            price: 15000.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            displacement,
            no_of_cylinders: displacement.map(|_| 4),
            car_range: displacement.map(|_| 500),
        }
    }

    #[test]
    fn joined_engine_fields_are_carried_over() {
        let row = row(Some(2000));
        let engine_id = row.engine_id;
        let car = Car::from(row);
        assert_eq!(
            car.engine,
            Engine {
                engine_id,
                displacement: 2000,
                no_of_cylinders: 4,
                car_range: 500,
            }
        );
    }

    #[test]
    fn missing_engine_reads_as_zeroed_reference() {
        let row = row(None);
        let engine_id = row.engine_id;
        let car = Car::from(row);
        assert_eq!(car.engine, Engine::reference(engine_id));
    }
}
