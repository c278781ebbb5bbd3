//! Request validation for cars and engines.
//!
//! Checks run in a fixed order and stop at the first violated rule. Nothing
//! here touches the database.

use chrono::{Datelike, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{FUEL_TYPES, MIN_CAR_YEAR};
use crate::models::{CarRequest, Engine, EngineRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,

    #[error("year is required")]
    YearRequired,

    #[error("year must be a number")]
    YearNotNumeric,

    #[error("year must be between 1886 and current year")]
    YearOutOfRange,

    #[error("brand is required")]
    BrandRequired,

    #[error("invalid fuel type")]
    InvalidFuelType,

    #[error("engine is required")]
    EngineRequired,

    #[error("displacement must be greater than 0")]
    Displacement,

    #[error("no_of_cylinders must be greater than 0")]
    NoOfCylinders,

    #[error("car_range must be greater than 0")]
    CarRange,

    #[error("price must be greater than 0")]
    Price,
}

pub fn validate_car_request(req: &CarRequest) -> Result<(), ValidationError> {
    validate_car_request_at(req, Utc::now().year())
}

/// Same as [`validate_car_request`] with the upper year bound supplied by the caller.
pub fn validate_car_request_at(req: &CarRequest, current_year: i32) -> Result<(), ValidationError> {
    validate_name(&req.name)?;
    validate_year(&req.year, current_year)?;
    validate_brand(&req.brand)?;
    validate_fuel_type(&req.fuel_type)?;
    validate_engine(&req.engine)?;
    validate_price(req.price)
}

pub fn validate_engine_request(req: &EngineRequest) -> Result<(), ValidationError> {
    validate_engine_figures(req.displacement, req.no_of_cylinders, req.car_range)
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

fn validate_year(year: &str, current_year: i32) -> Result<(), ValidationError> {
    if year.is_empty() {
        return Err(ValidationError::YearRequired);
    }
    let year: i64 = year.parse().map_err(|_| ValidationError::YearNotNumeric)?;
    if !(i64::from(MIN_CAR_YEAR)..=i64::from(current_year)).contains(&year) {
        return Err(ValidationError::YearOutOfRange);
    }
    Ok(())
}

fn validate_brand(brand: &str) -> Result<(), ValidationError> {
    if brand.is_empty() {
        return Err(ValidationError::BrandRequired);
    }
    Ok(())
}

fn validate_fuel_type(fuel_type: &str) -> Result<(), ValidationError> {
    if FUEL_TYPES.contains(&fuel_type) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFuelType)
    }
}

fn validate_engine(engine: &Engine) -> Result<(), ValidationError> {
    if engine.engine_id == Uuid::nil() {
        return Err(ValidationError::EngineRequired);
    }
    validate_engine_figures(engine.displacement, engine.no_of_cylinders, engine.car_range)
}

fn validate_engine_figures(
    displacement: i64,
    no_of_cylinders: i64,
    car_range: i64,
) -> Result<(), ValidationError> {
    if displacement <= 0 {
        return Err(ValidationError::Displacement);
    }
    if no_of_cylinders <= 0 {
        return Err(ValidationError::NoOfCylinders);
    }
    if car_range <= 0 {
        return Err(ValidationError::CarRange);
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_nan() || price <= 0.0 {
        return Err(ValidationError::Price);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIS_YEAR: i32 = 2026;

    fn valid_car_request() -> CarRequest {
        CarRequest {
            name: "X".to_string(),
            year: "2020".to_string(),
            brand: "Acme".to_string(),
            fuel_type: "Diesel".to_string(),
            engine: Engine {
                engine_id: Uuid::new_v4(),
                displacement: 2000,
                no_of_cylinders: 4,
                car_range: 500,
            },
            price: 15000.00,
        }
    }

    fn valid_engine_request() -> EngineRequest {
        EngineRequest {
            displacement: 2000,
            no_of_cylinders: 4,
            car_range: 500,
        }
    }

    #[test]
    fn valid_car_request_passes() {
        assert_eq!(validate_car_request_at(&valid_car_request(), THIS_YEAR), Ok(()));
    }

    #[test]
    fn first_violation_wins() {
        let req = CarRequest {
            name: String::new(),
            year: "abc".to_string(),
            price: -1.0,
            ..valid_car_request()
        };
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::NameRequired)
        );

        let req = CarRequest {
            brand: String::new(),
            fuel_type: "Steam".to_string(),
            ..valid_car_request()
        };
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::BrandRequired)
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let at = |year: &str| {
            let req = CarRequest {
                year: year.to_string(),
                ..valid_car_request()
            };
            validate_car_request_at(&req, THIS_YEAR)
        };

        assert_eq!(at("1885"), Err(ValidationError::YearOutOfRange));
        assert_eq!(at("1800"), Err(ValidationError::YearOutOfRange));
        assert_eq!(at("1886"), Ok(()));
        assert_eq!(at("2026"), Ok(()));
        assert_eq!(at("2027"), Err(ValidationError::YearOutOfRange));
        assert_eq!(at("99999999999"), Err(ValidationError::YearOutOfRange));
        assert_eq!(at("-5"), Err(ValidationError::YearOutOfRange));
    }

    #[test]
    fn year_must_be_present_and_numeric() {
        let req = CarRequest {
            year: String::new(),
            ..valid_car_request()
        };
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::YearRequired)
        );

        let req = CarRequest {
            year: "20x0".to_string(),
            ..valid_car_request()
        };
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::YearNotNumeric)
        );
    }

    #[test]
    fn next_year_fails_against_the_clock() {
        let next_year = (Utc::now().year() + 1).to_string();
        let req = CarRequest {
            year: next_year,
            ..valid_car_request()
        };
        assert_eq!(validate_car_request(&req), Err(ValidationError::YearOutOfRange));
    }

    #[test]
    fn fuel_types() {
        for fuel in ["Petrol", "Persol", "Diesel", "Electric", "Hybrid"] {
            let req = CarRequest {
                fuel_type: fuel.to_string(),
                ..valid_car_request()
            };
            assert_eq!(validate_car_request_at(&req, THIS_YEAR), Ok(()), "{fuel}");
        }

        for fuel in ["", "petrol", "Gasoline", "LPG"] {
            let req = CarRequest {
                fuel_type: fuel.to_string(),
                ..valid_car_request()
            };
            assert_eq!(
                validate_car_request_at(&req, THIS_YEAR),
                Err(ValidationError::InvalidFuelType),
                "{fuel}"
            );
        }
    }

    #[test]
    fn engine_reference_is_checked() {
        let mut req = valid_car_request();
        req.engine.engine_id = Uuid::nil();
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::EngineRequired)
        );

        let mut req = valid_car_request();
        req.engine.no_of_cylinders = 0;
        assert_eq!(
            validate_car_request_at(&req, THIS_YEAR),
            Err(ValidationError::NoOfCylinders)
        );
    }

    #[test]
    fn price_must_be_positive() {
        for price in [0.0, -0.01, f64::NAN] {
            let req = CarRequest {
                price,
                ..valid_car_request()
            };
            assert_eq!(
                validate_car_request_at(&req, THIS_YEAR),
                Err(ValidationError::Price)
            );
        }
    }

    #[test]
    fn engine_request_checks_each_figure_in_order() {
        assert_eq!(validate_engine_request(&valid_engine_request()), Ok(()));

        let req = EngineRequest {
            displacement: 0,
            no_of_cylinders: 0,
            ..valid_engine_request()
        };
        assert_eq!(validate_engine_request(&req), Err(ValidationError::Displacement));

        let req = EngineRequest {
            no_of_cylinders: -4,
            ..valid_engine_request()
        };
        assert_eq!(validate_engine_request(&req), Err(ValidationError::NoOfCylinders));

        let req = EngineRequest {
            car_range: 0,
            ..valid_engine_request()
        };
        assert_eq!(validate_engine_request(&req), Err(ValidationError::CarRange));
    }

    #[test]
    fn messages_name_the_rule() {
        assert_eq!(
            ValidationError::YearOutOfRange.to_string(),
            "year must be between 1886 and current year"
        );
        assert_eq!(ValidationError::InvalidFuelType.to_string(), "invalid fuel type");
    }
}
