use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repository::StoreError;
use crate::service::ServiceError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Inconsistent state: {0}")]
    Inconsistency(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            e @ StoreError::EngineNotFound(_) => AppError::NotFound(e.to_string()),
            e @ StoreError::EngineInUse(_) => AppError::ReferentialIntegrity(e.to_string()),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Inconsistency(msg) => AppError::Inconsistency(msg),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => AppError::Validation(e),
            ServiceError::Store(e) => e.into(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReferentialIntegrity(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Inconsistency(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            AppError::Inconsistency(msg) => {
                tracing::error!("Inconsistent state: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                e.to_string()
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                msg.clone()
            }
            AppError::ReferentialIntegrity(msg) => {
                tracing::warn!("Referential integrity violation: {}", msg);
                msg.clone()
            }
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                msg.clone()
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                msg.clone()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_client_and_server_statuses() {
        let id = Uuid::new_v4();
        let cases = [
            (StoreError::NotFound("car not found".into()), StatusCode::NOT_FOUND),
            (StoreError::EngineNotFound(id), StatusCode::NOT_FOUND),
            (StoreError::EngineInUse(id), StatusCode::CONFLICT),
            (StoreError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                StoreError::Inconsistency("no rows deleted".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[test]
    fn validation_maps_to_unprocessable_entity() {
        let err = AppError::from(ServiceError::Validation(ValidationError::Price));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn server_failures_are_opaque() {
        let response = AppError::Inconsistency("no rows deleted".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Unauthorized("Invalid token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
