use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use dogapi_schema::ValidationError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DogApiError {
    #[error("Dog breed with ID {0} not found.")]
    NotFound(i64),

    #[error("Dog with {breed} and {} already exists in the database.", .sub_breed.as_deref().unwrap_or("no sub-breed"))]
    Conflict {
        breed: String,
        sub_breed: Option<String>,
    },

    /// Uniqueness constraint raised by the store itself.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Seeding failed: {0}")]
    SeedFailure(#[source] Box<DogApiError>),

    #[error("Invalid reference dataset: {0}")]
    InvalidDataset(String),

    #[error("Request validation failed")]
    Validation(Vec<ValidationError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl DogApiError {
    /// Wrap a startup seeding failure. Already-wrapped errors are passed through.
    pub fn seed_failure(err: DogApiError) -> Self {
        match err {
            DogApiError::SeedFailure(_) => err,
            other => DogApiError::SeedFailure(Box::new(other)),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DogApiError::UniqueViolation(_))
    }
}

impl From<JsonRejection> for DogApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(e) => {
                DogApiError::UnexpectedError(format!("Failed to read request body: {e}"))
            }
            other => DogApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for DogApiError {
    fn from(rejection: PathRejection) -> Self {
        DogApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for DogApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            DogApiError::NotFound(_) => {
                let status = StatusCode::NOT_FOUND;
                let body = ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: self.to_string(),
                    details: None,
                };
                (status, body)
            }

            DogApiError::Conflict { .. } | DogApiError::UniqueViolation(_) => {
                let status = StatusCode::CONFLICT;
                let body = ApiErrorObject {
                    code: "CONFLICT".to_string(),
                    message: self.to_string(),
                    details: None,
                };
                (status, body)
            }

            DogApiError::Validation(errors) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorObject {
                    code: "VALIDATION_FAILED".to_string(),
                    message: "Request validation failed.".to_string(),
                    details: serde_json::to_value(errors).ok(),
                };
                (status, body)
            }

            DogApiError::BadRequest(reason) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorObject {
                    code: "BAD_REQUEST".to_string(),
                    message: reason,
                    details: None,
                };
                (status, body)
            }

            DogApiError::DatabaseError(_)
            | DogApiError::RactorError(_)
            | DogApiError::UnexpectedError(_)
            | DogApiError::SeedFailure(_)
            | DogApiError::InvalidDataset(_)
            | DogApiError::JsonError(_)
            | DogApiError::IoError(_) => {
                error!(error = %self, "request failed with internal error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_the_pair() {
        let err = DogApiError::Conflict {
            breed: "bulldog".to_string(),
            sub_breed: Some("boston".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Dog with bulldog and boston already exists in the database."
        );
    }

    #[test]
    fn seed_failure_is_not_double_wrapped() {
        let once = DogApiError::seed_failure(DogApiError::InvalidDataset("empty".into()));
        let twice = DogApiError::seed_failure(once);
        match twice {
            DogApiError::SeedFailure(inner) => {
                assert!(matches!(*inner, DogApiError::InvalidDataset(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            DogApiError::NotFound(1).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DogApiError::UniqueViolation("x".into())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DogApiError::Validation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DogApiError::RactorError("down".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
