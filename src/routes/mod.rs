//! HTTP plumbing shared by the endpoint modules: the JSON error contract and
//! small helpers.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

use crate::services::ServiceError;

pub mod appointment;
pub mod audit;
pub mod budget;
pub mod client;
pub mod invoice;
pub mod payment;
pub mod report;
pub mod user;

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) | ServiceError::TypeConstraint(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            // Storage details stay in the server log.
            ServiceError::Repository(err) => {
                log::error!("Repository failure: {err}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiErrorBody { error })
    }
}

/// Maps `validator` failures onto the service error taxonomy so handlers can
/// use `?` throughout.
pub fn reject_invalid(result: Result<(), validator::ValidationErrors>) -> Result<(), ServiceError> {
    result.map_err(|err| ServiceError::Validation(err.to_string()))
}
