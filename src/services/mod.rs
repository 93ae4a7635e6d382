use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod appointment;
pub mod audit;
pub mod budget;
pub mod client;
pub mod invoice;
pub mod payment;
pub mod report;
pub mod sync;
pub mod user;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller's role lacks the permission for the attempted operation.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Entity not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Type constraint error: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(msg) => ServiceError::Validation(msg),
            other => ServiceError::Repository(other),
        }
    }
}
