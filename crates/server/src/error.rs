use thiserror::Error;

use catalog::UserId;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// HTTP status a request handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::UserNotFound(_) => 404,
            ServiceError::InvalidRequest(_) => 400,
            ServiceError::Internal(_) => 500,
        }
    }
}
