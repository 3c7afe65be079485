use crate::models::ErrorResponse;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrompsterError {
    #[error("Path is outside the root: {0}")]
    OutsideRoot(String),

    #[error("Path does not exist: {0}")]
    NotFound(String),

    #[error("Path goes through a symbolic link: {0}")]
    Symlink(String),

    #[error("Path is excluded: {0}")]
    Excluded(String),

    #[error("Path is neither a file nor a directory: {0}")]
    Unsupported(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Blocking(#[from] BlockingError),
}

pub type Result<T> = std::result::Result<T, PrompsterError>;

impl PrompsterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrompsterError::Io {
            path: path.into(),
            source,
        }
    }
}

impl ResponseError for PrompsterError {
    fn status_code(&self) -> StatusCode {
        match self {
            PrompsterError::Io { .. } | PrompsterError::Config(_) | PrompsterError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_client_errors() {
        let err = PrompsterError::OutsideRoot("../etc/passwd".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Path is outside the root: ../etc/passwd");
    }

    #[test]
    fn io_errors_are_server_errors() {
        let err = PrompsterError::io(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("/tmp/x"));
    }
}
