use crate::core::plan::PlanError;
use crate::models::ErrorResponse;
use crate::services::{Resource, ServiceError};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Errors returned by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream failure: {0}")]
    Upstream(ServiceError),
}

impl From<ServiceError> for MatchError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound {
                resource: resource @ (Resource::Offer | Resource::Plan),
                id,
            } => MatchError::NotFound(format!("{} {}", resource, id)),
            ServiceError::Forbidden { resource, status } => {
                MatchError::Forbidden(format!("{} service rejected the credential ({})", resource, status))
            }
            other => MatchError::Upstream(other),
        }
    }
}

impl From<PlanError> for MatchError {
    fn from(err: PlanError) -> Self {
        MatchError::NotFound(err.to_string())
    }
}

impl MatchError {
    fn kind(&self) -> &'static str {
        match self {
            MatchError::Unauthorized(_) => "unauthorized",
            MatchError::Forbidden(_) => "forbidden",
            MatchError::NotFound(_) => "not_found",
            MatchError::Upstream(_) => "upstream_failure",
        }
    }
}

impl ResponseError for MatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            MatchError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MatchError::Forbidden(_) => StatusCode::FORBIDDEN,
            MatchError::NotFound(_) => StatusCode::NOT_FOUND,
            MatchError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if let MatchError::Upstream(source) = self {
            tracing::error!(resource = %source.resource(), "Matching failed: {}", self);
        } else {
            tracing::info!("Matching rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
