// Service exports
pub mod gateway;
pub mod identity;

pub use gateway::ApiGateway;
pub use identity::{KeycloakDirectory, KeycloakSettings};

use crate::models::{AvailabilityWindow, CandidateProfile, Offer, Plan, UserProfile};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// External resource a collaborator call was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Availability,
    Offer,
    Plan,
    IdentityProvider,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::User => "user",
            Resource::Availability => "availability",
            Resource::Offer => "offer",
            Resource::Plan => "plan",
            Resource::IdentityProvider => "identity provider",
        })
    }
}

/// Errors that can occur when calling an external collaborator
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{resource} request failed: {source}")]
    Request {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource} not found: {id}")]
    NotFound { resource: Resource, id: String },

    #[error("{resource} service rejected the credential ({status})")]
    Forbidden { resource: Resource, status: u16 },

    #[error("{resource} service returned error: {status}")]
    Api { resource: Resource, status: u16 },

    #[error("Invalid {resource} response: {message}")]
    InvalidResponse { resource: Resource, message: String },
}

impl ServiceError {
    pub fn resource(&self) -> Resource {
        match self {
            ServiceError::Request { resource, .. }
            | ServiceError::NotFound { resource, .. }
            | ServiceError::Forbidden { resource, .. }
            | ServiceError::Api { resource, .. }
            | ServiceError::InvalidResponse { resource, .. } => *resource,
        }
    }
}

/// Identity store holding candidate and recruiter profiles
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every candidate known to the identity provider
    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, ServiceError>;

    /// A single user by subject id
    async fn get_user(&self, subject_id: &str) -> Result<UserProfile, ServiceError>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn get_availability(&self, window_id: Uuid, token: &str) -> Result<AvailabilityWindow, ServiceError>;
}

#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn get_offer(&self, offer_id: Uuid, token: &str) -> Result<Offer, ServiceError>;
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn get_plan(&self, plan_id: Uuid, token: &str) -> Result<Plan, ServiceError>;
}
