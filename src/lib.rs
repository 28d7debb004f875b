//! Recruit Match - plan-tiered candidate matching service
//!
//! This library matches candidate availabilities against job offers and
//! shapes the result according to the requesting recruiter's subscription
//! plan. Identities, availabilities, offers and plans are read from external
//! services on every call.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use auth::TokenClaims;
pub use crate::core::{Collaborators, MatchingOrchestrator, PlanTier, Policy};
pub use error::MatchError;
pub use models::{AvailabilityWindow, CandidateProfile, Offer, TieredResult, UserProfile};
