// Model exports
pub mod domain;
pub mod responses;

pub use domain::{Address, AvailabilityWindow, CandidateProfile, MatchCandidate, Offer, OfferAddress, Plan, RecruiterProfile, UserProfile};
pub use responses::{ErrorResponse, FreeView, HealthResponse, PremiumView, TieredResult};
