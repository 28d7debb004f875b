// Core algorithm exports
pub mod availability;
pub mod matcher;
pub mod plan;
pub mod shaper;

pub use availability::{is_eligible, matches};
pub use matcher::{find_matching, Collaborators, MatchingOrchestrator, DEFAULT_AVAILABILITY_CONCURRENCY};
pub use plan::{resolve_policy, FieldSet, PlanError, PlanTier, Policy, Sampling};
pub use shaper::{shape, shape_with_rng};
