use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when resolving a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Plan not found: {0}")]
    NotFound(String),
}

/// Subscription tier of a recruiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanTier {
    Free,
    Silver,
    Gold,
    Platinum,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Silver => "silver",
            PlanTier::Gold => "gold",
            PlanTier::Platinum => "platinum",
        }
    }

    /// Visibility and quantity policy granted by this tier
    pub fn policy(&self) -> Policy {
        match self {
            PlanTier::Free => Policy {
                max_results: Some(5),
                sampling: Sampling::RandomSubset,
                field_set: FieldSet::Minimal,
            },
            PlanTier::Silver => Policy {
                max_results: Some(10),
                sampling: Sampling::RandomSubset,
                field_set: FieldSet::Full,
            },
            PlanTier::Gold | PlanTier::Platinum => Policy {
                max_results: None,
                sampling: Sampling::None,
                field_set: FieldSet::Full,
            },
        }
    }
}

impl FromStr for PlanTier {
    type Err = PlanError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "silver" => Ok(PlanTier::Silver),
            "gold" => Ok(PlanTier::Gold),
            "platinum" => Ok(PlanTier::Platinum),
            _ => Err(PlanError::NotFound(name.to_string())),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    None,
    RandomSubset,
}

/// Candidate fields exposed to the recruiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSet {
    /// id, first name, last name, profile picture
    Minimal,
    /// Minimal plus phone and email
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// `None` means unbounded
    pub max_results: Option<usize>,
    pub sampling: Sampling,
    pub field_set: FieldSet,
}

/// Resolve the policy for a plan name, compared case-insensitively
pub fn resolve_policy(tier_name: &str) -> Result<Policy, PlanError> {
    tier_name.parse::<PlanTier>().map(|tier| tier.policy())
}
