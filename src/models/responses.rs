use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate fields visible to every plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreeView {
    pub id: Uuid,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "profilePictureUrl")]
    pub profile_picture_url: Option<String>,
}

/// Candidate fields visible to Silver, Gold and Platinum plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumView {
    pub id: Uuid,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "profilePictureUrl")]
    pub profile_picture_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A matching candidate, redacted according to the recruiter's plan
///
/// `Free` is tried first and rejects records carrying contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TieredResult {
    Free(FreeView),
    Premium(PremiumView),
}

impl TieredResult {
    pub fn id(&self) -> Uuid {
        match self {
            TieredResult::Free(view) => view.id,
            TieredResult::Premium(view) => view.id,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
