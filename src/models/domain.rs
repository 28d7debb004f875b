use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Candidate profile as held by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "profilePictureUrl", default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "availabilityIdList", default)]
    pub availability_ids: Vec<Uuid>,
}

/// Recruiter profile as held by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterProfile {
    pub id: Uuid,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "companyId", default)]
    pub company_id: Option<Uuid>,
    #[serde(rename = "planId", default)]
    pub plan_id: Option<Uuid>,
}

/// A user of the platform, resolved once from the identity record's role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfile {
    Candidate(CandidateProfile),
    Recruiter(RecruiterProfile),
    /// Admins and accounts without a recognised role
    Other { id: Uuid, role: Option<String> },
}

impl UserProfile {
    pub fn id(&self) -> Uuid {
        match self {
            UserProfile::Candidate(c) => c.id,
            UserProfile::Recruiter(r) => r.id,
            UserProfile::Other { id, .. } => *id,
        }
    }

    pub fn into_candidate(self) -> Option<CandidateProfile> {
        match self {
            UserProfile::Candidate(c) => Some(c),
            _ => None,
        }
    }
}

/// Time interval and places a candidate declared themselves available for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    #[serde(rename = "startDate", deserialize_with = "flexible_instant")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate", deserialize_with = "flexible_instant")]
    pub end: DateTime<Utc>,
    #[serde(rename = "placeList", default, deserialize_with = "nullable_list")]
    pub places: Vec<String>,
    #[serde(rename = "jobTitle", default)]
    pub job_title: Option<String>,
}

/// Structured postal address attached to an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(rename = "zipCode", default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}, {}",
            self.street, self.number, self.zip_code, self.city, self.country
        )
    }
}

/// Offer address: the offer service sends either plain text or a structured record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OfferAddress {
    Text(String),
    Structured(Address),
}

impl fmt::Display for OfferAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferAddress::Text(text) => f.write_str(text),
            OfferAddress::Structured(address) => address.fmt(f),
        }
    }
}

/// Job offer with its required time interval and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    #[serde(rename = "startDate", deserialize_with = "flexible_instant")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate", deserialize_with = "flexible_instant")]
    pub end: DateTime<Utc>,
    pub address: OfferAddress,
}

impl Offer {
    /// Address as a single line of text, the form places are matched against
    pub fn address_line(&self) -> String {
        self.address.to_string()
    }
}

/// Subscription plan as returned by the plan service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
}

/// A candidate together with every availability window they declared
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub profile: CandidateProfile,
    pub windows: Vec<AvailabilityWindow>,
}

/// Accepts RFC 3339 strings as well as epoch milliseconds
fn flexible_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
        Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| serde::de::Error::custom(format!("invalid instant {:?}: {}", text, e))),
    }
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
