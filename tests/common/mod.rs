// Shared fixtures for the integration and API tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use recruit_match::core::{Collaborators, MatchingOrchestrator};
use recruit_match::models::{
    AvailabilityWindow, CandidateProfile, Offer, OfferAddress, Plan, RecruiterProfile, UserProfile,
};
use recruit_match::services::{
    AvailabilityStore, OfferStore, PlanStore, Resource, ServiceError, UserDirectory,
};
use recruit_match::TokenClaims;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub const OFFER_ADDRESS: &str = "12 Rue de Paris, Paris";

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn bearer_for(subject: &str) -> String {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({ "sub": subject }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    format!("Bearer {}", token)
}

/// In-memory identity store with call counters
#[derive(Default)]
pub struct FakeDirectory {
    pub users: Mutex<HashMap<String, UserProfile>>,
    pub fail_listing: bool,
    pub list_calls: AtomicUsize,
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(ServiceError::Api {
                resource: Resource::User,
                status: 500,
            });
        }

        let users = self.users.lock().unwrap();
        let mut candidates: Vec<CandidateProfile> = users
            .values()
            .cloned()
            .filter_map(UserProfile::into_candidate)
            .collect();
        candidates.sort_by_key(|c| c.id);
        Ok(candidates)
    }

    async fn get_user(&self, subject_id: &str) -> Result<UserProfile, ServiceError> {
        self.users
            .lock()
            .unwrap()
            .get(subject_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: Resource::User,
                id: subject_id.to_string(),
            })
    }
}

/// In-memory availability, offer and plan services with call counters
#[derive(Default)]
pub struct FakeStores {
    pub windows: Mutex<HashMap<Uuid, AvailabilityWindow>>,
    pub offers: Mutex<HashMap<Uuid, Offer>>,
    pub plans: Mutex<HashMap<Uuid, Plan>>,
    pub failing_windows: Mutex<Vec<Uuid>>,
    pub availability_calls: AtomicUsize,
    pub offer_calls: AtomicUsize,
    pub plan_calls: AtomicUsize,
    pub tokens: Mutex<Vec<String>>,
}

#[async_trait]
impl AvailabilityStore for FakeStores {
    async fn get_availability(&self, window_id: Uuid, token: &str) -> Result<AvailabilityWindow, ServiceError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());

        if self.failing_windows.lock().unwrap().contains(&window_id) {
            return Err(ServiceError::Api {
                resource: Resource::Availability,
                status: 503,
            });
        }

        self.windows
            .lock()
            .unwrap()
            .get(&window_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: Resource::Availability,
                id: window_id.to_string(),
            })
    }
}

#[async_trait]
impl OfferStore for FakeStores {
    async fn get_offer(&self, offer_id: Uuid, token: &str) -> Result<Offer, ServiceError> {
        self.offer_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());

        self.offers
            .lock()
            .unwrap()
            .get(&offer_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: Resource::Offer,
                id: offer_id.to_string(),
            })
    }
}

#[async_trait]
impl PlanStore for FakeStores {
    async fn get_plan(&self, plan_id: Uuid, token: &str) -> Result<Plan, ServiceError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());

        self.plans
            .lock()
            .unwrap()
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: Resource::Plan,
                id: plan_id.to_string(),
            })
    }
}

/// Availability store that answers after a delay and records peak concurrency
pub struct SlowAvailability {
    pub inner: Arc<FakeStores>,
    pub delay: Duration,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl SlowAvailability {
    pub fn new(inner: Arc<FakeStores>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityStore for SlowAvailability {
    async fn get_availability(&self, window_id: Uuid, token: &str) -> Result<AvailabilityWindow, ServiceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        let result = self.inner.get_availability(window_id, token).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A recruiter, an offer and a configurable candidate population
pub struct Fixture {
    pub directory: Arc<FakeDirectory>,
    pub stores: Arc<FakeStores>,
    pub recruiter_id: Uuid,
    pub offer_id: Uuid,
}

impl Fixture {
    /// Recruiter subscribed to `plan_name`, offer in Paris for June 2024
    pub fn new(plan_name: &str) -> Self {
        Self::with_directory(plan_name, FakeDirectory::default())
    }

    pub fn with_directory(plan_name: &str, directory: FakeDirectory) -> Self {
        let recruiter_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let offer_id = Uuid::new_v4();

        directory.users.lock().unwrap().insert(
            recruiter_id.to_string(),
            UserProfile::Recruiter(RecruiterProfile {
                id: recruiter_id,
                first_name: Some("Rita".to_string()),
                last_name: Some("Recruiter".to_string()),
                email: Some("rita@company.fr".to_string()),
                company_id: Some(Uuid::new_v4()),
                plan_id: Some(plan_id),
            }),
        );

        let stores = FakeStores::default();
        stores.plans.lock().unwrap().insert(
            plan_id,
            Plan {
                id: Some(plan_id),
                name: plan_name.to_string(),
            },
        );
        stores.offers.lock().unwrap().insert(
            offer_id,
            Offer {
                id: offer_id,
                start: day(2024, 6, 1),
                end: day(2024, 6, 30),
                address: OfferAddress::Text(OFFER_ADDRESS.to_string()),
            },
        );

        Self {
            directory: Arc::new(directory),
            stores: Arc::new(stores),
            recruiter_id,
            offer_id,
        }
    }

    /// Add a candidate with one window per entry of `windows`
    pub fn add_candidate(&self, windows: &[(DateTime<Utc>, DateTime<Utc>, &[&str])]) -> Uuid {
        let id = Uuid::new_v4();
        let mut availability_ids = Vec::new();

        for (start, end, places) in windows {
            let window_id = Uuid::new_v4();
            availability_ids.push(window_id);
            self.stores.windows.lock().unwrap().insert(
                window_id,
                AvailabilityWindow {
                    id: window_id,
                    start: *start,
                    end: *end,
                    places: places.iter().map(|p| p.to_string()).collect(),
                    job_title: None,
                },
            );
        }

        self.directory.users.lock().unwrap().insert(
            id.to_string(),
            UserProfile::Candidate(CandidateProfile {
                id,
                first_name: Some(format!("First {}", id)),
                last_name: Some("Candidate".to_string()),
                profile_picture_url: Some(format!("https://cdn.test/{}.png", id)),
                phone: Some("+33600000000".to_string()),
                email: Some(format!("{}@candidates.fr", id)),
                availability_ids,
            }),
        );

        id
    }

    /// Candidate available for the whole offer in Paris
    pub fn add_matching_candidate(&self) -> Uuid {
        self.add_candidate(&[(day(2024, 5, 1), day(2024, 7, 1), &["Paris"])])
    }

    pub fn add_user(&self, profile: UserProfile) {
        self.directory
            .users
            .lock()
            .unwrap()
            .insert(profile.id().to_string(), profile);
    }

    pub fn orchestrator(&self) -> MatchingOrchestrator {
        self.orchestrator_with(self.stores.clone(), 4)
    }

    /// Orchestrator reading availabilities from `availabilities` instead of the fake stores
    pub fn orchestrator_with(
        &self,
        availabilities: Arc<dyn AvailabilityStore>,
        concurrency: usize,
    ) -> MatchingOrchestrator {
        MatchingOrchestrator::new(
            Collaborators {
                users: self.directory.clone(),
                availabilities,
                offers: self.stores.clone(),
                plans: self.stores.clone(),
            },
            TokenClaims::unverified(),
        )
        .with_concurrency(concurrency)
    }

    pub fn recruiter_bearer(&self) -> String {
        bearer_for(&self.recruiter_id.to_string())
    }

    pub fn offer_calls(&self) -> usize {
        self.stores.offer_calls.load(Ordering::SeqCst)
    }

    pub fn plan_calls(&self) -> usize {
        self.stores.plan_calls.load(Ordering::SeqCst)
    }

    pub fn availability_calls(&self) -> usize {
        self.stores.availability_calls.load(Ordering::SeqCst)
    }
}
