use crate::auth::TokenClaims;
use crate::core::{availability::is_eligible, plan::resolve_policy, shaper::shape};
use crate::error::MatchError;
use crate::models::{AvailabilityWindow, CandidateProfile, MatchCandidate, Offer, TieredResult, UserProfile};
use crate::services::{AvailabilityStore, OfferStore, PlanStore, ServiceError, UserDirectory};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use uuid::Uuid;

/// Default number of availability lookups in flight per matching call
pub const DEFAULT_AVAILABILITY_CONCURRENCY: usize = 8;

/// External services the orchestrator reads from
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserDirectory>,
    pub availabilities: Arc<dyn AvailabilityStore>,
    pub offers: Arc<dyn OfferStore>,
    pub plans: Arc<dyn PlanStore>,
}

/// Main matching orchestrator - matches candidates against an offer for a recruiter
///
/// # Pipeline Stages
/// 1. Caller resolution (token subject, recruiter, plan id)
/// 2. Candidate population and availability fan-out
/// 3. Offer lookup and availability matching
/// 4. Plan resolution and result shaping
///
/// Every call works on a freshly fetched snapshot and either returns the
/// full result or an error; nothing is cached between calls.
#[derive(Clone)]
pub struct MatchingOrchestrator {
    collaborators: Collaborators,
    claims: TokenClaims,
    concurrency: usize,
}

impl MatchingOrchestrator {
    pub fn new(collaborators: Collaborators, claims: TokenClaims) -> Self {
        Self {
            collaborators,
            claims,
            concurrency: DEFAULT_AVAILABILITY_CONCURRENCY,
        }
    }

    /// Bound the number of concurrent availability lookups
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Match every candidate against an offer, shaped for the calling recruiter's plan
    ///
    /// # Arguments
    /// * `offer_id` - The offer to match candidates with
    /// * `bearer` - The caller's `Authorization` header value, forwarded to collaborators
    pub async fn match_users_with_offer(
        &self,
        offer_id: Uuid,
        bearer: &str,
    ) -> Result<Vec<TieredResult>, MatchError> {
        let subject = self
            .claims
            .subject_of(bearer)
            .ok_or_else(|| MatchError::Unauthorized("No subject in token".to_string()))?;
        let token = TokenClaims::raw_token(bearer)
            .ok_or_else(|| MatchError::Unauthorized("Missing bearer token".to_string()))?;

        tracing::info!("Getting all users matching with offer {} for {}", offer_id, subject);

        let plan_id = self.recruiter_plan_id(&subject).await?;

        let population = self.load_population(token).await?;
        let total_windows: usize = population.iter().map(|c| c.windows.len()).sum();

        if total_windows == 0 {
            tracing::info!(
                "No availability declared by {} candidates, skipping offer {}",
                population.len(),
                offer_id
            );
            return Ok(Vec::new());
        }

        let offer = self.collaborators.offers.get_offer(offer_id, token).await?;
        let total_candidates = population.len();
        let matching = find_matching(population, &offer);

        tracing::debug!(
            "{} of {} candidates match offer {}",
            matching.len(),
            total_candidates,
            offer_id
        );

        let plan = self.collaborators.plans.get_plan(plan_id, token).await?;
        let policy = resolve_policy(&plan.name)?;
        let results = shape(matching, &policy);

        tracing::info!(
            "Returning {} matches for offer {} (plan {}, from {} candidates)",
            results.len(),
            offer_id,
            plan.name,
            total_candidates
        );

        Ok(results)
    }

    async fn recruiter_plan_id(&self, subject: &str) -> Result<Uuid, MatchError> {
        let caller = match self.collaborators.users.get_user(subject).await {
            Ok(user) => user,
            Err(ServiceError::NotFound { .. }) => {
                return Err(MatchError::Unauthorized("Invalid user".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        match caller {
            UserProfile::Recruiter(recruiter) => recruiter.plan_id.ok_or_else(|| {
                MatchError::Unauthorized("No plan associated with recruiter".to_string())
            }),
            _ => Err(MatchError::Unauthorized("Invalid user".to_string())),
        }
    }

    /// Fetch every candidate with all of their availability windows
    ///
    /// Lookups run concurrently up to the configured bound. The first failure
    /// aborts the whole load and drops the lookups still in flight.
    async fn load_population(&self, token: &str) -> Result<Vec<MatchCandidate>, MatchError> {
        let candidates = self.collaborators.users.list_candidates().await?;

        let requests: Vec<(usize, Uuid)> = candidates
            .iter()
            .enumerate()
            .flat_map(|(idx, candidate)| candidate.availability_ids.iter().map(move |id| (idx, *id)))
            .collect();

        tracing::debug!(
            "Fetching {} availabilities for {} candidates",
            requests.len(),
            candidates.len()
        );

        let store = self.collaborators.availabilities.as_ref();
        let fetched: Vec<(usize, AvailabilityWindow)> = stream::iter(requests)
            .map(|(idx, window_id)| async move {
                store
                    .get_availability(window_id, token)
                    .await
                    .map(|window| (idx, window))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut windows: Vec<Vec<AvailabilityWindow>> = vec![Vec::new(); candidates.len()];
        for (idx, window) in fetched {
            windows[idx].push(window);
        }

        Ok(candidates
            .into_iter()
            .zip(windows)
            .map(|(profile, windows)| MatchCandidate { profile, windows })
            .collect())
    }
}

/// Keep the candidates with at least one window covering the offer
///
/// Each candidate appears at most once however many of their windows match.
pub fn find_matching(population: Vec<MatchCandidate>, offer: &Offer) -> Vec<CandidateProfile> {
    population
        .into_iter()
        .filter(|candidate| is_eligible(&candidate.windows, offer))
        .map(|candidate| candidate.profile)
        .collect()
}
