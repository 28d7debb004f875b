use crate::core::plan::{FieldSet, Policy, Sampling};
use crate::models::{CandidateProfile, FreeView, PremiumView, TieredResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shape matching candidates for a recruiter's plan using the thread-local RNG
pub fn shape(matching: Vec<CandidateProfile>, policy: &Policy) -> Vec<TieredResult> {
    shape_with_rng(matching, policy, &mut rand::thread_rng())
}

/// Shape matching candidates for a recruiter's plan
///
/// With random sampling the selection is a uniform subset without
/// replacement, and the output order is not meaningful. Without sampling
/// every candidate is returned.
pub fn shape_with_rng<R: Rng + ?Sized>(
    mut matching: Vec<CandidateProfile>,
    policy: &Policy,
    rng: &mut R,
) -> Vec<TieredResult> {
    if policy.sampling == Sampling::RandomSubset {
        matching.shuffle(rng);
        if let Some(cap) = policy.max_results {
            matching.truncate(cap);
        }
    } else if let Some(cap) = policy.max_results {
        matching.truncate(cap);
    }

    matching
        .into_iter()
        .map(|candidate| project(candidate, policy.field_set))
        .collect()
}

fn project(candidate: CandidateProfile, field_set: FieldSet) -> TieredResult {
    match field_set {
        FieldSet::Minimal => TieredResult::Free(FreeView {
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            profile_picture_url: candidate.profile_picture_url,
        }),
        FieldSet::Full => TieredResult::Premium(PremiumView {
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            profile_picture_url: candidate.profile_picture_url,
            phone: candidate.phone,
            email: candidate.email,
        }),
    }
}
