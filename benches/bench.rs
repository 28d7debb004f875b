// Criterion benchmarks for Recruit Match

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recruit_match::core::{availability::matches, find_matching, shape, PlanTier};
use recruit_match::models::{AvailabilityWindow, CandidateProfile, MatchCandidate, Offer, OfferAddress};
use uuid::Uuid;

const CITIES: [&str; 5] = ["Paris", "Lyon", "Marseille", "Lille", "Nantes"];

fn create_offer() -> Offer {
    Offer {
        id: Uuid::new_v4(),
        start: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap(),
        address: OfferAddress::Text("12 Rue de Paris, 75001 Paris, France".to_string()),
    }
}

fn create_candidate(id: usize, offer: &Offer) -> MatchCandidate {
    let windows = (0..(id % 4))
        .map(|w| AvailabilityWindow {
            id: Uuid::new_v4(),
            start: offer.start - Duration::days(((id + w) % 10) as i64 - 3),
            end: offer.end + Duration::days(((id * 7 + w) % 10) as i64 - 3),
            places: vec![CITIES[(id + w) % CITIES.len()].to_string()],
            job_title: None,
        })
        .collect();

    MatchCandidate {
        profile: CandidateProfile {
            id: Uuid::new_v4(),
            first_name: Some(format!("First {}", id)),
            last_name: Some(format!("Last {}", id)),
            profile_picture_url: None,
            phone: Some("+33600000000".to_string()),
            email: Some(format!("candidate{}@test.fr", id)),
            availability_ids: vec![],
        },
        windows,
    }
}

fn bench_window_match(c: &mut Criterion) {
    let offer = create_offer();
    let window = AvailabilityWindow {
        id: Uuid::new_v4(),
        start: offer.start - Duration::days(1),
        end: offer.end + Duration::days(1),
        places: CITIES.iter().rev().map(|c| c.to_string()).collect(),
        job_title: None,
    };

    c.bench_function("window_match", |b| {
        b.iter(|| matches(black_box(&window), black_box(&offer)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let offer = create_offer();
    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 100, 1000, 5000].iter() {
        let population: Vec<MatchCandidate> = (0..*candidate_count)
            .map(|i| create_candidate(i, &offer))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("find_matching", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| find_matching(black_box(population.clone()), black_box(&offer)));
            },
        );
    }

    group.finish();
}

fn bench_shaping(c: &mut Criterion) {
    let offer = create_offer();
    let profiles: Vec<CandidateProfile> = (0..1000)
        .map(|i| create_candidate(i, &offer).profile)
        .collect();
    let mut group = c.benchmark_group("shaping");

    for tier in [PlanTier::Free, PlanTier::Silver, PlanTier::Platinum] {
        let policy = tier.policy();
        group.bench_with_input(BenchmarkId::new("shape_1000", tier), &policy, |b, policy| {
            b.iter(|| shape(black_box(profiles.clone()), policy));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_window_match, bench_matching, bench_shaping);

criterion_main!(benches);
