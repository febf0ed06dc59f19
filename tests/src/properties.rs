use bidgate_common::conditions::ConditionName;
use bidgate_core::quota::map_score;
use bidgate_core::reputation::TrustScore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::{ELECTRONICS, GARDEN, SELLER, World, request};

#[tokio::test]
async fn unrated_score_tracks_configured_scale() {
    for scale in [1, 2, 7, 10, 100] {
        let world = World::new();
        world.set(ConditionName::S, scale).await;
        let score = world.controller.scorer().score(SELLER).await.unwrap();
        assert_eq!(score, TrustScore::whole(scale));
    }
}

#[test]
fn anything_under_the_cutoff_maps_to_zero() {
    for scale in 2..=20_i64 {
        let cutoff = scale / 2;
        for tenths in 0..cutoff * 10 {
            let score = TrustScore::new(tenths, 10).unwrap();
            assert_eq!(map_score(score, scale, 20), 0, "S={scale} score={tenths}/10");
        }
    }
}

#[test]
fn boundary_quotas_under_defaults() {
    assert_eq!(map_score(TrustScore::whole(10), 10, 20), 20);
    assert_eq!(map_score(TrustScore::whole(5), 10, 20), 1);
}

#[test]
fn random_rating_sets_map_monotonically() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut scores: Vec<TrustScore> = (0..500)
        .map(|_| {
            let count = rng.random_range(1..=5);
            let grades: Vec<i64> = (0..count).map(|_| rng.random_range(1..=10)).collect();
            TrustScore::mean(grades).unwrap()
        })
        .collect();
    scores.sort();

    for (ceiling, pair) in [20_i64, 7, 1].iter().flat_map(|t| scores.windows(2).map(move |w| (*t, w))) {
        let low = map_score(pair[0], 10, ceiling);
        let high = map_score(pair[1], 10, ceiling);
        assert!(low <= high, "T={ceiling}: {} -> {low}, {} -> {high}", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn repeated_checks_agree() {
    let mut world = World::new();
    world.rate(SELLER, &[9, 3, 7, 6]).await;
    world.list(SELLER, ELECTRONICS, 1, 9).await;
    world.list(SELLER, GARDEN, 4, 12).await;

    for req in [request(ELECTRONICS, 2, 5), request(GARDEN, 20, 25), request(GARDEN, 9, 3)] {
        let first = world.controller.evaluate(&req).await.unwrap();
        let second = world.controller.evaluate(&req).await.unwrap();
        assert_eq!(first, second);
    }
}
