use bidgate_common::conditions::ConditionName;
use bidgate_common::config::{CategoryScope, EngineConfig};
use bidgate_core::admission::{Decision, DenialReason};
use bidgate_core::reputation::TrustScore;

use crate::fixtures::{ELECTRONICS, GARDEN, OTHER_SELLER, SELLER, World, request};

#[tokio::test]
async fn unrated_seller_gets_full_quota() {
    let world = World::new();

    let score = world.controller.scorer().score(SELLER).await.unwrap();
    assert_eq!(score, TrustScore::whole(10));
    assert_eq!(world.controller.quota_mapper().quota(score).await, 20);

    let report = world.controller.evaluate(&request(ELECTRONICS, 1, 3)).await.unwrap();
    assert_eq!(report.decision, Decision::Allowed);
    assert_eq!(report.max_active, Some(10));
    assert_eq!(report.max_per_category, Some(5));
}

#[tokio::test]
async fn three_ratings_average_without_padding() {
    let mut world = World::new();
    world.rate(SELLER, &[10, 6, 8]).await;

    let report = world.controller.evaluate(&request(ELECTRONICS, 1, 3)).await.unwrap();
    assert_eq!(report.trust_score, Some(TrustScore::whole(8)));
    // 1 + 19/5 * 3 = 12.4
    assert_eq!(report.quota, Some(12));
    assert!(report.decision.is_allowed());
}

#[tokio::test]
async fn below_half_scale_is_denied_outright() {
    let mut world = World::new();
    world.rate(SELLER, &[4, 4, 4]).await;

    for (start, end) in [(1, 2), (30, 40), (100, 101)] {
        let decision = world.controller.can_list(&request(GARDEN, start, end)).await.unwrap();
        assert_eq!(decision, Decision::Denied(DenialReason::QuotaExceeded));
    }
}

#[tokio::test]
async fn full_active_slate_blocks_everything() {
    let mut world = World::new();
    for i in 0..10 {
        world.list(SELLER, ELECTRONICS, i, i + 20).await;
    }

    for category in [ELECTRONICS, GARDEN] {
        let decision = world.controller.can_list(&request(category, 50, 60)).await.unwrap();
        assert_eq!(decision, Decision::Denied(DenialReason::TooManyActiveListings));
    }

    world.rate(SELLER, &[10, 10, 10]).await;
    let decision = world.controller.can_list(&request(GARDEN, 50, 60)).await.unwrap();
    assert_eq!(decision, Decision::Denied(DenialReason::TooManyActiveListings));
}

#[tokio::test]
async fn shared_boundary_day_counts_as_overlap() {
    let mut world = World::new();
    world.list(SELLER, ELECTRONICS, 5, 10).await;

    let report = world.controller.evaluate(&request(GARDEN, 10, 15)).await.unwrap();
    assert_eq!(report.overlapping, Some(1));
    assert!(report.decision.is_allowed());

    // A seller sitting exactly at the cutoff has a quota of one, already used.
    world.rate(SELLER, &[5]).await;
    let decision = world.controller.can_list(&request(GARDEN, 10, 15)).await.unwrap();
    assert_eq!(decision, Decision::Denied(DenialReason::QuotaExceeded));

    let decision = world.controller.can_list(&request(GARDEN, 11, 15)).await.unwrap();
    assert_eq!(decision, Decision::Allowed);
}

#[tokio::test]
async fn other_sellers_listings_do_not_count() {
    let mut world = World::new();
    world.set(ConditionName::K, 1).await;
    world.list(OTHER_SELLER, ELECTRONICS, 1, 30).await;

    let decision = world.controller.can_list(&request(ELECTRONICS, 1, 30)).await.unwrap();
    assert_eq!(decision, Decision::Allowed);
}

#[tokio::test]
async fn category_cap_counts_finished_listings_by_default() {
    let mut world = World::new();
    world.set(ConditionName::M, 2).await;
    world.list(SELLER, GARDEN, -30, -20).await;
    world.list(SELLER, GARDEN, -10, -5).await;

    let report = world.controller.evaluate(&request(GARDEN, 1, 5)).await.unwrap();
    assert_eq!(report.in_category, Some(2));
    assert_eq!(report.decision, Decision::Denied(DenialReason::CategoryLimitExceeded));

    let decision = world.controller.can_list(&request(ELECTRONICS, 1, 5)).await.unwrap();
    assert_eq!(decision, Decision::Allowed);
}

#[tokio::test]
async fn windowed_category_scope_counts_only_overlaps() {
    let mut world = World::with_config(EngineConfig {
        category_scope: CategoryScope::CategoryWindow,
        ..EngineConfig::default()
    });
    world.set(ConditionName::M, 2).await;
    world.list(SELLER, GARDEN, -30, -20).await;
    world.list(SELLER, GARDEN, -10, -5).await;
    world.list(SELLER, GARDEN, 3, 8).await;

    let report = world.controller.evaluate(&request(GARDEN, 1, 5)).await.unwrap();
    assert_eq!(report.in_category, Some(1));
    assert!(report.decision.is_allowed());
}

#[tokio::test]
async fn new_ratings_change_the_next_decision() {
    let mut world = World::new();
    world.list(SELLER, ELECTRONICS, 1, 10).await;
    world.list(SELLER, ELECTRONICS, 2, 10).await;

    assert!(world.controller.can_list(&request(GARDEN, 5, 6)).await.unwrap().is_allowed());

    // Five sixes: score 6, quota round(4.8) = 5, still room for a third.
    world.rate(SELLER, &[6, 6, 6, 6, 6]).await;
    assert!(world.controller.can_list(&request(GARDEN, 5, 6)).await.unwrap().is_allowed());

    // Five fives push the sixes out of the window: quota 1, two overlaps.
    world.rate(SELLER, &[5, 5, 5, 5, 5]).await;
    let decision = world.controller.can_list(&request(GARDEN, 5, 6)).await.unwrap();
    assert_eq!(decision, Decision::Denied(DenialReason::QuotaExceeded));
}

#[tokio::test]
async fn configured_thresholds_override_defaults() {
    let mut world = World::new();
    world.set(ConditionName::S, 5).await;
    world.set(ConditionName::T, 3).await;
    world.set(ConditionName::N, 2).await;
    world.rate(SELLER, &[1, 1, 5, 5]).await;

    let report = world.controller.evaluate(&request(ELECTRONICS, 1, 2)).await.unwrap();
    assert_eq!(report.trust_score, Some(TrustScore::whole(5)));
    assert_eq!(report.quota, Some(3));
}

#[tokio::test]
async fn sentinel_condition_behaves_as_unset() {
    let mut world = World::new();
    world.set(ConditionName::K, -1).await;
    for i in 0..9 {
        world.list(SELLER, ELECTRONICS, i, i + 20).await;
    }

    let report = world.controller.evaluate(&request(GARDEN, 100, 101)).await.unwrap();
    assert_eq!(report.max_active, Some(10));
    assert!(report.decision.is_allowed());
}
