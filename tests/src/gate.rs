use std::sync::Arc;

use bidgate_common::conditions::ConditionName;
use bidgate_common::listings::ListingWindow;
use bidgate_core::admission::{DenialReason, ListingRequest};
use bidgate_core::gate::{GateOutcome, ListingGate};

use crate::fixtures::{ELECTRONICS, OTHER_SELLER, SELLER, World, day, request};

fn gate(world: &World) -> Arc<ListingGate> {
    Arc::new(ListingGate::new(
        world.controller.clone(),
        Arc::new(world.listings.clone()),
        std::time::Duration::from_secs(1),
    ))
}

async fn submit_many(gate: &Arc<ListingGate>, requests: Vec<ListingRequest>) -> Vec<GateOutcome> {
    let handles: Vec<_> = requests
        .into_iter()
        .map(|req| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.submit(req).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }
    outcomes
}

fn listed(outcomes: &[GateOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| matches!(o, GateOutcome::Listed(_)))
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_from_one_seller_stops_at_the_category_cap() {
    let world = World::new();
    world.set(ConditionName::M, 3).await;
    let gate = gate(&world);

    let requests = (0..12).map(|i| request(ELECTRONICS, 100 + i, 101 + i)).collect();
    let outcomes = submit_many(&gate, requests).await;

    assert_eq!(listed(&outcomes), 3);
    assert_eq!(world.listings.len().await, 3);
    assert!(outcomes
        .iter()
        .filter_map(|o| match o {
            GateOutcome::Rejected(reason) => Some(*reason),
            GateOutcome::Listed(_) => None,
        })
        .all(|r| r == DenialReason::CategoryLimitExceeded));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_stops_at_the_quota() {
    let mut world = World::new();
    // Score 6 earns a quota of 5 overlapping listings.
    world.rate(SELLER, &[6]).await;
    world.set(ConditionName::M, 100).await;
    world.set(ConditionName::K, 100).await;
    let gate = gate(&world);

    let requests = (0..10).map(|_| request(ELECTRONICS, 10, 20)).collect();
    let outcomes = submit_many(&gate, requests).await;

    assert_eq!(listed(&outcomes), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sellers_do_not_block_each_other() {
    let world = World::new();
    world.set(ConditionName::K, 1).await;
    let gate = gate(&world);

    let window = ListingWindow::new(day(3), day(4));
    let requests = vec![
        ListingRequest {
            seller: SELLER,
            category: ELECTRONICS,
            window,
        },
        ListingRequest {
            seller: OTHER_SELLER,
            category: ELECTRONICS,
            window,
        },
    ];
    let outcomes = submit_many(&gate, requests).await;

    assert_eq!(listed(&outcomes), 2);
}
