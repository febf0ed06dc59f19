use std::path::Path;
use std::process::ExitCode;

use bidgate_common::config::EngineConfig;
use bidgate_common::ids::{CategoryId, UserId};
use bidgate_common::listings::ListingWindow;
use bidgate_core::admission::ListingRequest;
use chrono::{DateTime, Utc};

use crate::snapshot::Snapshot;
use crate::terminal::{colors, format, print};

pub const DENIED_EXIT: u8 = 1;
pub const RETRY_EXIT: u8 = 2;

pub fn request(seller: u64, category: u64, start: DateTime<Utc>, end: DateTime<Utc>) -> ListingRequest {
    ListingRequest {
        seller: UserId(seller),
        category: CategoryId(category),
        window: ListingWindow::new(start, end),
    }
}

pub async fn check(path: &Path, request: ListingRequest, cfg: &EngineConfig) -> anyhow::Result<ExitCode> {
    let controller = Snapshot::load(path)?.into_controller(cfg).await;

    let report = match controller.evaluate(&request).await {
        Ok(report) => report,
        Err(e) => {
            print::verdict("RETRY", colors::RETRY, &e.to_string());
            return Ok(ExitCode::from(RETRY_EXIT));
        }
    };

    print::tree_head(&format!("seller {} in category {}", request.seller, request.category));
    print::as_tree_one_level(format::report_to_details(&report));

    let (label, color, detail) = format::decision_label(&report.decision);
    print::verdict(label, color, &detail);

    Ok(if report.decision.is_allowed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED_EXIT)
    })
}
