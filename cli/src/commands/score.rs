use std::path::Path;
use std::process::ExitCode;

use bidgate_common::config::EngineConfig;
use bidgate_common::ids::UserId;
use colored::*;

use crate::commands::check::RETRY_EXIT;
use crate::snapshot::Snapshot;
use crate::terminal::{colors, print};

pub async fn score(path: &Path, user: UserId, cfg: &EngineConfig) -> anyhow::Result<ExitCode> {
    let controller = Snapshot::load(path)?.into_controller(cfg).await;

    let thresholds = controller.conditions().thresholds().await;
    let trust = match controller.scorer().score_with(user, &thresholds).await {
        Ok(trust) => trust,
        Err(e) => {
            print::verdict("RETRY", colors::RETRY, &format!("rating store unavailable: {e}"));
            return Ok(ExitCode::from(RETRY_EXIT));
        }
    };
    let quota = controller.quota_mapper().quota_with(trust, &thresholds);

    let user = user.to_string();
    print::set_key_width(["User", "Trust score", "Quota"]);
    print::aligned_with_key("User", user.as_str());
    print::aligned_with_key("Trust score", trust.to_string().color(colors::ACCENT).bold());
    print::aligned_with_key("Quota", quota.to_string().color(colors::ACCENT).bold());
    Ok(ExitCode::SUCCESS)
}
