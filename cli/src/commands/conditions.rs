use std::path::Path;
use std::process::ExitCode;

use bidgate_common::config::EngineConfig;

use crate::snapshot::Snapshot;
use crate::terminal::{format, print};

pub async fn conditions(path: &Path, cfg: &EngineConfig) -> anyhow::Result<ExitCode> {
    let controller = Snapshot::load(path)?.into_controller(cfg).await;
    let resolved = controller.conditions().resolve_all().await;

    print::as_tree_one_level(resolved.iter().map(format::condition_to_detail).collect());
    Ok(ExitCode::SUCCESS)
}
