use tracing::info;

use volscale_core::InvocationContext;
use volscale_directory::{Credential, CvsDirectory};
use volscale_engine::ResizeEngine;

use crate::report::{self, Format};

pub async fn run(
    project: String,
    credential: &str,
    interval: u32,
    margin: u32,
    dry_run: bool,
    format: &str,
) -> anyhow::Result<()> {
    let format = Format::parse(format)?;
    let credential = Credential::load(credential)?;
    info!(
        project = %project,
        credential = %credential,
        interval,
        margin,
        dry_run,
        "sweep parameters"
    );

    let directory = CvsDirectory::new(project.clone(), credential)?;
    let engine = ResizeEngine::new(directory);
    let ctx = InvocationContext::sweep(project, Some(interval), Some(margin), dry_run);

    let outcomes = engine.run(&ctx).await?;
    report::print(&outcomes, format);
    Ok(())
}
