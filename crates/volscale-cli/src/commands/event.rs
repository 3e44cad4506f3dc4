//! Queued invocation messages.
//!
//! Two payload shapes arrive on the queue: a scheduled sweep message
//! (project-wide, carries its own interval) and a monitoring alert
//! (one volume crossed its usage threshold). Alerts carry no timing
//! guarantee, so they always use the static strategy; the alerting
//! system may also deliver duplicates or a closing notification for
//! an already-handled breach, both of which are safe to reprocess.

use std::fs;
use std::io::Read;

use anyhow::Context as _;
use serde::Deserialize;
use tracing::info;

use volscale_core::{InvocationContext, VolumeId};
use volscale_directory::{Credential, CvsDirectory};
use volscale_engine::ResizeEngine;

use crate::report::{self, Format};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventPayload {
    Alert(AlertMessage),
    Scheduled(ScheduledMessage),
}

/// Monitoring alert: one volume breached its usage threshold.
#[derive(Debug, Deserialize)]
struct AlertMessage {
    incident: Incident,
}

#[derive(Debug, Deserialize)]
struct Incident {
    state: String,
    resource: IncidentResource,
}

#[derive(Debug, Deserialize)]
struct IncidentResource {
    labels: IncidentLabels,
}

#[derive(Debug, Deserialize)]
struct IncidentLabels {
    /// Project identifier, reporting only.
    project_id: String,
    /// Project number, used for API calls.
    resource_container: String,
    location: String,
    volume_id: String,
    #[serde(default)]
    name: String,
}

/// Scheduled sweep message for a whole project.
#[derive(Debug, Deserialize)]
struct ScheduledMessage {
    projectid: String,
    /// Minutes between scheduled runs; 0 selects the static strategy.
    duration: u32,
    #[serde(default)]
    margin: Option<u32>,
    #[serde(default)]
    dry_mode: bool,
}

pub async fn run(credential: &str, payload: &str, margin: u32, dry_run: bool) -> anyhow::Result<()> {
    let raw = read_payload(payload)?;
    let event: EventPayload =
        serde_json::from_str(&raw).context("payload is neither a sweep message nor an alert")?;
    let credential = Credential::load(credential)?;

    match event {
        EventPayload::Alert(alert) => handle_alert(alert, credential, margin, dry_run).await,
        EventPayload::Scheduled(msg) => handle_scheduled(msg, credential, margin, dry_run).await,
    }
}

async fn handle_alert(
    alert: AlertMessage,
    credential: Credential,
    margin: u32,
    dry_run: bool,
) -> anyhow::Result<()> {
    let labels = alert.incident.resource.labels;
    let volume = VolumeId::new(labels.location, labels.volume_id);

    if alert.incident.state == "closed" {
        info!(volume = %volume, name = %labels.name, "incident resolved, nothing to do");
        return Ok(());
    }

    info!(
        project = %labels.project_id,
        volume = %volume,
        name = %labels.name,
        "alert invocation"
    );

    let directory = CvsDirectory::new(labels.resource_container, credential)?;
    let engine = ResizeEngine::new(directory);
    // Alerts force the static strategy; see InvocationContext::alert.
    let ctx = InvocationContext::alert(volume, Some(margin), dry_run);

    let outcomes = engine.run(&ctx).await?;
    report::print(&outcomes, Format::Json);
    Ok(())
}

async fn handle_scheduled(
    msg: ScheduledMessage,
    credential: Credential,
    margin: u32,
    dry_run: bool,
) -> anyhow::Result<()> {
    info!(
        project = %msg.projectid,
        duration = msg.duration,
        "scheduled invocation"
    );

    let directory = CvsDirectory::new(msg.projectid.clone(), credential)?;
    let engine = ResizeEngine::new(directory);
    let ctx = InvocationContext::sweep(
        msg.projectid,
        Some(msg.duration),
        Some(msg.margin.unwrap_or(margin)),
        dry_run || msg.dry_mode,
    );

    let outcomes = engine.run(&ctx).await?;
    report::print(&outcomes, Format::Json);
    Ok(())
}

fn read_payload(payload: &str) -> anyhow::Result<String> {
    if payload == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("reading payload from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(payload).with_context(|| format!("reading payload file {payload}"))
    }
}
