//! Resize decision engine.
//!
//! Orchestrates one invocation: resolve the candidate volumes, apply
//! the sizing policy to each, and apply (or report) the resulting
//! resizes. Each volume goes through a single fetch→decide→mutate
//! pass; nothing is cached across invocations, so re-running is
//! always safe.

use tracing::{debug, info, warn};

use volscale_core::{
    CandidateSet, InvocationContext, LifecycleState, ReplicationRole, ResizeOutcome, SkipReason,
    StrategyConfig, VolumeSnapshot,
};
use volscale_directory::VolumeDirectory;

use crate::error::EngineResult;
use crate::policy;

/// Decides and applies volume resizes for one invocation.
pub struct ResizeEngine<D> {
    directory: D,
}

impl<D: VolumeDirectory> ResizeEngine<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Run one invocation and return one outcome per candidate
    /// volume.
    ///
    /// Configuration errors abort before any I/O. A failure to list a
    /// project's volumes aborts the invocation (there are no
    /// candidates to report on); per-volume fetch and mutation
    /// failures are recorded in that volume's outcome and never stop
    /// the remaining volumes.
    pub async fn run(&self, ctx: &InvocationContext) -> EngineResult<Vec<ResizeOutcome>> {
        policy::validate(&ctx.strategy)?;

        let mut outcomes = Vec::new();
        match &ctx.candidates {
            CandidateSet::Project(project) => {
                let snapshots = self.directory.list_volumes(project).await?;
                info!(project = %project, volumes = snapshots.len(), "evaluating project volumes");
                for snapshot in snapshots {
                    outcomes.push(self.decide(snapshot, &ctx.strategy).await?);
                }
            }
            CandidateSet::Volume(id) => match self.directory.get_volume(id).await {
                Ok(snapshot) => outcomes.push(self.decide(snapshot, &ctx.strategy).await?),
                Err(e) => {
                    warn!(volume = %id, error = %e, "volume fetch failed");
                    outcomes.push(ResizeOutcome::fetch_failed(id.clone()));
                }
            },
        }
        Ok(outcomes)
    }

    async fn decide(
        &self,
        snapshot: VolumeSnapshot,
        strategy: &StrategyConfig,
    ) -> EngineResult<ResizeOutcome> {
        if snapshot.lifecycle_state != LifecycleState::Available {
            debug!(volume = %snapshot.id, state = ?snapshot.lifecycle_state, "not available, skipping");
            return Ok(skipped(&snapshot, SkipReason::NotAvailable));
        }
        if snapshot.replication_role == ReplicationRole::SecondaryActive {
            debug!(volume = %snapshot.id, "secondary in active replication, skipping");
            return Ok(skipped(&snapshot, SkipReason::SecondaryReplica));
        }

        let proposed = policy::compute_target(&snapshot, strategy)?;

        if proposed <= snapshot.allocated_bytes {
            debug!(volume = %snapshot.id, allocated = snapshot.allocated_bytes, "no growth needed");
            return Ok(ResizeOutcome {
                skip_reason: Some(SkipReason::NoGrowthNeeded),
                ..sized(&snapshot, proposed)
            });
        }

        if strategy.dry_run {
            info!(
                volume = %snapshot.id,
                from = snapshot.allocated_bytes,
                to = proposed,
                "dry run, would resize"
            );
            return Ok(ResizeOutcome {
                skip_reason: Some(SkipReason::DryRun),
                ..sized(&snapshot, proposed)
            });
        }

        match self.directory.set_allocation(&snapshot.id, proposed).await {
            Ok(()) => {
                info!(
                    volume = %snapshot.id,
                    from = snapshot.allocated_bytes,
                    to = proposed,
                    "volume resized"
                );
                Ok(ResizeOutcome {
                    applied: true,
                    ..sized(&snapshot, proposed)
                })
            }
            Err(e) => {
                warn!(volume = %snapshot.id, error = %e, "resize failed");
                Ok(ResizeOutcome {
                    skip_reason: Some(SkipReason::MutationFailed),
                    ..sized(&snapshot, proposed)
                })
            }
        }
    }
}

/// Outcome for a volume that never reached the sizing policy.
fn skipped(snapshot: &VolumeSnapshot, reason: SkipReason) -> ResizeOutcome {
    ResizeOutcome {
        skip_reason: Some(reason),
        ..sized(snapshot, snapshot.allocated_bytes)
    }
}

/// Base outcome: not applied, no skip reason, sizes filled in.
fn sized(snapshot: &VolumeSnapshot, proposed: u64) -> ResizeOutcome {
    ResizeOutcome {
        volume_id: snapshot.id.clone(),
        volume_name: snapshot.name.clone(),
        service_level: Some(snapshot.service_level),
        used_bytes: snapshot.used_bytes,
        previous_size: snapshot.allocated_bytes,
        proposed_size: proposed,
        snap_reserve_percent: snapshot.snap_reserve_percent,
        applied: false,
        skip_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volscale_core::{ResizeMode, ServiceLevel, VolumeId};
    use volscale_directory::MemoryDirectory;

    fn volume(id: &str, used: u64, allocated: u64) -> VolumeSnapshot {
        VolumeSnapshot {
            id: VolumeId::new("europe-west1", id),
            name: format!("vol-{id}"),
            lifecycle_state: LifecycleState::Available,
            replication_role: ReplicationRole::None,
            used_bytes: used,
            allocated_bytes: allocated,
            service_level: ServiceLevel::Extreme,
            snap_reserve_percent: 0,
        }
    }

    fn static_sweep(margin: u32, dry_run: bool) -> InvocationContext {
        InvocationContext::sweep("test-project", Some(0), Some(margin), dry_run)
    }

    #[tokio::test]
    async fn grows_a_full_volume() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        let engine = ResizeEngine::new(directory);

        let outcomes = engine.run(&static_sweep(20, false)).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].applied);
        assert_eq!(outcomes[0].skip_reason, None);
        assert_eq!(outcomes[0].previous_size, 1000);
        assert_eq!(outcomes[0].proposed_size, 1250);
        // Volume details travel with the outcome for reporting.
        assert_eq!(outcomes[0].used_bytes, 1000);
        assert_eq!(outcomes[0].service_level, Some(ServiceLevel::Extreme));
        assert_eq!(
            engine.directory.mutations(),
            vec![(VolumeId::new("europe-west1", "a"), 1250)]
        );
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        let engine = ResizeEngine::new(directory);

        let first = engine.run(&static_sweep(20, false)).await.unwrap();
        assert!(first[0].applied);

        let second = engine.run(&static_sweep(20, false)).await.unwrap();
        assert!(!second[0].applied);
        assert_eq!(second[0].skip_reason, Some(SkipReason::NoGrowthNeeded));
        assert_eq!(engine.directory.mutations().len(), 1);
    }

    #[tokio::test]
    async fn dry_run_never_mutates() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        let engine = ResizeEngine::new(directory);

        let outcomes = engine.run(&static_sweep(20, true)).await.unwrap();

        assert!(!outcomes[0].applied);
        assert_eq!(outcomes[0].skip_reason, Some(SkipReason::DryRun));
        // The proposal is still computed and reported.
        assert_eq!(outcomes[0].proposed_size, 1250);
        assert!(engine.directory.mutations().is_empty());
    }

    #[tokio::test]
    async fn skips_unavailable_volume_regardless_of_usage() {
        let directory = MemoryDirectory::new();
        let mut v = volume("a", 1000, 1000);
        v.lifecycle_state = LifecycleState::Other("creating".to_string());
        directory.insert(v);
        let engine = ResizeEngine::new(directory);

        let outcomes = engine.run(&static_sweep(20, false)).await.unwrap();

        assert_eq!(outcomes[0].skip_reason, Some(SkipReason::NotAvailable));
        assert!(engine.directory.mutations().is_empty());
    }

    #[tokio::test]
    async fn skips_active_secondary_replica() {
        let directory = MemoryDirectory::new();
        let mut v = volume("a", 1000, 1000);
        v.replication_role = ReplicationRole::SecondaryActive;
        directory.insert(v);
        let engine = ResizeEngine::new(directory);

        let outcomes = engine.run(&static_sweep(20, false)).await.unwrap();

        assert_eq!(outcomes[0].skip_reason, Some(SkipReason::SecondaryReplica));
        assert!(engine.directory.mutations().is_empty());
    }

    #[tokio::test]
    async fn mutation_failure_does_not_stop_other_volumes() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        directory.insert(volume("b", 2000, 2000));
        directory.fail_mutations_for(VolumeId::new("europe-west1", "a"));
        let engine = ResizeEngine::new(directory);

        let outcomes = engine.run(&static_sweep(20, false)).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].skip_reason, Some(SkipReason::MutationFailed));
        assert!(!outcomes[0].applied);
        assert!(outcomes[1].applied);
        assert_eq!(outcomes[1].proposed_size, 2500);
    }

    #[tokio::test]
    async fn configuration_error_aborts_before_any_fetch() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        let engine = ResizeEngine::new(directory);

        let err = engine.run(&static_sweep(100, false)).await.unwrap_err();

        assert!(matches!(err, crate::error::EngineError::Configuration(_)));
        assert_eq!(engine.directory.list_calls(), 0);
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_invocation() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        directory.fail_listing();
        let engine = ResizeEngine::new(directory);

        let err = engine.run(&static_sweep(20, false)).await.unwrap_err();

        // With no candidate list there is nothing to report per volume.
        assert!(matches!(err, crate::error::EngineError::Directory(_)));
        assert!(engine.directory.mutations().is_empty());
    }

    #[tokio::test]
    async fn alert_invocation_targets_one_volume() {
        let directory = MemoryDirectory::new();
        directory.insert(volume("a", 1000, 1000));
        directory.insert(volume("b", 2000, 2000));
        let engine = ResizeEngine::new(directory);

        let ctx =
            InvocationContext::alert(VolumeId::new("europe-west1", "b"), Some(20), false);
        assert_eq!(ctx.strategy.mode, ResizeMode::Static);

        let outcomes = engine.run(&ctx).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].volume_id, VolumeId::new("europe-west1", "b"));
        assert!(outcomes[0].applied);
        // Only the named volume was touched.
        assert_eq!(engine.directory.mutations().len(), 1);
    }

    #[tokio::test]
    async fn alert_for_missing_volume_reports_fetch_failure() {
        let directory = MemoryDirectory::new();
        let engine = ResizeEngine::new(directory);

        let ctx = InvocationContext::alert(VolumeId::new("us-east4", "ghost"), None, false);
        let outcomes = engine.run(&ctx).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].skip_reason, Some(SkipReason::FetchFailed));
        assert!(!outcomes[0].applied);
    }

    #[tokio::test]
    async fn dynamic_sweep_sizes_for_the_interval() {
        let directory = MemoryDirectory::new();
        // Nearly-full extreme volume.
        directory.insert(volume("a", 10 << 30, 10 << 30));
        let engine = ResizeEngine::new(directory);

        let ctx = InvocationContext::sweep("test-project", Some(60), Some(10), false);
        let outcomes = engine.run(&ctx).await.unwrap();

        assert!(outcomes[0].applied);
        assert!(outcomes[0].proposed_size > 10 << 30);

        // Immediately afterwards, nothing more to do.
        let again = engine.run(&ctx).await.unwrap();
        assert_eq!(again[0].skip_reason, Some(SkipReason::NoGrowthNeeded));
    }
}
