//! Per-volume resize outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ServiceLevel, VolumeId};

/// Why a volume was not (or could not be) resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Lifecycle state is not `available`.
    NotAvailable,
    /// Actively replicating secondary; resizing the primary
    /// propagates.
    SecondaryReplica,
    /// Computed target does not exceed the current allocation.
    NoGrowthNeeded,
    /// Growth was needed but the invocation ran dry.
    DryRun,
    /// The volume could not be fetched from the directory.
    FetchFailed,
    /// The resize request was issued and rejected or lost.
    MutationFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotAvailable => "not available",
            Self::SecondaryReplica => "secondary replica",
            Self::NoGrowthNeeded => "no growth needed",
            Self::DryRun => "dry run",
            Self::FetchFailed => "fetch failed",
            Self::MutationFailed => "mutation failed",
        };
        f.write_str(s)
    }
}

/// Result of the engine's decision for one volume in one invocation.
/// Returned and logged, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeOutcome {
    pub volume_id: VolumeId,
    /// Reporting only; empty when the volume could not be fetched.
    pub volume_name: String,
    /// `None` when the volume could not be fetched.
    pub service_level: Option<ServiceLevel>,
    pub used_bytes: u64,
    pub previous_size: u64,
    pub proposed_size: u64,
    /// Snapshot reserve percentage, carried through for reporting.
    pub snap_reserve_percent: u64,
    pub applied: bool,
    pub skip_reason: Option<SkipReason>,
}

impl ResizeOutcome {
    /// Outcome for a volume whose snapshot could not be fetched; no
    /// size information is known.
    pub fn fetch_failed(volume_id: VolumeId) -> Self {
        Self {
            volume_id,
            volume_name: String::new(),
            service_level: None,
            used_bytes: 0,
            previous_size: 0,
            proposed_size: 0,
            snap_reserve_percent: 0,
            applied: false,
            skip_reason: Some(SkipReason::FetchFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_for_structured_reports() {
        let outcome = ResizeOutcome {
            volume_id: VolumeId::new("us-east4", "7a1b"),
            volume_name: "vol1".to_string(),
            service_level: Some(ServiceLevel::Standard),
            used_bytes: 1000,
            previous_size: 1000,
            proposed_size: 1250,
            snap_reserve_percent: 10,
            applied: false,
            skip_reason: Some(SkipReason::DryRun),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["skip_reason"], "dry_run");
        assert_eq!(value["volume_id"]["region"], "us-east4");
        assert_eq!(value["proposed_size"], 1250);
        assert_eq!(value["service_level"], "standard");
        assert_eq!(value["used_bytes"], 1000);
        assert_eq!(value["snap_reserve_percent"], 10);
    }

    #[test]
    fn fetch_failure_outcome_has_no_volume_details() {
        let outcome = ResizeOutcome::fetch_failed(VolumeId::new("us-east4", "ghost"));
        assert_eq!(outcome.service_level, None);
        assert_eq!(outcome.skip_reason, Some(SkipReason::FetchFailed));
        assert!(!outcome.applied);
    }
}
