//! Volume domain types.
//!
//! A `VolumeSnapshot` is the engine's read-only view of one volume,
//! fetched fresh from the directory each invocation and discarded
//! once its outcome is computed. Nothing here is cached or persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest allocation the platform accepts for a single volume
/// (100 TiB). Proposed sizes above this are clamped down to it.
pub const MAX_VOLUME_SIZE: u64 = 100 * (1 << 40);

/// Identifies one volume. The volume API is region-scoped, so the
/// identifier carries the region alongside the opaque volume id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId {
    pub region: String,
    pub id: String,
}

impl VolumeId {
    pub fn new(region: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.id)
    }
}

/// Lifecycle state as reported by the directory. Only `Available`
/// volumes are eligible for resizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Available,
    /// Any non-available state (creating, deleting, error, ...).
    /// The engine treats them all the same, so the raw state string
    /// is kept only for reporting.
    Other(String),
}

/// Role of a volume in cross-region replication.
///
/// An actively replicating secondary is resized implicitly by
/// resizing its primary, so the engine never touches it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationRole {
    None,
    Primary,
    SecondaryActive,
}

// ── Service levels ─────────────────────────────────────────────────

/// Performance tier of a volume.
///
/// The platform grants write throughput proportional to the
/// provisioned allocation, with a per-tier rate and ceiling. The
/// `standard-sw` pseudo-level is the software storage class, which
/// reports itself as `basic` on the wire but delivers a different
/// rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceLevel {
    Basic,
    Standard,
    Extreme,
    StandardSw,
}

impl ServiceLevel {
    /// Parse the API-side service level name.
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "extreme" => Some(Self::Extreme),
            "standard-sw" => Some(Self::StandardSw),
            _ => None,
        }
    }

    /// The UI-side name differs from the wire name for historical
    /// reasons (the wire's "standard" is sold as "premium").
    pub fn ui_name(&self) -> &'static str {
        match self {
            Self::Basic => "standard",
            Self::Standard => "premium",
            Self::Extreme => "extreme",
            Self::StandardSw => "standard-sw",
        }
    }

    /// Sustained write rate in KiB/s per GiB of allocation.
    pub fn write_rate_kib_per_sec_per_gib(&self) -> u64 {
        match self {
            Self::Basic => 16,
            Self::Standard => 64,
            Self::Extreme => 128,
            Self::StandardSw => 128,
        }
    }

    /// Per-tier throughput ceiling in bytes/s. The rate stops scaling
    /// with allocation once it reaches this.
    pub fn write_rate_ceiling_bytes_per_sec(&self) -> u64 {
        match self {
            Self::Basic => 1 << 30,
            Self::Standard => 2 << 30,
            Self::Extreme => 4 << 30,
            Self::StandardSw => 4 << 30,
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Point-in-time view of one volume, as read from the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSnapshot {
    pub id: VolumeId,
    /// Human-readable volume name, reporting only.
    pub name: String,
    pub lifecycle_state: LifecycleState,
    pub replication_role: ReplicationRole,
    /// Consumed bytes, including snapshot blocks and metadata.
    /// Unaffected by the snapshot reserve setting.
    pub used_bytes: u64,
    /// Current provisioned quota in bytes.
    pub allocated_bytes: u64,
    pub service_level: ServiceLevel,
    /// Snapshot reserve percentage, reporting only.
    pub snap_reserve_percent: u64,
}
