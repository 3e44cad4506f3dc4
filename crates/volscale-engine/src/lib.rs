//! volscale-engine: the resize decision engine.
//!
//! Given an invocation context (candidate volumes + sizing strategy)
//! and a volume directory, decides per volume whether to grow its
//! allocation and by how much, and applies the result unless the run
//! is dry.
//!
//! # Decision flow per volume
//!
//! ```text
//! fetch snapshot
//!   ├─ not available            → skip (not_available)
//!   ├─ replicating secondary    → skip (secondary_replica)
//!   └─ eligible
//!        target = compute_target(snapshot, strategy)
//!          ├─ target <= allocated → skip (no_growth_needed)
//!          ├─ dry run             → skip (dry_run), target reported
//!          └─ set_allocation(target)
//!               ├─ ok            → applied
//!               └─ err           → skip (mutation_failed), others continue
//! ```
//!
//! Targets never shrink a volume and are clamped to the platform's
//! 100 TiB maximum. No state survives an invocation; re-running with
//! unchanged usage is a no-op.

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::ResizeEngine;
pub use error::{EngineError, EngineResult};
pub use policy::compute_target;
