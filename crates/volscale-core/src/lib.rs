//! volscale-core: domain types for the volume capacity manager.
//!
//! Shared vocabulary for the directory client, the sizing engine, and
//! the invocation adapters: what a volume looks like once fetched
//! (`VolumeSnapshot`), what an invocation asks for
//! (`InvocationContext` / `StrategyConfig`), and what the engine
//! reports back (`ResizeOutcome`).

pub mod context;
pub mod outcome;
pub mod types;

pub use context::{CandidateSet, InvocationContext, ResizeMode, StrategyConfig};
pub use outcome::{ResizeOutcome, SkipReason};
pub use types::{
    LifecycleState, MAX_VOLUME_SIZE, ReplicationRole, ServiceLevel, VolumeId, VolumeSnapshot,
};
