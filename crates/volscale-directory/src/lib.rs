//! volscale-directory: client for the cloud volume directory.
//!
//! The engine talks to the directory through the [`VolumeDirectory`]
//! trait: list the volumes of a project, fetch one volume, set one
//! volume's allocation. [`http::CvsDirectory`] implements it against
//! the cloud volume API; [`memory::MemoryDirectory`] is an in-memory
//! implementation for tests.

pub mod credential;
pub mod error;
pub mod http;
pub mod memory;

pub use credential::Credential;
pub use error::{DirectoryError, DirectoryResult};
pub use http::CvsDirectory;
pub use memory::MemoryDirectory;

use volscale_core::{VolumeId, VolumeSnapshot};

/// The minimal directory surface the resize engine consumes.
///
/// Implementations are scoped to one invocation; the engine holds no
/// connection state of its own and never caches snapshots across
/// calls.
#[allow(async_fn_in_trait)]
pub trait VolumeDirectory {
    /// All volumes of a project, across all regions.
    async fn list_volumes(&self, project: &str) -> DirectoryResult<Vec<VolumeSnapshot>>;

    /// One volume by region-scoped id.
    async fn get_volume(&self, id: &VolumeId) -> DirectoryResult<VolumeSnapshot>;

    /// Set a volume's provisioned allocation in bytes.
    async fn set_allocation(&self, id: &VolumeId, new_size_bytes: u64) -> DirectoryResult<()>;
}
