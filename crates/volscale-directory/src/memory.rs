//! In-memory volume directory for tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use volscale_core::{VolumeId, VolumeSnapshot};

use crate::error::{DirectoryError, DirectoryResult};
use crate::VolumeDirectory;

/// Directory backed by a seeded set of snapshots. Applied mutations
/// update the stored snapshots, so repeated engine runs observe their
/// own earlier resizes.
#[derive(Default)]
pub struct MemoryDirectory {
    volumes: Mutex<Vec<VolumeSnapshot>>,
    mutations: Mutex<Vec<(VolumeId, u64)>>,
    failing: Mutex<HashSet<VolumeId>>,
    listing_fails: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a snapshot.
    pub fn insert(&self, snapshot: VolumeSnapshot) {
        self.volumes.lock().unwrap().push(snapshot);
    }

    /// Make `set_allocation` fail for the given volume.
    pub fn fail_mutations_for(&self, id: VolumeId) {
        self.failing.lock().unwrap().insert(id);
    }

    /// Make every `list_volumes` call fail.
    pub fn fail_listing(&self) {
        self.listing_fails.store(true, Ordering::SeqCst);
    }

    /// All `set_allocation` calls accepted so far, in order.
    pub fn mutations(&self) -> Vec<(VolumeId, u64)> {
        self.mutations.lock().unwrap().clone()
    }

    /// Number of `list_volumes` calls observed.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl VolumeDirectory for MemoryDirectory {
    // Mirrors the HTTP client's contract closely enough for engine
    // tests: applied mutations are visible to later reads.
    async fn list_volumes(&self, _project: &str) -> DirectoryResult<Vec<VolumeSnapshot>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_fails.load(Ordering::SeqCst) {
            return Err(DirectoryError::Api {
                status: 503,
                message: "injected listing failure".to_string(),
            });
        }
        Ok(self.volumes.lock().unwrap().clone())
    }

    async fn get_volume(&self, id: &VolumeId) -> DirectoryResult<VolumeSnapshot> {
        self.volumes
            .lock()
            .unwrap()
            .iter()
            .find(|v| &v.id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::VolumeNotFound(id.to_string()))
    }

    async fn set_allocation(&self, id: &VolumeId, new_size_bytes: u64) -> DirectoryResult<()> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(DirectoryError::Api {
                status: 500,
                message: "injected mutation failure".to_string(),
            });
        }
        let mut volumes = self.volumes.lock().unwrap();
        let volume = volumes
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| DirectoryError::VolumeNotFound(id.to_string()))?;
        volume.allocated_bytes = new_size_bytes;
        self.mutations
            .lock()
            .unwrap()
            .push((id.clone(), new_size_bytes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volscale_core::{LifecycleState, ReplicationRole, ServiceLevel};

    fn snapshot(id: &str) -> VolumeSnapshot {
        VolumeSnapshot {
            id: VolumeId::new("us-east4", id),
            name: id.to_string(),
            lifecycle_state: LifecycleState::Available,
            replication_role: ReplicationRole::None,
            used_bytes: 100,
            allocated_bytes: 200,
            service_level: ServiceLevel::Standard,
            snap_reserve_percent: 0,
        }
    }

    #[tokio::test]
    async fn mutations_are_visible_to_later_reads() {
        let directory = MemoryDirectory::new();
        directory.insert(snapshot("a"));
        let id = VolumeId::new("us-east4", "a");

        directory.set_allocation(&id, 500).await.unwrap();

        let fetched = directory.get_volume(&id).await.unwrap();
        assert_eq!(fetched.allocated_bytes, 500);
        assert_eq!(directory.mutations(), vec![(id, 500)]);
    }

    #[tokio::test]
    async fn injected_failures_reject_mutations() {
        let directory = MemoryDirectory::new();
        directory.insert(snapshot("a"));
        let id = VolumeId::new("us-east4", "a");
        directory.fail_mutations_for(id.clone());

        let err = directory.set_allocation(&id, 500).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Api { status: 500, .. }));
        assert!(directory.mutations().is_empty());
        // The stored snapshot is untouched.
        assert_eq!(directory.get_volume(&id).await.unwrap().allocated_bytes, 200);
    }

    #[tokio::test]
    async fn unknown_volume_is_not_found() {
        let directory = MemoryDirectory::new();
        let id = VolumeId::new("us-east4", "ghost");
        assert!(matches!(
            directory.get_volume(&id).await.unwrap_err(),
            DirectoryError::VolumeNotFound(_)
        ));
    }
}
