//! HTTP implementation of the volume directory against the cloud
//! volume API.
//!
//! The API is region-scoped
//! (`/v2/projects/{project}/locations/{region}/Volumes[/{id}]`);
//! region `-` enumerates all regions. Updates are read-modify-write:
//! the full volume document is fetched, the quota field overwritten,
//! and the document PUT back.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use volscale_core::{
    LifecycleState, ReplicationRole, ServiceLevel, VolumeId, VolumeSnapshot,
};

use crate::credential::Credential;
use crate::error::{DirectoryError, DirectoryResult};
use crate::VolumeDirectory;

const DEFAULT_API_HOST: &str = "https://cloudvolumesgcp-api.netapp.com";

/// Directory client bound to one project and one credential.
pub struct CvsDirectory {
    client: reqwest::Client,
    host: String,
    project: String,
    credential: Credential,
}

impl CvsDirectory {
    /// Client against the production API host.
    pub fn new(project: impl Into<String>, credential: Credential) -> DirectoryResult<Self> {
        Self::with_host(DEFAULT_API_HOST, project, credential)
    }

    /// Client against an explicit API host (tests, private endpoints).
    pub fn with_host(
        host: impl Into<String>,
        project: impl Into<String>,
        credential: Credential,
    ) -> DirectoryResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("volscale")
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            project: project.into(),
            credential,
        })
    }

    fn project_root(&self, project: &str) -> String {
        format!("{}/v2/projects/{}", self.host, project)
    }

    fn volume_url(&self, id: &VolumeId) -> String {
        format!(
            "{}/locations/{}/Volumes/{}",
            self.project_root(&self.project),
            id.region,
            id.id
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> DirectoryResult<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(self.credential.bearer())
            .send()
            .await?
            .error_for_status()?;
        resp.json::<T>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

impl VolumeDirectory for CvsDirectory {
    async fn list_volumes(&self, project: &str) -> DirectoryResult<Vec<VolumeSnapshot>> {
        let url = format!("{}/locations/-/Volumes", self.project_root(project));
        debug!(project, "listing volumes");
        let wires: Vec<WireVolume> = self.get_json(&url).await?;
        Ok(wires.into_iter().map(snapshot_from_wire).collect())
    }

    async fn get_volume(&self, id: &VolumeId) -> DirectoryResult<VolumeSnapshot> {
        let url = self.volume_url(id);
        debug!(volume = %id, "fetching volume");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.credential.bearer())
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::VolumeNotFound(id.to_string()));
        }
        let wire: WireVolume = resp
            .error_for_status()?
            .json()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))?;
        Ok(snapshot_from_wire(wire))
    }

    async fn set_allocation(&self, id: &VolumeId, new_size_bytes: u64) -> DirectoryResult<()> {
        let url = self.volume_url(id);
        debug!(volume = %id, new_size_bytes, "setting allocation");

        // The API expects the whole volume document on PUT, so fetch
        // it, overwrite the quota, and send it back.
        let mut doc: serde_json::Value = self.get_json(&url).await?;
        match doc.as_object_mut() {
            Some(obj) => {
                obj.insert("quotaInBytes".to_string(), new_size_bytes.into());
            }
            None => {
                return Err(DirectoryError::Decode(
                    "volume document is not a JSON object".to_string(),
                ));
            }
        }

        self.client
            .put(&url)
            .bearer_auth(self.credential.bearer())
            .json(&doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

// ── Wire model ─────────────────────────────────────────────────────

/// The subset of the volume document the engine reads. Updates go
/// through the raw JSON document instead, so unknown fields are never
/// dropped on the PUT path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVolume {
    name: String,
    volume_id: String,
    region: String,
    life_cycle_state: String,
    quota_in_bytes: u64,
    used_bytes: u64,
    #[serde(default)]
    snap_reserve: u64,
    service_level: String,
    storage_class: String,
    #[serde(default)]
    is_data_protection: bool,
    #[serde(default)]
    in_replication: bool,
}

fn snapshot_from_wire(wire: WireVolume) -> VolumeSnapshot {
    let lifecycle_state = if wire.life_cycle_state == "available" {
        LifecycleState::Available
    } else {
        LifecycleState::Other(wire.life_cycle_state)
    };

    // In a cross-region pair the data-protection volume is the
    // secondary side; its replicating peer is the primary.
    let replication_role = if wire.is_data_protection && wire.in_replication {
        ReplicationRole::SecondaryActive
    } else if wire.in_replication {
        ReplicationRole::Primary
    } else {
        ReplicationRole::None
    };

    // The software storage class reports serviceLevel "basic" on the
    // wire but delivers a different rate; it gets its own pseudo
    // level so the throughput table stays honest.
    let service_level = if wire.storage_class == "hardware" {
        ServiceLevel::from_api_name(&wire.service_level).unwrap_or_else(|| {
            warn!(
                service_level = %wire.service_level,
                volume = %wire.volume_id,
                "unknown service level, assuming extreme"
            );
            ServiceLevel::Extreme
        })
    } else {
        ServiceLevel::StandardSw
    };

    VolumeSnapshot {
        id: VolumeId::new(wire.region, wire.volume_id),
        name: wire.name,
        lifecycle_state,
        replication_role,
        used_bytes: wire.used_bytes,
        allocated_bytes: wire.quota_in_bytes,
        service_level,
        snap_reserve_percent: wire.snap_reserve,
    }
}
