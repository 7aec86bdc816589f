//! In-memory [`WarehouseApi`] for tests
//!
//! `FakeWarehouse` serves fixed resource lists in pages of a configurable
//! size (markers are item offsets), records every delete call and can be told
//! to fail specific deletes, tag lookups or listing pages.
//!
//! Deletes are recorded but not applied, so listings stay stable while a
//! deleter drains them, the same way Redshift keeps listing a cluster that is
//! in the `deleting` state.
//!
//! ```rust
//! use redshift_reaper_core::testing::FakeWarehouse;
//! use redshift_reaper_core::{Cluster, ResourceKind};
//!
//! let fake = FakeWarehouse::new()
//!     .with_page_size(2)
//!     .with_cluster(Cluster::new("sandbox", 100.0).with_tag("env", "dev"))
//!     .fail_delete(ResourceKind::Cluster, "sandbox");
//! assert!(fake.deleted(ResourceKind::Cluster).is_empty());
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::WarehouseApi;
use crate::error::ApiError;
use crate::model::{Cluster, Page, ParameterGroup, ResourceKind, Snapshot, SubnetGroup};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Default)]
struct CallLog {
    delete_attempts: Vec<(ResourceKind, String)>,
    deleted: Vec<(ResourceKind, String)>,
    tag_lookups: usize,
    pages: HashMap<ResourceKind, usize>,
}

/// Scriptable in-memory Redshift
pub struct FakeWarehouse {
    page_size: usize,
    unreachable: bool,
    clusters: Vec<Cluster>,
    snapshots: Vec<Snapshot>,
    subnet_groups: Vec<SubnetGroup>,
    parameter_groups: Vec<ParameterGroup>,
    failing_deletes: HashSet<(ResourceKind, String)>,
    failing_tags: HashSet<String>,
    /// Listing of a kind fails from this page index on
    failing_listings: HashMap<ResourceKind, usize>,
    log: Mutex<CallLog>,
}

impl Default for FakeWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWarehouse {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            unreachable: false,
            clusters: Vec::new(),
            snapshots: Vec::new(),
            subnet_groups: Vec::new(),
            parameter_groups: Vec::new(),
            failing_deletes: HashSet::new(),
            failing_tags: HashSet::new(),
            failing_listings: HashMap::new(),
            log: Mutex::new(CallLog::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_cluster(mut self, cluster: Cluster) -> Self {
        self.clusters.push(cluster);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots.push(snapshot);
        self
    }

    pub fn with_subnet_group(mut self, group: SubnetGroup) -> Self {
        self.subnet_groups.push(group);
        self
    }

    pub fn with_parameter_group(mut self, group: ParameterGroup) -> Self {
        self.parameter_groups.push(group);
        self
    }

    /// Make the delete call for this identifier fail with an invalid-state error
    pub fn fail_delete(mut self, kind: ResourceKind, identifier: &str) -> Self {
        self.failing_deletes.insert((kind, identifier.to_string()));
        self
    }

    /// Make the tag lookup for this cluster fail with an access-denied error
    pub fn fail_tags(mut self, identifier: &str) -> Self {
        self.failing_tags.insert(identifier.to_string());
        self
    }

    /// Make listing of `kind` fail when page `from_page` (0-based) or later is requested
    pub fn fail_listing(mut self, kind: ResourceKind, from_page: usize) -> Self {
        self.failing_listings.insert(kind, from_page);
        self
    }

    /// Make the probe fail as if the regional endpoint did not exist
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Identifiers successfully deleted for a kind, in call order
    pub fn deleted(&self, kind: ResourceKind) -> Vec<String> {
        Self::of_kind(&self.log().deleted, kind)
    }

    /// Identifiers a delete was attempted for, failed or not
    pub fn delete_attempts(&self, kind: ResourceKind) -> Vec<String> {
        Self::of_kind(&self.log().delete_attempts, kind)
    }

    /// Total number of delete calls across all kinds
    pub fn delete_calls(&self) -> usize {
        self.log().delete_attempts.len()
    }

    pub fn tag_lookups(&self) -> usize {
        self.log().tag_lookups
    }

    pub fn pages_fetched(&self, kind: ResourceKind) -> usize {
        self.log().pages.get(&kind).copied().unwrap_or(0)
    }

    fn log(&self) -> MutexGuard<'_, CallLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn of_kind(entries: &[(ResourceKind, String)], kind: ResourceKind) -> Vec<String> {
        entries
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| id.clone())
            .collect()
    }

    fn page_of<T: Clone>(
        &self,
        kind: ResourceKind,
        items: &[T],
        marker: Option<String>,
    ) -> Result<Page<T>, ApiError> {
        let start = match marker {
            None => 0,
            Some(marker) => marker.parse::<usize>().map_err(|_| ApiError::Service {
                code: "InvalidParameterValue".to_string(),
                message: format!("invalid marker '{}'", marker),
            })?,
        };
        let index = start / self.page_size;
        *self.log().pages.entry(kind).or_insert(0) += 1;

        if let Some(&from_page) = self.failing_listings.get(&kind)
            && index >= from_page
        {
            return Err(ApiError::Service {
                code: "InternalFailure".to_string(),
                message: format!("listing {} failed on page {}", kind, index),
            });
        }

        let start = start.min(items.len());
        let end = (start + self.page_size).min(items.len());
        Ok(Page {
            items: items[start..end].to_vec(),
            marker: (end < items.len()).then(|| end.to_string()),
        })
    }

    fn delete(&self, kind: ResourceKind, identifier: &str) -> Result<(), ApiError> {
        let mut log = self.log();
        log.delete_attempts.push((kind, identifier.to_string()));

        if self
            .failing_deletes
            .contains(&(kind, identifier.to_string()))
        {
            return Err(ApiError::InvalidState(format!(
                "{} {} cannot be deleted right now",
                kind, identifier
            )));
        }

        log.deleted.push((kind, identifier.to_string()));
        Ok(())
    }
}

#[async_trait]
impl WarehouseApi for FakeWarehouse {
    async fn probe(&self) -> Result<(), ApiError> {
        if self.unreachable {
            return Err(ApiError::Endpoint(
                "could not resolve redshift endpoint".to_string(),
            ));
        }
        Ok(())
    }

    async fn describe_clusters(&self, marker: Option<String>) -> Result<Page<Cluster>, ApiError> {
        self.page_of(ResourceKind::Cluster, &self.clusters, marker)
    }

    async fn describe_cluster_snapshots(
        &self,
        marker: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError> {
        self.page_of(ResourceKind::Snapshot, &self.snapshots, marker)
    }

    async fn describe_cluster_subnet_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<SubnetGroup>, ApiError> {
        self.page_of(ResourceKind::SubnetGroup, &self.subnet_groups, marker)
    }

    async fn describe_cluster_parameter_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<ParameterGroup>, ApiError> {
        self.page_of(ResourceKind::ParameterGroup, &self.parameter_groups, marker)
    }

    async fn cluster_tags(&self, identifier: &str) -> Result<BTreeMap<String, String>, ApiError> {
        self.log().tag_lookups += 1;

        if self.failing_tags.contains(identifier) {
            return Err(ApiError::AccessDenied(format!(
                "not allowed to read tags of {}",
                identifier
            )));
        }

        self.clusters
            .iter()
            .find(|c| c.identifier == identifier)
            .map(|c| c.tags.clone())
            .ok_or_else(|| ApiError::NotFound(format!("Cluster {} not found", identifier)))
    }

    async fn delete_cluster(&self, identifier: &str) -> Result<(), ApiError> {
        self.delete(ResourceKind::Cluster, identifier)
    }

    async fn delete_cluster_snapshot(&self, identifier: &str) -> Result<(), ApiError> {
        self.delete(ResourceKind::Snapshot, identifier)
    }

    async fn delete_cluster_subnet_group(&self, name: &str) -> Result<(), ApiError> {
        self.delete(ResourceKind::SubnetGroup, name)
    }

    async fn delete_cluster_parameter_group(&self, name: &str) -> Result<(), ApiError> {
        self.delete(ResourceKind::ParameterGroup, name)
    }
}
