//! The service seam consumed by the reapers
//!
//! Implemented by [`crate::aws::AwsWarehouse`] for real accounts and by
//! [`crate::testing::FakeWarehouse`] in tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{ApiError, CoreError};
use crate::model::{Cluster, Page, ParameterGroup, Snapshot, SubnetGroup};

/// Paginated listing, tag lookup and deletion for one region
///
/// Listing calls take the marker returned by the previous page (`None` for
/// the first page).
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    /// Lightweight call used to check that the service answers in this region
    async fn probe(&self) -> Result<(), ApiError>;

    async fn describe_clusters(&self, marker: Option<String>) -> Result<Page<Cluster>, ApiError>;

    async fn describe_cluster_snapshots(
        &self,
        marker: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError>;

    async fn describe_cluster_subnet_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<SubnetGroup>, ApiError>;

    async fn describe_cluster_parameter_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<ParameterGroup>, ApiError>;

    /// Fetch the current tag set of a cluster by identifier
    async fn cluster_tags(&self, identifier: &str) -> Result<BTreeMap<String, String>, ApiError>;

    /// Delete a cluster without taking a final snapshot
    async fn delete_cluster(&self, identifier: &str) -> Result<(), ApiError>;

    async fn delete_cluster_snapshot(&self, identifier: &str) -> Result<(), ApiError>;

    async fn delete_cluster_subnet_group(&self, name: &str) -> Result<(), ApiError>;

    async fn delete_cluster_parameter_group(&self, name: &str) -> Result<(), ApiError>;
}

/// Run the capability probe, turning an unreachable endpoint into
/// [`CoreError::ServiceUnavailable`]
pub async fn ensure_available(api: &dyn WarehouseApi, region: &str) -> crate::Result<()> {
    match api.probe().await {
        Ok(()) => {
            debug!("Redshift probe succeeded in {}", region);
            Ok(())
        }
        Err(ApiError::Endpoint(detail)) => {
            debug!("Redshift probe failed in {}: {}", region, detail);
            Err(CoreError::ServiceUnavailable {
                region: region.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}
