//! `aws-sdk-redshift` implementation of [`WarehouseApi`]
//!
//! Credentials and the default region come from the standard AWS chain
//! (environment, shared config/credentials files, SSO, IMDS). The region and
//! the named AWS profile can be overridden per connection.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_redshift::Client;
use aws_sdk_redshift::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_redshift::types::Tag;
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

use crate::api::{WarehouseApi, ensure_available};
use crate::error::ApiError;
use crate::model::{Cluster, Page, ParameterGroup, Snapshot, SubnetGroup};

/// Smallest page size Redshift accepts for `DescribeClusters`
const PROBE_MAX_RECORDS: i32 = 20;

/// How to build the Redshift client
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Region override; `None` uses the region from the AWS config chain
    pub region: Option<String>,
    /// Named profile from the shared AWS config files
    pub aws_profile: Option<String>,
    /// Run the capability probe before returning the client
    pub probe: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            region: None,
            aws_profile: None,
            probe: true,
        }
    }
}

impl ConnectOptions {
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }
}

/// Redshift client bound to one region
#[derive(Clone, Debug)]
pub struct AwsWarehouse {
    client: Client,
    region: Option<String>,
}

impl AwsWarehouse {
    pub fn new(client: Client, region: Option<String>) -> Self {
        Self { client, region }
    }

    /// Region the client is bound to, if one was resolved
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

/// Build a Redshift client and probe it
///
/// An unreachable endpoint during the probe is fatal and surfaces as
/// [`crate::CoreError::ServiceUnavailable`], so callers never run a nuke against a
/// region where Redshift does not exist.
pub async fn connect(options: &ConnectOptions) -> crate::Result<AwsWarehouse> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &options.aws_profile {
        debug!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }

    let shared_config = loader.load().await;
    let region = shared_config.region().map(|r| r.to_string());
    info!(
        "Connecting to Redshift in region {}",
        region.as_deref().unwrap_or("<unset>")
    );

    let warehouse = AwsWarehouse::new(Client::new(&shared_config), region);

    if options.probe {
        ensure_available(&warehouse, warehouse.region().unwrap_or("<unset>")).await?;
    }

    Ok(warehouse)
}

/// Map an SDK error onto [`ApiError`]
fn classify<E, R>(err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    if matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    ) {
        return ApiError::Endpoint(DisplayErrorContext(&err).to_string());
    }

    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    match err.code() {
        Some(code) => ApiError::from_code(code, message),
        None => ApiError::Service {
            code: "Unknown".to_string(),
            message,
        },
    }
}

fn tags_to_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|tag| {
            let key = tag.key()?;
            Some((key.to_string(), tag.value().unwrap_or_default().to_string()))
        })
        .collect()
}

fn cluster_from_sdk(cluster: &aws_sdk_redshift::types::Cluster) -> Option<Cluster> {
    Some(Cluster {
        identifier: cluster.cluster_identifier()?.to_string(),
        created_at: cluster.cluster_create_time().map(|t| t.as_secs_f64()),
        tags: tags_to_map(cluster.tags()),
    })
}

fn snapshot_from_sdk(snapshot: &aws_sdk_redshift::types::Snapshot) -> Option<Snapshot> {
    Some(Snapshot {
        identifier: snapshot.snapshot_identifier()?.to_string(),
        created_at: snapshot.snapshot_create_time().map(|t| t.as_secs_f64()),
    })
}

#[async_trait]
impl WarehouseApi for AwsWarehouse {
    async fn probe(&self) -> Result<(), ApiError> {
        self.client
            .describe_clusters()
            .max_records(PROBE_MAX_RECORDS)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn describe_clusters(
        &self,
        marker: Option<String>,
    ) -> Result<Page<Cluster>, ApiError> {
        trace!(?marker, "DescribeClusters");
        let output = self
            .client
            .describe_clusters()
            .set_marker(marker)
            .send()
            .await
            .map_err(classify)?;

        Ok(Page {
            items: output.clusters().iter().filter_map(cluster_from_sdk).collect(),
            marker: output.marker().map(str::to_string),
        })
    }

    async fn describe_cluster_snapshots(
        &self,
        marker: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError> {
        trace!(?marker, "DescribeClusterSnapshots");
        let output = self
            .client
            .describe_cluster_snapshots()
            .set_marker(marker)
            .send()
            .await
            .map_err(classify)?;

        Ok(Page {
            items: output
                .snapshots()
                .iter()
                .filter_map(snapshot_from_sdk)
                .collect(),
            marker: output.marker().map(str::to_string),
        })
    }

    async fn describe_cluster_subnet_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<SubnetGroup>, ApiError> {
        trace!(?marker, "DescribeClusterSubnetGroups");
        let output = self
            .client
            .describe_cluster_subnet_groups()
            .set_marker(marker)
            .send()
            .await
            .map_err(classify)?;

        Ok(Page {
            items: output
                .cluster_subnet_groups()
                .iter()
                .filter_map(|g| g.cluster_subnet_group_name().map(SubnetGroup::new))
                .collect(),
            marker: output.marker().map(str::to_string),
        })
    }

    async fn describe_cluster_parameter_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<ParameterGroup>, ApiError> {
        trace!(?marker, "DescribeClusterParameterGroups");
        let output = self
            .client
            .describe_cluster_parameter_groups()
            .set_marker(marker)
            .send()
            .await
            .map_err(classify)?;

        Ok(Page {
            items: output
                .parameter_groups()
                .iter()
                .filter_map(|g| g.parameter_group_name().map(ParameterGroup::new))
                .collect(),
            marker: output.marker().map(str::to_string),
        })
    }

    /// Tags are read from `DescribeClusters` filtered on the identifier, which
    /// avoids building the cluster ARN (that would need the account id).
    async fn cluster_tags(
        &self,
        identifier: &str,
    ) -> Result<BTreeMap<String, String>, ApiError> {
        let output = self
            .client
            .describe_clusters()
            .cluster_identifier(identifier)
            .send()
            .await
            .map_err(classify)?;

        output
            .clusters()
            .first()
            .map(|c| tags_to_map(c.tags()))
            .ok_or_else(|| ApiError::NotFound(format!("Cluster {} not found", identifier)))
    }

    async fn delete_cluster(&self, identifier: &str) -> Result<(), ApiError> {
        self.client
            .delete_cluster()
            .cluster_identifier(identifier)
            .skip_final_cluster_snapshot(true)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_cluster_snapshot(&self, identifier: &str) -> Result<(), ApiError> {
        self.client
            .delete_cluster_snapshot()
            .snapshot_identifier(identifier)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_cluster_subnet_group(&self, name: &str) -> Result<(), ApiError> {
        self.client
            .delete_cluster_subnet_group()
            .cluster_subnet_group_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_cluster_parameter_group(
        &self,
        name: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete_cluster_parameter_group()
            .parameter_group_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }
}
