//! Listing, filtering and deletion of aged Redshift resources
//!
//! [`ResourceReaper`] holds a reference to a [`WarehouseApi`] and runs the
//! four resource kinds in a fixed order. Each kind has a lister producing a
//! lazy stream of identifiers and a deleter draining it:
//!
//! | kind            | lister                  | deleter                |
//! |-----------------|-------------------------|------------------------|
//! | cluster         | `list_clusters`         | `nuke_clusters`        |
//! | snapshot        | `list_snapshots`        | `nuke_snapshots`       |
//! | subnet group    | `list_subnets`          | `nuke_subnets`         |
//! | parameter group | `list_cluster_params`   | `nuke_param_groups`    |
//!
//! Deletion is best effort. A failed delete is logged, reported through the
//! progress callback, recorded in the [`KindReport`] and the loop moves on.
//! A failed listing call abandons the rest of that kind only.

mod clusters;
mod parameter_groups;
mod snapshots;
mod subnet_groups;

use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::WarehouseApi;
use crate::error::ApiError;
use crate::model::{RequiredTags, ResourceKind};
use crate::progress::{ProgressCallback, ReapEvent, emit};
use crate::report::{KindReport, NukeReport, Outcome};
use crate::threshold::AgeThreshold;

/// What to do with a cluster whose tags cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagFailurePolicy {
    /// Treat the tags as not matching, so the cluster stays eligible for deletion
    #[default]
    Delete,
    /// Treat the tags as matching, so the cluster is preserved
    Preserve,
}

/// Knobs for a reaper run
#[derive(Debug, Clone)]
pub struct ReaperOptions {
    /// List and report eligible resources without deleting them
    pub dry_run: bool,
    /// Kinds to process; the processing order is always [`ResourceKind::ALL`]
    pub kinds: Vec<ResourceKind>,
    pub tag_failure: TagFailurePolicy,
}

impl Default for ReaperOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            kinds: ResourceKind::ALL.to_vec(),
            tag_failure: TagFailurePolicy::default(),
        }
    }
}

impl ReaperOptions {
    pub fn includes(&self, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Deletes aged Redshift resources in one region
pub struct ResourceReaper<'a> {
    api: &'a dyn WarehouseApi,
    options: ReaperOptions,
    on_event: Option<ProgressCallback>,
}

impl<'a> ResourceReaper<'a> {
    pub fn new(api: &'a dyn WarehouseApi, options: ReaperOptions) -> Self {
        Self {
            api,
            options,
            on_event: None,
        }
    }

    /// Attach a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    pub fn options(&self) -> &ReaperOptions {
        &self.options
    }

    /// Run every selected kind: clusters, snapshots, subnet groups, parameter groups
    ///
    /// Never fails as a whole; per-item and per-kind failures end up in the report.
    pub async fn nuke(&self, threshold: AgeThreshold, required_tags: &RequiredTags) -> NukeReport {
        info!(
            threshold = %threshold,
            dry_run = self.options.dry_run,
            required_tags = required_tags.len(),
            "Starting Redshift nuke"
        );

        let mut report = NukeReport::new(threshold, self.options.dry_run);

        for kind in ResourceKind::ALL {
            if !self.options.includes(kind) {
                debug!(%kind, "Kind not selected, skipping");
                continue;
            }

            emit(&self.on_event, ReapEvent::KindStarted { kind });

            let kind_report = match kind {
                ResourceKind::Cluster => self.nuke_clusters(threshold, required_tags).await,
                ResourceKind::Snapshot => self.nuke_snapshots(threshold).await,
                ResourceKind::SubnetGroup => self.nuke_subnets().await,
                ResourceKind::ParameterGroup => self.nuke_param_groups().await,
            };

            emit(
                &self.on_event,
                ReapEvent::KindFinished {
                    kind,
                    deleted: kind_report.deleted(),
                    failed: kind_report.failed(),
                    skipped: kind_report.skipped(),
                },
            );
            report.kinds.push(kind_report);
        }

        info!(
            deleted = report.deleted_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "Redshift nuke finished"
        );
        report
    }

    /// Drain a lister, deleting every identifier it yields
    async fn reap(
        &self,
        kind: ResourceKind,
        mut identifiers: BoxStream<'_, Result<String, ApiError>>,
    ) -> KindReport {
        let mut report = KindReport::new(kind);

        while let Some(next) = identifiers.next().await {
            let identifier = match next {
                Ok(identifier) => identifier,
                Err(err) => {
                    warn!(%kind, error = %err, "Listing failed, abandoning the rest of this kind");
                    emit(
                        &self.on_event,
                        ReapEvent::ListingFailed {
                            kind,
                            error: err.to_string(),
                        },
                    );
                    report.listing_error = Some(err.to_string());
                    break;
                }
            };

            if self.options.dry_run {
                debug!(%kind, id = %identifier, "Dry run, not deleting");
                emit(
                    &self.on_event,
                    ReapEvent::Skipped {
                        kind,
                        identifier: identifier.clone(),
                    },
                );
                report.record(identifier, Outcome::Skipped);
                continue;
            }

            match self.delete(kind, &identifier).await {
                Ok(()) => {
                    info!(%kind, id = %identifier, "Nuke {} {}", kind.label(), identifier);
                    emit(
                        &self.on_event,
                        ReapEvent::Deleted {
                            kind,
                            identifier: identifier.clone(),
                        },
                    );
                    report.record(identifier, Outcome::Deleted);
                }
                Err(err) => {
                    warn!(%kind, id = %identifier, error = %err, "Failed to delete {}", kind.label());
                    emit(
                        &self.on_event,
                        ReapEvent::DeleteFailed {
                            kind,
                            identifier: identifier.clone(),
                            error: err.to_string(),
                        },
                    );
                    report.record(
                        identifier,
                        Outcome::Failed {
                            error: err.to_string(),
                        },
                    );
                }
            }
        }

        report
    }

    async fn delete(&self, kind: ResourceKind, identifier: &str) -> Result<(), ApiError> {
        match kind {
            ResourceKind::Cluster => self.api.delete_cluster(identifier).await,
            ResourceKind::Snapshot => self.api.delete_cluster_snapshot(identifier).await,
            ResourceKind::SubnetGroup => self.api.delete_cluster_subnet_group(identifier).await,
            ResourceKind::ParameterGroup => {
                self.api.delete_cluster_parameter_group(identifier).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParameterGroup, Snapshot, SubnetGroup};
    use crate::testing::FakeWarehouse;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_kind_selection_keeps_fixed_order() {
        let fake = FakeWarehouse::new()
            .with_snapshot(Snapshot::new("snap", 1.0))
            .with_subnet_group(SubnetGroup::new("subnet"))
            .with_parameter_group(ParameterGroup::new("params"));
        let options = ReaperOptions {
            kinds: vec![ResourceKind::ParameterGroup, ResourceKind::Snapshot],
            ..ReaperOptions::default()
        };

        let report = ResourceReaper::new(&fake, options)
            .nuke(AgeThreshold::from_epoch_secs(10.0), &RequiredTags::new())
            .await;

        let kinds: Vec<_> = report.kinds.iter().map(|k| k.kind).collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Snapshot, ResourceKind::ParameterGroup]
        );
        assert!(fake.deleted(ResourceKind::SubnetGroup).is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let fake = FakeWarehouse::new()
            .with_subnet_group(SubnetGroup::new("ok"))
            .with_subnet_group(SubnetGroup::new("busy"))
            .fail_delete(ResourceKind::SubnetGroup, "busy");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let options = ReaperOptions {
            kinds: vec![ResourceKind::SubnetGroup],
            ..ReaperOptions::default()
        };

        ResourceReaper::new(&fake, options)
            .with_progress(Box::new(move |event| sink.lock().unwrap().push(event)))
            .nuke(AgeThreshold::from_epoch_secs(0.0), &RequiredTags::new())
            .await;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            ReapEvent::KindStarted {
                kind: ResourceKind::SubnetGroup
            }
        );
        assert!(matches!(&events[1], ReapEvent::Deleted { identifier, .. } if identifier == "ok"));
        assert!(
            matches!(&events[2], ReapEvent::DeleteFailed { identifier, .. } if identifier == "busy")
        );
        assert_eq!(
            events[3],
            ReapEvent::KindFinished {
                kind: ResourceKind::SubnetGroup,
                deleted: 1,
                failed: 1,
                skipped: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_tag_and_listing_failures_reach_callback() {
        use crate::model::Cluster;

        let fake = FakeWarehouse::new()
            .with_cluster(Cluster::new("x", 1.0).with_tag("env", "prod"))
            .with_snapshot(Snapshot::new("snap", 1.0))
            .fail_tags("x")
            .fail_listing(ResourceKind::Snapshot, 0);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let options = ReaperOptions {
            kinds: vec![ResourceKind::Cluster, ResourceKind::Snapshot],
            ..ReaperOptions::default()
        };
        let required = RequiredTags::from([("env".to_string(), "prod".to_string())]);

        let report = ResourceReaper::new(&fake, options)
            .with_progress(Box::new(move |event| sink.lock().unwrap().push(event)))
            .nuke(AgeThreshold::from_epoch_secs(10.0), &required)
            .await;

        assert_eq!(fake.deleted(ResourceKind::Cluster), vec!["x"]);
        assert!(fake.delete_attempts(ResourceKind::Snapshot).is_empty());
        assert!(
            report
                .kind(ResourceKind::Snapshot)
                .unwrap()
                .listing_error
                .is_some()
        );

        let events = events.lock().unwrap();
        let tag_failed = events
            .iter()
            .position(|e| matches!(e, ReapEvent::TagLookupFailed { identifier, .. } if identifier == "x"))
            .expect("tag lookup failure reported");
        let deleted = events
            .iter()
            .position(|e| matches!(e, ReapEvent::Deleted { identifier, .. } if identifier == "x"))
            .expect("cluster deleted");
        assert!(tag_failed < deleted);
        assert!(events.iter().any(|e| matches!(
            e,
            ReapEvent::ListingFailed {
                kind: ResourceKind::Snapshot,
                ..
            }
        )));
        assert_eq!(
            events.last(),
            Some(&ReapEvent::KindFinished {
                kind: ResourceKind::Snapshot,
                deleted: 0,
                failed: 0,
                skipped: 0,
            })
        );
    }

    #[test]
    fn test_tag_failure_policy_serde() {
        let policy: TagFailurePolicy = serde_json::from_str("\"preserve\"").unwrap();
        assert_eq!(policy, TagFailurePolicy::Preserve);
        assert_eq!(TagFailurePolicy::default(), TagFailurePolicy::Delete);
    }
}
