use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use super::{ResourceReaper, TagFailurePolicy};
use crate::error::ApiError;
use crate::model::{RequiredTags, ResourceKind, tags_match};
use crate::pager::paginate;
use crate::progress::{ReapEvent, emit};
use crate::report::KindReport;
use crate::threshold::AgeThreshold;

impl<'a> ResourceReaper<'a> {
    /// Identifiers of clusters created before `threshold` that do not carry `required_tags`
    ///
    /// With an empty `required_tags` every aged cluster is yielded and no
    /// tag lookups are made.
    pub fn list_clusters<'s>(
        &'s self,
        threshold: AgeThreshold,
        required_tags: &'s RequiredTags,
    ) -> BoxStream<'s, Result<String, ApiError>> {
        let api = self.api;

        paginate(move |marker| api.describe_clusters(marker))
            .try_filter_map(move |cluster| async move {
                if !threshold.admits_opt(cluster.created_at) {
                    debug!(id = %cluster.identifier, "Cluster too recent, keeping");
                    return Ok(None);
                }
                if !required_tags.is_empty()
                    && self
                        .has_required_tags(&cluster.identifier, required_tags)
                        .await
                {
                    debug!(id = %cluster.identifier, "Cluster carries the required tags, keeping");
                    return Ok(None);
                }
                Ok::<_, ApiError>(Some(cluster.identifier))
            })
            .boxed()
    }

    /// Whether the cluster carries every required tag with the required value
    ///
    /// When the tags cannot be fetched the answer comes from the
    /// [`TagFailurePolicy`]: `Delete` answers false (the cluster stays
    /// eligible), `Preserve` answers true.
    pub async fn has_required_tags(&self, identifier: &str, required_tags: &RequiredTags) -> bool {
        match self.api.cluster_tags(identifier).await {
            Ok(tags) => tags_match(&tags, required_tags),
            Err(err) => {
                warn!(
                    id = identifier,
                    error = %err,
                    policy = ?self.options.tag_failure,
                    "Failed to get tags for Redshift cluster"
                );
                emit(
                    &self.on_event,
                    ReapEvent::TagLookupFailed {
                        identifier: identifier.to_string(),
                        error: err.to_string(),
                    },
                );
                self.options.tag_failure == TagFailurePolicy::Preserve
            }
        }
    }

    /// Delete every cluster yielded by [`list_clusters`](Self::list_clusters), skipping the final snapshot
    pub async fn nuke_clusters(
        &self,
        threshold: AgeThreshold,
        required_tags: &RequiredTags,
    ) -> KindReport {
        self.reap(
            ResourceKind::Cluster,
            self.list_clusters(threshold, required_tags),
        )
        .await
    }
}
