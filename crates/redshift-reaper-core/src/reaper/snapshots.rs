use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use super::ResourceReaper;
use crate::error::ApiError;
use crate::model::ResourceKind;
use crate::pager::paginate;
use crate::report::KindReport;
use crate::threshold::AgeThreshold;

impl<'a> ResourceReaper<'a> {
    /// Identifiers of cluster snapshots created before `threshold`
    pub fn list_snapshots<'s>(
        &'s self,
        threshold: AgeThreshold,
    ) -> BoxStream<'s, Result<String, ApiError>> {
        let api = self.api;

        paginate(move |marker| api.describe_cluster_snapshots(marker))
            .try_filter_map(move |snapshot| async move {
                Ok::<_, ApiError>(
                    threshold
                        .admits_opt(snapshot.created_at)
                        .then_some(snapshot.identifier),
                )
            })
            .boxed()
    }

    /// Delete every snapshot yielded by [`list_snapshots`](Self::list_snapshots)
    pub async fn nuke_snapshots(&self, threshold: AgeThreshold) -> KindReport {
        self.reap(ResourceKind::Snapshot, self.list_snapshots(threshold))
            .await
    }
}
