use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use super::ResourceReaper;
use crate::error::ApiError;
use crate::model::ResourceKind;
use crate::pager::paginate;
use crate::report::KindReport;

impl<'a> ResourceReaper<'a> {
    /// Names of every cluster parameter group, built-in `default.*` groups included
    pub fn list_cluster_params(&self) -> BoxStream<'_, Result<String, ApiError>> {
        let api = self.api;

        paginate(move |marker| api.describe_cluster_parameter_groups(marker))
            .map_ok(|group| group.name)
            .boxed()
    }

    pub async fn nuke_param_groups(&self) -> KindReport {
        self.reap(ResourceKind::ParameterGroup, self.list_cluster_params())
            .await
    }
}
