use futures::stream::{BoxStream, StreamExt, TryStreamExt};

use super::ResourceReaper;
use crate::error::ApiError;
use crate::model::ResourceKind;
use crate::pager::paginate;
use crate::report::KindReport;

impl<'a> ResourceReaper<'a> {
    /// Names of every cluster subnet group; subnet groups carry no age and are always eligible
    pub fn list_subnets(&self) -> BoxStream<'_, Result<String, ApiError>> {
        let api = self.api;

        paginate(move |marker| api.describe_cluster_subnet_groups(marker))
            .map_ok(|group| group.name)
            .boxed()
    }

    pub async fn nuke_subnets(&self) -> KindReport {
        self.reap(ResourceKind::SubnetGroup, self.list_subnets()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubnetGroup;
    use crate::reaper::ReaperOptions;
    use crate::testing::FakeWarehouse;

    #[tokio::test]
    async fn test_list_subnets_yields_everything() {
        let fake = FakeWarehouse::new()
            .with_page_size(2)
            .with_subnet_group(SubnetGroup::new("one"))
            .with_subnet_group(SubnetGroup::new("two"))
            .with_subnet_group(SubnetGroup::new("three"));
        let reaper = ResourceReaper::new(&fake, ReaperOptions::default());

        let names: Vec<String> = reaper.list_subnets().try_collect().await.unwrap();

        assert_eq!(names, vec!["one", "two", "three"]);
    }
}
