//! Per-item results of a nuke run

use serde::Serialize;

use crate::model::ResourceKind;
use crate::threshold::AgeThreshold;

/// What happened to one eligible resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Deleted,
    /// Dry run: eligible but left in place
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    pub identifier: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcomes for one resource kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindReport {
    pub kind: ResourceKind,
    pub items: Vec<ItemOutcome>,
    /// Set when listing broke off; items listed before the failure are still reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

impl KindReport {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            listing_error: None,
        }
    }

    pub fn record(&mut self, identifier: impl Into<String>, outcome: Outcome) {
        self.items.push(ItemOutcome {
            identifier: identifier.into(),
            outcome,
        });
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Deleted))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    /// Identifiers with the given outcome status, in processing order
    pub fn identifiers_where(&self, pred: impl Fn(&Outcome) -> bool) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| pred(&item.outcome))
            .map(|item| item.identifier.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.listing_error.is_some()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

/// Summary of a whole nuke run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NukeReport {
    pub threshold: AgeThreshold,
    pub dry_run: bool,
    pub kinds: Vec<KindReport>,
}

impl NukeReport {
    pub fn new(threshold: AgeThreshold, dry_run: bool) -> Self {
        Self {
            threshold,
            dry_run,
            kinds: Vec::new(),
        }
    }

    /// Report for one kind, if that kind was processed
    pub fn kind(&self, kind: ResourceKind) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    /// Identifiers successfully deleted for a kind
    pub fn deleted(&self, kind: ResourceKind) -> Vec<&str> {
        self.kind(kind)
            .map(|k| k.identifiers_where(|o| matches!(o, Outcome::Deleted)))
            .unwrap_or_default()
    }

    pub fn deleted_count(&self) -> usize {
        self.kinds.iter().map(KindReport::deleted).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.kinds.iter().map(KindReport::failed).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.kinds.iter().map(KindReport::skipped).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.kinds.iter().any(KindReport::has_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_and_failures() {
        let mut kind = KindReport::new(ResourceKind::Snapshot);
        kind.record("a", Outcome::Deleted);
        kind.record(
            "b",
            Outcome::Failed {
                error: "busy".to_string(),
            },
        );
        kind.record("c", Outcome::Deleted);

        assert_eq!(kind.deleted(), 2);
        assert_eq!(kind.failed(), 1);
        assert_eq!(kind.skipped(), 0);
        assert!(kind.has_failures());

        let mut report = NukeReport::new(AgeThreshold::from_epoch_secs(10.0), false);
        report.kinds.push(kind);
        assert_eq!(report.deleted(ResourceKind::Snapshot), vec!["a", "c"]);
        assert!(report.deleted(ResourceKind::Cluster).is_empty());
        assert_eq!(report.deleted_count(), 2);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_listing_error_counts_as_failure() {
        let mut kind = KindReport::new(ResourceKind::Cluster);
        assert!(!kind.has_failures());
        kind.listing_error = Some("throttled".to_string());
        assert!(kind.has_failures());
    }

    #[test]
    fn test_serialized_shape() {
        let mut kind = KindReport::new(ResourceKind::SubnetGroup);
        kind.record("sg-1", Outcome::Skipped);
        kind.record(
            "sg-2",
            Outcome::Failed {
                error: "in use".to_string(),
            },
        );
        let mut report = NukeReport::new(AgeThreshold::from_epoch_secs(1000.0), true);
        report.kinds.push(kind);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "threshold": 1000.0,
                "dry_run": true,
                "kinds": [{
                    "kind": "subnet-group",
                    "items": [
                        {"identifier": "sg-1", "status": "skipped"},
                        {"identifier": "sg-2", "status": "failed", "error": "in use"}
                    ]
                }]
            })
        );
    }
}
