//! Typed records for the Redshift resources the reaper reads
//!
//! Only the fields the filters consult are kept: identifier, creation time
//! and (for clusters) tags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required tag key/value pairs; a cluster carrying all of them is preserved
pub type RequiredTags = BTreeMap<String, String>;

/// Resource kinds handled by the reaper, in processing order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Cluster,
    Snapshot,
    SubnetGroup,
    ParameterGroup,
}

impl ResourceKind {
    /// Every kind, in the fixed order `nuke` walks them
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Cluster,
        ResourceKind::Snapshot,
        ResourceKind::SubnetGroup,
        ResourceKind::ParameterGroup,
    ];

    /// Human readable label used in progress lines and failure messages
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Cluster => "redshift cluster",
            ResourceKind::Snapshot => "redshift snapshot",
            ResourceKind::SubnetGroup => "redshift subnet",
            ResourceKind::ParameterGroup => "redshift param",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Cluster => write!(f, "cluster"),
            ResourceKind::Snapshot => write!(f, "snapshot"),
            ResourceKind::SubnetGroup => write!(f, "subnet-group"),
            ResourceKind::ParameterGroup => write!(f, "parameter-group"),
        }
    }
}

/// A Redshift cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub identifier: String,
    /// Creation time in seconds since the epoch; `None` while still being created
    pub created_at: Option<f64>,
    pub tags: BTreeMap<String, String>,
}

impl Cluster {
    pub fn new(identifier: impl Into<String>, created_at: f64) -> Self {
        Self {
            identifier: identifier.into(),
            created_at: Some(created_at),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A manual or automated cluster snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub identifier: String,
    pub created_at: Option<f64>,
}

impl Snapshot {
    pub fn new(identifier: impl Into<String>, created_at: f64) -> Self {
        Self {
            identifier: identifier.into(),
            created_at: Some(created_at),
        }
    }
}

/// A cluster subnet group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetGroup {
    pub name: String,
}

impl SubnetGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A cluster parameter group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGroup {
    pub name: String,
}

impl ParameterGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` (or empty) on the last page
    pub marker: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            marker: None,
        }
    }
}

/// Check that every required key is present in `tags` with the same value
///
/// A missing key counts as a mismatch.
pub fn tags_match(tags: &BTreeMap<String, String>, required: &RequiredTags) -> bool {
    required
        .iter()
        .all(|(key, value)| tags.get(key) == Some(value))
}
