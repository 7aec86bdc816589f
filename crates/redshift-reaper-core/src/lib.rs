//! # redshift-reaper-core
//!
//! Shared engine for deleting aged Amazon Redshift resources.
//!
//! Four resource kinds are handled, always in this order:
//!
//! 1. clusters (age threshold, optional tag exclusion)
//! 2. cluster snapshots (age threshold)
//! 3. cluster subnet groups (always eligible)
//! 4. cluster parameter groups (always eligible)
//!
//! Each kind is listed lazily through its paginated `Describe*` endpoint,
//! filtered, and deleted one identifier at a time. A failed delete is
//! recorded in the [`NukeReport`] and never stops the batch.
//!
//! ## Layers
//!
//! - [`api::WarehouseApi`] - the service seam (list pages, delete, tags)
//! - [`aws::AwsWarehouse`] - the `aws-sdk-redshift` implementation
//! - [`reaper::ResourceReaper`] - listers, deleters and the orchestrator
//! - [`config`] - TOML profiles holding region and filter defaults
//!
//! ```rust,ignore
//! use redshift_reaper_core::{AgeThreshold, ReaperOptions, RequiredTags, ResourceReaper};
//! use redshift_reaper_core::aws::{ConnectOptions, connect};
//! use std::time::Duration;
//!
//! let warehouse = connect(&ConnectOptions::for_region("eu-west-1")).await?;
//! let reaper = ResourceReaper::new(&warehouse, ReaperOptions::default());
//! let threshold = AgeThreshold::older_than(Duration::from_secs(7 * 24 * 3600));
//! let report = reaper.nuke(threshold, &RequiredTags::new()).await;
//! println!("deleted {} resources", report.deleted_count());
//! ```

pub mod api;
pub mod aws;
pub mod config;
pub mod error;
pub mod model;
pub mod pager;
pub mod progress;
pub mod reaper;
pub mod report;
pub mod testing;
pub mod threshold;

// Re-export commonly used types at crate root
pub use api::WarehouseApi;
pub use config::{Config, ConfigDocument, ConfigError, Profile};
pub use error::{ApiError, CoreError, Result};
pub use model::{
    Cluster, Page, ParameterGroup, RequiredTags, ResourceKind, Snapshot, SubnetGroup, tags_match,
};
pub use progress::{ProgressCallback, ReapEvent};
pub use reaper::{ReaperOptions, ResourceReaper, TagFailurePolicy};
pub use report::{ItemOutcome, KindReport, NukeReport, Outcome};
pub use threshold::{AgeThreshold, parse_duration};
