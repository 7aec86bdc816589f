//! `nuke` command: connect, reap, report

use colored::Colorize;
use redshift_reaper_core::aws::ConnectOptions;
use redshift_reaper_core::{
    AgeThreshold, NukeReport, Profile, ReapEvent, ReaperOptions, RequiredTags, ResourceKind,
    ResourceReaper,
};
use tracing::{debug, info};

use crate::cli::{NukeArgs, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{ReaperCliError, Result as CliResult};
use crate::output;

/// Everything a run needs once flags and profile defaults are merged
#[derive(Debug, Clone)]
pub struct NukePlan {
    pub connect: ConnectOptions,
    pub threshold: AgeThreshold,
    pub required_tags: RequiredTags,
    pub options: ReaperOptions,
}

impl NukePlan {
    /// Merge command-line flags over profile values over defaults
    pub fn resolve(args: &NukeArgs, profile: Option<(&str, &Profile)>) -> CliResult<Self> {
        let empty = Profile::default();
        let (profile_name, profile) = profile.unwrap_or(("<none>", &empty));

        let threshold = if let Some(before) = args.before {
            AgeThreshold::from_epoch_secs(before)
        } else if let Some(age) = args.older_than {
            AgeThreshold::older_than(age)
        } else if let Some(age) = profile.older_than_duration(profile_name)? {
            AgeThreshold::older_than(age)
        } else {
            return Err(ReaperCliError::MissingThreshold);
        };

        let mut required_tags = profile.required_tags.clone();
        required_tags.extend(args.required_tags.iter().cloned());

        let kinds = if !args.kinds.is_empty() {
            args.kinds.clone()
        } else if !profile.kinds.is_empty() {
            profile.kinds.clone()
        } else {
            ResourceKind::ALL.to_vec()
        };

        Ok(Self {
            connect: ConnectOptions {
                region: args.region.clone().or_else(|| profile.region.clone()),
                aws_profile: args
                    .aws_profile
                    .clone()
                    .or_else(|| profile.aws_profile.clone()),
                probe: !args.skip_probe,
            },
            threshold,
            required_tags,
            options: ReaperOptions {
                dry_run: args.dry_run,
                kinds,
                tag_failure: args
                    .tag_failure
                    .or(profile.tag_failure)
                    .unwrap_or_default(),
            },
        })
    }
}

pub async fn handle_nuke_command(
    args: &NukeArgs,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr.resolve_profile(profile_name)?;
    let plan = NukePlan::resolve(args, profile)?;
    debug!("Resolved nuke plan: {:?}", plan);

    let warehouse = conn_mgr.create_warehouse(&plan.connect).await?;
    info!(
        "Reaping Redshift resources created before {} in {}",
        plan.threshold,
        warehouse.region().unwrap_or("<default region>")
    );

    let reaper =
        ResourceReaper::new(&warehouse, plan.options).with_progress(Box::new(print_event));
    let report = reaper.nuke(plan.threshold, &plan.required_tags).await;

    output::print_report(&report, output_format)?;
    finish(&report, args.fail_on_error)
}

/// Map the report onto the exit status
fn finish(report: &NukeReport, fail_on_error: bool) -> CliResult<()> {
    if fail_on_error && report.has_failures() {
        let listing_failures = report
            .kinds
            .iter()
            .filter(|k| k.listing_error.is_some())
            .count();
        return Err(ReaperCliError::NukeFailures {
            failed: report.failed_count() + listing_failures,
        });
    }
    Ok(())
}

/// One line on stderr per item, so stdout stays parseable
fn print_event(event: ReapEvent) {
    match event {
        ReapEvent::Deleted { kind, identifier } => {
            eprintln!("Nuked {} {}", kind.label(), identifier.bold());
        }
        ReapEvent::Skipped { kind, identifier } => {
            eprintln!("Would nuke {} {}", kind.label(), identifier.bold());
        }
        ReapEvent::DeleteFailed {
            kind,
            identifier,
            error,
        } => {
            eprintln!(
                "{} to nuke {} {}: {}",
                "Failed".red(),
                kind.label(),
                identifier.bold(),
                error
            );
        }
        ReapEvent::TagLookupFailed { identifier, error } => {
            eprintln!(
                "{} to read tags of {} {}: {}",
                "Failed".yellow(),
                ResourceKind::Cluster.label(),
                identifier.bold(),
                error
            );
        }
        ReapEvent::ListingFailed { kind, error } => {
            eprintln!("{} to list {}s: {}", "Failed".red(), kind.label(), error);
        }
        ReapEvent::KindStarted { .. } | ReapEvent::KindFinished { .. } => {}
    }
}
