//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};
use redshift_reaper_core::{ResourceKind, TagFailurePolicy};

/// Delete aged Amazon Redshift resources in one region
#[derive(Parser, Debug)]
#[command(name = "redshift-reaper")]
#[command(version, about = "Delete aged Amazon Redshift resources")]
#[command(long_about = "
Delete aged Amazon Redshift resources

Resources are processed in a fixed order: clusters, cluster snapshots,
cluster subnet groups, cluster parameter groups. Clusters and snapshots
must be older than the threshold; subnet and parameter groups are always
eligible. Clusters carrying every --required-tag are preserved.

EXAMPLES:
    # Preview what would be deleted in eu-west-1
    redshift-reaper nuke --region eu-west-1 --older-than 7d --dry-run

    # Delete week-old resources, keeping clusters tagged keep=true
    redshift-reaper nuke --region eu-west-1 --older-than 1w --required-tag keep=true

    # Only snapshots, machine-readable output
    redshift-reaper nuke --older-than 30d --kind snapshot -o json

    # Save defaults for an account
    redshift-reaper profile set sandbox --region eu-west-1 --older-than 7d --default
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "REDSHIFT_REAPER_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "REDSHIFT_REAPER_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete aged clusters, snapshots, subnet groups and parameter groups
    #[command(visible_alias = "run")]
    Nuke(NukeArgs),

    /// Profile management
    #[command(subcommand, visible_alias = "prof", visible_alias = "pr")]
    Profile(ProfileCommands),
}

#[derive(Args, Debug, Clone)]
pub struct NukeArgs {
    /// AWS region (defaults to the profile, then the AWS config chain)
    #[arg(long)]
    pub region: Option<String>,

    /// Named profile in the shared AWS config files
    #[arg(long)]
    pub aws_profile: Option<String>,

    /// Minimum age of deleted clusters and snapshots (e.g. 12h, 7d, 2w, 1m; bare numbers are days)
    #[arg(long, conflicts_with = "before", value_parser = parse_duration_arg)]
    pub older_than: Option<std::time::Duration>,

    /// Absolute threshold as epoch seconds; only resources created before it are deleted
    #[arg(long)]
    pub before: Option<f64>,

    /// Preserve clusters carrying this tag (repeatable; all must match)
    #[arg(long = "required-tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    pub required_tags: Vec<(String, String)>,

    /// Restrict the run to these kinds (repeatable)
    #[arg(long = "kind", value_enum)]
    pub kinds: Vec<ResourceKind>,

    /// List eligible resources without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the availability probe before listing
    #[arg(long)]
    pub skip_probe: bool,

    /// What to do with a cluster whose tags cannot be read
    #[arg(long, value_enum)]
    pub tag_failure: Option<TagFailurePolicy>,

    /// Exit with status 1 when any delete or listing failed
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls", visible_alias = "l")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "sh", visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add", visible_alias = "create")]
    #[command(after_help = "EXAMPLES:
    # Sandbox account, keep anything tagged keep=true
    redshift-reaper profile set sandbox --region eu-west-1 --aws-profile sandbox-admin \\
        --older-than 7d --required-tag keep=true --default

    # Snapshots only, never delete a cluster whose tags cannot be read
    redshift-reaper profile set snapshots --kind snapshot --tag-failure preserve
")]
    Set {
        /// Profile name
        name: String,

        /// AWS region
        #[arg(long)]
        region: Option<String>,

        /// Named profile in the shared AWS config files
        #[arg(long)]
        aws_profile: Option<String>,

        /// Default minimum age (e.g. 7d)
        #[arg(long, value_parser = validate_duration)]
        older_than: Option<String>,

        /// Preserve clusters carrying this tag (repeatable)
        #[arg(long = "required-tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
        required_tags: Vec<(String, String)>,

        /// Kinds to process (repeatable; none means all)
        #[arg(long = "kind", value_enum)]
        kinds: Vec<ResourceKind>,

        /// What to do with a cluster whose tags cannot be read
        #[arg(long, value_enum)]
        tag_failure: Option<TagFailurePolicy>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm", visible_alias = "del", visible_alias = "delete")]
    Remove {
        /// Profile name to remove
        name: String,
    },

    /// Set the default profile
    #[command(visible_alias = "def")]
    Default {
        /// Profile name
        name: String,
    },
}

fn parse_duration_arg(value: &str) -> Result<std::time::Duration, String> {
    redshift_reaper_core::parse_duration(value).map_err(|e| e.to_string())
}

fn validate_duration(value: &str) -> Result<String, String> {
    parse_duration_arg(value).map(|_| value.to_string())
}

/// Parse a `KEY=VALUE` tag; the value may be empty but the key may not
fn parse_tag(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("env=prod").unwrap(),
            ("env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_tag("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_tag("empty=").unwrap().1, "");
        assert!(parse_tag("novalue").is_err());
        assert!(parse_tag("=prod").is_err());
    }

    #[test]
    fn test_nuke_args() {
        let cli = Cli::try_parse_from([
            "redshift-reaper",
            "nuke",
            "--older-than",
            "2w",
            "--required-tag",
            "keep=true",
            "--kind",
            "snapshot",
            "--kind",
            "cluster",
            "--tag-failure",
            "preserve",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Nuke(args) = cli.command else {
            panic!("expected nuke");
        };
        assert_eq!(
            args.older_than,
            Some(std::time::Duration::from_secs(14 * 24 * 3600))
        );
        assert_eq!(args.kinds, vec![ResourceKind::Snapshot, ResourceKind::Cluster]);
        assert_eq!(args.tag_failure, Some(TagFailurePolicy::Preserve));
        assert!(args.dry_run);
    }

    #[test]
    fn test_older_than_conflicts_with_before() {
        let result = Cli::try_parse_from([
            "redshift-reaper",
            "nuke",
            "--older-than",
            "7d",
            "--before",
            "1700000000",
        ]);
        assert!(result.is_err());
    }
}
