//! Profile management command implementations

use colored::Colorize;
use redshift_reaper_core::{Profile, ResourceKind};
use serde_json::json;
use tracing::{debug, info};

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{ReaperCliError, Result as CliResult};
use crate::output;

pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    match profile_cmd {
        ProfileCommands::List => handle_list(conn_mgr, output_format),
        ProfileCommands::Path => handle_path(conn_mgr, output_format),
        ProfileCommands::Show { name } => handle_show(conn_mgr, name, output_format),
        ProfileCommands::Set {
            name,
            region,
            aws_profile,
            older_than,
            required_tags,
            kinds,
            tag_failure,
            default,
        } => {
            let profile = Profile {
                region: region.clone(),
                aws_profile: aws_profile.clone(),
                older_than: older_than.clone(),
                tag_failure: *tag_failure,
                kinds: kinds.clone(),
                required_tags: required_tags.iter().cloned().collect(),
            };
            handle_set(conn_mgr, name, profile, *default)
        }
        ProfileCommands::Remove { name } => handle_remove(conn_mgr, name),
        ProfileCommands::Default { name } => handle_default(conn_mgr, name),
    }
}

fn profile_json(name: &str, profile: &Profile, is_default: bool) -> serde_json::Value {
    json!({
        "name": name,
        "default": is_default,
        "region": profile.region,
        "aws_profile": profile.aws_profile,
        "older_than": profile.older_than,
        "tag_failure": profile.tag_failure,
        "kinds": profile.kinds,
        "required_tags": profile.required_tags,
    })
}

fn kinds_label(kinds: &[ResourceKind]) -> String {
    if kinds.is_empty() {
        "all".to_string()
    } else {
        kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    let default_name = conn_mgr.config.default_profile.as_deref();
    let config_path = conn_mgr.effective_config_path();

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let profile_list: Vec<_> = profiles
                .iter()
                .map(|(name, profile)| {
                    profile_json(name, profile, default_name == Some(name.as_str()))
                })
                .collect();

            let output_data = json!({
                "config_path": config_path.map(|p| p.display().to_string()),
                "profiles": profile_list,
                "count": profiles.len(),
            });
            output::print_output(&output_data, output_format)
        }
        OutputFormat::Table => {
            if let Some(path) = config_path {
                println!("Configuration file: {}", path.display());
                println!();
            }

            if profiles.is_empty() {
                info!("No profiles configured");
                println!("No profiles configured.");
                println!("Use 'redshift-reaper profile set' to create a profile.");
                return Ok(());
            }

            for (name, profile) in &profiles {
                if default_name == Some(name.as_str()) {
                    println!("  {} {}", name.bold().cyan(), "(default)".green());
                } else {
                    println!("  {}", name.bold().cyan());
                }
                if let Some(region) = &profile.region {
                    println!("    {} {}", "Region:".dimmed(), region);
                }
                if let Some(age) = &profile.older_than {
                    println!("    {} {}", "Older than:".dimmed(), age);
                }
                println!("    {} {}", "Kinds:".dimmed(), kinds_label(&profile.kinds));
            }
            Ok(())
        }
    }
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let path = conn_mgr
        .effective_config_path()
        .ok_or_else(|| {
            ReaperCliError::Configuration("Failed to determine config directory".to_string())
        })?;

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => output::print_output(
            json!({ "config_path": path.display().to_string() }),
            output_format,
        ),
        OutputFormat::Table => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr
        .config
        .profiles
        .get(name)
        .ok_or_else(|| ReaperCliError::ProfileNotFound {
            name: name.to_string(),
        })?;
    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            output::print_output(profile_json(name, profile, is_default), output_format)
        }
        OutputFormat::Table => {
            println!("Profile: {}", name.bold());
            println!("Default: {}", if is_default { "yes" } else { "no" });
            println!(
                "Region: {}",
                profile.region.as_deref().unwrap_or("(AWS default)")
            );
            println!(
                "AWS profile: {}",
                profile.aws_profile.as_deref().unwrap_or("(AWS default)")
            );
            println!(
                "Older than: {}",
                profile.older_than.as_deref().unwrap_or("(not set)")
            );
            println!(
                "Tag failure: {}",
                profile
                    .tag_failure
                    .map(|p| format!("{:?}", p).to_lowercase())
                    .unwrap_or_else(|| "delete".to_string())
            );
            println!("Kinds: {}", kinds_label(&profile.kinds));
            if profile.required_tags.is_empty() {
                println!("Required tags: (none)");
            } else {
                println!("Required tags:");
                for (key, value) in &profile.required_tags {
                    println!("  {}={}", key, value);
                }
            }
            Ok(())
        }
    }
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    profile: Profile,
    make_default: bool,
) -> CliResult<()> {
    debug!("Setting profile: {}", name);

    let mut document = conn_mgr.load_document()?;
    let is_first = document.is_empty();
    document.set_profile(name, &profile)?;
    if make_default || is_first {
        document.set_default_profile(name);
    }
    conn_mgr.save_document(&document)?;

    println!("Profile '{}' saved", name);
    if document.default_profile() == Some(name) {
        println!("Profile '{}' is the default", name);
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    let mut document = conn_mgr.load_document()?;
    if !document.remove_profile(name) {
        return Err(ReaperCliError::ProfileNotFound {
            name: name.to_string(),
        });
    }

    conn_mgr.save_document(&document)?;
    println!("Profile '{}' removed", name);
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    let mut document = conn_mgr.load_document()?;
    if !document.has_profile(name) {
        return Err(ReaperCliError::ProfileNotFound {
            name: name.to_string(),
        });
    }

    document.set_default_profile(name);
    conn_mgr.save_document(&document)?;
    println!("Default profile set to '{}'", name);
    Ok(())
}
