//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_sdk::LectorClient;

/// Execute the profile command.
pub async fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    let changed = match args.action {
        ProfileAction::List => {
            list_profiles(config, formatter);
            false
        }
        ProfileAction::Show => {
            show_active_profile(config, formatter)?;
            false
        }
        ProfileAction::Switch { name } => {
            switch_profile(config, name, formatter)?;
            true
        }
        ProfileAction::Set { name, url } => {
            set_profile(config, name, url, formatter)?;
            true
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter)?,
    };

    if changed {
        config.save()?;
    }
    Ok(())
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return;
    }

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    println!("Available profiles:");
    for name in names {
        let active = name == &config.active_profile;
        let marker = if active { "* " } else { "  " };
        println!(
            "{}{}",
            marker,
            if active { formatter.success(name) } else { name.clone() }
        );
        println!("    URL: {}", config.profiles[name].server_url);
    }
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    println!("  URL: {}", profile.server_url);
    match config.session.request_timeout() {
        Some(limit) => println!("  Timeout: {}s", limit.as_secs()),
        None => println!("  Timeout: none"),
    }
    println!("  Downloads: {}", config.download_dir().display());

    Ok(())
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, name: String, url: String, formatter: &Formatter) -> Result<()> {
    // Reject URLs the client could never use
    LectorClient::new(&url).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), Profile { server_url: url });

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile; returns whether anything was removed.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<bool> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
        Ok(true)
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
        Ok(false)
    }
}
