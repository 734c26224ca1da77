//! Sources command - choose which apps are monitored.

use clap::{Args, Subcommand};
use console::style;

use txalert_core::{SourceConfig, TransactionClassifier};

use super::{config_path, load_or_default, save_config};

/// Arguments for the sources command.
#[derive(Args)]
pub struct SourcesArgs {
    #[command(subcommand)]
    command: SourcesCommand,
}

#[derive(Subcommand)]
enum SourcesCommand {
    /// List monitored package names
    List,

    /// Start monitoring one or more apps
    Add {
        /// Package names (e.g., "com.example.bank")
        #[arg(required = true)]
        apps: Vec<String>,
    },

    /// Stop monitoring one or more apps
    Remove {
        #[arg(required = true)]
        apps: Vec<String>,
    },

    /// Check whether an app is monitored
    Check {
        app: String,
    },

    /// Restore the built-in list of banking apps
    Reset,
}

pub async fn run(args: SourcesArgs, explicit: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        SourcesCommand::List => list_sources(explicit),
        SourcesCommand::Add { apps } => add_sources(explicit, apps),
        SourcesCommand::Remove { apps } => remove_sources(explicit, &apps),
        SourcesCommand::Check { app } => check_source(explicit, &app),
        SourcesCommand::Reset => reset_sources(explicit),
    }
}

fn list_sources(explicit: Option<&str>) -> anyhow::Result<()> {
    let classifier = TransactionClassifier::from_config(&load_or_default(&config_path(explicit))?)?;

    for app in classifier.allowlist() {
        println!("{}", app);
    }

    Ok(())
}

fn add_sources(explicit: Option<&str>, apps: Vec<String>) -> anyhow::Result<()> {
    let path = config_path(explicit);
    let mut config = load_or_default(&path)?;

    let mut added = 0;
    for app in apps {
        let app = app.trim().to_string();
        if app.is_empty() || config.sources.allowlist.contains(&app) {
            continue;
        }
        config.sources.allowlist.push(app);
        added += 1;
    }

    save_config(&config, &path)?;
    println!("{} Added {} app(s)", style("✓").green(), added);

    Ok(())
}

fn remove_sources(explicit: Option<&str>, apps: &[String]) -> anyhow::Result<()> {
    let path = config_path(explicit);
    let mut config = load_or_default(&path)?;

    let before = config.sources.allowlist.len();
    config.sources.allowlist.retain(|a| !apps.contains(a));
    let removed = before - config.sources.allowlist.len();

    if config.sources.allowlist.is_empty() {
        anyhow::bail!("Refusing to remove every monitored app; use 'sources reset' to start over.");
    }

    save_config(&config, &path)?;
    println!("{} Removed {} app(s)", style("✓").green(), removed);

    Ok(())
}

fn check_source(explicit: Option<&str>, app: &str) -> anyhow::Result<()> {
    let classifier = TransactionClassifier::from_config(&load_or_default(&config_path(explicit))?)?;

    if classifier.should_process(app) {
        println!("{} {} is monitored", style("✓").green(), app);
    } else {
        println!("{} {} is not monitored", style("✗").red(), app);
    }

    Ok(())
}

fn reset_sources(explicit: Option<&str>) -> anyhow::Result<()> {
    let path = config_path(explicit);
    let mut config = load_or_default(&path)?;

    config.sources = SourceConfig::default();
    save_config(&config, &path)?;

    println!(
        "{} Restored {} built-in apps",
        style("✓").green(),
        config.sources.allowlist.len()
    );

    Ok(())
}
