use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vertagus::assembly::assemble_project;
use vertagus::cli::orchestration::{self, CommandContext};
use vertagus::cli::{Args, Command};
use vertagus::config;
use vertagus::git::Git2Repository;
use vertagus::rules::RuleRegistry;
use vertagus::ui;

/// Environment variable holding the log filter, e.g. `debug` or `vertagus=info`.
const LOG_ENV: &str = "VERTAGUS_LOG_LEVEL";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config_path = config::locate_config(args.config.as_deref())?;
    let config = config::read_config(&config_path)
        .with_context(|| format!("Error loading config '{}'", config_path.display()))?;

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let repo_root = config
        .scm
        .root
        .as_ref()
        .map(|root| base_dir.join(root))
        .unwrap_or_else(|| base_dir.clone());

    let registry = RuleRegistry::with_builtins();
    let project = assemble_project(&config.project, &registry, &base_dir)?;

    match &args.command {
        Command::ListRules { stage, json } => {
            let listing = orchestration::list_rules(&project, stage.as_deref())?;
            if *json {
                ui::display_json(&listing)?;
            } else {
                ui::display_rules(&listing);
            }
            return Ok(());
        }
        Command::ListAliases {
            stage,
            alias_prefix,
            json,
        } => {
            let aliases =
                orchestration::list_aliases(&project, stage.as_deref(), alias_prefix.as_deref())?;
            if *json {
                ui::display_json(&aliases)?;
            } else {
                ui::display_aliases(&aliases);
            }
            return Ok(());
        }
        _ => {}
    }

    if config.scm.scm_type != "git" {
        ui::display_error(&format!("Unsupported scm type '{}'", config.scm.scm_type));
        std::process::exit(1);
    }
    let repo = Git2Repository::open(&repo_root, Some(&config.scm.remote_name))?;
    let ctx = CommandContext {
        project: &project,
        repo: &repo,
        tag_prefix: config.scm.tag_prefix.as_deref(),
    };

    match args.command {
        Command::Validate { stage, previous } => {
            let outcome = orchestration::validate(&ctx, stage.as_deref(), previous.as_deref())?;
            ui::display_validation(&outcome);
            if !outcome.passed {
                std::process::exit(1);
            }
        }
        Command::CreateTag { stage, reference } => {
            let tag = orchestration::create_tag(&ctx, stage.as_deref(), reference.as_deref())?;
            ui::display_success(&format!("Created tag: {}", tag));
        }
        Command::CreateAliases {
            stage,
            alias_prefix,
            reference,
        } => {
            let aliases = orchestration::create_aliases(
                &ctx,
                stage.as_deref(),
                alias_prefix.as_deref(),
                reference.as_deref(),
            )?;
            for alias in aliases {
                ui::display_success(&format!("Moved alias: {}", alias));
            }
        }
        Command::ListRules { .. } | Command::ListAliases { .. } => {}
    }

    Ok(())
}
