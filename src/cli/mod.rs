//! Command-line surface: argument model and command orchestration.

pub mod orchestration;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "vertagus",
    version,
    about = "Validate manifest versions and publish version tags"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the current version against the configured rules
    Validate {
        #[arg(short, long, help = "Stage whose rules apply on top of the project's")]
        stage: Option<String>,

        #[arg(short, long, help = "Previous version (defaults to the highest existing tag)")]
        previous: Option<String>,
    },

    /// Create the version tag for the current version
    CreateTag {
        #[arg(short, long)]
        stage: Option<String>,

        #[arg(short, long = "ref", help = "Revision to tag (defaults to HEAD)")]
        reference: Option<String>,
    },

    /// Create or move the alias tags for the current version
    CreateAliases {
        #[arg(short, long)]
        stage: Option<String>,

        #[arg(short, long)]
        alias_prefix: Option<String>,

        #[arg(short, long = "ref", help = "Revision to point aliases at (defaults to HEAD)")]
        reference: Option<String>,
    },

    /// List the effective rules
    ListRules {
        #[arg(short, long)]
        stage: Option<String>,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,
    },

    /// List the alias tag names for the current version
    ListAliases {
        #[arg(short, long)]
        stage: Option<String>,

        #[arg(short, long)]
        alias_prefix: Option<String>,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,
    },
}
