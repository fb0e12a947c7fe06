//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `update`: merge scanner output into the locale catalogs
//! - `check`: load catalogs, report parse errors and translation progress
//! - `resolve`: look up one message through a locale's fallback chain
//! - `init`: write a default `.lingcatrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Update(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Resolve(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Catalog directory (overrides config file)
    #[arg(long)]
    pub catalogs_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locales to update; a catalog is created for a locale without one.
    /// Can be specified multiple times (default: every discovered catalog)
    #[arg(long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Scanner output to merge (overrides config file)
    #[arg(long)]
    pub extraction: Option<PathBuf>,

    /// Remove messages that were already vanished
    #[arg(long)]
    pub prune: bool,

    /// Report what would change without writing catalogs
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locales to check (default: every discovered catalog)
    #[arg(long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Context (class) of the message
    pub context: String,

    /// Source text of the message
    pub source: String,

    /// Locale to resolve in
    #[arg(long)]
    pub locale: String,

    /// Disambiguation comment of the message
    #[arg(long)]
    pub disambiguation: Option<String>,

    /// Count selecting the plural form
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge extracted source strings into the translation catalogs
    Update(UpdateCommand),
    /// Report catalog parse errors and translation progress
    Check(CheckCommand),
    /// Print the translation of one message for a locale
    Resolve(ResolveCommand),
    /// Initialize a new .lingcatrc.json configuration file
    Init,
}
