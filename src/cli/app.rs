use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::NotifyArgs;
use super::commands::auth::AuthCommands;
use super::commands::badge::{AssertionCommands, BadgeClassCommands, BadgeCommands, EarnerCommands};
use super::commands::collections::CollectionsCommands;
use super::commands::issuer::IssuerCommands;
use super::commands::open::OpenArgs;

#[derive(Parser)]
#[command(name = "badgr-cli")]
#[command(about = "A CLI client for Badgr-style open badge issuing servers")]
pub struct Cli {
    /// JSON file of initial collection data to preload (server bootstrap
    /// payload format)
    #[arg(long, global = true)]
    pub bootstrap: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Badge server authentication management
    Auth(AuthCommands),
    /// Inspect the in-process API collections
    Collections(CollectionsCommands),
    /// Create or edit issuers
    Issuer(IssuerCommands),
    /// Create or edit badge classes
    Badgeclass(BadgeClassCommands),
    /// Issue badges to earners
    Assertion(AssertionCommands),
    /// Manage badges in your own backpack
    Earner(EarnerCommands),
    /// Show a badge's detail view
    Badge(BadgeCommands),
    /// Notify an earner about an issued badge
    Notify(NotifyArgs),
    /// Open a panel by its type name (unknown names show an empty panel)
    Open(OpenArgs),
}
