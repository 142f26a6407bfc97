use clap::{Args, Subcommand};

use super::FormArgs;

#[derive(Args)]
pub struct BadgeClassCommands {
    #[command(subcommand)]
    pub command: BadgeClassSubcommands,
}

#[derive(Subcommand)]
pub enum BadgeClassSubcommands {
    /// Create a badge class under an issuer
    Create {
        /// Issuer slug (falls back to the configured default issuer)
        #[arg(long)]
        issuer: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit an existing badge class
    Edit {
        /// Badge class slug
        badge: String,
        /// Issuer slug (falls back to the configured default issuer)
        #[arg(long)]
        issuer: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
}

#[derive(Args)]
pub struct AssertionCommands {
    #[command(subcommand)]
    pub command: AssertionSubcommands,
}

#[derive(Subcommand)]
pub enum AssertionSubcommands {
    /// Issue a badge class to an earner
    Issue {
        /// Badge class slug
        badge: String,
        /// Issuer slug (falls back to the configured default issuer)
        #[arg(long)]
        issuer: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
}

#[derive(Args)]
pub struct EarnerCommands {
    #[command(subcommand)]
    pub command: EarnerSubcommands,
}

#[derive(Subcommand)]
pub enum EarnerSubcommands {
    /// Upload a badge you earned into your backpack
    Upload {
        /// Known recipient identifiers; the first becomes the default
        #[arg(long = "recipient")]
        recipient_ids: Vec<String>,
        #[command(flatten)]
        form: FormArgs,
    },
}

#[derive(Args)]
pub struct BadgeCommands {
    #[command(subcommand)]
    pub command: BadgeSubcommands,
}

#[derive(Subcommand)]
pub enum BadgeSubcommands {
    /// Show one badge from the backpack collection
    Show {
        /// Badge slug
        slug: String,
    },
}
