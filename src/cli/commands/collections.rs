use clap::{Args, Subcommand};

#[derive(Args)]
pub struct CollectionsCommands {
    #[command(subcommand)]
    pub command: CollectionsSubcommands,
}

#[derive(Subcommand)]
pub enum CollectionsSubcommands {
    /// List collection names and sizes
    List,
    /// Print one collection's records as JSON
    Show {
        /// Collection name, e.g. issuer_badgeclasses
        name: String,
    },
}
