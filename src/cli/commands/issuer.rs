use clap::{Args, Subcommand};

use super::FormArgs;

#[derive(Args)]
pub struct IssuerCommands {
    #[command(subcommand)]
    pub command: IssuerSubcommands,
}

#[derive(Subcommand)]
pub enum IssuerSubcommands {
    /// Create a new issuer
    Create {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit an existing issuer
    Edit {
        /// Issuer slug
        slug: String,
        #[command(flatten)]
        form: FormArgs,
    },
}
