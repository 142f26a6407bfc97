use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Set up a badge server connection
    Setup {
        /// Name for this server (e.g., "production", "staging")
        #[arg(short, long)]
        name: Option<String>,
        /// Server base URL
        #[arg(long)]
        base_url: Option<String>,
        /// API token
        #[arg(long)]
        api_token: Option<String>,
        /// CSRF token for cookie-session deployments
        #[arg(long)]
        csrf_token: Option<String>,
        /// Issuer slug used when commands don't name one
        #[arg(long)]
        default_issuer: Option<String>,
    },
    /// Select the current server
    Select {
        /// Server name to select
        name: Option<String>,
    },
    /// Show current connection status
    Status,
}
