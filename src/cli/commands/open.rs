use clap::Args;

use super::FormArgs;

/// The stringly panel boundary: `open EarnerBadgeForm`, `open
/// BadgeClassCreateUpdateForm --issuer chess-club`, and so on. Unrecognized
/// names degrade to an empty panel.
#[derive(Args)]
pub struct OpenArgs {
    /// Panel type name
    pub panel_type: String,

    /// Issuer slug context
    #[arg(long)]
    pub issuer: Option<String>,

    /// Badge slug context
    #[arg(long)]
    pub badge: Option<String>,

    /// Recipient identifier context (repeatable)
    #[arg(long = "recipient")]
    pub recipient_ids: Vec<String>,

    #[command(flatten)]
    pub form: FormArgs,
}
