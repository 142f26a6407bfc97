pub mod auth;
pub mod badge;
pub mod collections;
pub mod issuer;
pub mod open;

use clap::Args;

/// Arguments shared by every form-backed command.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Set a field without prompting, as field=value (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Image field content: a file path to upload or an image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Skip interactive prompts and submit with the provided values
    #[arg(short, long)]
    pub yes: bool,

    /// Re-submit after every field change instead of once at the end
    #[arg(long)]
    pub submit_immediately: bool,
}

#[derive(Args, Debug)]
pub struct NotifyArgs {
    #[command(flatten)]
    pub form: FormArgs,
}
