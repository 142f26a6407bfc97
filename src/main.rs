use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use badgr_cli::api::{BadgrClient, CollectionStore};
use badgr_cli::cli::commands::badge::{
    AssertionSubcommands, BadgeClassSubcommands, BadgeSubcommands, EarnerSubcommands,
};
use badgr_cli::cli::commands::issuer::IssuerSubcommands;
use badgr_cli::cli::{Cli, Commands};
use badgr_cli::commands;
use badgr_cli::config::{Config, ServerConfig};
use badgr_cli::forms::{FormStore, SubmissionController};
use badgr_cli::panels::{self, Panel, PanelContext, PanelView};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("badgr-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = Config::load()?;
    let cli = Cli::parse();
    info!("Starting badgr-cli");

    let mut forms = FormStore::new();
    let mut collections = CollectionStore::new();
    if let Some(path) = &cli.bootstrap {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bootstrap file: {}", path.display()))?;
        let initial: serde_json::Value =
            serde_json::from_str(&raw).context("Bootstrap file is not valid JSON")?;
        let loaded = collections.seed(&initial)?;
        info!("loaded {loaded} bootstrap records");
    }

    match cli.command {
        Commands::Auth(auth) => commands::auth::handle(auth.command, &mut config),
        Commands::Collections(cmd) => commands::collections::handle(cmd.command, &collections),
        Commands::Badge(badge) => {
            let BadgeSubcommands::Show { slug } = badge.command;
            let view = panels::resolve(&Panel::BadgeDetail { badge_slug: slug });
            if let PanelView::Detail(spec) = view {
                commands::collections::render_detail(&spec, &collections);
            }
            Ok(())
        }
        Commands::Issuer(issuer) => {
            let server = config.effective_server()?;
            let controller = SubmissionController::new(BadgrClient::new(&server));
            let (panel, form) = match issuer.command {
                IssuerSubcommands::Create { form } => (Panel::IssuerCreate, form),
                IssuerSubcommands::Edit { slug, form } => (Panel::IssuerEdit { issuer: slug }, form),
            };
            commands::forms::run_panel(&controller, &mut forms, &mut collections, panel, &form)
                .await
        }
        Commands::Badgeclass(badgeclass) => {
            let server = config.effective_server()?;
            let controller = SubmissionController::new(BadgrClient::new(&server));
            let (panel, form) = match badgeclass.command {
                BadgeClassSubcommands::Create { issuer, form } => {
                    let issuer = require_issuer(issuer, &server)?;
                    (Panel::BadgeClassCreate { issuer }, form)
                }
                BadgeClassSubcommands::Edit {
                    badge,
                    issuer,
                    form,
                } => {
                    let issuer = require_issuer(issuer, &server)?;
                    (Panel::BadgeClassEdit { issuer, badge }, form)
                }
            };
            commands::forms::run_panel(&controller, &mut forms, &mut collections, panel, &form)
                .await
        }
        Commands::Assertion(assertion) => {
            let server = config.effective_server()?;
            let controller = SubmissionController::new(BadgrClient::new(&server));
            let AssertionSubcommands::Issue {
                badge,
                issuer,
                form,
            } = assertion.command;
            let issuer = require_issuer(issuer, &server)?;
            let panel = Panel::AssertionIssue { issuer, badge };
            commands::forms::run_panel(&controller, &mut forms, &mut collections, panel, &form)
                .await
        }
        Commands::Earner(earner) => {
            let server = config.effective_server()?;
            let controller = SubmissionController::new(BadgrClient::new(&server));
            let EarnerSubcommands::Upload {
                recipient_ids,
                form,
            } = earner.command;
            let panel = Panel::EarnerBadgeUpload { recipient_ids };
            commands::forms::run_panel(&controller, &mut forms, &mut collections, panel, &form)
                .await
        }
        Commands::Notify(notify) => {
            let server = config.effective_server()?;
            let controller = SubmissionController::new(BadgrClient::new(&server));
            commands::forms::run_panel(
                &controller,
                &mut forms,
                &mut collections,
                Panel::IssuerNotification,
                &notify.form,
            )
            .await
        }
        Commands::Open(open) => {
            let context = PanelContext {
                issuer: open.issuer,
                badge: open.badge,
                recipient_ids: open.recipient_ids,
            };
            let Some(panel) = Panel::parse(&open.panel_type, &context) else {
                // Unknown panel types degrade to an empty panel, never an error.
                println!(
                    "{}",
                    format!("No panel for '{}'", open.panel_type).dimmed()
                );
                return Ok(());
            };
            match panels::resolve(&panel) {
                PanelView::Detail(spec) => {
                    commands::collections::render_detail(&spec, &collections);
                    Ok(())
                }
                PanelView::Form(_) => {
                    let server = config.effective_server()?;
                    let controller = SubmissionController::new(BadgrClient::new(&server));
                    commands::forms::run_panel(
                        &controller,
                        &mut forms,
                        &mut collections,
                        panel,
                        &open.form,
                    )
                    .await
                }
            }
        }
    }
}

fn require_issuer(issuer: Option<String>, server: &ServerConfig) -> Result<String> {
    issuer
        .or_else(|| server.default_issuer.clone())
        .context("No issuer given; pass --issuer or configure a default issuer")
}
