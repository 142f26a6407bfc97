use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::cli::commands::auth::AuthSubcommands;
use crate::config::{Config, ServerConfig};
use crate::ui::{prompt_server_config, prompt_server_selection};

pub fn handle(command: AuthSubcommands, config: &mut Config) -> Result<()> {
    match command {
        AuthSubcommands::Setup {
            name,
            base_url,
            api_token,
            csrf_token,
            default_issuer,
        } => setup(config, name, base_url, api_token, csrf_token, default_issuer),
        AuthSubcommands::Select { name } => select(config, name),
        AuthSubcommands::Status => status(config),
    }
}

fn setup(
    config: &mut Config,
    name: Option<String>,
    base_url: Option<String>,
    api_token: Option<String>,
    csrf_token: Option<String>,
    default_issuer: Option<String>,
) -> Result<()> {
    info!("Starting auth setup");

    let name = name.unwrap_or_else(|| "default".to_string());

    let server = if let Some(base_url) = base_url {
        // All the interesting parameters came from the command line.
        ServerConfig {
            base_url,
            api_token,
            csrf_token,
            default_issuer,
        }
    } else {
        prompt_server_config(config.servers.get(&name))?
    };

    config.add_server(name.clone(), server)?;
    println!("{}", format!("Server '{name}' saved").green());
    Ok(())
}

fn select(config: &mut Config, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => {
            let mut names: Vec<String> = config.servers.keys().cloned().collect();
            names.sort();
            if names.is_empty() {
                anyhow::bail!("No servers configured. Run 'badgr-cli auth setup' first");
            }
            prompt_server_selection(&names, config.current_server.as_ref())?
        }
    };
    config.set_current_server(name.clone())?;
    println!("Current server: {}", name.cyan());
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    match (&config.current_server, config.get_current_server()) {
        (Some(name), Some(server)) => {
            println!("Current server: {}", name.cyan());
            println!("  URL:            {}", server.base_url);
            println!(
                "  API token:      {}",
                if server.api_token.is_some() {
                    "configured".green()
                } else {
                    "not set".yellow()
                }
            );
            println!(
                "  CSRF token:     {}",
                if server.csrf_token.is_some() {
                    "configured".green()
                } else {
                    "not set".yellow()
                }
            );
            if let Some(issuer) = &server.default_issuer {
                println!("  Default issuer: {}", issuer);
            }
        }
        _ => println!("{}", "No server configured".yellow()),
    }
    Ok(())
}
