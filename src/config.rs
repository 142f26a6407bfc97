use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One badge server the CLI can talk to, plus the ambient session tokens
/// submissions are sent with.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub csrf_token: Option<String>,
    /// Issuer slug used when a command does not name one.
    pub default_issuer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub current_server: Option<String>,
    pub servers: HashMap<String, ServerConfig>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("badgr-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".badgr-cli")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using default config");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} servers", config.servers.len());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn add_server(&mut self, name: String, server: ServerConfig) -> Result<()> {
        info!("Adding server: {}", name);
        self.servers.insert(name.clone(), server);

        // Set as current server if it's the first one
        if self.current_server.is_none() {
            self.current_server = Some(name.clone());
            info!("Set {} as current server", name);
        }

        self.save()
    }

    pub fn set_current_server(&mut self, name: String) -> Result<()> {
        if !self.servers.contains_key(&name) {
            anyhow::bail!("Server '{}' not found", name);
        }

        info!("Setting current server to: {}", name);
        self.current_server = Some(name);
        self.save()
    }

    pub fn get_current_server(&self) -> Option<&ServerConfig> {
        let current = self.current_server.as_ref()?;
        self.servers.get(current)
    }

    pub fn list_servers(&self) -> Vec<&String> {
        self.servers.keys().collect()
    }

    /// The server the process should talk to: the current configured server
    /// with `BADGR_BASE_URL` / `BADGR_API_TOKEN` / `BADGR_CSRF_TOKEN`
    /// environment overrides applied on top.
    pub fn effective_server(&self) -> Result<ServerConfig> {
        let mut server = self
            .get_current_server()
            .cloned()
            .unwrap_or_default();

        if let Ok(base_url) = std::env::var("BADGR_BASE_URL") {
            server.base_url = base_url;
        }
        if let Ok(token) = std::env::var("BADGR_API_TOKEN") {
            server.api_token = Some(token);
        }
        if let Ok(csrf) = std::env::var("BADGR_CSRF_TOKEN") {
            server.csrf_token = Some(csrf);
        }

        if server.base_url.is_empty() {
            anyhow::bail!(
                "No badge server configured. Run 'badgr-cli auth setup' or set BADGR_BASE_URL"
            );
        }
        Ok(server)
    }
}
