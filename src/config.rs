use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat backend
    pub backend_base_url: String,

    /// Polichat home directory
    pub polichat_home: PathBuf,

    /// Timing knobs for the conversation flow
    pub timing: TimingConfig,
}

/// Delays driving the typing animation and the simulated response pause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Typing-dots animation tick (ms)
    pub typing_tick_ms: u64,
    /// Pause before showing a category or free-text reply (ms)
    pub reply_delay_ms: u64,
    /// Shorter pause before returning to the start screen (ms)
    pub home_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_tick_ms: 300,
            reply_delay_ms: 1000,
            home_delay_ms: 600,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            backend_base_url: DEFAULT_BASE_URL.to_string(),
            polichat_home: home.join(".polichat"),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, then apply env and CLI overrides.
    /// Precedence: CLI flag > POLICHAT_BASE_URL > config.toml > default.
    pub fn load(cli_base_url: Option<String>) -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let polichat_home = home.join(".polichat");
        let config_path = polichat_home.join("config.toml");

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.polichat_home = polichat_home;

        if let Ok(url) = std::env::var("POLICHAT_BASE_URL") {
            if !url.trim().is_empty() {
                config.backend_base_url = url;
            }
        }

        if let Some(url) = cli_base_url {
            config.backend_base_url = url;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.polichat_home)
            .context("Failed to create .polichat directory")?;

        let config_path = self.polichat_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}
