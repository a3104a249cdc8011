use anyhow::{Context, Result};
use gastobot_core::{PaymentMethodRegistry, DEFAULT_PAYMENT_METHODS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk configuration (`config.toml` in the data directory). Absent file
/// means defaults; the registry is read once at startup and never reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub payment_methods: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            payment_methods: DEFAULT_PAYMENT_METHODS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    pub fn registry(&self) -> PaymentMethodRegistry {
        PaymentMethodRegistry::new(self.payment_methods.clone())
    }
}

pub fn data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "gastobot", "Gastobot")
        .context("could not determine a data directory")?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.toml"))
}

pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("gastos.db"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn bot_token() -> Result<String> {
    std::env::var("TELEGRAM_BOT_TOKEN")
        .context("TELEGRAM_BOT_TOKEN is not set; get a token from @BotFather")
}
