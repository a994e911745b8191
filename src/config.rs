//! Configuration management
//!
//! Manages tracker configuration including the default budget, the shopping
//! schedule, server binding and optional assets.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Budget defaults
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Shopping schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Server binding
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional static assets
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Amount restored on reset and used when no record exists yet
    #[serde(default = "default_budget")]
    pub default_budget: f64,
}

fn default_budget() -> f64 {
    600.0
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default_budget: default_budget(),
        }
    }
}

impl BudgetConfig {
    /// Default amount as a decimal for the allocator and store
    pub fn default_amount(&self) -> Decimal {
        Decimal::from_f64_retain(self.default_budget).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Weekday names shopping happens on (e.g. "wednesday", "sat")
    #[serde(default = "default_shopping_weekdays")]
    pub shopping_weekdays: Vec<String>,
    /// Hour of day after which today's trip counts as taken
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
}

fn default_shopping_weekdays() -> Vec<String> {
    vec!["wednesday".to_string(), "saturday".to_string()]
}

fn default_cutoff_hour() -> u32 {
    crate::schedule::DEFAULT_CUTOFF_HOUR
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            shopping_weekdays: default_shopping_weekdays(),
            cutoff_hour: default_cutoff_hour(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Image fetched once at startup and served from /static
    pub mascot_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget: BudgetConfig::default(),
            schedule: ScheduleConfig::default(),
            server: ServerConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "pantry-budget", "pantry-budget")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "pantry-budget", "pantry-budget")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

/// Get the static assets directory path
pub fn static_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("static"))
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Configuration ({})", config_path()?.display());
    println!("  Default budget:    {:.2} EUR", config.budget.default_budget);
    println!("  Shopping weekdays: {}", config.schedule.shopping_weekdays.join(", "));
    println!("  Cutoff hour:       {:02}:00", config.schedule.cutoff_hour);
    println!("  Server:            {}:{}", config.server.host, config.server.port);
    match &config.assets.mascot_url {
        Some(url) if !url.is_empty() => println!("  Mascot URL:        {}", url),
        _ => println!("  Mascot URL:        (not set)"),
    }

    Ok(())
}

/// Set the default budget restored on reset
pub fn set_default_budget(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("Default budget must be a non-negative amount, got {}", amount);
    }

    let mut config = Config::load()?;
    config.budget.default_budget = amount;
    config.save()?;
    println!("Default budget set to {:.2} EUR", amount);
    Ok(())
}

/// Set the hour after which today's trip counts as taken
pub fn set_cutoff_hour(hour: u32) -> Result<()> {
    if hour > 23 {
        bail!("Cutoff hour must be between 0 and 23, got {}", hour);
    }

    let mut config = Config::load()?;
    config.schedule.cutoff_hour = hour;
    config.save()?;
    println!("Cutoff hour set to {:02}:00", hour);
    Ok(())
}

/// Set the mascot image URL cached at startup
pub fn set_mascot_url(url: &str) -> Result<()> {
    url::Url::parse(url).context("Invalid mascot URL")?;

    let mut config = Config::load()?;
    config.assets.mascot_url = Some(url.to_string());
    config.save()?;
    println!("Mascot URL set");
    Ok(())
}
