//! Configuration loader for the map-render service.
//!
//! Loads and validates a single YAML file. Values may reference environment
//! variables with `${VAR}` or `${VAR:-default}`.

use anyhow::{Context, Result};
use map_common::RenderConfig;
use renderer::style::DEFAULT_ELEMENT_COLORS;
use renderer::{OutputTemplate, Palette, StrokeStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Service Configuration (map-render.yaml)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rendering: RenderConfig,
    #[serde(default)]
    pub tiles: TilesConfig,
    #[serde(default)]
    pub symbols: Option<SymbolsConfig>,
    #[serde(default = "default_map_save_file")]
    pub map_save_file: String,
    #[serde(default = "default_element_colors")]
    pub element_colors: Vec<String>,
    #[serde(default)]
    pub stroke: StrokeStyle,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesConfig {
    /// Root of a `{z}/{x}/{y}.png` tile tree
    pub directory: PathBuf,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("tiles"),
        }
    }
}

/// Note icon sources: local paths or `http(s)` URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsConfig {
    pub note_open: String,
    pub note_solved: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sliding window length in seconds
    pub time_period: f64,
    /// Calls allowed inside one window
    pub max_calls: usize,
    /// Seconds each element beyond the first keeps a call in the window
    pub extra_per_element: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            time_period: 60.0,
            max_calls: 10,
            extra_per_element: 0.5,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.time_period)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("map-render/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

fn default_map_save_file() -> String {
    "map_{t}.png".to_string()
}

fn default_element_colors() -> Vec<String> {
    DEFAULT_ELEMENT_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn palette(&self) -> Result<Palette> {
        Ok(Palette::from_hex(&self.element_colors)?)
    }

    pub fn output_template(&self) -> OutputTemplate {
        OutputTemplate::new(self.map_save_file.clone())
    }
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load and parse the service YAML with environment variable substitution.
pub fn load_app_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
    parse_app_config(&content)
        .with_context(|| format!("Invalid config in {:?}", path.as_ref()))
}

/// Parse and validate service YAML from a string.
pub fn parse_app_config(content: &str) -> Result<AppConfig> {
    let expanded = expand_env_vars(content)?;

    let config: AppConfig =
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse config YAML")?;

    validate_app_config(&config)?;

    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_app_config(config: &AppConfig) -> Result<()> {
    config.rendering.validate()?;
    config.palette()?;

    anyhow::ensure!(
        !config.map_save_file.trim().is_empty(),
        "map_save_file cannot be empty"
    );
    anyhow::ensure!(
        config.rate_limit.time_period > 0.0 && config.rate_limit.time_period.is_finite(),
        "rate_limit.time_period must be a positive number of seconds"
    );
    anyhow::ensure!(
        config.rate_limit.max_calls > 0,
        "rate_limit.max_calls must be greater than 0"
    );
    anyhow::ensure!(
        config.rate_limit.extra_per_element >= 0.0,
        "rate_limit.extra_per_element cannot be negative"
    );
    anyhow::ensure!(
        config.stroke.line_width > 0.0 && config.stroke.marker_radius >= 0.0,
        "stroke sizes must be positive"
    );

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    anyhow::ensure!(
        valid_levels.contains(&config.log_level.to_lowercase().as_str()),
        "Invalid log level: {}. Must be one of: {:?}",
        config.log_level,
        valid_levels
    );

    Ok(())
}
