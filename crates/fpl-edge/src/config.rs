// Configuration loading and parsing (league.toml, strategy.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::engine::gameweek::DEFAULT_REMINDER_LEAD_HOURS;
use crate::engine::transfer::DEFAULT_BUDGET_BUFFER;
use crate::engine::StrategyMode;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// The user's own entry id; excluded when picking rivals from standings.
    pub entry_id: u64,
    /// How many rivals (top of the standings) to compare against.
    #[serde(default = "default_max_rivals")]
    pub max_rivals: usize,
}

fn default_max_rivals() -> usize {
    3
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    strategy: StrategySection,
    #[serde(default)]
    scoring: ScoringWeights,
    #[serde(default)]
    transfer: TransferSection,
    data: DataPaths,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct StrategySection {
    mode: StrategyMode,
    #[serde(default = "default_reminder_lead_hours")]
    reminder_lead_hours: i64,
}

fn default_reminder_lead_hours() -> i64 {
    DEFAULT_REMINDER_LEAD_HOURS
}

#[derive(Debug, Clone, Deserialize)]
struct TransferSection {
    budget_buffer: u32,
}

impl Default for TransferSection {
    fn default() -> Self {
        TransferSection {
            budget_buffer: DEFAULT_BUDGET_BUFFER,
        }
    }
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub mode: StrategyMode,
    pub reminder_lead_hours: i64,
    pub weights: ScoringWeights,
    /// Extra spend allowed on a single swap, in tenths of a currency unit.
    pub budget_buffer: u32,
}

/// Weights for the DEFEND (safety) and CHASE (swing) scores.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ScoringWeights {
    #[serde(default)]
    pub safety: SafetyWeights,
    #[serde(default)]
    pub swing: SwingWeights,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SafetyWeights {
    pub ownership: f64,
    pub ppg: f64,
    pub form: f64,
    pub ease: f64,
    pub chance: f64,
}

impl Default for SafetyWeights {
    fn default() -> Self {
        SafetyWeights {
            ownership: 0.45,
            ppg: 0.20,
            form: 0.15,
            ease: 0.10,
            chance: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwingWeights {
    /// Weight on `100 - ownership`.
    pub scarcity: f64,
    pub ppg: f64,
    pub form: f64,
    pub ease: f64,
    pub medium_risk_penalty: f64,
    pub high_risk_penalty: f64,
}

impl Default for SwingWeights {
    fn default() -> Self {
        SwingWeights {
            scarcity: 0.45,
            ppg: 0.20,
            form: 0.15,
            ease: 0.15,
            medium_risk_penalty: 8.0,
            high_risk_penalty: 18.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub bootstrap: String,
    pub fixtures: String,
    pub my_picks: String,
    /// League standings payload; league analysis is skipped when absent.
    #[serde(default)]
    pub standings: Option<String>,
    /// Directory of `<entry_id>.json` rival picks payloads.
    #[serde(default)]
    pub rival_picks_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, both relative to the given `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let strategy = StrategyConfig {
        mode: strategy_file.strategy.mode,
        reminder_lead_hours: strategy_file.strategy.reminder_lead_hours,
        weights: strategy_file.scoring,
        budget_buffer: strategy_file.transfer.budget_buffer,
    };

    let config = Config {
        league: league_file.league,
        strategy,
        data_paths: strategy_file.data,
        output: strategy_file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// The files `load_config_from` reads, in `config/` and shipped in `defaults/`.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Copy any of [`CONFIG_FILES`] missing from `config/` out of `defaults/`.
/// Existing files are never overwritten. Returns the paths that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{name} is in neither config/ nor defaults/ under {}; \
                     run from the crate root or restore defaults/{name}",
                    base_dir.display()
                ),
            });
        }
        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.max_rivals == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.max_rivals".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.strategy.reminder_lead_hours < 0 {
        return Err(ConfigError::ValidationError {
            field: "strategy.reminder_lead_hours".into(),
            message: format!("must be >= 0, got {}", config.strategy.reminder_lead_hours),
        });
    }

    let s = &config.strategy.weights.safety;
    let w = &config.strategy.weights.swing;
    let weight_fields: &[(&str, f64)] = &[
        ("scoring.safety.ownership", s.ownership),
        ("scoring.safety.ppg", s.ppg),
        ("scoring.safety.form", s.form),
        ("scoring.safety.ease", s.ease),
        ("scoring.safety.chance", s.chance),
        ("scoring.swing.scarcity", w.scarcity),
        ("scoring.swing.ppg", w.ppg),
        ("scoring.swing.form", w.form),
        ("scoring.swing.ease", w.ease),
        ("scoring.swing.medium_risk_penalty", w.medium_risk_penalty),
        ("scoring.swing.high_risk_penalty", w.high_risk_penalty),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite value >= 0, got {val}"),
            });
        }
    }

    if w.high_risk_penalty < w.medium_risk_penalty {
        return Err(ConfigError::ValidationError {
            field: "scoring.swing.high_risk_penalty".into(),
            message: format!(
                "must be >= medium_risk_penalty ({}), got {}",
                w.medium_risk_penalty, w.high_risk_penalty
            ),
        });
    }

    let paths: &[(&str, &str)] = &[
        ("data.bootstrap", config.data_paths.bootstrap.as_str()),
        ("data.fixtures", config.data_paths.fixtures.as_str()),
        ("data.my_picks", config.data_paths.my_picks.as_str()),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.data_paths.standings.is_some() && config.data_paths.rival_picks_dir.is_none() {
        return Err(ConfigError::ValidationError {
            field: "data.rival_picks_dir".into(),
            message: "required when data.standings is set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
