use santase_bot::OpponentKind;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_REVEAL_DELAY_MS: u64 = 800;
const MAX_REVEAL_DELAY_MS: u64 = 10_000;

/// Root application configuration loaded from YAML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub opponent: OpponentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.game.validate()?;
        self.opponent.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.logging.tracing_level),
            });
        }
        Ok(())
    }
}

/// Deal and pacing settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub human_leads_first: bool,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            human_leads_first: true,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
        }
    }
}

impl GameConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.reveal_delay_ms > MAX_REVEAL_DELAY_MS {
            return Err(ValidationError::InvalidField {
                field: "game.reveal_delay_ms".to_string(),
                message: format!("delay must not exceed {MAX_REVEAL_DELAY_MS} ms"),
            });
        }
        Ok(())
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_reveal_delay_ms() -> u64 {
    DEFAULT_REVEAL_DELAY_MS
}

/// Which bot sits across the table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OpponentConfig {
    #[serde(default = "default_opponent_kind")]
    pub kind: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            kind: default_opponent_kind(),
            seed: None,
        }
    }
}

impl OpponentConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let kind = self
            .kind
            .parse::<OpponentKind>()
            .map_err(|err| ValidationError::InvalidField {
                field: "opponent.kind".to_string(),
                message: err.to_string(),
            })?;
        self.kind = kind.as_str().to_string();
        Ok(())
    }

    pub fn opponent_kind(&self) -> OpponentKind {
        self.kind.parse().unwrap_or_default()
    }
}

fn default_opponent_kind() -> String {
    OpponentKind::LowestLegal.as_str().to_string()
}

/// Logging configuration; plain text on stderr unless told otherwise.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self
            .file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.file = None;
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
