//! Logging configuration and initialization
//!
//! Central tracing setup shared by every LDP binary. Supports console and/or
//! daily-rotated file output, text or JSON formatting, and environment-based
//! configuration.
//!
//! Use the structured macros (`trace!`, `debug!`, `info!`, `warn!`, `error!`)
//! with fields rather than `println!`:
//!
//! ```rust
//! use tracing::info;
//!
//! info!(file = "transactions_20240115.csv", rows = 5, "File loaded");
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Minimum level to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to a tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

/// Output target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" => Ok(LogOutput::Both),
            _ => Err(anyhow::anyhow!("Invalid log output: {}", s)),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for structured collection
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level to display
    pub level: LogLevel,
    /// Output target (console, file, or both)
    pub output: LogOutput,
    /// Text or JSON
    pub format: LogFormat,
    /// Directory for log files (file output only)
    pub log_dir: PathBuf,
    /// Log file prefix, e.g. "ldp" -> "ldp.2024-01-18.log"
    pub file_prefix: String,
    /// Extra filter directives, e.g. "sqlx=warn"
    pub filter_directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            output: LogOutput::Console,
            format: LogFormat::Text,
            log_dir: PathBuf::from("./logs"),
            file_prefix: "ldp".to_string(),
            filter_directives: None,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`,
    /// `LOG_DIR`, `LOG_FILE_PREFIX`, `LOG_FILTER`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.level = level.parse()?;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            config.output = output.parse()?;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.format = format.parse()?;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("LOG_FILE_PREFIX") {
            config.file_prefix = prefix;
        }
        if let Ok(filter) = std::env::var("LOG_FILTER") {
            config.filter_directives = Some(filter);
        }

        Ok(config)
    }

    /// Override the minimum level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Override the log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Override the filter directives
    pub fn with_filter_directives(mut self, directives: impl Into<String>) -> Self {
        self.filter_directives = Some(directives.into());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter =
            EnvFilter::from_default_env().add_directive(self.level.to_tracing_level().into());

        if let Some(ref directives) = self.filter_directives {
            for directive in directives.split(',') {
                filter = filter.add_directive(
                    directive
                        .trim()
                        .parse()
                        .context("Failed to parse log filter directive")?,
                );
            }
        }

        Ok(filter)
    }
}

/// Initialize the global tracing subscriber
///
/// Call once at startup. Returns an error if a subscriber is already set or
/// the log directory cannot be created.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = config.env_filter()?;

    match config.output {
        LogOutput::Console => init_console(config, filter),
        LogOutput::File => init_file(config, filter),
        LogOutput::Both => init_both(config, filter),
    }
}

fn init_console(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let layer = fmt::layer().with_writer(std::io::stdout);
    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        },
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()?;
        },
    }
    Ok(())
}

fn init_file(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let layer = fmt::layer().with_writer(file_writer(config)?).with_ansi(false);
    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        },
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()?;
        },
    }
    Ok(())
}

fn init_both(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    match config.format {
        LogFormat::Text => {
            let console = fmt::layer().with_writer(std::io::stdout);
            let file = fmt::layer().with_writer(file_writer(config)?).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init()?;
        },
        LogFormat::Json => {
            let console = fmt::layer().json().with_writer(std::io::stdout);
            let file = fmt::layer().json().with_writer(file_writer(config)?).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init()?;
        },
    }
    Ok(())
}

fn file_writer(config: &LogConfig) -> Result<tracing_appender::non_blocking::NonBlocking> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The guard flushes buffered lines on drop; keep it alive for the
    // lifetime of the process.
    std::mem::forget(guard);

    Ok(writer)
}
