//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (GR_LOG, RUST_LOG, GR_LOG_FORMAT)
//! - CLI flags (-v, -q), which win over the environment

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" | "machine" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug information.
    Debug,
    /// Standard operational info (default).
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
    /// Completely silent.
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "GR_LOG";

/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "GR_LOG_FORMAT";

/// Environment variable holding a full `EnvFilter` directive.
pub const ENV_RUST_LOG: &str = "RUST_LOG";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Level chosen by `GR_LOG` or the CLI flags. Overrides `RUST_LOG`.
    pub level: Option<LogLevel>,
    /// Raw `RUST_LOG` directive, used only when no level is chosen.
    pub rust_log: Option<String>,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: None,
            rust_log: None,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    ///
    /// Level precedence, highest first: `-q`/`-v`, `GR_LOG`, `RUST_LOG`,
    /// then info. Format precedence: `GR_LOG_FORMAT`, then
    /// `default_format` (JSONL when the payload format is machine-readable),
    /// then human.
    pub fn from_env(cli_level: Option<LogLevel>, default_format: Option<LogFormat>) -> Self {
        Self::from_vars(|key| std::env::var(key).ok(), cli_level, default_format)
    }

    /// Same as [`LogConfig::from_env`], reading variables through `var`.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        default_format: Option<LogFormat>,
    ) -> Self {
        let env_level = var(ENV_LOG_LEVEL).and_then(|val| val.parse::<LogLevel>().ok());
        let rust_log = var(ENV_RUST_LOG)
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        let format = var(ENV_LOG_FORMAT)
            .and_then(|val| val.parse::<LogFormat>().ok())
            .or(default_format)
            .unwrap_or_default();

        LogConfig {
            format,
            level: cli_level.or(env_level),
            rust_log,
            timestamps: true,
        }
    }

    /// Directive handed to `EnvFilter`.
    pub fn filter_directive(&self) -> String {
        match (self.level, &self.rust_log) {
            (Some(level), _) => level.to_string(),
            (None, Some(directive)) => directive.clone(),
            (None, None) => LogLevel::Info.to_string(),
        }
    }

    /// Level implied by the CLI verbosity flags, if any.
    ///
    /// `-q` wins over `-v`; `-v` is debug, `-vv` and beyond trace.
    pub fn level_from_flags(verbose: u8, quiet: bool) -> Option<LogLevel> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}
