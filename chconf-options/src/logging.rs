//! Subscriber setup for the chconf crates.
//!
//! The crates log through `tracing` only. Applications that do not install
//! their own subscriber can install one scoped to the `chconf` and
//! `chconf_options` targets, either from the environment ([`init_from_env`])
//! or from resolved [`Options`], whose `debug` flag raises the level to
//! `DEBUG` ([`init_for`]):
//!
//! - `CHCONF_LOG_LEVEL=trace|debug|info|warn|error` - level for [`init_from_env`]
//! - `CHCONF_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! Installing needs the `tracing-subscriber` feature; without it every init
//! function returns `false`. Credentials are never logged.
//!
//! ```rust
//! use chconf_options::Options;
//! use chconf_options::logging::LogSettings;
//!
//! let options = Options::from_dsn("clickhouse://db1?debug=true").unwrap();
//! let settings = LogSettings::for_options(&options);
//! assert_eq!(settings.directives(), "chconf=debug,chconf_options=debug");
//! ```

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Level;

use crate::options::Options;

const LEVEL_VAR: &str = "CHCONF_LOG_LEVEL";
const FORMAT_VAR: &str = "CHCONF_LOG_FORMAT";

/// Targets the installed filter enables.
const TARGETS: [&str; 2] = ["chconf", "chconf_options"];

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human-oriented output.
    Pretty,
    /// Single-line output.
    Compact,
}

impl LogFormat {
    /// Parse a format name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    /// Format named by `CHCONF_LOG_FORMAT`, or JSON.
    pub fn from_env() -> Self {
        env::var(FORMAT_VAR)
            .ok()
            .as_deref()
            .and_then(Self::from_name)
            .unwrap_or_default()
    }

    /// The format name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Level and format of the subscriber to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Most verbose level enabled for the chconf targets.
    pub level: Level,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Json,
        }
    }
}

impl LogSettings {
    /// Build settings from raw `CHCONF_LOG_LEVEL` / `CHCONF_LOG_FORMAT` values.
    ///
    /// Returns `None` when the level is absent or not a level name. An
    /// unknown format falls back to JSON.
    pub fn from_env_values(level: Option<&str>, format: Option<&str>) -> Option<Self> {
        let level = level?.trim().parse::<Level>().ok()?;
        let format = format.and_then(LogFormat::from_name).unwrap_or_default();
        Some(Self { level, format })
    }

    /// Settings from the process environment, if `CHCONF_LOG_LEVEL` is set.
    pub fn from_env() -> Option<Self> {
        let level = env::var(LEVEL_VAR).ok();
        let format = env::var(FORMAT_VAR).ok();
        Self::from_env_values(level.as_deref(), format.as_deref())
    }

    /// Settings for a resolved connection: `DEBUG` when the DSN asked for
    /// debug output, `WARN` otherwise.
    pub fn for_options(options: &Options) -> Self {
        let level = if options.debug { Level::DEBUG } else { Level::WARN };
        Self {
            level,
            ..Self::default()
        }
    }

    /// Replace the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter directives enabling `level` for every chconf target.
    pub fn directives(&self) -> String {
        let level = self.level.to_string().to_ascii_lowercase();
        TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install a global subscriber with the given settings.
///
/// Returns `true` only for the call that installed it. Later calls, calls
/// made after another global subscriber was set, and every call without the
/// `tracing-subscriber` feature return `false`.
pub fn init(settings: LogSettings) -> bool {
    if INSTALLED.load(Ordering::Acquire) {
        return false;
    }

    let installed = install(&settings);
    if installed {
        INSTALLED.store(true, Ordering::Release);
        tracing::info!(
            level = %settings.level,
            format = settings.format.as_str(),
            "chconf logging initialized"
        );
    }
    installed
}

/// Install a subscriber configured by `CHCONF_LOG_LEVEL` / `CHCONF_LOG_FORMAT`.
///
/// Does nothing when `CHCONF_LOG_LEVEL` is unset or invalid.
pub fn init_from_env() -> bool {
    match LogSettings::from_env() {
        Some(settings) => init(settings),
        None => false,
    }
}

/// Install a subscriber whose level follows the `debug` flag of `options`.
///
/// The format still comes from `CHCONF_LOG_FORMAT`.
pub fn init_for(options: &Options) -> bool {
    init(LogSettings::for_options(options).with_format(LogFormat::from_env()))
}

#[cfg(feature = "tracing-subscriber")]
fn install(settings: &LogSettings) -> bool {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let Ok(filter) = EnvFilter::try_new(settings.directives()) else {
        return false;
    };

    let registry = tracing_subscriber::registry().with(filter);
    match settings.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    }
    .is_ok()
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_settings: &LogSettings) -> bool {
    false
}
