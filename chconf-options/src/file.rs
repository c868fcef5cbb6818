//! Options files.
//!
//! An options file is TOML holding a DSN plus overrides that are awkward to
//! express in a URL:
//!
//! ```toml
//! dsn = "${CLICKHOUSE_DSN}"
//! debug = false
//!
//! [pool]
//! max_open_conns = 20
//! max_idle_conns = 10
//! conn_max_lifetime = "30m"
//!
//! [settings]
//! max_execution_time = 60
//! readonly = true
//! ```
//!
//! `${VAR}` references are replaced with the value of the environment
//! variable before parsing. References to unset variables are left as is.

use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::duration::parse_duration;
use crate::error::{OptionsError, OptionsResult};
use crate::options::Options;
use crate::protocol::ConnOpenStrategy;
use crate::settings::Settings;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Contents of an options file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    /// Connection DSN.
    pub dsn: String,

    /// Overrides the DSN `debug` flag.
    #[serde(default)]
    pub debug: Option<bool>,

    /// Pool and timeout overrides.
    #[serde(default)]
    pub pool: PoolSection,

    /// Settings merged over those of the DSN.
    #[serde(default)]
    pub settings: Settings,
}

/// Pool and timeout overrides of an options file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSection {
    /// Upper bound of open connections.
    pub max_open_conns: Option<u32>,
    /// Upper bound of idle connections.
    pub max_idle_conns: Option<u32>,
    /// Maximum connection age, as a duration string.
    pub conn_max_lifetime: Option<String>,
    /// Dial timeout, as a duration string.
    pub dial_timeout: Option<String>,
    /// Read timeout, as a duration string.
    pub read_timeout: Option<String>,
    /// Address rotation policy.
    pub conn_open_strategy: Option<ConnOpenStrategy>,
}

impl OptionsFile {
    /// Load an options file from a path.
    pub fn from_file(path: impl AsRef<Path>) -> OptionsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| OptionsError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let file: Self = content.parse()?;
        info!(path = %path.display(), "Loaded options file");
        Ok(file)
    }

    /// Build options from the DSN and overrides.
    ///
    /// Defaults are not applied.
    pub fn to_options(&self) -> OptionsResult<Options> {
        let mut options = Options::from_dsn(&self.dsn)?;
        let pool = &self.pool;

        if let Some(debug) = self.debug {
            options.debug = debug;
        }
        if let Some(n) = pool.max_open_conns {
            options.max_open_conns = n;
        }
        if let Some(n) = pool.max_idle_conns {
            options.max_idle_conns = n;
        }
        if let Some(lifetime) = &pool.conn_max_lifetime {
            options.conn_max_lifetime = duration_field("pool.conn_max_lifetime", lifetime)?;
        }
        if let Some(timeout) = &pool.dial_timeout {
            options.dial_timeout = duration_field("pool.dial_timeout", timeout)?;
        }
        if let Some(timeout) = &pool.read_timeout {
            options.read_timeout = duration_field("pool.read_timeout", timeout)?;
        }
        if let Some(strategy) = pool.conn_open_strategy {
            options.conn_open_strategy = strategy;
        }

        for (name, value) in &self.settings {
            options.settings.insert(name.clone(), value.clone());
        }

        Ok(options)
    }
}

impl FromStr for OptionsFile {
    type Err = OptionsError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let expanded = expand_env_vars(content);
        toml::from_str(&expanded).map_err(|e| OptionsError::Toml { source: e })
    }
}

/// Load an options file and return fully resolved options.
pub fn load_options(path: impl AsRef<Path>) -> OptionsResult<Options> {
    Ok(OptionsFile::from_file(path)?.to_options()?.with_defaults())
}

fn duration_field(field: &str, value: &str) -> OptionsResult<std::time::Duration> {
    parse_duration(value).map_err(|source| OptionsError::InvalidDuration {
        field: field.to_string(),
        source,
    })
}

/// Expand environment variables in the format `${VAR_NAME}`.
fn expand_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
