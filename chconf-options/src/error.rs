//! Error types for DSN parsing and options loading.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::duration::DurationError;

/// Result type for options operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Errors that can occur while resolving connection options.
#[derive(Error, Debug, Diagnostic)]
pub enum OptionsError {
    /// The DSN is not a valid URL, or one of its typed parameters is invalid.
    #[error("malformed DSN: {0}")]
    #[diagnostic(
        code(chconf::options::malformed_dsn),
        help("expected scheme://[user[:password]@]host[,host...][/database][?key=value&...]")
    )]
    MalformedDsn(#[from] MalformedDsn),

    /// The `http` scheme was combined with `secure`.
    #[error("scheme '{scheme}' cannot be combined with the 'secure' parameter")]
    #[diagnostic(
        code(chconf::options::scheme_tls_conflict),
        help("use the https scheme for TLS over HTTP")
    )]
    SchemeTlsConflict {
        /// The offending scheme.
        scheme: String,
    },

    /// The `https` scheme was used without `secure`.
    #[error("scheme '{scheme}' requires the 'secure' parameter")]
    #[diagnostic(
        code(chconf::options::scheme_tls_missing),
        help("add '?secure=true' to the DSN")
    )]
    SchemeTlsMissing {
        /// The offending scheme.
        scheme: String,
    },

    /// A duration field of an options file could not be parsed.
    #[error("invalid duration for '{field}'")]
    #[diagnostic(
        code(chconf::options::invalid_duration),
        help("durations look like \"500ms\", \"30s\" or \"1h30m\"")
    )]
    InvalidDuration {
        /// Dotted path of the field.
        field: String,
        #[source]
        source: DurationError,
    },

    /// Error reading an options file.
    #[error("failed to read options file: {path}")]
    #[diagnostic(code(chconf::options::io_error))]
    Io {
        /// Path of the file.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing an options file.
    #[error("failed to parse options file")]
    #[diagnostic(code(chconf::options::toml_error))]
    Toml {
        #[source]
        source: toml::de::Error,
    },
}

/// Why a DSN was rejected as malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedDsn {
    /// The string is not a syntactically valid URL.
    #[error("invalid URL: {source}")]
    Url {
        #[source]
        source: url::ParseError,
    },

    /// A host of the host list is not a bare `host[:port]`.
    #[error("invalid host '{host}'")]
    Host {
        /// The host as written.
        host: String,
    },

    /// A duration-valued parameter could not be parsed.
    #[error("{key}: {source}")]
    Duration {
        /// Query parameter name.
        key: String,
        #[source]
        source: DurationError,
    },
}

impl OptionsError {
    /// Create a malformed-DSN error from a URL parse failure.
    pub fn url(source: url::ParseError) -> Self {
        Self::MalformedDsn(MalformedDsn::Url { source })
    }

    /// Create a malformed-DSN error for an invalid host.
    pub fn host(host: impl Into<String>) -> Self {
        Self::MalformedDsn(MalformedDsn::Host { host: host.into() })
    }

    /// Create a malformed-DSN error for an invalid duration parameter.
    pub fn duration(key: impl Into<String>, source: DurationError) -> Self {
        Self::MalformedDsn(MalformedDsn::Duration {
            key: key.into(),
            source,
        })
    }

    /// Check if this is a malformed-DSN error.
    pub fn is_malformed_dsn(&self) -> bool {
        matches!(self, Self::MalformedDsn(_))
    }

    /// Check if the DSN scheme disagrees with the TLS request.
    pub fn is_scheme_conflict(&self) -> bool {
        matches!(
            self,
            Self::SchemeTlsConflict { .. } | Self::SchemeTlsMissing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_dsn_display() {
        let err = OptionsError::duration("dial_timeout", DurationError::MissingUnit("5".into()));
        let display = err.to_string();
        assert!(display.contains("malformed DSN"));
        assert!(display.contains("dial_timeout"));
        assert!(err.is_malformed_dsn());
        assert!(!err.is_scheme_conflict());
    }

    #[test]
    fn test_url_error_source() {
        let err = OptionsError::url(url::ParseError::RelativeUrlWithoutBase);
        assert!(err.is_malformed_dsn());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_host_error_display() {
        let err = OptionsError::host("host\\db");
        assert!(err.is_malformed_dsn());
        assert!(err.to_string().contains("invalid host 'host\\db'"));
    }

    #[test]
    fn test_scheme_errors() {
        let conflict = OptionsError::SchemeTlsConflict {
            scheme: "http".into(),
        };
        let missing = OptionsError::SchemeTlsMissing {
            scheme: "https".into(),
        };
        assert!(conflict.is_scheme_conflict());
        assert!(missing.is_scheme_conflict());
        assert!(conflict.to_string().contains("http"));
        assert!(missing.to_string().contains("secure"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = OptionsError::SchemeTlsMissing {
            scheme: "https".into(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("chconf::options::scheme_tls_missing"));
    }
}
