//! Connection options and default resolution.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compression::{Compression, CompressionMethod};
use crate::protocol::{ConnOpenStrategy, Protocol};
use crate::settings::{SettingValue, Settings};

/// Database and user name used when none is given.
pub const DEFAULT_DATABASE: &str = "default";
/// Username used when none is given.
pub const DEFAULT_USERNAME: &str = "default";
/// Dial timeout used when none is given.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(1);
/// Idle connection limit used when none is given.
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 5;
/// Headroom of open connections above the idle limit.
pub const DEFAULT_MAX_OPEN_CONNS_HEADROOM: u32 = 5;
/// Connection lifetime used when none is given.
pub const DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Credentials and target database.
///
/// Username and password are passed through untouched; they may contain
/// control characters that the transport has to deal with.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    /// Database name.
    pub database: String,
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// A TLS request for the transport.
///
/// The handshake is performed by the transport; this only records what was
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Accept any server certificate.
    pub insecure_skip_verify: bool,
}

impl TlsConfig {
    /// TLS with certificate verification.
    pub fn verified() -> Self {
        Self {
            insecure_skip_verify: false,
        }
    }

    /// TLS without certificate verification.
    pub fn insecure() -> Self {
        Self {
            insecure_skip_verify: true,
        }
    }
}

/// Resolved description of a connection target.
///
/// Build one from a DSN with [`Options::from_dsn`] or directly with the
/// setter methods, then call [`Options::set_defaults`] before handing it to
/// a transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Wire protocol.
    pub protocol: Protocol,
    /// TLS request, absent for plaintext.
    pub tls: Option<TlsConfig>,
    /// Server addresses as `host[:port]`, in configured order.
    pub addr: Vec<String>,
    /// Credentials and database.
    pub auth: Auth,
    /// Enables verbose protocol logging in the transport.
    pub debug: bool,
    /// Settings sent with every session.
    pub settings: Settings,
    /// Block compression, absent when disabled.
    pub compression: Option<Compression>,
    /// Timeout for establishing a connection.
    pub dial_timeout: Duration,
    /// Timeout for reading a response; zero means none.
    pub read_timeout: Duration,
    /// Upper bound of open connections.
    pub max_open_conns: u32,
    /// Upper bound of idle connections.
    pub max_idle_conns: u32,
    /// Maximum age of a connection before it is recycled.
    pub conn_max_lifetime: Duration,
    /// Address rotation policy.
    pub conn_open_strategy: ConnOpenStrategy,
    pub(crate) scheme: String,
}

impl Options {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme of the DSN these options were parsed from, empty otherwise.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether TLS was requested.
    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    /// The configured compression method, if any.
    pub fn compression_method(&self) -> Option<CompressionMethod> {
        self.compression.map(|c| c.method)
    }

    /// Fill unset fields with defaults.
    ///
    /// Only fields still at their zero value are touched, so calling this
    /// more than once has no further effect.
    pub fn set_defaults(&mut self) {
        if self.auth.database.is_empty() {
            self.auth.database = DEFAULT_DATABASE.to_string();
        }
        if self.auth.username.is_empty() {
            self.auth.username = DEFAULT_USERNAME.to_string();
        }
        if self.dial_timeout.is_zero() {
            self.dial_timeout = DEFAULT_DIAL_TIMEOUT;
        }
        if self.max_idle_conns == 0 {
            self.max_idle_conns = DEFAULT_MAX_IDLE_CONNS;
        }
        // Depends on the idle limit resolved above.
        if self.max_open_conns == 0 {
            self.max_open_conns = self
                .max_idle_conns
                .saturating_add(DEFAULT_MAX_OPEN_CONNS_HEADROOM);
        }
        if self.conn_max_lifetime.is_zero() {
            self.conn_max_lifetime = DEFAULT_CONN_MAX_LIFETIME;
        }
    }

    /// Consume the options and return them with defaults filled in.
    pub fn with_defaults(mut self) -> Self {
        self.set_defaults();
        self
    }

    /// Add a server address.
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr.push(addr.into());
        self
    }

    /// Set the protocol.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.auth.database = database.into();
        self
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.auth.username = username.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth.password = password.into();
        self
    }

    /// Set the compression method.
    pub fn compression(mut self, method: CompressionMethod) -> Self {
        self.compression = Some(Compression::new(method));
        self
    }

    /// Request TLS.
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Set the dial timeout.
    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the open connection limit.
    pub fn max_open_conns(mut self, n: u32) -> Self {
        self.max_open_conns = n;
        self
    }

    /// Set the idle connection limit.
    pub fn max_idle_conns(mut self, n: u32) -> Self {
        self.max_idle_conns = n;
        self
    }

    /// Set the connection lifetime.
    pub fn conn_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.conn_max_lifetime = lifetime;
        self
    }

    /// Set the address rotation policy.
    pub fn conn_open_strategy(mut self, strategy: ConnOpenStrategy) -> Self {
        self.conn_open_strategy = strategy;
        self
    }

    /// Add a server-side setting.
    pub fn setting(mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Enable or disable transport debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_on_empty_options() {
        let options = Options::new().with_defaults();

        assert_eq!(options.auth.database, "default");
        assert_eq!(options.auth.username, "default");
        assert_eq!(options.dial_timeout, Duration::from_secs(1));
        assert_eq!(options.max_idle_conns, 5);
        assert_eq!(options.max_open_conns, 10);
        assert_eq!(options.conn_max_lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn test_defaults_leave_other_fields_unset() {
        let options = Options::new().with_defaults();

        assert_eq!(options.protocol, Protocol::Native);
        assert!(options.addr.is_empty());
        assert!(options.compression.is_none());
        assert!(options.tls.is_none());
        assert_eq!(options.read_timeout, Duration::ZERO);
        assert_eq!(options.conn_open_strategy, ConnOpenStrategy::InOrder);
        assert!(options.auth.password.is_empty());
    }

    #[test]
    fn test_max_open_follows_resolved_idle() {
        let options = Options::new().max_idle_conns(20).with_defaults();

        assert_eq!(options.max_idle_conns, 20);
        assert_eq!(options.max_open_conns, 25);
    }

    #[test]
    fn test_defaults_keep_explicit_values() {
        let options = Options::new()
            .database("analytics")
            .username("reader")
            .dial_timeout(Duration::from_millis(250))
            .max_open_conns(3)
            .conn_max_lifetime(Duration::from_secs(60))
            .with_defaults();

        assert_eq!(options.auth.database, "analytics");
        assert_eq!(options.auth.username, "reader");
        assert_eq!(options.dial_timeout, Duration::from_millis(250));
        assert_eq!(options.max_open_conns, 3);
        assert_eq!(options.max_idle_conns, 5);
        assert_eq!(options.conn_max_lifetime, Duration::from_secs(60));
    }

    #[test]
    fn test_set_defaults_is_idempotent() {
        let once = Options::new().max_idle_conns(7).with_defaults();
        let twice = once.clone().with_defaults();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_builder_setters() {
        let options = Options::new()
            .addr("a:9000")
            .addr("b:9000")
            .password("secret")
            .compression(CompressionMethod::Zstd)
            .tls(TlsConfig::insecure())
            .setting("max_threads", 8)
            .debug(true);

        assert_eq!(options.addr, vec!["a:9000", "b:9000"]);
        assert_eq!(options.compression_method(), Some(CompressionMethod::Zstd));
        assert!(options.is_secure());
        assert_eq!(options.settings["max_threads"], SettingValue::Int(8));
        assert!(options.debug);
        assert_eq!(options.scheme(), "");
    }

    #[test]
    fn test_auth_debug_hides_password() {
        let auth = Auth {
            database: "db".into(),
            username: "user".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
