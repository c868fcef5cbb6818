//! Wire protocol and address rotation enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire protocol used to talk to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Protocol {
    /// Native binary protocol.
    #[default]
    Native = 0,
    /// HTTP interface, with or without TLS.
    Http = 1,
}

impl Protocol {
    /// Get the protocol name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Http => "http",
        }
    }

    /// Look up a protocol by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Native),
            1 => Some(Self::Http),
            _ => None,
        }
    }

    /// Name of the protocol with the given code, or `""` if unknown.
    pub fn name_of(code: u8) -> &'static str {
        Self::from_code(code).map_or("", |p| p.as_str())
    }

    /// Resolve the protocol implied by a DSN scheme.
    ///
    /// `http` and `https` share the HTTP protocol; every other scheme is native.
    pub fn for_scheme(scheme: &str) -> Self {
        match scheme {
            "http" | "https" => Self::Http,
            _ => Self::Native,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a pool walks the configured addresses when opening connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnOpenStrategy {
    /// Try addresses in the configured order.
    #[default]
    InOrder,
    /// Rotate through addresses.
    RoundRobin,
}

impl ConnOpenStrategy {
    /// Get the strategy name as used in DSNs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InOrder => "in_order",
            Self::RoundRobin => "round_robin",
        }
    }

    /// Parse a DSN strategy name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in_order" => Some(Self::InOrder),
            "round_robin" => Some(Self::RoundRobin),
            _ => None,
        }
    }
}

impl fmt::Display for ConnOpenStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_names() {
        assert_eq!(Protocol::Native.to_string(), "native");
        assert_eq!(Protocol::Http.to_string(), "http");
        assert_eq!(Protocol::name_of(0), "native");
        assert_eq!(Protocol::name_of(1), "http");
        assert_eq!(Protocol::name_of(2), "");
        assert_eq!(Protocol::name_of(u8::MAX), "");
    }

    #[test]
    fn test_protocol_for_scheme() {
        assert_eq!(Protocol::for_scheme("http"), Protocol::Http);
        assert_eq!(Protocol::for_scheme("https"), Protocol::Http);
        assert_eq!(Protocol::for_scheme("clickhouse"), Protocol::Native);
        assert_eq!(Protocol::for_scheme("tcp"), Protocol::Native);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(ConnOpenStrategy::default(), ConnOpenStrategy::InOrder);
        assert_eq!(
            ConnOpenStrategy::from_name("round_robin"),
            Some(ConnOpenStrategy::RoundRobin)
        );
        assert_eq!(ConnOpenStrategy::from_name("random"), None);
        assert_eq!(ConnOpenStrategy::RoundRobin.to_string(), "round_robin");
    }
}
