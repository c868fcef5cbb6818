//! Block compression selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Method bytes of the native compressed block format.
mod codec {
    pub(super) const NONE: u8 = 0x02;
    pub(super) const LZ4: u8 = 0x82;
    pub(super) const ZSTD: u8 = 0x90;
    /// No native codec exists for gzip; transports must special-case it.
    pub(super) const GZIP: u8 = 0x99;
}

/// Compression method applied to data blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CompressionMethod {
    /// Blocks are framed but not compressed.
    #[default]
    None = codec::NONE,
    /// LZ4 block compression.
    Lz4 = codec::LZ4,
    /// Zstandard block compression.
    Zstd = codec::ZSTD,
    /// Gzip, only meaningful for the HTTP transport.
    Gzip = codec::GZIP,
}

impl CompressionMethod {
    /// All methods, in declaration order.
    pub const ALL: [Self; 4] = [Self::None, Self::Lz4, Self::Zstd, Self::Gzip];

    /// Get the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
            Self::Gzip => "gzip",
        }
    }

    /// The codec identifier written on the wire.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Look up a method by its codec identifier.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Name of the method with the given codec identifier, or `""` if unknown.
    pub fn name_of(code: u8) -> &'static str {
        Self::from_code(code).map_or("", |m| m.as_str())
    }

    /// Whether the native protocol has a codec for this method.
    pub fn is_native(&self) -> bool {
        !matches!(self, Self::Gzip)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for CompressionMethod {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

/// Compression settings for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Compression {
    /// The method to use.
    pub method: CompressionMethod,
}

impl Compression {
    /// Create compression settings for a method.
    pub fn new(method: CompressionMethod) -> Self {
        Self { method }
    }

    /// LZ4, the method enabled by `compress=true`.
    pub fn lz4() -> Self {
        Self::new(CompressionMethod::Lz4)
    }
}

impl From<CompressionMethod> for Compression {
    fn from(method: CompressionMethod) -> Self {
        Self::new(method)
    }
}
