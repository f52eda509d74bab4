//! Unified error type.

use std::fmt;

/// The error type returned by tolk's fallible operations.
///
/// Construction is the only place tolk can fail: a middleware with no usable
/// translations must never serve a request. Per-request resolution is total —
/// a missing cookie or an empty header is an ordinary value, and the default
/// language guarantees that every request ends up with a translator.
#[derive(Debug)]
pub enum Error {
    /// `Config::default_language` was empty.
    NoDefaultLanguage,
    /// Neither `Config::files` nor `Config::sources` supplied any
    /// translation source.
    NoSources,
    /// A translation source could not be read or parsed.
    Source { name: String, reason: String },
    /// The configured default language matched nothing in the loaded catalog.
    UnknownDefaultLanguage(String),
    /// Binding to a port or accepting a connection failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultLanguage => write!(f, "no default language set"),
            Self::NoSources => write!(f, "no translation sources supplied"),
            Self::Source { name, reason } => {
                write!(f, "translation source `{name}`: {reason}")
            }
            Self::UnknownDefaultLanguage(tag) => {
                write!(f, "default language `{tag}` is not in the catalog")
            }
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
