//! variable providers
//!
//! A [Provider] turns one raw input into [Variables]. Providers are stateless; only
//! [Environment] looks at ambient (process) state.
//!
//! Which provider handles a literal input is decided by its [Format] tag, see [Format::provider].
//! Several providers are combined with a [Chain].
mod chain;
mod environment;
mod key_value;
mod structured;

pub use chain::{Chain, EnvPolicy, RawInputs, ResolveError};
pub use environment::Environment;
pub use key_value::KeyValue;
pub use structured::Structured;

use crate::value::Variables;
use std::fmt::Formatter;

/// Source of variables for one raw input format
pub trait Provider: std::fmt::Debug {
    /// Type identity, reported in errors and used to look up raw input in a [Chain]
    fn kind(&self) -> ProviderKind;

    /// Parse raw input
    ///
    /// Empty input is not an error and yields an empty mapping.
    fn parse(&self, raw: &str) -> Result<Variables, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Environment,
    KeyValue,
    Structured,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Environment => f.write_str("environment"),
            ProviderKind::KeyValue => f.write_str("key-value"),
            ProviderKind::Structured => f.write_str("json"),
        }
    }
}

/// Format of a literal variables input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `KEY=VALUE` lines
    #[default]
    Env,
    /// a json object
    Json,
}

impl Format {
    /// Provider handling literal input of this format
    pub fn provider(self) -> Box<dyn Provider> {
        match self {
            Format::Env => Box::new(KeyValue),
            Format::Json => Box::new(Structured),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Env => f.write_str("env"),
            Format::Json => f.write_str("json"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("invalid key-value input")]
    KeyValue(#[from] dotenvy::Error),
    #[error("invalid json document")]
    Json(#[from] serde_json::Error),
    #[error("json document must be an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("invalid environment variable: {entry}")]
    InvalidEnvironment { entry: String },
}
