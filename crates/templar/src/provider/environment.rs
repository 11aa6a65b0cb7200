use super::{ParseError, Provider, ProviderKind};
use crate::value::Variables;
use std::ffi::OsString;

/// Snapshot of the process environment
///
/// Raw input is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Environment {
    /// Build variables from `(name, value)` environment entries
    ///
    /// Names and values that are not valid unicode are converted lossily. An entry without a name
    /// is malformed.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Result<Variables, ParseError> {
        let mut variables = Variables::new();

        for (name, value) in entries {
            let name = name.to_string_lossy();
            let value = value.to_string_lossy();

            if name.is_empty() {
                return Err(ParseError::InvalidEnvironment {
                    entry: format!("={value}"),
                });
            }

            variables.insert(name, value);
        }

        Ok(variables)
    }
}

impl Provider for Environment {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Environment
    }

    fn parse(&self, _raw: &str) -> Result<Variables, ParseError> {
        Self::from_entries(std::env::vars_os())
    }
}
