use super::{ParseError, Provider, ProviderKind};
use crate::value::Variables;

/// Line oriented `KEY=VALUE` input (dotenv syntax, parsed by [dotenvy])
///
/// Quoting, `export` prefixes, comments and `$VAR` / `${VAR}` expansion follow dotenv. Expansion
/// looks at the process environment first, then at keys defined earlier in the same input.
///
/// Lines without `=` are skipped, any other malformed line is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValue;

impl Provider for KeyValue {
    fn kind(&self) -> ProviderKind {
        ProviderKind::KeyValue
    }

    fn parse(&self, raw: &str) -> Result<Variables, ParseError> {
        let mut variables = Variables::new();

        for entry in dotenvy::from_read_iter(raw.as_bytes()) {
            match entry {
                Ok((key, value)) => variables.insert(key, value),
                Err(dotenvy::Error::LineParse(line, _)) if !line.contains('=') => {
                    tracing::debug!("skipping line without '='");
                }
                Err(err) => return Err(ParseError::KeyValue(err)),
            }
        }

        Ok(variables)
    }
}
