use super::{ParseError, Provider, ProviderKind};
use crate::value::{type_name, Variables};
use serde_json::Value as JsonValue;

/// Json object input
///
/// Nested objects and arrays are kept as structured values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

impl Provider for Structured {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Structured
    }

    fn parse(&self, raw: &str) -> Result<Variables, ParseError> {
        if raw.trim().is_empty() {
            return Ok(Variables::new());
        }

        match serde_json::from_str::<JsonValue>(raw)? {
            JsonValue::Object(object) => Ok(object.into()),
            JsonValue::Null => Ok(Variables::new()),
            other => Err(ParseError::NotAnObject {
                found: type_name(&other),
            }),
        }
    }
}
