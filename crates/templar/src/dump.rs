//! variable introspection
//!
//! Instead of rendering a template, show which variables a template would see. Names are always
//! ordered lexicographically.
//!
//! | detail    | text                          | json / yaml                 |
//! |-----------|-------------------------------|-----------------------------|
//! | `Basic`   | one name per line             | list of names               |
//! | `Verbose` | `name=<type>`                 | name to type                |
//! | `Debug`   | `name=<json value>`           | name to value               |
//!
//! `Verbose` deliberately hides values and only reveals their type. An empty mapping in `Basic`
//! detail produces no output at all.
use crate::value::{type_name, Variables};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// How much of each variable is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Detail {
    /// names only
    #[default]
    Basic,
    /// names and value types
    Verbose,
    /// names and full values
    Debug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    pub format: DumpFormat,
    pub detail: Detail,
    /// single line json instead of pretty printed
    pub compact: bool,
}

/// Render variables for inspection
pub fn dump(variables: &Variables, options: DumpOptions) -> Result<String, DumpError> {
    if variables.is_empty() && options.detail == Detail::Basic {
        return Ok(String::new());
    }

    match options.format {
        DumpFormat::Text => Ok(text(variables, options.detail)),
        DumpFormat::Json => {
            let projection = project(variables, options.detail);
            let mut json = if options.compact {
                serde_json::to_string(&projection)?
            } else {
                serde_json::to_string_pretty(&projection)?
            };
            json.push('\n');
            Ok(json)
        }
        DumpFormat::Yaml => Ok(serde_yaml::to_string(&project(variables, options.detail))?),
    }
}

fn text(variables: &Variables, detail: Detail) -> String {
    if variables.is_empty() {
        return "No variables found\n".to_string();
    }

    let mut out = String::new();
    for (name, value) in variables.sorted() {
        out.push_str(name);
        match detail {
            Detail::Basic => {}
            Detail::Verbose => {
                out.push('=');
                out.push_str(type_name(value));
            }
            Detail::Debug => {
                out.push('=');
                out.push_str(&value.to_string());
            }
        }
        out.push('\n');
    }
    out
}

/// Structured view of the variables for the given detail level
fn project(variables: &Variables, detail: Detail) -> JsonValue {
    let sorted = variables.sorted();
    match detail {
        Detail::Basic => JsonValue::Array(
            sorted
                .into_iter()
                .map(|(name, _)| JsonValue::String(name.clone()))
                .collect(),
        ),
        Detail::Verbose => JsonValue::Object(
            sorted
                .into_iter()
                .map(|(name, value)| (name.clone(), JsonValue::from(type_name(value))))
                .collect(),
        ),
        Detail::Debug => JsonValue::Object(
            sorted
                .into_iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        ),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DumpError {
    #[error("failed to encode variables as json")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode variables as yaml")]
    Yaml(#[from] serde_yaml::Error),
}
