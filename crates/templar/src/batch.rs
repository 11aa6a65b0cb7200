//! batch manifest
//!
//! A manifest describes many render jobs. Each [BatchItem] is combined with the shared
//! [BatchDefault] by [merge] before rendering.
//!
//! ```json
//! {
//!   "items": [
//!     { "info": "override", "output": "a.txt", "variables": { "foo": "baz" } },
//!     { "info": "inherit everything", "output": "b.txt" }
//!   ],
//!   "defaults": { "template": "tpl/base.tpl", "variables": { "foo": "bar", "size": 42 } }
//! }
//! ```
//!
//! In JSON-Lines form every non-empty line is one item and there are no defaults.
use crate::provider::Format;
use crate::value::Variables;
use serde::{Deserialize, Serialize};

/// One render job as written in the manifest. Empty strings count as "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchItem {
    /// description of the item
    pub info: String,
    /// template file
    pub template: String,
    /// variables file, read with `format`
    pub input: String,
    pub format: Option<Format>,
    /// target file, rendered to the shared output when empty
    pub output: String,
    /// literal variables, take precedence over `input`
    pub variables: Variables,
}

/// Values shared by all items of a manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchDefault {
    pub info: String,
    pub template: String,
    pub input: String,
    pub format: Option<Format>,
    pub variables: Variables,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub items: Vec<BatchItem>,
    #[serde(default)]
    pub defaults: BatchDefault,
}

/// Where the variables of an [EffectiveItem] come from
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSource {
    /// used as-is
    Literal(Variables),
    /// resolved through the provider chain. An empty path means "no literal input".
    Input { path: String, format: Format },
}

/// A [BatchItem] after defaults were applied
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveItem {
    pub info: String,
    pub template: String,
    pub output: String,
    pub variables: VariableSource,
}

impl Manifest {
    /// Parse a single json document with `items` and `defaults`
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.ensure_items()
    }

    /// Parse one item per non-empty line
    pub fn from_json_lines(text: &str) -> Result<Self, ManifestError> {
        let mut items = vec![];
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let item = serde_json::from_str(line).map_err(|source| ManifestError::Line {
                line: index + 1,
                source,
            })?;
            items.push(item);
        }

        Manifest {
            items,
            defaults: Default::default(),
        }
        .ensure_items()
    }

    fn ensure_items(self) -> Result<Self, ManifestError> {
        if self.items.is_empty() {
            return Err(ManifestError::NoItems);
        }
        Ok(self)
    }

    /// All items with defaults applied, in manifest order
    pub fn effective_items(&self) -> impl Iterator<Item = EffectiveItem> + '_ {
        self.items.iter().map(|item| merge(item, &self.defaults))
    }
}

/// Apply defaults to an item
///
/// `info` and `template` fall back to the defaults individually. Variables are taken from the
/// first source that is set, in this order:
/// 1. the item's `variables`
/// 2. the item's `input` (defaults are not consulted, even if the input turns out to be empty)
/// 3. the defaults' `variables`
/// 4. the defaults' `input`
///
/// `output` is never inherited.
pub fn merge(item: &BatchItem, defaults: &BatchDefault) -> EffectiveItem {
    let info = or_default(&item.info, &defaults.info);
    let template = or_default(&item.template, &defaults.template);

    let variables = if !item.variables.is_empty() {
        VariableSource::Literal(item.variables.clone())
    } else if !item.input.is_empty() {
        VariableSource::Input {
            path: item.input.clone(),
            format: item.format.unwrap_or_default(),
        }
    } else if !defaults.variables.is_empty() {
        VariableSource::Literal(defaults.variables.clone())
    } else {
        VariableSource::Input {
            path: defaults.input.clone(),
            format: defaults.format.unwrap_or_default(),
        }
    };

    EffectiveItem {
        info,
        template,
        output: item.output.clone(),
        variables,
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("invalid batch manifest")]
    Json(#[from] serde_json::Error),
    #[error("invalid batch item on line {line}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("no items defined")]
    NoItems,
}
