use super::{Environment, Format, ParseError, Provider, ProviderKind};
use crate::value::Variables;
use std::collections::HashMap;

/// Raw input per provider type. Missing entries are treated as empty input.
pub type RawInputs = HashMap<ProviderKind, String>;

/// Ordered list of providers
///
/// Resolving a chain merges all provider results, later providers overwrite earlier ones.
#[derive(Debug, Default)]
pub struct Chain {
    providers: Vec<Box<dyn Provider>>,
}

/// How the process environment takes part in resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvPolicy {
    /// literal input first, then the environment (environment wins on collision)
    #[default]
    Layered,
    /// literal input only
    Clear,
}

impl Chain {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn push(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Standard composition for one literal input
    ///
    /// | policy    | has input | chain                    |
    /// |-----------|-----------|--------------------------|
    /// | `Layered` | yes       | `[format, environment]`  |
    /// | `Layered` | no        | `[environment]`          |
    /// | `Clear`   | yes       | `[format]`               |
    /// | `Clear`   | no        | `[]`                     |
    pub fn for_input(format: Format, has_input: bool, policy: EnvPolicy) -> Self {
        let mut providers = Vec::with_capacity(2);
        if has_input {
            providers.push(format.provider());
        }
        if policy == EnvPolicy::Layered {
            providers.push(Box::new(Environment) as Box<dyn Provider>);
        }
        Self::new(providers)
    }

    /// Merge all providers in order
    ///
    /// Fails on the first provider error, no partial result is returned.
    pub fn resolve(&self, raws: &RawInputs) -> Result<Variables, ResolveError> {
        if self.providers.is_empty() {
            return Err(ResolveError::NoProviders);
        }

        let mut resolved = Variables::new();
        for provider in &self.providers {
            let kind = provider.kind();
            let raw = raws.get(&kind).map(String::as_str).unwrap_or_default();

            let variables = provider
                .parse(raw)
                .map_err(|source| ResolveError::Provider { kind, source })?;

            tracing::debug!(provider = %kind, count = variables.len(), "merging variables");
            resolved.overwrite_with(variables);
        }

        Ok(resolved)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("no providers configured")]
    NoProviders,
    #[error("failed to apply {kind} provider")]
    Provider {
        kind: ProviderKind,
        #[source]
        source: ParseError,
    },
}
