//! [`MethodRegistry`]: immutable name → descriptor table.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use kvcompat_core::config::CompatConfig;
use kvcompat_core::models::{HostStatus, MethodCategory, MethodDescriptor, SubstitutionDescriptor};

use crate::table;

/// Per-category summary of the registry, for operators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistryReport {
    pub total: usize,
    pub supported: usize,
    pub unsupported: usize,
    pub with_substitution: usize,
    pub blocked: Vec<String>,
    pub by_category: BTreeMap<MethodCategory, (usize, usize)>,
    pub deprecated: Vec<String>,
}

/// Classification table of every known store command.
///
/// Lookups are case-insensitive. A name is either supported or unsupported,
/// never both; names absent from the table are neither.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodDescriptor>,
}

impl MethodRegistry {
    /// Registry over the built-in table.
    pub fn with_defaults() -> Self {
        Self::from_descriptors(table::default_methods())
    }

    /// Registry over an explicit descriptor set. Later entries win.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        let methods = descriptors
            .into_iter()
            .map(|mut d| {
                d.name = d.name.to_ascii_lowercase();
                (d.name.clone(), d)
            })
            .collect();
        Self { methods }
    }

    /// Built-in table with the config's overrides merged over it by name.
    pub fn from_config(config: &CompatConfig) -> Self {
        let mut registry = Self::with_defaults();
        for descriptor in &config.methods {
            let name = descriptor.name.to_ascii_lowercase();
            debug!(method = %name, supported = descriptor.supported, "method descriptor override");
            let mut descriptor = descriptor.clone();
            descriptor.name = name.clone();
            registry.methods.insert(name, descriptor);
        }
        registry
    }

    pub fn get_method_config(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(&name.to_ascii_lowercase())
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.get_method_config(name)
            .map(|d| d.supported)
            .unwrap_or(false)
    }

    pub fn is_unsupported(&self, name: &str) -> bool {
        self.get_method_config(name)
            .map(|d| !d.supported)
            .unwrap_or(false)
    }

    pub fn get_substitution(&self, name: &str) -> Option<&SubstitutionDescriptor> {
        self.get_method_config(name)
            .and_then(|d| d.substitution.as_ref())
    }

    /// Names of every unsupported method, sorted.
    pub fn unsupported_methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .methods
            .values()
            .filter(|d| !d.supported)
            .map(|d| d.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Names of every supported method, sorted.
    pub fn supported_methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .methods
            .values()
            .filter(|d| d.supported)
            .map(|d| d.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Advice for a call site that hit a compatibility failure on `name`.
    pub fn recommendation_for(&self, name: &str) -> String {
        match self.get_method_config(name) {
            Some(d) => match &d.substitution {
                Some(sub) => format!(
                    "Use {} ({:?}, {:?} accuracy) instead of {}",
                    sub.target_method, sub.strategy, sub.accuracy, d.name
                ),
                None if !d.alternative.is_empty() => d.alternative.clone(),
                None => format!("Avoid {} on this host", d.name),
            },
            None => format!("Register {name} in the method table and verify host support"),
        }
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values()
    }

    /// Summarise the table.
    pub fn report(&self) -> RegistryReport {
        let mut report = RegistryReport {
            total: self.methods.len(),
            ..RegistryReport::default()
        };
        for d in self.methods.values() {
            let entry = report.by_category.entry(d.category).or_insert((0, 0));
            if d.supported {
                report.supported += 1;
                entry.0 += 1;
            } else {
                report.unsupported += 1;
                entry.1 += 1;
            }
            if d.substitution.is_some() {
                report.with_substitution += 1;
            }
            if d.is_blocked() {
                report.blocked.push(d.name.clone());
            }
            if d.host_status == HostStatus::Deprecated {
                report.deprecated.push(d.name.clone());
            }
        }
        report.blocked.sort();
        report.deprecated.sort();
        report
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
