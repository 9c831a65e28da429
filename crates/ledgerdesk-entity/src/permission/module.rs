//! Module catalog.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::config::ModuleConfig;

/// A named functional area of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Stable key, e.g. `"kosten"`.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Whether the module exposes sensitive financial data.
    pub sensitive: bool,
}

impl From<&ModuleConfig> for Module {
    fn from(config: &ModuleConfig) -> Self {
        let label = if config.label.is_empty() {
            config.key.clone()
        } else {
            config.label.clone()
        };
        Self {
            key: config.key.clone(),
            label,
            sensitive: config.sensitive,
        }
    }
}

/// The ordered set of modules known to the permission engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
}

impl ModuleCatalog {
    /// Build a catalog from an explicit module list.
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Build a catalog from the configured module list.
    pub fn from_config(configs: &[ModuleConfig]) -> Self {
        Self::new(configs.iter().map(Module::from).collect())
    }

    /// Look up a module by key.
    pub fn get(&self, key: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.key == key)
    }

    /// Whether the catalog contains the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate modules in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
