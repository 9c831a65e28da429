//! Module catalog configuration.
//!
//! The set of application modules is injected through configuration so that
//! deployments and tests can substitute a smaller catalog.

use serde::{Deserialize, Serialize};

/// One functional area of the back office (bank accounts, costs, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Stable key used in permission documents, e.g. `"kosten"`.
    pub key: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Whether the module exposes sensitive financial data.
    #[serde(default)]
    pub sensitive: bool,
}

impl ModuleConfig {
    fn new(key: &str, label: &str, sensitive: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sensitive,
        }
    }
}

/// The module catalog shipped with the application.
pub fn default_modules() -> Vec<ModuleConfig> {
    vec![
        ModuleConfig::new("bankkonten", "Bankkonten", true),
        ModuleConfig::new("kosten", "Kosten", false),
        ModuleConfig::new("forderungen", "Forderungen", false),
        ModuleConfig::new("zahlungen", "Zahlungen", true),
        ModuleConfig::new("vertrage", "Verträge", false),
        ModuleConfig::new("entitaeten", "Entitäten", false),
        ModuleConfig::new("permissions", "Berechtigungen", true),
        ModuleConfig::new("reports", "Reports", false),
        ModuleConfig::new("kpis", "KPIs", false),
        ModuleConfig::new("einstellungen", "Einstellungen", true),
    ]
}
