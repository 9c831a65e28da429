//! The two independent rights every module offers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action that can be checked against a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read access to the module.
    View,
    /// Write access to the module.
    Edit,
}

impl Action {
    /// Both actions.
    pub const ALL: [Action; 2] = [Action::View, Action::Edit];

    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }

    /// Parse an action, returning `None` for anything unrecognised.
    ///
    /// Permission checks use this so that unknown actions deny instead of
    /// failing the request.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ledgerdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            ledgerdesk_core::AppError::validation(format!(
                "Invalid action: '{s}'. Expected one of: view, edit"
            ))
        })
    }
}
