//! Consumer account as seen by the billing engine

use serde::{Deserialize, Serialize};

use crate::domain::tariff::{Department, Jurisdiction, TariffCategory, TariffScope};

/// Connection status maintained by the account registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Active,
    Disconnected,
    Suspended,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

/// A billable consumer. Owned by the account registry; read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i32,
    pub jurisdiction: Jurisdiction,
    pub department: Department,
    pub category: TariffCategory,
    pub meter_id: String,
    pub connection_status: ConnectionStatus,
}

impl Account {
    /// Scope the account's tariff is resolved by.
    pub fn tariff_scope(&self) -> TariffScope {
        TariffScope {
            jurisdiction: self.jurisdiction.clone(),
            department: self.department,
            category: self.category,
        }
    }
}
