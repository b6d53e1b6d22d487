use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Invalid reading order: current reading {current} must be greater than previous reading {previous}")]
    InvalidReadingOrder { previous: Decimal, current: Decimal },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Machine-checkable error classification carried next to every reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidReadingOrder,
    Validation,
    NotFound,
    PersistenceFailure,
    StoreUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidReadingOrder => "invalid_reading_order",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::PersistenceFailure => "persistence_failure",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReadingOrder { .. } => ErrorKind::InvalidReadingOrder,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Whether the store itself could not be reached, as opposed to a
    /// single rejected write.
    pub fn is_systemic(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
                DomainError::StoreUnavailable(e.to_string())
            }
            other => DomainError::Persistence(format!("Database error: {}", other)),
        }
    }
}
