//! ASIC error types.
//!
//! Every failure an L3 table can report: a duplicate entry, a missing
//! entry or egress object, a full table, or an internal fault in the
//! backend itself.

use thiserror::Error;

/// Error type for ASIC operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsicError {
    #[error("Entry not found: {item}")]
    NotFound { item: String },

    #[error("Entry already exists: {item}")]
    AlreadyExists { item: String },

    /// Hardware table has no free entries.
    #[error("Table full: {table}")]
    TableFull { table: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AsicError {
    pub fn not_found(item: impl Into<String>) -> Self {
        AsicError::NotFound { item: item.into() }
    }

    pub fn already_exists(item: impl Into<String>) -> Self {
        AsicError::AlreadyExists { item: item.into() }
    }

    pub fn table_full(table: impl Into<String>) -> Self {
        AsicError::TableFull {
            table: table.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AsicError::Internal {
            message: message.into(),
        }
    }
}

/// Result type for ASIC operations.
pub type AsicResult<T> = Result<T, AsicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AsicError::table_full("L3 route").to_string(),
            "Table full: L3 route"
        );
        assert_eq!(
            AsicError::already_exists("L3 host 10.0.0.1").to_string(),
            "Entry already exists: L3 host 10.0.0.1"
        );
    }
}
