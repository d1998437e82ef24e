//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business/domain failures. `Internal`
/// is the one escape hatch for unexpected conditions; callers log its detail
/// and surface a generic failure instead of the message itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A field failed validation (e.g. malformed or out-of-range input).
    #[error("validation failed on {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// An order-state transition that the legality table forbids.
    #[error("cannot {attempted} an order in state {current}")]
    StateConflict {
        current: &'static str,
        attempted: &'static str,
    },

    /// Neither warehouse can cover a required quantity.
    #[error("insufficient stock for product {product_id}: required {required}, available {available}")]
    InsufficientStock {
        product_id: String,
        required: i64,
        available: i64,
    },

    /// A uniqueness rule was violated (e.g. duplicate branch name or folio).
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },

    /// Unexpected failure. Detail is for logs, not for callers.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn state_conflict(current: &'static str, attempted: &'static str) -> Self {
        Self::StateConflict { current, attempted }
    }

    pub fn insufficient_stock(product_id: impl ToString, required: i64, available: i64) -> Self {
        Self::InsufficientStock {
            product_id: product_id.to_string(),
            required,
            available,
        }
    }

    pub fn unique(field: &'static str) -> Self {
        Self::UniqueViolation { field }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
