//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a synchronous, recoverable business failure. None of them
/// leaves partial state behind: the operation that returned the error did not
/// change the inventory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed construction arguments or a non-positive amount.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An item with this identity is already stocked.
    #[error("product with id {0} already exists")]
    DuplicateProduct(String),

    /// No item with this identity is stocked.
    #[error("product with id {0} not found")]
    ProductNotFound(String),

    /// An order asked for more than is on hand.
    #[error("insufficient stock for product {name} (id {id}): available={available}, requested={requested}")]
    InsufficientStock {
        id: String,
        name: String,
        available: i64,
        requested: i64,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateProduct(id.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ProductNotFound(id.into())
    }

    pub fn insufficient(
        id: impl Into<String>,
        name: impl Into<String>,
        available: i64,
        requested: i64,
    ) -> Self {
        Self::InsufficientStock {
            id: id.into(),
            name: name.into(),
            available,
            requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_the_item() {
        let err = DomainError::insufficient("P1001", "Laptop", 4, 100);
        let msg = err.to_string();
        assert!(msg.contains("Laptop"));
        assert!(msg.contains("available=4"));
        assert!(msg.contains("requested=100"));
    }

    #[test]
    fn not_found_and_duplicate_carry_the_id() {
        assert_eq!(
            DomainError::not_found("X1").to_string(),
            "product with id X1 not found"
        );
        assert_eq!(
            DomainError::duplicate("X1").to_string(),
            "product with id X1 already exists"
        );
    }
}
