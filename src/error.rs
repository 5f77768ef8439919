//! Error types for warehouse

use thiserror::Error;

/// Unified error type for store and inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// File I/O failed (permission denied, disk full, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A store file could not be parsed or written as TSV
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A store header or raw record lacks a column the operation needs
    #[error("Column '{column}' is missing from {context}")]
    SchemaKey { column: String, context: String },
    /// Record access by a column name that does not exist
    #[error("Unknown field: {0}")]
    UnknownField(String),
    /// A numeric cell or input could not be parsed
    #[error("Invalid value for {field}: '{value}'")]
    InvalidNumber { field: String, value: String },
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Not enough '{product}' in stock: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },
    /// A product that is not stocked yet was added without prices
    #[error("Purchase and sale price are required for new product: {0}")]
    MissingPrices(String),
    #[error("Quantity of '{0}' would overflow")]
    QuantityOverflow(String),
    /// The operator's input stream ended
    #[error("Input closed")]
    InputClosed,
}

/// Result alias for warehouse operations
pub type Result<T> = std::result::Result<T, InventoryError>;
