//! Warehouse - inventory and sales bookkeeping in TSV stores
//!
//! Tracks products in a warehouse store, moves sold quantities into a sales
//! store and reports profit. All state lives in two tab-separated files whose
//! paths are passed in explicitly.

pub mod config;
pub mod engine;
pub mod error;
pub mod formatters;
pub mod prompt;
pub mod record;
pub mod report;
pub mod session;
pub mod store;

pub use config::StorePaths;
pub use engine::{Added, Inventory, LedgerEntry, Prices, SaleLedger};
pub use error::{InventoryError, Result};
pub use prompt::{ConsoleOperator, Operator};
pub use record::{Field, Product};
pub use report::{listing, profit, ListingRow, Profit};
pub use session::{Command, SaleOutcome};
pub use store::{Adjustment, MergeOutcome, PendingRewrite, Store};
