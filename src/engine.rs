//! Reconciliation of products across the warehouse and sales stores.
//!
//! The engine decides whether an incoming product is appended as a new row or
//! merged into an existing one, and keeps the two stores consistent when a
//! sale moves stock from the warehouse to the sales store.

use crate::config::StorePaths;
use crate::error::{InventoryError, Result};
use crate::record::{normalize_name, Product};
use crate::store::{Adjustment, Store};
use log::{debug, info};

fn require_positive(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(InventoryError::InvalidNumber {
            field: "QUANTITY".to_string(),
            value: quantity.to_string(),
        });
    }
    Ok(())
}

/// Prices required to stock a product for the first time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub purchase_price: f64,
    pub price: f64,
}

/// Result of adding stock to the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub enum Added {
    /// The product was new and got its own row
    Created(Product),
    /// The product existed; the record carries the quantity that was added
    Restocked(Product),
}

impl Added {
    pub fn product(&self) -> &Product {
        match self {
            Added::Created(product) | Added::Restocked(product) => product,
        }
    }
}

/// One line of a sale transaction summary.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Per-product totals of one sale transaction, in the order products were
/// first sold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleLedger {
    entries: Vec<LedgerEntry>,
}

impl SaleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates a sold product. Quantities add up, the unit price is
    /// replaced by the latest one.
    pub fn record(&mut self, sold: &Product) {
        match self.entries.iter_mut().find(|e| e.name == sold.name()) {
            Some(entry) => {
                entry.quantity += sold.quantity();
                entry.unit_price = sold.price();
            }
            None => self.entries.push(LedgerEntry {
                name: sold.name().to_string(),
                quantity: sold.quantity(),
                unit_price: sold.price(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The warehouse and sales stores of one inventory.
#[derive(Debug, Clone)]
pub struct Inventory {
    warehouse: Store,
    sales: Store,
}

impl Inventory {
    pub fn new(warehouse: Store, sales: Store) -> Self {
        Self { warehouse, sales }
    }

    pub fn open(paths: &StorePaths) -> Self {
        debug!(
            "Opening inventory: warehouse={}, sales={}",
            paths.warehouse.display(),
            paths.sales.display()
        );
        Self::new(
            Store::new(paths.warehouse.clone()),
            Store::new(paths.sales.clone()),
        )
    }

    pub fn warehouse(&self) -> &Store {
        &self.warehouse
    }

    pub fn sales(&self) -> &Store {
        &self.sales
    }

    /// Whether the product currently has a warehouse row.
    pub fn is_stocked(&self, name: &str) -> Result<bool> {
        self.warehouse.contains(&normalize_name(name))
    }

    /// The warehouse record of a product.
    pub fn lookup(&self, name: &str) -> Result<Option<Product>> {
        self.warehouse.find(&normalize_name(name))
    }

    /// Adds `quantity` units of a product to the warehouse.
    ///
    /// An existing product is merged into its row and keeps its stored
    /// prices. A new product needs `prices` and is appended.
    pub fn add_product(&self, name: &str, quantity: u32, prices: Option<Prices>) -> Result<Added> {
        require_positive(quantity)?;
        let name = normalize_name(name);

        if self.warehouse.contains(&name)? {
            let stored = self
                .warehouse
                .find(&name)?
                .ok_or_else(|| InventoryError::ProductNotFound(name.clone()))?;
            let partial = Product::from_fields([
                ("PRODUCT", name.as_str()),
                ("QUANTITY", quantity.to_string().as_str()),
            ])?;
            let product = partial.with_remaining_from(&stored);
            self.warehouse.merge_or_subtract(&product, Adjustment::Add)?;
            info!("Restocked {} X {}", quantity, name);
            return Ok(Added::Restocked(product));
        }

        let prices = prices.ok_or_else(|| InventoryError::MissingPrices(name.clone()))?;
        let product = Product::new(&name, quantity, prices.purchase_price, prices.price);
        self.warehouse.append(&product)?;
        info!("Stocked new product {} X {}", quantity, name);
        Ok(Added::Created(product))
    }

    /// Moves `quantity` units of a product from the warehouse to the sales
    /// store and returns the sold record.
    ///
    /// Availability is checked before either store is touched. The sales
    /// store is updated first, then the warehouse row is depleted (and
    /// dropped once exhausted).
    pub fn record_sale(&self, name: &str, quantity: u32) -> Result<Product> {
        require_positive(quantity)?;
        let name = normalize_name(name);
        let mut product = self
            .warehouse
            .find(&name)?
            .ok_or_else(|| InventoryError::ProductNotFound(name.clone()))?;

        if quantity > product.quantity() {
            return Err(InventoryError::InsufficientStock {
                product: name,
                available: product.quantity(),
                requested: quantity,
            });
        }
        product.set_quantity(quantity);

        if self.sales.contains(&name)? {
            self.sales.merge_or_subtract(&product, Adjustment::Add)?;
        } else {
            self.sales.append(&product)?;
        }
        self.warehouse
            .merge_or_subtract(&product, Adjustment::Subtract)?;

        info!("Sold {} X {}", quantity, name);
        Ok(product)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
