//! Typed product records.
//!
//! A [`Product`] is one row of a warehouse or sales store. Rows arrive from
//! the stores as raw strings keyed by column name; [`Product::from_fields`]
//! coerces them into typed fields.

use crate::error::{InventoryError, Result};
use log::debug;
use serde::Deserialize;

/// The columns of a store, in canonical header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Product,
    Quantity,
    PurchasePrice,
    Price,
}

/// Header written to a new store file.
pub const CANONICAL_HEADER: [&str; 4] = ["PRODUCT", "QUANTITY", "PURCHASE PRICE", "PRICE"];

impl Field {
    /// Returns the header text of this column (e.g., "PURCHASE PRICE")
    pub fn column(&self) -> &'static str {
        match self {
            Field::Product => "PRODUCT",
            Field::Quantity => "QUANTITY",
            Field::PurchasePrice => "PURCHASE PRICE",
            Field::Price => "PRICE",
        }
    }

    /// Parse a header name into a Field
    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "PRODUCT" => Some(Field::Product),
            "QUANTITY" => Some(Field::Quantity),
            "PURCHASE PRICE" => Some(Field::PurchasePrice),
            "PRICE" => Some(Field::Price),
            _ => None,
        }
    }

    /// Returns all fields in canonical order
    pub fn all() -> &'static [Field] {
        &[
            Field::Product,
            Field::Quantity,
            Field::PurchasePrice,
            Field::Price,
        ]
    }
}

/// A typed value read from a product by column name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Real(f64),
}

/// Prices are written with two decimals unless that would lose precision,
/// in which case the shortest exact form is written instead.
pub fn format_price(value: f64) -> String {
    let cents = format!("{value:.2}");
    if cents.parse::<f64>() == Ok(value) {
        cents
    } else {
        value.to_string()
    }
}

/// Product names are keys: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn parse_quantity(value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| InventoryError::InvalidNumber {
            field: Field::Quantity.column().to_string(),
            value: value.to_string(),
        })
}

fn parse_real(field: Field, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| InventoryError::InvalidNumber {
            field: field.column().to_string(),
            value: value.to_string(),
        })
}

/// Raw store row as deserialized by header name. Extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "PRODUCT")]
    pub product: String,
    #[serde(rename = "QUANTITY")]
    pub quantity: String,
    #[serde(rename = "PURCHASE PRICE")]
    pub purchase_price: String,
    #[serde(rename = "PRICE")]
    pub price: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = InventoryError;

    fn try_from(row: ProductRow) -> Result<Self> {
        Product::from_fields([
            ("PRODUCT", row.product.as_str()),
            ("QUANTITY", row.quantity.as_str()),
            ("PURCHASE PRICE", row.purchase_price.as_str()),
            ("PRICE", row.price.as_str()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    name: String,
    quantity: u32,
    purchase_price: f64,
    price: f64,
}

impl Product {
    pub fn new(name: &str, quantity: u32, purchase_price: f64, price: f64) -> Self {
        Self {
            name: normalize_name(name),
            quantity,
            purchase_price,
            price,
        }
    }

    /// Builds a product from raw `(column, value)` pairs.
    ///
    /// Only type coercion happens here; range checks belong to the input
    /// layer. `PRODUCT` is required, numeric columns that are absent default
    /// to zero so a partial record can be completed later with
    /// [`Product::with_remaining_from`].
    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut name = None;
        let mut product = Product::new("", 0, 0.0, 0.0);

        for (column, value) in fields {
            match Field::from_column(column) {
                Some(Field::Product) => name = Some(normalize_name(value)),
                Some(field) => product.set(field.column(), value)?,
                None => return Err(InventoryError::UnknownField(column.to_string())),
            }
        }

        product.name = name.ok_or_else(|| InventoryError::SchemaKey {
            column: Field::Product.column().to_string(),
            context: "the record".to_string(),
        })?;
        Ok(product)
    }

    /// Completes a partial record with the prices of the stored record,
    /// keeping this record's name and quantity.
    pub fn with_remaining_from(mut self, stored: &Product) -> Self {
        debug!("Completing '{}' with stored prices", self.name);
        self.purchase_price = stored.purchase_price;
        self.price = stored.price;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    /// Sale price per unit
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn set_purchase_price(&mut self, purchase_price: f64) {
        self.purchase_price = purchase_price;
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    /// Reads a field by its column name.
    pub fn get(&self, column: &str) -> Result<FieldValue> {
        match Field::from_column(column) {
            Some(Field::Product) => Ok(FieldValue::Text(self.name.clone())),
            Some(Field::Quantity) => Ok(FieldValue::Integer(self.quantity)),
            Some(Field::PurchasePrice) => Ok(FieldValue::Real(self.purchase_price)),
            Some(Field::Price) => Ok(FieldValue::Real(self.price)),
            None => Err(InventoryError::UnknownField(column.to_string())),
        }
    }

    /// Parses `value` into the field named by `column`.
    pub fn set(&mut self, column: &str, value: &str) -> Result<()> {
        match Field::from_column(column) {
            Some(Field::Product) => self.name = normalize_name(value),
            Some(Field::Quantity) => self.quantity = parse_quantity(value)?,
            Some(field @ Field::PurchasePrice) => self.purchase_price = parse_real(field, value)?,
            Some(field @ Field::Price) => self.price = parse_real(field, value)?,
            None => return Err(InventoryError::UnknownField(column.to_string())),
        }
        Ok(())
    }

    /// The cell written under `field` when this product is appended.
    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Product => self.name.clone(),
            Field::Quantity => self.quantity.to_string(),
            Field::PurchasePrice => format_price(self.purchase_price),
            Field::Price => format_price(self.price),
        }
    }

    /// Value of this product at sale price
    pub fn revenue(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Value of this product at purchase price
    pub fn cost(&self) -> f64 {
        self.purchase_price * f64::from(self.quantity)
    }
}

/// Quantity after a restock, `None` on overflow.
pub fn restocked(existing: u32, incoming: u32) -> Option<u32> {
    existing.checked_add(incoming)
}

/// Quantity after a sale. `None` means the stock is exhausted and the row
/// must be dropped: selling everything that is left never stores zero.
pub fn depleted(existing: u32, incoming: u32) -> Option<u32> {
    if existing > incoming {
        Some(existing - incoming)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
