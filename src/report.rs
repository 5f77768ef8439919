//! Read-only queries over the stores.

use crate::error::Result;
use crate::store::Store;

/// Aggregate profit over the sales store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profit {
    /// Revenue at sale price
    pub gross: f64,
    /// Revenue minus cost at purchase price
    pub net: f64,
}

/// One listed product. The purchase price is never part of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Computes gross and net profit; `None` when nothing has been sold.
pub fn profit(sales: &Store) -> Result<Option<Profit>> {
    if sales.is_empty()? {
        log::debug!("No sales recorded in {}", sales.path().display());
        return Ok(None);
    }

    let mut gross = 0.0;
    let mut cost = 0.0;
    for product in sales.products()? {
        gross += product.revenue();
        cost += product.cost();
    }

    Ok(Some(Profit {
        gross,
        net: gross - cost,
    }))
}

/// Lists the warehouse in file order; `None` when it is empty.
pub fn listing(warehouse: &Store) -> Result<Option<Vec<ListingRow>>> {
    if warehouse.is_empty()? {
        return Ok(None);
    }

    let rows = warehouse
        .products()?
        .into_iter()
        .map(|product| ListingRow {
            name: product.name().to_string(),
            quantity: product.quantity(),
            price: product.price(),
        })
        .collect();
    Ok(Some(rows))
}
