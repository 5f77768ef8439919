//! Interactive workflows.
//!
//! Each workflow collects input through an [`Operator`], hands typed values
//! to the [`Inventory`] and reports the result back to the operator.

use crate::engine::{Added, Inventory, Prices, SaleLedger};
use crate::error::{InventoryError, Result};
use crate::formatters::{format_listing, format_profit, format_sale_summary, help_message};
use crate::prompt::{
    is_non_negative_price, is_positive_integer, is_product_name, parse_positive_integer,
    parse_price, Operator,
};
use crate::report::{listing, profit};
use log::{error, info};

const NAME_QUESTION: &str = "Name of the product: ";
const QUANTITY_QUESTION: &str = "Quantity: ";
const EMPTY_WAREHOUSE: &str = "There are no products in the warehouse.";

/// A command of the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    List,
    Sale,
    Profits,
    Help,
    Close,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "add" => Some(Command::Add),
            "list" => Some(Command::List),
            "sale" => Some(Command::Sale),
            "profits" => Some(Command::Profits),
            "help" => Some(Command::Help),
            "close" => Some(Command::Close),
            _ => None,
        }
    }
}

/// How a sale transaction ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    /// Nothing to sell; no question was asked
    WarehouseEmpty,
    /// Everything sold during the transaction, possibly nothing
    Completed(SaleLedger),
}

fn prompt_quantity<O: Operator>(op: &mut O) -> Result<u32> {
    parse_positive_integer(&op.prompt_validated(QUANTITY_QUESTION, &is_positive_integer)?)
}

fn prompt_price<O: Operator>(op: &mut O, question: &str) -> Result<f64> {
    parse_price(&op.prompt_validated(question, &is_non_negative_price)?)
}

/// Asks for a product and a quantity and adds them to the warehouse.
/// Prices are only asked for products that are not stocked yet.
pub fn add_product<O: Operator>(inventory: &Inventory, op: &mut O) -> Result<Added> {
    let name = op.prompt_validated(NAME_QUESTION, &is_product_name)?;
    let quantity = prompt_quantity(op)?;

    let prices = if inventory.is_stocked(&name)? {
        None
    } else {
        Some(Prices {
            purchase_price: prompt_price(op, "Purchase price: ")?,
            price: prompt_price(op, "Sale price: ")?,
        })
    };

    let added = inventory.add_product(&name, quantity, prices)?;
    op.say(&format!(
        "ADDED: {} X {}",
        added.product().quantity(),
        added.product().name()
    ))?;
    Ok(added)
}

/// What the operator wants after one product of a sale.
enum Next {
    AnotherProduct,
    Stop,
}

const ANOTHER_PRODUCT_QUESTION: &str = "Do you want to add another product? (yes/no): ";

/// Sells a single product of a transaction and records it in `ledger`.
fn sell_one<O: Operator>(
    inventory: &Inventory,
    op: &mut O,
    ledger: &mut SaleLedger,
) -> Result<Next> {
    let mut name = op.prompt_validated(NAME_QUESTION, &is_product_name)?;
    while !inventory.is_stocked(&name)? {
        op.say("This product is not present in the warehouse.")?;
        if !op.prompt_yes_no("Do you want to continue with your purchase? (yes/no): ")? {
            return Ok(Next::Stop);
        }
        name = op.prompt_validated(NAME_QUESTION, &is_product_name)?;
    }

    let stored = inventory
        .lookup(&name)?
        .ok_or_else(|| InventoryError::ProductNotFound(name.clone()))?;

    let mut quantity = prompt_quantity(op)?;
    while quantity > stored.quantity() {
        op.say(&format!(
            "The available quantity of the product '{}' is {}.",
            stored.name(),
            stored.quantity()
        ))?;
        if op.prompt_yes_no("Do you still want to purchase this product? (yes/no): ")? {
            quantity = prompt_quantity(op)?;
        } else if op.prompt_yes_no("Do you want to buy other products? (yes/no): ")? {
            return Ok(Next::AnotherProduct);
        } else {
            return Ok(Next::Stop);
        }
    }

    let sold = inventory.record_sale(stored.name(), quantity)?;
    ledger.record(&sold);

    if op.prompt_yes_no(ANOTHER_PRODUCT_QUESTION)? {
        Ok(Next::AnotherProduct)
    } else {
        Ok(Next::Stop)
    }
}

/// Runs one sale transaction covering any number of products.
///
/// Every product is persisted as soon as its quantity is confirmed, so
/// stopping early keeps what was already sold. When a requested quantity
/// exceeds the stock, declining to reduce it asks whether to buy other
/// products: "yes" skips only this product, "no" ends the transaction.
///
/// A product that fails (for example a malformed warehouse row) is reported
/// and the operator may go on with other products. The summary of what was
/// sold is printed however the transaction ends, including when the input
/// closes; in that case the error is still returned afterwards.
pub fn sell<O: Operator>(inventory: &Inventory, op: &mut O) -> Result<SaleOutcome> {
    if inventory.warehouse().is_empty()? {
        op.say(EMPTY_WAREHOUSE)?;
        return Ok(SaleOutcome::WarehouseEmpty);
    }

    let mut ledger = SaleLedger::new();
    let ended = loop {
        let next = match sell_one(inventory, op, &mut ledger) {
            Ok(next) => Ok(next),
            Err(InventoryError::InputClosed) => Err(InventoryError::InputClosed),
            Err(e) => {
                error!("Sale of a product failed: {}", e);
                op.say(&format!("Error: {e}"))
                    .and_then(|()| op.prompt_yes_no(ANOTHER_PRODUCT_QUESTION))
                    .map(|more| if more { Next::AnotherProduct } else { Next::Stop })
            }
        };
        match next {
            Ok(Next::AnotherProduct) => continue,
            Ok(Next::Stop) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    if !ledger.is_empty() {
        op.say(&format_sale_summary(&ledger))?;
    }
    ended.map(|()| SaleOutcome::Completed(ledger))
}

/// Prints the warehouse listing.
pub fn list<O: Operator>(inventory: &Inventory, op: &mut O) -> Result<()> {
    match listing(inventory.warehouse())? {
        Some(rows) => op.say(format_listing(&rows).trim_end()),
        None => op.say(EMPTY_WAREHOUSE),
    }
}

/// Prints gross and net profit.
pub fn profits<O: Operator>(inventory: &Inventory, op: &mut O) -> Result<()> {
    match profit(inventory.sales())? {
        Some(profit) => op.say(&format_profit(&profit)),
        None => op.say("No product has been sold yet."),
    }
}

fn dispatch<O: Operator>(inventory: &Inventory, op: &mut O, command: Command) -> Result<()> {
    match command {
        Command::Add => add_product(inventory, op).map(|_| ()),
        Command::List => list(inventory, op),
        Command::Sale => sell(inventory, op).map(|_| ()),
        Command::Profits => profits(inventory, op),
        Command::Help => op.say(&help_message()),
        Command::Close => op.say("Bye bye"),
    }
}

/// Reads commands until `close` or the end of input.
///
/// A failing command is reported and the loop goes on with the next one.
pub fn run<O: Operator>(inventory: &Inventory, op: &mut O) -> Result<()> {
    loop {
        let input = match op.prompt("Enter a command: ") {
            Ok(input) => input,
            Err(InventoryError::InputClosed) => {
                info!("Input closed, leaving");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(command) = Command::parse(&input) else {
            op.say("Invalid command")?;
            op.say(&help_message())?;
            continue;
        };

        match dispatch(inventory, op, command) {
            Ok(()) => {}
            Err(InventoryError::InputClosed) => {
                info!("Input closed during '{}', leaving", input.trim());
                return Ok(());
            }
            Err(e) => {
                error!("Command '{}' failed: {}", input.trim(), e);
                op.say(&format!("Error: {e}"))?;
            }
        }

        if command == Command::Close {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
