//! Unit tests for the interactive workflows.

use super::*;
use crate::config::StorePaths;
use crate::prompt::ConsoleOperator;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

const HEADER: &str = "PRODUCT\tQUANTITY\tPURCHASE PRICE\tPRICE\n";

type TestOperator = ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>>;

fn operator(answers: &[&str]) -> TestOperator {
    let mut input = answers.join("\n");
    input.push('\n');
    ConsoleOperator::new(Cursor::new(input.into_bytes()), Vec::new())
}

fn output(op: TestOperator) -> String {
    String::from_utf8(op.into_output()).unwrap()
}

/// Inventory with 15 flour and 4 sugar in stock.
fn stocked_inventory(dir: &TempDir) -> Inventory {
    let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
    fs::write(
        inventory.warehouse().path(),
        format!("{HEADER}flour\t15\t1.50\t2.00\nsugar\t4\t0.80\t1.20\n"),
    )
    .unwrap();
    inventory
}

fn ledger_of(outcome: SaleOutcome) -> SaleLedger {
    match outcome {
        SaleOutcome::Completed(ledger) => ledger,
        SaleOutcome::WarehouseEmpty => panic!("expected a completed sale"),
    }
}

mod add_product_tests {
    use super::*;

    #[test]
    fn new_product_asks_for_prices() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&["Flour", "10", "1.50", "2"]);

        add_product(&inventory, &mut op).unwrap();

        assert_eq!(
            fs::read_to_string(inventory.warehouse().path()).unwrap(),
            format!("{HEADER}flour\t10\t1.50\t2.00\n")
        );
        let out = output(op);
        assert!(out.contains("Purchase price: "));
        assert!(out.contains("ADDED: 10 X flour"));
    }

    #[test]
    fn existing_product_skips_price_prompts() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["flour", "5"]);

        let added = add_product(&inventory, &mut op).unwrap();

        assert!(matches!(added, Added::Restocked(_)));
        assert_eq!(inventory.lookup("flour").unwrap().unwrap().quantity(), 20);
        assert!(!output(op).contains("Purchase price: "));
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&["salt", "0", "2.5", "3", "-1", "0.20", "free", "0.50"]);

        add_product(&inventory, &mut op).unwrap();

        let salt = inventory.lookup("salt").unwrap().unwrap();
        assert_eq!(salt.quantity(), 3);
        assert_eq!(output(op).matches("Invalid value.").count(), 4);
    }
}

mod sell_tests {
    use super::*;

    #[test]
    fn empty_warehouse_asks_nothing() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&[]);

        let outcome = sell(&inventory, &mut op).unwrap();
        assert_eq!(outcome, SaleOutcome::WarehouseEmpty);
        assert_eq!(output(op), "There are no products in the warehouse.\n");
    }

    #[test]
    fn single_product_sale() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["Flour", "15", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.get("flour").unwrap().quantity, 15);
        assert!(!inventory.is_stocked("flour").unwrap());
        assert_eq!(
            fs::read_to_string(inventory.sales().path()).unwrap(),
            format!("{HEADER}flour\t15\t1.50\t2.00\n")
        );
        assert!(output(op).contains("SALE REGISTERED"));
    }

    #[test]
    fn multiple_products_in_one_transaction() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["flour", "2", "yes", "sugar", "1", "yes", "flour", "3", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("flour").unwrap().quantity, 5);
        assert_eq!(ledger.get("sugar").unwrap().quantity, 1);
        assert_eq!(inventory.lookup("flour").unwrap().unwrap().quantity(), 10);
        assert_eq!(inventory.sales().find("flour").unwrap().unwrap().quantity(), 5);
    }

    #[test]
    fn unknown_product_can_be_retried() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["rice", "yes", "sugar", "4", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.get("sugar").unwrap().quantity, 4);
        assert!(output(op).contains("This product is not present in the warehouse."));
    }

    #[test]
    fn unknown_product_can_abort_transaction() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["rice", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert!(ledger.is_empty());
        assert!(!inventory.sales().path().exists());
        assert!(!output(op).contains("SALE REGISTERED"));
    }

    #[test]
    fn excess_quantity_can_be_reduced() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["sugar", "10", "yes", "3", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.get("sugar").unwrap().quantity, 3);
        assert_eq!(inventory.lookup("sugar").unwrap().unwrap().quantity(), 1);
        assert!(output(op).contains("The available quantity of the product 'sugar' is 4."));
    }

    #[test]
    fn declining_excess_quantity_can_skip_only_this_product() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["sugar", "10", "no", "yes", "flour", "1", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert!(ledger.get("sugar").is_none());
        assert_eq!(ledger.get("flour").unwrap().quantity, 1);
        assert_eq!(inventory.lookup("sugar").unwrap().unwrap().quantity(), 4);
    }

    #[test]
    fn declining_excess_quantity_can_end_transaction_keeping_earlier_sales() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["flour", "2", "yes", "sugar", "10", "no", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("flour").unwrap().quantity, 2);
        assert_eq!(inventory.lookup("flour").unwrap().unwrap().quantity(), 13);
        assert_eq!(inventory.lookup("sugar").unwrap().unwrap().quantity(), 4);
        assert!(output(op).contains("\u{2022} 2 X flour : \u{20ac}2.00"));
    }

    #[test]
    fn ending_input_mid_transaction_is_reported() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["flour"]);

        let result = sell(&inventory, &mut op);
        assert!(matches!(result, Err(InventoryError::InputClosed)));
        assert_eq!(inventory.lookup("flour").unwrap().unwrap().quantity(), 15);
    }

    #[test]
    fn malformed_row_fails_only_that_product() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        fs::write(
            inventory.warehouse().path(),
            format!("{HEADER}flour\t15\t1.50\t2.00\nsugar\tfour\t0.80\t1.20\n"),
        )
        .unwrap();
        let mut op = operator(&["flour", "5", "yes", "sugar", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("flour").unwrap().quantity, 5);
        assert_eq!(inventory.sales().find("flour").unwrap().unwrap().quantity(), 5);
        let printed = output(op);
        assert!(printed.contains("Error: Invalid value for QUANTITY: 'four'"));
        assert!(printed.contains("SALE REGISTERED"));
        assert!(printed.contains("\u{2022} 5 X flour : \u{20ac}2.00"));
    }

    #[test]
    fn malformed_row_can_be_followed_by_other_products() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        fs::write(
            inventory.warehouse().path(),
            format!("{HEADER}flour\t15\t1.50\t2.00\nsugar\tfour\t0.80\t1.20\n"),
        )
        .unwrap();
        let mut op = operator(&["sugar", "yes", "flour", "2", "no"]);

        let ledger = ledger_of(sell(&inventory, &mut op).unwrap());

        assert_eq!(ledger.get("flour").unwrap().quantity, 2);
        assert_eq!(inventory.lookup("flour").unwrap().unwrap().quantity(), 13);
    }

    #[test]
    fn summary_is_shown_when_input_ends_after_a_sale() {
        let dir = TempDir::new().unwrap();
        let inventory = stocked_inventory(&dir);
        let mut op = operator(&["flour", "3", "yes"]);

        let result = sell(&inventory, &mut op);

        assert!(matches!(result, Err(InventoryError::InputClosed)));
        assert_eq!(inventory.sales().find("flour").unwrap().unwrap().quantity(), 3);
        let printed = output(op);
        assert!(printed.contains("SALE REGISTERED"));
        assert!(printed.contains("\u{2022} 3 X flour : \u{20ac}2.00"));
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::parse("add"), Some(Command::Add));
        assert_eq!(Command::parse(" profits "), Some(Command::Profits));
        assert_eq!(Command::parse("ADD"), None);
        assert_eq!(Command::parse("quit"), None);
    }

    #[test]
    fn full_session() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&[
            "profits", "add", "flour", "10", "1.50", "2.00", "list", "sale", "flour", "4", "no",
            "profits", "close",
        ]);

        run(&inventory, &mut op).unwrap();

        let out = output(op);
        assert!(out.contains("No product has been sold yet."));
        assert!(out.contains("flour\t10\t\u{20ac}2.00"));
        assert!(out.contains("Profit: gross=\u{20ac}8.00 net=\u{20ac}2.00"));
        assert!(out.ends_with("Bye bye\n"));
    }

    #[test]
    fn unknown_command_prints_help() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&["dance", "close"]);

        run(&inventory, &mut op).unwrap();

        let out = output(op);
        assert!(out.contains("Invalid command"));
        assert!(out.contains("The available commands are the following:"));
    }

    #[test]
    fn list_of_empty_warehouse() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&["list", "close"]);

        run(&inventory, &mut op).unwrap();
        assert!(output(op).contains("There are no products in the warehouse."));
    }

    #[test]
    fn end_of_input_closes_the_loop() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        let mut op = operator(&["help"]);

        assert!(run(&inventory, &mut op).is_ok());
    }

    #[test]
    fn failing_command_does_not_end_the_loop() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::open(&StorePaths::in_dir(dir.path()));
        fs::write(
            inventory.sales().path(),
            format!("{HEADER}flour\tmany\t1.50\t2.00\n"),
        )
        .unwrap();
        let mut op = operator(&["profits", "close"]);

        run(&inventory, &mut op).unwrap();

        let out = output(op);
        assert!(out.contains("Error: Invalid value for QUANTITY: 'many'"));
        assert!(out.ends_with("Bye bye\n"));
    }
}
