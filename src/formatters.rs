use crate::engine::SaleLedger;
use crate::record::Field;
use crate::report::{ListingRow, Profit};

pub fn format_sale_summary(ledger: &SaleLedger) -> String {
    let mut output = String::from("SALE REGISTERED\n\n");
    for entry in ledger.entries() {
        output.push_str(&format!(
            "\u{2022} {} X {} : \u{20ac}{:.2}\n",
            entry.quantity, entry.name, entry.unit_price
        ));
    }
    output
}

pub fn format_listing(rows: &[ListingRow]) -> String {
    let mut output = format!(
        "{}\t{}\t{}\n",
        Field::Product.column(),
        Field::Quantity.column(),
        Field::Price.column()
    );
    for row in rows {
        output.push_str(&format!(
            "{}\t{}\t\u{20ac}{:.2}\n",
            row.name, row.quantity, row.price
        ));
    }
    output
}

pub fn format_profit(profit: &Profit) -> String {
    format!(
        "Profit: gross=\u{20ac}{:.2} net=\u{20ac}{:.2}",
        profit.gross, profit.net
    )
}

pub fn help_message() -> String {
    [
        "The available commands are the following:",
        "",
        "\u{2022} add: adds a product to the warehouse",
        "\u{2022} list: lists the products in the warehouse",
        "\u{2022} sale: records a sale made",
        "\u{2022} profits: shows the total profits",
        "\u{2022} help: shows the available commands",
        "\u{2022} close: quit the program",
    ]
    .join("\n")
}
