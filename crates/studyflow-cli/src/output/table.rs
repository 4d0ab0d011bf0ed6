use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn print_table(table: Table) -> Result<()> {
    println!("{table}");
    Ok(())
}

/// Two-column field/value table.
pub fn field_table<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }
    table
}
