//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use markbook_core::MarksTable;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a marks table as "Subject | Marks"
pub fn marks_table(marks: &MarksTable) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Subject", "Marks"]);
    for row in marks.rows() {
        table.add_row(vec![
            Cell::new(row.subject.name()),
            Cell::new(row.marks.value()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Horizontal bar for a 0-100 value, two points per block
pub fn bar(value: u8) -> String {
    "█".repeat(usize::from(value).div_ceil(2))
}
