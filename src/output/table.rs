//! Table rendering for `--format table` and list output

use tabled::{
    Table, Tabled,
    settings::{
        Alignment, Modify, Style,
        object::{Columns, Rows},
    },
};

/// Shown instead of a table when there are no rows
pub const NO_RESULTS: &str = "No results found.";

pub fn format_table<T: Tabled>(rows: &[T]) -> String {
    format_table_or(rows, NO_RESULTS)
}

/// Render `rows`, or `empty` when there are none.
///
/// Columns holding only numbers (scores, counts, percentages) are
/// right-aligned; `--` placeholders do not count against that.
pub fn format_table_or<T: Tabled>(rows: &[T], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    for column in numeric_columns(rows) {
        table.with(Modify::new(Columns::one(column)).with(Alignment::right()));
    }
    table.with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

fn numeric_columns<T: Tabled>(rows: &[T]) -> Vec<usize> {
    let cells: Vec<_> = rows.iter().map(Tabled::fields).collect();

    (0..T::LENGTH)
        .filter(|&column| {
            let values: Vec<&str> = cells
                .iter()
                .filter_map(|row| row.get(column))
                .map(|cell| cell.trim())
                .filter(|cell| *cell != "--" && !cell.is_empty())
                .collect();
            !values.is_empty() && values.iter().all(|cell| is_numeric(cell))
        })
        .collect()
}

fn is_numeric(cell: &str) -> bool {
    cell.trim_end_matches('%').parse::<f64>().is_ok()
}
