//! Plain-text table rendering for command output.

use rundex_core::Table;

/// Formats a table with right-aligned columns, header first.
pub fn format_table(table: &Table) -> String {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            table
                .rows
                .iter()
                .map(|row| row.get(idx).map_or(0, String::len))
                .max()
                .unwrap_or(0)
                .max(column.len())
        })
        .collect();
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(render_row(&table.columns, &widths));
    for row in &table.rows {
        lines.push(render_row(row, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" ")
}
