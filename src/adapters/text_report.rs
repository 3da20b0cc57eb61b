//! Plain-text ledger table for the console.

use crate::domain::calendar::format_date;
use crate::domain::ledger::LedgerEntry;

const HEADER: [&str; 8] = [
    "Date", "Kind", "Volume", "Stored", "Days", "Op Cost", "Holding", "Cumulative",
];

pub fn format_ledger_table(entries: &[LedgerEntry]) -> String {
    if entries.is_empty() {
        return "No operations in ledger\n".to_string();
    }

    let rows: Vec<[String; 8]> = entries
        .iter()
        .map(|e| {
            [
                format_date(e.date),
                e.kind.to_string(),
                format!("{:.2}", e.volume),
                format!("{:.2}", e.volume_after),
                e.days_elapsed.to_string(),
                format!("{:.2}", e.operation_cost),
                format!("{:.2}", e.holding_cost),
                format!("{:.2}", e.cumulative_cost),
            ]
        })
        .collect();

    let mut widths: [usize; 8] = HEADER.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &HEADER.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&rule.join("  "));
    output.push('\n');
    for row in &rows {
        push_row(&mut output, row, &widths);
    }
    output
}

// Date and kind are left-aligned, numbers right-aligned.
fn push_row(output: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let formatted: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i < 2 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    output.push_str(formatted.join("  ").trim_end());
    output.push('\n');
}
