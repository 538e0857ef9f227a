use plume_core::error::PlumeError;
use plume_core::extraction::Table;
use plume_core::model::RowWarning;
use plume_core::summary::report::{matrix_table, summary_table};
use plume_core::summary::{MatrixReport, SummaryReport};

pub fn print_summary(report: &SummaryReport) -> Result<(), PlumeError> {
    let table = summary_table(report)?;
    print!("{}", format_table(&table));
    println!("\n{}", report.nd_statement);
    if report.skipped_rows > 0 {
        println!("({} row(s) skipped as not reported or incomplete)", report.skipped_rows);
    }
    Ok(())
}

pub fn print_matrix(report: &MatrixReport) -> Result<(), PlumeError> {
    let table = matrix_table(report)?;
    print!("{}", format_table(&table));
    println!("\n{}", report.nd_statement);
    Ok(())
}

pub fn print_warnings(warnings: &[RowWarning]) {
    for w in warnings {
        // Data rows are reported 1-based, after the header line.
        eprintln!("  warning: row {}: {}", w.row + 1, w.message);
    }
}

/// Left-aligned columns separated by two spaces, header underlined.
fn format_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &table.rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
