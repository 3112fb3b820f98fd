use ductwise_core::model::Sheet;
use ductwise_core::reports::Reports;

/// Master sheet rows shown on screen; the xlsx file always has all of them.
const MASTER_DISPLAY_ROWS: usize = 1000;
const MAX_COLUMN_WIDTH: usize = 40;

pub fn print_reports(reports: &Reports) {
    println!("=== Duct-wise Summary: Duct x Unit x Vendor x PO ===\n");
    println!("{}", format_sheet(&reports.summary, usize::MAX));

    println!("=== Master Sheet: All DU Items per Duct x Unit ===\n");
    println!("{}", format_sheet(&reports.master, MASTER_DISPLAY_ROWS));
}

/// Render up to `limit` rows as a left-aligned text table.
pub fn format_sheet(sheet: &Sheet, limit: usize) -> String {
    let shown: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(|v| clip(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = sheet
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            shown
                .iter()
                .filter_map(|row| row.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(clip(name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = sheet.columns.iter().map(|c| clip(c)).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &shown {
        push_line(&mut out, row, &widths);
    }

    if sheet.len() > shown.len() {
        out.push_str(&format!(
            "  ... {} more row(s) not shown\n",
            sheet.len() - shown.len()
        ));
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str("  ");
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn clip(s: &str) -> String {
    if s.chars().count() <= MAX_COLUMN_WIDTH {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX_COLUMN_WIDTH - 3).collect();
        format!("{head}...")
    }
}
