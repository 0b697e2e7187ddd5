use anyhow::{Context, Result};
use energymix::{
    config::{Settings, EIA_FIGURE6},
    locate::{
        keyword_header_row,
        table::{cell_text, Table},
        Locator, Workbook, GENERATION_SHEET,
    },
    logging,
};
use std::{env, io, path::PathBuf};
use tracing::info;

const RAW_PREVIEW_ROWS: usize = 30;
const KEYWORD_SCAN_ROWS: usize = 50;
const TABLE_PREVIEW_ROWS: usize = 10;

fn main() -> Result<()> {
    logging::init();
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Settings::from_env().cache_path(&EIA_FIGURE6));
    println!("Excel path: {} exists={}", path.display(), path.exists());

    // ─── sheets ──────────────────────────────────────────────────────
    let workbook = Workbook::open(&path)?;
    println!("Sheets:");
    for sheet in &workbook.sheets {
        println!("  {:<24} {} rows x {} cols", sheet.name, sheet.height(), sheet.width());
    }

    // ─── raw preview ─────────────────────────────────────────────────
    let Some(sheet) = workbook
        .sheet(GENERATION_SHEET)
        .or_else(|| workbook.sheets.first())
    else {
        println!("Workbook has no sheets.");
        return Ok(());
    };
    println!();
    println!("Raw rows of {:?} (first {RAW_PREVIEW_ROWS}):", sheet.name);
    for (i, row) in sheet.rows.iter().take(RAW_PREVIEW_ROWS).enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        println!("{i:>3} | {}", cells.join(" | "));
    }
    match keyword_header_row(sheet, KEYWORD_SCAN_ROWS) {
        Some(idx) => println!("Detected header row: {idx}"),
        None => println!("No header row detected in first {KEYWORD_SCAN_ROWS} rows."),
    }

    // ─── locator ─────────────────────────────────────────────────────
    let located = Locator::generation()
        .locate(&workbook)
        .context("locator found no usable table")?;
    info!(strategy = located.strategy, sheet = %located.sheet, "located");
    println!();
    println!(
        "Located by {} on {:?}, header row {}, {} rows",
        located.strategy,
        located.sheet,
        located.header_row,
        located.table.height()
    );
    println!("{}", serde_json::to_string_pretty(&located.mapping)?);
    println!();
    write_csv_preview(&located.table, TABLE_PREVIEW_ROWS)?;
    Ok(())
}

fn write_csv_preview(table: &Table, rows: usize) -> Result<()> {
    let mut out = csv::Writer::from_writer(io::stdout().lock());
    out.write_record(&table.headers)?;
    for row in table.rows.iter().take(rows) {
        out.write_record(row.iter().map(cell_text))?;
    }
    out.flush()?;
    Ok(())
}
