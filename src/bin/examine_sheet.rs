use bcv_indicators::extract::{Cell, CellGrid, ExtractionEngine, IndicatorTable, Orientation};
use bcv_indicators::importers::first_sheet_from_path;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "examine-sheet")]
#[command(about = "Dump a BCV workbook's first sheet and the layout the extractor sees", long_about = None)]
struct Cli {
    /// Workbook to examine (.xls, .xlsx)
    file: PathBuf,

    /// Table profile to extract with: liquidity or base_monetaria
    #[arg(long, default_value = "liquidity")]
    table: IndicatorTable,

    /// Force an orientation instead of detecting it: rows or columns
    #[arg(long)]
    orientation: Option<String>,

    /// Number of rows to print
    #[arg(long, default_value = "40")]
    rows: usize,

    /// Number of columns to print
    #[arg(long, default_value = "10")]
    cols: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("Opening workbook: {}", cli.file.display());
    let range = first_sheet_from_path(&cli.file)?;

    println!("Dimensions: {} rows x {} cols", range.row_count(), range.col_count());
    println!("\nFirst {} rows (showing first {} columns):", cli.rows, cli.cols);
    println!("{}", "=".repeat(100));

    for row in 0..range.row_count().min(cli.rows) {
        let has_data = (0..range.col_count()).any(|col| range.cell(row, col) != Cell::Empty);
        if has_data {
            print!("Row {row:3}: ");
            for col in 0..range.col_count().min(cli.cols) {
                match range.cell(row, col) {
                    Cell::Empty => print!("[empty] "),
                    Cell::Number(n) => print!("[{n}] "),
                    Cell::Text(t) => print!("[{t}] "),
                }
            }
            println!();
        }
    }

    let mut profile = cli.table.profile();
    match cli.orientation.as_deref() {
        Some("rows") => profile = profile.with_orientation(Orientation::Rows),
        Some("columns") => profile = profile.with_orientation(Orientation::Columns),
        Some(other) => return Err(format!("unknown orientation '{other}'").into()),
        None => {}
    }

    println!("\n{}", "=".repeat(100));
    println!("Extraction with the {} profile:", profile.name);
    println!("{}", "=".repeat(100));

    let engine = ExtractionEngine::new(profile);
    match engine.extract(&range) {
        Ok(extraction) => {
            println!("Layout: {}", extraction.layout);
            for record in extraction.series.iter() {
                println!(
                    "  {}  primary={:?} secondary={:?} variation={:?} ({:?})",
                    record.period_label,
                    record.primary_value,
                    record.secondary_value,
                    record.variation_pct,
                    record.variation_source
                );
            }
            for warning in &extraction.warnings {
                println!("  skipped {warning}");
            }
        }
        Err(e) => println!("Extraction failed: {e}"),
    }

    Ok(())
}
