//! Reactant Stock CLI
//!
//! Projects daily stock for every reactant in a stock table, writes the
//! trajectory table to CSV and optionally the zero-stock dates to JSON.
//!
//! ```bash
//! reactant-stock --stock stock_data.csv --supply supply_data.csv \
//!     --output reactant_consumption.csv --zero-stock-output zero_stock.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use reactant_stock::material::{load_materials, load_supply_events};
use reactant_stock::projection::{ProjectionConfig, ProjectionEngine};
use reactant_stock::report::{write_trajectory_csv, write_zero_stock_json};
use reactant_stock::Scenario;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "reactant-stock")]
#[command(about = "Project daily reactant stock under forecast/actual supply and planned/actual consumption")]
#[command(version)]
struct Args {
    /// Stock table (CSV)
    #[arg(long, env = "REACTANT_STOCK_FILE")]
    stock: PathBuf,

    /// Supply-event table (CSV)
    #[arg(long, env = "REACTANT_SUPPLY_FILE")]
    supply: PathBuf,

    /// Where to save the daily trajectory table (CSV)
    #[arg(short, long, env = "REACTANT_OUTPUT_FILE")]
    output: PathBuf,

    /// Where to save first zero-stock dates per material (JSON)
    #[arg(long, env = "REACTANT_ZERO_STOCK_FILE")]
    zero_stock_output: Option<PathBuf>,

    /// Project materials in parallel
    #[arg(long, env = "REACTANT_PARALLEL")]
    parallel: bool,

    /// Number of materials listed in the console summary
    #[arg(long, default_value = "20")]
    summary_rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Reactant Stock Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================\n");

    let start = Instant::now();
    let materials = load_materials(&args.stock)
        .with_context(|| format!("failed to load stock data from {}", args.stock.display()))?;
    let supply_events = load_supply_events(&args.supply)
        .with_context(|| format!("failed to load supply data from {}", args.supply.display()))?;
    info!("Inputs loaded in {:?}", start.elapsed());

    println!("Materials:     {}", materials.len());
    println!("Supply events: {}", supply_events.len());

    let engine = ProjectionEngine::new(ProjectionConfig { parallel: args.parallel });
    let result = engine.project(&materials, &supply_events);
    let summaries = result.summaries();
    let (rows, zero_stock) = result.into_parts();

    write_trajectory_csv(&args.output, &rows)
        .with_context(|| format!("failed to save trajectory to {}", args.output.display()))?;
    println!("\nReactant consumption table saved to {}", args.output.display());

    if let Some(path) = &args.zero_stock_output {
        write_zero_stock_json(path, &zero_stock)
            .with_context(|| format!("failed to save zero-stock days to {}", path.display()))?;
        println!("Zero-stock days saved to {}", path.display());
    }

    // Print summary
    println!("\nFirst zero-stock day (FC = forecast supply, ACT = actual supply; PLN/ACT = consumption):");
    println!(
        "{:<12} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Material", "Days", "FC/PLN", "FC/ACT", "ACT/PLN", "ACT/ACT", "Re-order"
    );
    println!("{}", "-".repeat(86));

    for summary in summaries.iter().take(args.summary_rows) {
        let cells: Vec<String> = Scenario::ALL
            .iter()
            .map(|s| date_cell(summary.zero_stock.get(*s)))
            .collect();
        let first_reorder = summary.first_reorder.values().iter().flatten().min().copied();
        println!(
            "{:<12} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12}",
            summary.material_code,
            summary.days_projected,
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            date_cell(first_reorder),
        );
    }

    if summaries.len() > args.summary_rows {
        println!("... ({} more materials)", summaries.len() - args.summary_rows);
    }

    let stocked_out = summaries.iter().filter(|s| s.zero_stock.earliest().is_some()).count();
    println!("\nSummary:");
    println!("  Rows written:          {}", rows.len());
    println!("  Materials stocked out: {} of {}", stocked_out, summaries.len());
    println!("  Total time:            {:?}", start.elapsed());

    Ok(())
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}
