use std::path::PathBuf;

use clap::Args;
use statview_view::explorer::{ExplorerBuilder, ExplorerConfig};

use crate::data;

#[derive(Debug, Clone, Args)]
pub(crate) struct ExploreArg {
    /// Path to the table JSON file
    pub table: PathBuf,

    /// Number of histogram bins per column
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Columns to summarize (defaults to every column)
    #[arg(long)]
    pub columns: Vec<String>,

    /// Write the summaries as JSON instead of printing a report
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExploreArg) -> anyhow::Result<()> {
    let table = data::load_table(&arg.table)?;

    let config = ExplorerConfig {
        num_bins: arg.bins,
        columns: (!arg.columns.is_empty()).then(|| arg.columns.clone()),
    };
    let summaries = ExplorerBuilder::new(&config).build(&table)?;

    if let Some(output) = &arg.output {
        data::write_json(output, &summaries)?;
        return Ok(());
    }

    println!("Column Summaries ({} rows)", table.rows.len());
    println!(
        "  {:<20} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Missing", "Min", "Max", "Mean", "Median", "Std Dev"
    );
    println!("  {}", "-".repeat(84));
    for summary in &summaries {
        match &summary.stats {
            Some(stats) => println!(
                "  {:<20} {:>8} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                summary.name,
                summary.missing_count,
                stats.min,
                stats.max,
                stats.mean,
                stats.median,
                stats.std_dev
            ),
            None => println!(
                "  {:<20} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
                summary.name, summary.missing_count, "-", "-", "-", "-", "-"
            ),
        }
    }
    Ok(())
}
