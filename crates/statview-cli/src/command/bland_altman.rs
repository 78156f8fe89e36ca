use std::path::PathBuf;

use clap::Args;
use statview_view::bland_altman::{BlandAltmanBuilder, BlandAltmanConfig};

use crate::data;

#[derive(Debug, Clone, Args)]
pub(crate) struct BlandAltmanArg {
    /// Path to the table JSON file
    pub table: PathBuf,

    /// First measurement column
    #[arg(long)]
    pub measurement1: String,

    /// Second measurement column
    #[arg(long)]
    pub measurement2: String,

    /// Compare measurements on a log2 scale
    #[arg(long)]
    pub log_scale: bool,

    /// Write the chart data as JSON instead of printing a report
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BlandAltmanArg) -> anyhow::Result<()> {
    let table = data::load_table(&arg.table)?;

    let mut config = BlandAltmanConfig::new(&arg.measurement1, &arg.measurement2);
    config.log_scale = arg.log_scale;
    let chart = BlandAltmanBuilder::new(&config).build(&table)?;

    if let Some(output) = &arg.output {
        data::write_json(output, &chart)?;
        return Ok(());
    }

    println!(
        "Bland-Altman Agreement: {} vs {}",
        arg.measurement1, arg.measurement2
    );
    println!("  Valid pairs:              {}", chart.points.len());
    println!("  Skipped rows:             {}", chart.skipped_rows);
    println!("  Bias (mean difference):   {:.4}", chart.bias);
    println!("  Upper limit of agreement: {:.4}", chart.upper_limit);
    println!("  Lower limit of agreement: {:.4}", chart.lower_limit);
    println!(
        "  Mean axis range:          [{:.4}, {:.4}]",
        chart.x_min, chart.x_max
    );
    println!(
        "  Difference axis range:    [{:.4}, {:.4}]",
        chart.y_min, chart.y_max
    );
    Ok(())
}
