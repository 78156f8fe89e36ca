use std::path::PathBuf;

use clap::Args;
use statview_view::survival::{SurvivalCurveBuilder, SurvivalViewConfig};

use crate::data;

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalArg {
    /// Path to the table JSON file
    pub table: PathBuf,

    /// Name of the time column
    #[arg(long)]
    pub time_col: String,

    /// Name of the event column (counts are read from its #True/#False columns)
    #[arg(long)]
    pub event_col: String,

    /// Optional grouping column
    #[arg(long)]
    pub group_col: Option<String>,

    /// Write the chart data as JSON instead of printing a report
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let table = data::load_table(&arg.table)?;

    let mut config = SurvivalViewConfig::new(&arg.time_col, &arg.event_col);
    config.group_col = arg.group_col.clone();
    let chart = SurvivalCurveBuilder::new(&config).build(&table)?;

    if let Some(output) = &arg.output {
        data::write_json(output, &chart)?;
        return Ok(());
    }

    println!("Survival Curves (max time = {})", chart.max_time);
    println!(
        "  {:<24} {:>8} {:>8} {:>8} {:>12}",
        "Group", "Subjects", "Events", "Censored", "KM Median"
    );
    println!("  {}", "-".repeat(66));
    for group in &chart.groups {
        let median = group
            .median_survival
            .map_or_else(|| "-".to_owned(), |m| format!("{m:.1}"));
        println!(
            "  {:<24} {:>8} {:>8} {:>8} {:>12}",
            group.name, group.subject_count, group.event_count, group.censored_count, median
        );
    }
    Ok(())
}
