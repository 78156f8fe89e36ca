//! Data-explorer widget: per-column descriptive summaries and histograms.
//!
//! The explorer shows one row per table column: descriptive statistics, the
//! missing-cell count, and an equal-width histogram strip. The input schema
//! carries no type information, so a column's numeric values are whatever
//! cells read as numbers; everything else counts as missing for that column.

use serde::{Deserialize, Serialize};
use statview_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use statview_table::{DataTable, MissingColumnError};

fn default_num_bins() -> usize {
    10
}

/// Host-provided representation of the data-explorer widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerConfig {
    /// Number of histogram bins per column.
    #[serde(default = "default_num_bins")]
    pub num_bins: usize,
    /// Restrict the summaries to these columns; `None` summarizes every
    /// column in the table.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl ExplorerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_bins: default_num_bins(),
            columns: None,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// User-adjustable state of the data-explorer widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerViewValue {
    pub title: String,
    pub subtitle: String,
}

/// Descriptive statistics of one column's numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl From<DescriptiveStats> for ColumnStats {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            variance: stats.variance,
            std_dev: stats.std_dev,
        }
    }
}

/// One histogram bin of a column summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinSummary {
    pub min: f64,
    pub max: f64,
    pub count: u64,
}

/// Summary row of the explorer table, one per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub name: String,
    /// Total number of table rows.
    pub row_count: usize,
    /// Cells that are missing or not numeric.
    pub missing_count: usize,
    /// Statistics over the numeric cells; `None` when the column has none.
    pub stats: Option<ColumnStats>,
    /// Equal-width histogram over the numeric cells.
    pub histogram: Vec<BinSummary>,
}

/// Builds explorer summaries from the widget's input table.
#[derive(Debug, Clone, Copy)]
pub struct ExplorerBuilder<'a> {
    config: &'a ExplorerConfig,
}

impl<'a> ExplorerBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a ExplorerConfig) -> Self {
        Self { config }
    }

    /// Summarizes the configured columns in table order.
    pub fn build(&self, table: &DataTable) -> Result<Vec<ColumnSummary>, MissingColumnError> {
        let columns: Vec<(String, usize)> = match &self.config.columns {
            Some(names) => names
                .iter()
                .map(|name| Ok((name.clone(), table.spec.find_column(name)?)))
                .collect::<Result<_, MissingColumnError>>()?,
            None => table
                .spec
                .col_names
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), idx))
                .collect(),
        };

        Ok(columns
            .into_iter()
            .map(|(name, idx)| self.summarize_column(table, name, idx))
            .collect())
    }

    fn summarize_column(&self, table: &DataTable, name: String, idx: usize) -> ColumnSummary {
        let row_count = table.rows.len();
        let values: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|row| row.cell(idx).as_f64())
            .collect();
        let missing_count = row_count - values.len();

        let stats = DescriptiveStats::new(values.iter().copied()).map(ColumnStats::from);
        let histogram = Histogram::equal_width(values, self.config.num_bins)
            .bins
            .into_iter()
            .map(|bin| BinSummary {
                min: bin.range.start,
                max: bin.range.end,
                count: bin.count,
            })
            .collect();

        ColumnSummary {
            name,
            row_count,
            missing_count,
            stats,
            histogram,
        }
    }
}

/// One live instance of the data-explorer widget.
#[derive(Debug, Clone)]
pub struct ExplorerView {
    config: ExplorerConfig,
    value: ExplorerViewValue,
    summaries: Vec<ColumnSummary>,
}

impl ExplorerView {
    #[must_use]
    pub fn new(config: ExplorerConfig, value: ExplorerViewValue) -> Self {
        Self {
            config,
            value,
            summaries: vec![],
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Rebuilds the column summaries from `table`.
    pub fn build(&mut self, table: &DataTable) -> Result<&[ColumnSummary], MissingColumnError> {
        self.summaries = ExplorerBuilder::new(&self.config).build(table)?;
        Ok(&self.summaries)
    }

    #[must_use]
    pub fn summaries(&self) -> &[ColumnSummary] {
        &self.summaries
    }

    #[must_use]
    pub fn component_value(&self) -> &ExplorerViewValue {
        &self.value
    }

    #[must_use]
    pub fn into_component_value(self) -> ExplorerViewValue {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use statview_table::{Cell, Row, TableSpec};

    use super::*;

    fn mixed_table() -> DataTable {
        DataTable {
            spec: TableSpec::new(["Value", "Label"]),
            rows: vec![
                Row::new([Cell::Number(1.0), Cell::Text("a".to_owned())]),
                Row::new([Cell::Number(3.0), Cell::Text("b".to_owned())]),
                Row::new([Cell::Missing, Cell::Text("c".to_owned())]),
                Row::new([Cell::Number(5.0), Cell::Missing]),
            ],
        }
    }

    #[test]
    fn summarizes_every_column_in_table_order() {
        let config = ExplorerConfig::new();
        let summaries = ExplorerBuilder::new(&config).build(&mixed_table()).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Value");
        assert_eq!(summaries[1].name, "Label");
    }

    #[test]
    fn numeric_column_gets_stats_and_histogram() {
        let mut config = ExplorerConfig::new();
        config.num_bins = 2;
        let summaries = ExplorerBuilder::new(&config).build(&mixed_table()).unwrap();

        let value = &summaries[0];
        assert_eq!(value.row_count, 4);
        assert_eq!(value.missing_count, 1);
        let stats = value.stats.as_ref().unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(value.histogram.len(), 2);
        let total: u64 = value.histogram.iter().map(|bin| bin.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn non_numeric_column_counts_all_cells_missing() {
        let config = ExplorerConfig::new();
        let summaries = ExplorerBuilder::new(&config).build(&mixed_table()).unwrap();

        let label = &summaries[1];
        assert_eq!(label.missing_count, 4);
        assert_eq!(label.stats, None);
        assert!(label.histogram.is_empty());
    }

    #[test]
    fn explicit_column_selection_must_resolve() {
        let mut config = ExplorerConfig::new();
        config.columns = Some(vec!["Nope".to_owned()]);
        let err = ExplorerBuilder::new(&config)
            .build(&mixed_table())
            .unwrap_err();
        assert_eq!(err.name, "Nope");
    }

    #[test]
    fn explicit_selection_preserves_requested_order() {
        let mut config = ExplorerConfig::new();
        config.columns = Some(vec!["Label".to_owned(), "Value".to_owned()]);
        let summaries = ExplorerBuilder::new(&config).build(&mixed_table()).unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Label", "Value"]);
    }
}
