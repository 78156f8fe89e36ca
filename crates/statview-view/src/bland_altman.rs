//! Bland-Altman agreement plot: per-row mean/difference points plus the bias
//! and limits of agreement across two measurement columns.
//!
//! For each row the builder computes `mean = (m1 + m2) / 2` and
//! `difference = m1 - m2`, optionally after a symmetric log2 transform. Rows
//! with a missing measurement are skipped and counted. Across all valid rows
//! the bias is the mean difference and the limits of agreement are
//! `bias ± 1.96 · sd`, with the sample standard deviation of the differences.

use serde::{Deserialize, Serialize};
use statview_stats::descriptive::DescriptiveStats;
use statview_table::{DataTable, MissingColumnError};

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    600
}

fn default_dot_size() -> u32 {
    3
}

/// Host-provided representation of the agreement-plot widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlandAltmanConfig {
    /// First measurement column.
    pub measurement1_col: String,
    /// Second measurement column.
    pub measurement2_col: String,
    /// Compare on a log2 scale, clamping values in `[-1, 1]` to zero.
    #[serde(default)]
    pub log_scale: bool,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_dot_size")]
    pub dot_size: u32,
}

impl BlandAltmanConfig {
    #[must_use]
    pub fn new(measurement1_col: impl Into<String>, measurement2_col: impl Into<String>) -> Self {
        Self {
            measurement1_col: measurement1_col.into(),
            measurement2_col: measurement2_col.into(),
            log_scale: false,
            image_width: default_image_width(),
            image_height: default_image_height(),
            dot_size: default_dot_size(),
        }
    }
}

/// User-adjustable state of the agreement-plot widget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlandAltmanViewValue {
    pub x_axis_min: Option<f64>,
    pub x_axis_max: Option<f64>,
    pub y_axis_min: Option<f64>,
    pub y_axis_max: Option<f64>,
    pub dot_size: Option<u32>,
}

/// Chart data for the agreement plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlandAltmanChartData {
    /// `(mean, difference)` per valid row, in row order.
    pub points: Vec<(f64, f64)>,
    /// Mean difference across all valid rows.
    pub bias: f64,
    /// `bias + 1.96 · sd`.
    pub upper_limit: f64,
    /// `bias - 1.96 · sd`.
    pub lower_limit: f64,
    /// Data range of the mean axis.
    pub x_min: f64,
    pub x_max: f64,
    /// Data range of the difference axis, stretched to include both limits.
    pub y_min: f64,
    pub y_max: f64,
    /// Rows dropped because a measurement was missing.
    pub skipped_rows: u64,
}

/// Failure to turn a table into agreement-plot data.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BlandAltmanChartError {
    #[display("{_0}")]
    MissingColumn(MissingColumnError),
    #[display("no valid measurement pairs found")]
    NoValidRows,
}

impl From<MissingColumnError> for BlandAltmanChartError {
    fn from(err: MissingColumnError) -> Self {
        Self::MissingColumn(err)
    }
}

/// Builds agreement-plot chart data from the widget's input table.
#[derive(Debug, Clone, Copy)]
pub struct BlandAltmanBuilder<'a> {
    config: &'a BlandAltmanConfig,
}

impl<'a> BlandAltmanBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a BlandAltmanConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, table: &DataTable) -> Result<BlandAltmanChartData, BlandAltmanChartError> {
        let m1_idx = table.spec.find_column(&self.config.measurement1_col)?;
        let m2_idx = table.spec.find_column(&self.config.measurement2_col)?;

        let mut points = vec![];
        let mut differences = vec![];
        let mut skipped_rows = 0u64;

        for row in &table.rows {
            let (Some(mut m1), Some(mut m2)) =
                (row.cell(m1_idx).as_f64(), row.cell(m2_idx).as_f64())
            else {
                skipped_rows += 1;
                continue;
            };
            if self.config.log_scale {
                m1 = symmetric_log2(m1);
                m2 = symmetric_log2(m2);
            }
            let mean = (m1 + m2) / 2.0;
            let difference = m1 - m2;
            points.push((mean, difference));
            differences.push(difference);
        }

        let stats =
            DescriptiveStats::new(differences).ok_or(BlandAltmanChartError::NoValidRows)?;
        let bias = stats.mean;
        let upper_limit = bias + 1.96 * stats.std_dev;
        let lower_limit = bias - 1.96 * stats.std_dev;

        let x_min = points.iter().map(|&(x, _)| x).fold(f64::INFINITY, f64::min);
        let x_max = points
            .iter()
            .map(|&(x, _)| x)
            .fold(f64::NEG_INFINITY, f64::max);
        let y_min = stats.min.min(lower_limit);
        let y_max = stats.max.max(upper_limit);

        Ok(BlandAltmanChartData {
            points,
            bias,
            upper_limit,
            lower_limit,
            x_min,
            x_max,
            y_min,
            y_max,
            skipped_rows,
        })
    }
}

/// One live instance of the agreement-plot widget.
#[derive(Debug, Clone)]
pub struct BlandAltmanView {
    config: BlandAltmanConfig,
    value: BlandAltmanViewValue,
    chart: Option<BlandAltmanChartData>,
}

impl BlandAltmanView {
    #[must_use]
    pub fn new(config: BlandAltmanConfig, value: BlandAltmanViewValue) -> Self {
        Self {
            config,
            value,
            chart: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BlandAltmanConfig {
        &self.config
    }

    /// Rebuilds the chart data and seeds unset axis bounds from the data
    /// ranges, so the host gets concrete bounds back.
    pub fn build(
        &mut self,
        table: &DataTable,
    ) -> Result<&BlandAltmanChartData, BlandAltmanChartError> {
        let chart = BlandAltmanBuilder::new(&self.config).build(table)?;
        self.value.x_axis_min.get_or_insert(chart.x_min);
        self.value.x_axis_max.get_or_insert(chart.x_max);
        self.value.y_axis_min.get_or_insert(chart.y_min);
        self.value.y_axis_max.get_or_insert(chart.y_max);
        Ok(self.chart.insert(chart))
    }

    #[must_use]
    pub fn chart(&self) -> Option<&BlandAltmanChartData> {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn component_value(&self) -> &BlandAltmanViewValue {
        &self.value
    }

    #[must_use]
    pub fn into_component_value(self) -> BlandAltmanViewValue {
        self.value
    }
}

/// Log2 transform that mirrors negative values and clamps `[-1, 1]` to zero,
/// keeping the transform defined over the whole real line.
fn symmetric_log2(value: f64) -> f64 {
    if value > 1.0 {
        value.log2()
    } else if value < -1.0 {
        -((-value).log2())
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use statview_table::{Cell, Row, TableSpec};

    use super::*;

    fn measurement_table(pairs: &[(Cell, Cell)]) -> DataTable {
        DataTable {
            spec: TableSpec::new(["M1", "M2"]),
            rows: pairs
                .iter()
                .map(|(m1, m2)| Row::new([m1.clone(), m2.clone()]))
                .collect(),
        }
    }

    #[test]
    fn computes_bias_and_limits_of_agreement() {
        let table = measurement_table(&[
            (Cell::Number(1.0), Cell::Number(1.0)),
            (Cell::Number(2.0), Cell::Number(1.0)),
            (Cell::Number(3.0), Cell::Number(1.0)),
            (Cell::Number(4.0), Cell::Number(1.0)),
        ]);
        let config = BlandAltmanConfig::new("M1", "M2");
        let chart = BlandAltmanBuilder::new(&config).build(&table).unwrap();

        // Differences 0, 1, 2, 3: bias 1.5, sample sd sqrt(5/3).
        assert_eq!(chart.bias, 1.5);
        let sd = (5.0f64 / 3.0).sqrt();
        assert!((chart.upper_limit - (1.5 + 1.96 * sd)).abs() < 1e-12);
        assert!((chart.lower_limit - (1.5 - 1.96 * sd)).abs() < 1e-12);
        assert_eq!(chart.points.len(), 4);
        assert_eq!(chart.points[1], (1.5, 1.0));
        assert_eq!(chart.x_min, 1.0);
        assert_eq!(chart.x_max, 2.5);
    }

    #[test]
    fn difference_axis_includes_both_limits() {
        let table = measurement_table(&[
            (Cell::Number(1.0), Cell::Number(1.0)),
            (Cell::Number(2.0), Cell::Number(1.0)),
        ]);
        let config = BlandAltmanConfig::new("M1", "M2");
        let chart = BlandAltmanBuilder::new(&config).build(&table).unwrap();
        assert!(chart.y_min <= chart.lower_limit);
        assert!(chart.y_max >= chart.upper_limit);
    }

    #[test]
    fn rows_with_missing_measurements_are_skipped() {
        let table = measurement_table(&[
            (Cell::Number(1.0), Cell::Missing),
            (Cell::Number(2.0), Cell::Number(2.0)),
            (Cell::Missing, Cell::Number(3.0)),
        ]);
        let config = BlandAltmanConfig::new("M1", "M2");
        let chart = BlandAltmanBuilder::new(&config).build(&table).unwrap();
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.skipped_rows, 2);
    }

    #[test]
    fn all_rows_missing_is_an_error() {
        let table = measurement_table(&[(Cell::Missing, Cell::Missing)]);
        let config = BlandAltmanConfig::new("M1", "M2");
        let err = BlandAltmanBuilder::new(&config).build(&table).unwrap_err();
        assert_eq!(err, BlandAltmanChartError::NoValidRows);
    }

    #[test]
    fn missing_measurement_column_is_an_error() {
        let table = measurement_table(&[(Cell::Number(1.0), Cell::Number(1.0))]);
        let config = BlandAltmanConfig::new("M1", "Other");
        let err = BlandAltmanBuilder::new(&config).build(&table).unwrap_err();
        assert!(matches!(err, BlandAltmanChartError::MissingColumn(_)));
    }

    #[test]
    fn log_scale_applies_symmetric_log2() {
        assert_eq!(symmetric_log2(4.0), 2.0);
        assert_eq!(symmetric_log2(-4.0), -2.0);
        assert_eq!(symmetric_log2(0.5), 0.0);
        assert_eq!(symmetric_log2(-1.0), 0.0);

        let table = measurement_table(&[(Cell::Number(8.0), Cell::Number(2.0))]);
        let mut config = BlandAltmanConfig::new("M1", "M2");
        config.log_scale = true;
        let chart = BlandAltmanBuilder::new(&config).build(&table).unwrap();
        assert_eq!(chart.points[0], (2.0, 2.0));
    }

    #[test]
    fn view_seeds_axis_bounds_from_data() {
        let table = measurement_table(&[
            (Cell::Number(1.0), Cell::Number(1.0)),
            (Cell::Number(3.0), Cell::Number(1.0)),
        ]);
        let config = BlandAltmanConfig::new("M1", "M2");
        let mut view = BlandAltmanView::new(config, BlandAltmanViewValue::default());
        view.build(&table).unwrap();

        let value = view.component_value();
        assert_eq!(value.x_axis_min, Some(1.0));
        assert_eq!(value.x_axis_max, Some(2.0));
        assert!(value.y_axis_min.is_some());
        assert!(value.y_axis_max.is_some());
    }
}
