//! Kaplan-Meier survival curve widget: configuration, table wiring, and
//! chart-data construction.
//!
//! The widget's input table carries one row per observed time point with the
//! event and censor counts in the host's derived count columns
//! (`#True(<eventCol>)` / `#False(<eventCol>)`) and an optional grouping
//! column. Rows are expected in ascending time order; the builder trusts that
//! order and never sorts.
//!
//! Rows with an absent group land in the sentinel [`DEFAULT_GROUP`]. Groups
//! appear in the output in first-seen order, and each group's curve is the
//! standard Kaplan-Meier estimate computed by
//! [`statview_stats::survival::KaplanMeierCurve`].

use serde::{Deserialize, Serialize};
use statview_stats::survival::{CountRow, KaplanMeierCurve, SurvivalCurveError};
use statview_table::{DataTable, MissingColumnError, event_false_column, event_true_column};

/// Group assigned to rows whose group cell is missing.
pub const DEFAULT_GROUP: &str = "Study Objects";

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_true() -> bool {
    true
}

fn default_color() -> String {
    "#fff".to_owned()
}

/// Host-provided representation of the survival widget.
///
/// Every option the host may pass is enumerated here, so the widget works
/// against a typed structure rather than an untyped property bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalViewConfig {
    /// Name of the time column.
    pub time_col: String,
    /// Name of the event column; counts are read from its derived
    /// `#True(..)` / `#False(..)` columns.
    pub event_col: String,
    /// Optional grouping column.
    #[serde(default)]
    pub group_col: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default = "default_true")]
    pub enable_view_controls: bool,
    #[serde(default = "default_true")]
    pub enable_title_edit: bool,
    #[serde(default = "default_true")]
    pub enable_subtitle_edit: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default = "default_color")]
    pub background_color: String,
    #[serde(default = "default_color")]
    pub data_area_color: String,
}

impl SurvivalViewConfig {
    /// Creates a configuration with the host's default view options.
    #[must_use]
    pub fn new(time_col: impl Into<String>, event_col: impl Into<String>) -> Self {
        Self {
            time_col: time_col.into(),
            event_col: event_col.into(),
            group_col: None,
            width: default_width(),
            height: default_height(),
            fullscreen: true,
            enable_view_controls: true,
            enable_title_edit: true,
            enable_subtitle_edit: true,
            show_legend: true,
            background_color: default_color(),
            data_area_color: default_color(),
        }
    }
}

/// User-adjustable state of the survival widget, returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurvivalViewValue {
    pub title: String,
    pub subtitle: String,
}

/// One aggregated input row, after column resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: f64,
    pub events: u64,
    pub censored: u64,
    /// Group key; `None` maps to [`DEFAULT_GROUP`].
    pub group: Option<String>,
}

/// Survival curve of a single group, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCurve {
    pub name: String,
    /// Right-continuous step function, starting at `(0, 1.0)`.
    pub plot: Vec<(f64, f64)>,
    /// `(time, probability)` marks where censoring occurred.
    pub censors: Vec<(f64, f64)>,
    /// Initial at-risk pool of the group.
    pub subject_count: u64,
    pub event_count: u64,
    pub censored_count: u64,
    /// Kaplan-Meier median survival time, if the curve reaches 50%.
    pub median_survival: Option<f64>,
}

/// Chart data for the whole widget: one curve per group plus the time-axis
/// maximum the renderer scales against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalChartData {
    /// Group curves in first-seen order of their group keys.
    pub groups: Vec<GroupCurve>,
    /// Largest time value across all rows.
    pub max_time: f64,
}

impl SurvivalChartData {
    /// Looks up a group's curve by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupCurve> {
        self.groups.iter().find(|group| group.name == name)
    }
}

/// Failure to turn a table into survival chart data.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SurvivalChartError {
    #[display("{_0}")]
    MissingColumn(MissingColumnError),
    /// The group's at-risk total is non-positive where a survival ratio is
    /// needed; no statistically valid curve exists.
    #[display("cannot compute survival curve for group '{group}': {source}")]
    InvalidGroupTotal {
        group: String,
        source: SurvivalCurveError,
    },
}

impl From<MissingColumnError> for SurvivalChartError {
    fn from(err: MissingColumnError) -> Self {
        Self::MissingColumn(err)
    }
}

/// Builds survival chart data from the widget's input table.
#[derive(Debug, Clone, Copy)]
pub struct SurvivalCurveBuilder<'a> {
    config: &'a SurvivalViewConfig,
}

impl<'a> SurvivalCurveBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a SurvivalViewConfig) -> Self {
        Self { config }
    }

    /// Resolves the configured columns and reads the table into observations.
    ///
    /// Rows without a numeric time value are skipped; missing count cells
    /// read as zero. Group cells are stringified, with missing cells mapping
    /// to [`DEFAULT_GROUP`] later.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn observations(&self, table: &DataTable) -> Result<Vec<Observation>, SurvivalChartError> {
        let spec = &table.spec;
        let time_idx = spec.find_column(&self.config.time_col)?;
        let event_idx = spec.find_column(&event_true_column(&self.config.event_col))?;
        let censor_idx = spec.find_column(&event_false_column(&self.config.event_col))?;
        let group_idx = self
            .config
            .group_col
            .as_deref()
            .map(|name| spec.find_column(name))
            .transpose()?;

        let mut observations = vec![];
        for row in &table.rows {
            let Some(time) = row.cell(time_idx).as_f64() else {
                continue;
            };
            let events = row.cell(event_idx).as_f64().unwrap_or(0.0).max(0.0) as u64;
            let censored = row.cell(censor_idx).as_f64().unwrap_or(0.0).max(0.0) as u64;
            let group = group_idx.and_then(|idx| match row.cell(idx) {
                statview_table::Cell::Text(name) => Some(name.clone()),
                statview_table::Cell::Number(n) => Some(n.to_string()),
                statview_table::Cell::Bool(b) => Some(b.to_string()),
                statview_table::Cell::Missing => None,
            });
            observations.push(Observation {
                time,
                events,
                censored,
                group,
            });
        }
        Ok(observations)
    }

    /// Builds the per-group survival curves and the global time maximum.
    pub fn build(&self, table: &DataTable) -> Result<SurvivalChartData, SurvivalChartError> {
        build_curves(self.observations(table)?)
    }
}

/// Builds survival chart data from already-resolved observations.
///
/// Two passes: the first creates group state in first-seen order and
/// accumulates each group's initial at-risk pool (`events + censored` over
/// the group's rows) and the global `max_time`; the second computes each
/// group's step curve with a running product of survival ratios.
pub fn build_curves<I>(observations: I) -> Result<SurvivalChartData, SurvivalChartError>
where
    I: IntoIterator<Item = Observation>,
{
    let mut max_time: f64 = 0.0;
    let mut names: Vec<String> = vec![];
    let mut grouped: Vec<Vec<CountRow>> = vec![];

    for obs in observations {
        let name = obs.group.as_deref().unwrap_or(DEFAULT_GROUP);
        let idx = match names.iter().position(|n| n == name) {
            Some(idx) => idx,
            None => {
                names.push(name.to_owned());
                grouped.push(vec![]);
                names.len() - 1
            }
        };
        grouped[idx].push(CountRow {
            time: obs.time,
            events: obs.events,
            censored: obs.censored,
        });
        max_time = max_time.max(obs.time);
    }

    let groups = names
        .into_iter()
        .zip(grouped)
        .map(|(name, rows)| {
            let curve =
                KaplanMeierCurve::from_counts(&rows).map_err(|source| {
                    SurvivalChartError::InvalidGroupTotal {
                        group: name.clone(),
                        source,
                    }
                })?;
            let event_count = rows.iter().map(|row| row.events).sum::<u64>();
            let censored_count = rows.iter().map(|row| row.censored).sum::<u64>();
            Ok(GroupCurve {
                name,
                median_survival: curve.median_survival(),
                plot: curve.plot,
                censors: curve.censors,
                subject_count: event_count + censored_count,
                event_count,
                censored_count,
            })
        })
        .collect::<Result<Vec<_>, SurvivalChartError>>()?;

    Ok(SurvivalChartData { groups, max_time })
}

/// One live instance of the survival widget.
///
/// Owns the configuration, the user-adjustable value, and the last-built
/// chart data. Created explicitly per widget instance and dropped when the
/// host tears the view down.
#[derive(Debug, Clone)]
pub struct SurvivalView {
    config: SurvivalViewConfig,
    value: SurvivalViewValue,
    chart: Option<SurvivalChartData>,
}

impl SurvivalView {
    #[must_use]
    pub fn new(config: SurvivalViewConfig, value: SurvivalViewValue) -> Self {
        Self {
            config,
            value,
            chart: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SurvivalViewConfig {
        &self.config
    }

    /// Rebuilds the chart data from `table`, replacing any previous build.
    pub fn build(&mut self, table: &DataTable) -> Result<&SurvivalChartData, SurvivalChartError> {
        let chart = SurvivalCurveBuilder::new(&self.config).build(table)?;
        Ok(self.chart.insert(chart))
    }

    /// The last-built chart data, if any.
    #[must_use]
    pub fn chart(&self) -> Option<&SurvivalChartData> {
        self.chart.as_ref()
    }

    /// Applies a title edit from the view controls.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.value.title = title.into();
    }

    /// Applies a subtitle edit from the view controls.
    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.value.subtitle = subtitle.into();
    }

    /// Current value object, as returned to the host on request.
    #[must_use]
    pub fn component_value(&self) -> &SurvivalViewValue {
        &self.value
    }

    /// Tears the view down, handing the final value back to the host.
    #[must_use]
    pub fn into_component_value(self) -> SurvivalViewValue {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use statview_table::{Cell, Row, TableSpec};

    use super::*;

    fn obs(time: f64, events: u64, censored: u64, group: Option<&str>) -> Observation {
        Observation {
            time,
            events,
            censored,
            group: group.map(str::to_owned),
        }
    }

    fn survival_table() -> DataTable {
        DataTable {
            spec: TableSpec::new(["Time", "#True(Death)", "#False(Death)", "Cohort"]),
            rows: vec![
                Row::new([
                    Cell::Number(1.0),
                    Cell::Number(1.0),
                    Cell::Number(0.0),
                    Cell::Text("A".to_owned()),
                ]),
                Row::new([
                    Cell::Number(2.0),
                    Cell::Number(0.0),
                    Cell::Number(1.0),
                    Cell::Text("A".to_owned()),
                ]),
                Row::new([
                    Cell::Number(5.0),
                    Cell::Number(2.0),
                    Cell::Number(0.0),
                    Cell::Text("B".to_owned()),
                ]),
            ],
        }
    }

    #[test]
    fn builds_from_table_with_derived_count_columns() {
        let mut config = SurvivalViewConfig::new("Time", "Death");
        config.group_col = Some("Cohort".to_owned());
        let chart = SurvivalCurveBuilder::new(&config)
            .build(&survival_table())
            .unwrap();

        assert_eq!(chart.max_time, 5.0);
        let names: Vec<&str> = chart.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let a = chart.group("A").unwrap();
        assert_eq!(a.subject_count, 2);
        assert_eq!(a.plot[0], (0.0, 1.0));
        assert_eq!(a.censors, vec![(2.0, 0.5)]);

        let b = chart.group("B").unwrap();
        assert_eq!(b.plot, vec![(0.0, 1.0), (5.0, 1.0), (5.0, 0.0)]);
    }

    #[test]
    fn missing_time_column_is_an_error() {
        let config = SurvivalViewConfig::new("Elapsed", "Death");
        let err = SurvivalCurveBuilder::new(&config)
            .build(&survival_table())
            .unwrap_err();
        assert_eq!(
            err,
            SurvivalChartError::MissingColumn(MissingColumnError {
                name: "Elapsed".to_owned()
            })
        );
    }

    #[test]
    fn missing_derived_count_column_is_an_error() {
        let config = SurvivalViewConfig::new("Time", "Relapse");
        let err = SurvivalCurveBuilder::new(&config)
            .build(&survival_table())
            .unwrap_err();
        assert_eq!(
            err,
            SurvivalChartError::MissingColumn(MissingColumnError {
                name: "#True(Relapse)".to_owned()
            })
        );
    }

    #[test]
    fn configured_group_column_must_exist() {
        let mut config = SurvivalViewConfig::new("Time", "Death");
        config.group_col = Some("Arm".to_owned());
        let err = SurvivalCurveBuilder::new(&config)
            .build(&survival_table())
            .unwrap_err();
        assert!(matches!(err, SurvivalChartError::MissingColumn(_)));
    }

    #[test]
    fn two_groups_yield_independent_curves() {
        let chart = build_curves([
            obs(1.0, 1, 0, Some("X")),
            obs(2.0, 1, 0, Some("Y")),
            obs(3.0, 1, 0, Some("X")),
            obs(4.0, 1, 0, Some("Y")),
        ])
        .unwrap();

        assert_eq!(chart.groups.len(), 2);
        assert_eq!(chart.max_time, 4.0);
        for group in &chart.groups {
            assert_eq!(group.subject_count, 2);
            let mut previous = 1.0;
            for &(_, p) in &group.plot {
                assert!(p <= previous);
                previous = p;
            }
        }
    }

    #[test]
    fn absent_group_aggregates_under_sentinel() {
        let chart = build_curves([
            obs(1.0, 1, 0, None),
            obs(2.0, 0, 1, None),
            obs(3.0, 1, 0, Some(DEFAULT_GROUP)),
        ])
        .unwrap();

        assert_eq!(chart.groups.len(), 1);
        let group = &chart.groups[0];
        assert_eq!(group.name, DEFAULT_GROUP);
        assert_eq!(group.subject_count, 3);
    }

    #[test]
    fn zero_total_group_is_rejected() {
        let err = build_curves([obs(1.0, 0, 0, Some("empty"))]).unwrap_err();
        assert_eq!(
            err,
            SurvivalChartError::InvalidGroupTotal {
                group: "empty".to_owned(),
                source: SurvivalCurveError::RiskSetExhausted { time: 1.0 },
            }
        );
    }

    #[test]
    fn build_is_idempotent() {
        let rows = [obs(1.0, 1, 0, None), obs(2.0, 0, 1, None)];
        let first = build_curves(rows.clone()).unwrap();
        let second = build_curves(rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn chart_data_serializes_as_point_pair_arrays() {
        let chart = build_curves([obs(1.0, 1, 1, None)]).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["maxTime"], 1.0);
        assert_eq!(
            json["groups"][0]["plot"],
            serde_json::json!([[0.0, 1.0], [1.0, 1.0], [1.0, 0.5]])
        );
        assert_eq!(json["groups"][0]["censors"], serde_json::json!([[1.0, 0.5]]));
    }

    #[test]
    fn config_round_trips_with_host_field_names() {
        let json = r#"{
            "timeCol": "Time",
            "eventCol": "Death",
            "groupCol": "Cohort",
            "showLegend": false
        }"#;
        let config: SurvivalViewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.time_col, "Time");
        assert_eq!(config.group_col.as_deref(), Some("Cohort"));
        assert!(!config.show_legend);
        assert_eq!(config.width, 800);
        assert!(config.fullscreen);
    }

    #[test]
    fn view_session_tracks_value_edits() {
        let config = SurvivalViewConfig::new("Time", "Death");
        let mut view = SurvivalView::new(config, SurvivalViewValue::default());
        view.build(&survival_table()).unwrap();
        view.set_title("Survival by cohort");
        view.set_subtitle("placebo vs treatment");

        assert!(view.chart().is_some());
        let value = view.into_component_value();
        assert_eq!(value.title, "Survival by cohort");
        assert_eq!(value.subtitle, "placebo vs treatment");
    }
}
