//! Chart-data builders for the statistics view widgets.
//!
//! Each widget in the page host receives a strongly-typed configuration and
//! value pair, reads its input from a [`statview_table::DataTable`], and
//! produces plot-ready chart data for the (out-of-scope) rendering layer:
//!
//! - [`survival`]: Kaplan-Meier survival step curves per group, with
//!   censoring marks and the global time axis maximum
//! - [`bland_altman`]: agreement plot points with bias and limits of
//!   agreement
//! - [`explorer`]: per-column descriptive summaries and histograms for the
//!   tabular data explorer
//!
//! Builders are pure: same table in, same chart data out, errors surfaced
//! synchronously. Each widget also gets a view-session type owning its
//! configuration, current value, and last-built chart data, replacing the
//! original widgets' module-global mutable state with explicit per-instance
//! lifetime.
//!
//! # Examples
//!
//! ```
//! use statview_table::{Cell, DataTable, Row, TableSpec};
//! use statview_view::survival::{SurvivalCurveBuilder, SurvivalViewConfig};
//!
//! let table = DataTable {
//!     spec: TableSpec::new(["Time", "#True(Death)", "#False(Death)"]),
//!     rows: vec![
//!         Row::new([Cell::Number(1.0), Cell::Number(1.0), Cell::Number(0.0)]),
//!         Row::new([Cell::Number(2.0), Cell::Number(0.0), Cell::Number(1.0)]),
//!     ],
//! };
//! let config = SurvivalViewConfig::new("Time", "Death");
//! let chart = SurvivalCurveBuilder::new(&config).build(&table)?;
//! assert_eq!(chart.max_time, 2.0);
//! assert_eq!(chart.groups.len(), 1);
//! # Ok::<(), statview_view::survival::SurvivalChartError>(())
//! ```

pub mod bland_altman;
pub mod explorer;
pub mod survival;
