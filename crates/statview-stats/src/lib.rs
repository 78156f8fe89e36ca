//! Statistical estimators backing the statview chart-data builders.
//!
//! This crate holds the pure computations shared by the view widgets:
//!
//! - **Survival analysis**: Kaplan-Meier step curves from aggregated
//!   time-to-event counts, with censoring marks and at-risk bookkeeping
//! - **Descriptive statistics**: min, max, mean, median, variance and
//!   standard deviation for numeric columns
//! - **Histogram generation**: equal-width frequency bins for the
//!   data-explorer's per-column distribution strips
//!
//! All computations are synchronous, allocation-bounded by input size, and
//! free of side effects. Callers own ordering: the survival estimator trusts
//! the caller to supply rows in ascending time order and does not sort.
//!
//! # Examples
//!
//! ## Building a survival curve
//!
//! ```
//! use statview_stats::survival::{CountRow, KaplanMeierCurve};
//!
//! let rows = [
//!     CountRow { time: 1.0, events: 1, censored: 0 },
//!     CountRow { time: 2.0, events: 0, censored: 1 },
//!     CountRow { time: 3.0, events: 1, censored: 0 },
//! ];
//! let curve = KaplanMeierCurve::from_counts(&rows)?;
//! assert_eq!(curve.plot[0], (0.0, 1.0));
//! # Ok::<(), statview_stats::survival::SurvivalCurveError>(())
//! ```
//!
//! ## Summarizing a column
//!
//! ```
//! use statview_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod survival;
