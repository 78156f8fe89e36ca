//! Kaplan-Meier estimation over aggregated time-to-event counts.
//!
//! Input rows are already grouped per time point: each [`CountRow`] carries
//! the number of observed events and the number of censored subjects at that
//! time. The estimator walks the rows in the order given (callers sort by
//! time), maintains the at-risk pool, and emits a right-continuous step
//! function of survival probability together with censoring marks.
//!
//! The at-risk pool is seeded with the sum of `events + censored` over all
//! rows, i.e. every subject that eventually leaves observation is at risk at
//! time zero. Studies where some subjects never produce a row (still alive
//! and uncensored at the end) can pass the larger pool explicitly via
//! [`KaplanMeierCurve::with_initial_at_risk`].

/// Aggregated observations at a single time point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountRow {
    /// Observation time. Non-negative; rows must be supplied in ascending order.
    pub time: f64,
    /// Number of subjects that experienced the event at this time.
    pub events: u64,
    /// Number of subjects censored at this time.
    pub censored: u64,
}

/// The at-risk pool cannot support the requested ratio computation.
///
/// Raised when a survival ratio must be computed against an empty pool
/// (division by zero), or when the row counts would drive the pool negative.
/// No statistically valid curve exists for such input, so this is a hard
/// failure rather than something to clamp.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SurvivalCurveError {
    #[display("no subjects at risk at time {time}")]
    RiskSetExhausted { time: f64 },
    #[display(
        "risk set underflow at time {time}: {at_risk} at risk, {events} events, {censored} censored"
    )]
    RiskSetUnderflow {
        time: f64,
        at_risk: u64,
        events: u64,
        censored: u64,
    },
}

/// Kaplan-Meier survival curve for one group of subjects.
///
/// The curve is stored twice, for two consumers:
///
/// - `plot` / `censors` are plot-ready `(time, probability)` sequences.
///   `plot` begins at `(0, 1.0)` and encodes each step as a horizontal point
///   followed by a vertical drop at the same time, so a renderer can draw it
///   with a plain line generator.
/// - `times` / `survival_prob` / `at_risk` / `events` are parallel per-step
///   vectors (one entry per input row) used for lookups such as
///   [`median_survival`](Self::median_survival).
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Step-function plot points, starting at `(0, 1.0)`.
    pub plot: Vec<(f64, f64)>,
    /// `(time, probability)` marks for rows where censoring occurred.
    pub censors: Vec<(f64, f64)>,
    /// Time of each processed row.
    pub times: Vec<f64>,
    /// Cumulative survival probability after each row.
    pub survival_prob: Vec<f64>,
    /// At-risk count at each row, before that row's events are removed.
    pub at_risk: Vec<u64>,
    /// Event count of each row.
    pub events: Vec<u64>,
}

impl KaplanMeierCurve {
    /// Computes the curve, seeding the at-risk pool from the rows themselves.
    ///
    /// The initial pool is the sum of `events + censored` across all rows:
    /// every subject that leaves observation at some point was at risk at
    /// time zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use statview_stats::survival::{CountRow, KaplanMeierCurve};
    ///
    /// let rows = [
    ///     CountRow { time: 5.0, events: 2, censored: 0 },
    ///     CountRow { time: 8.0, events: 1, censored: 1 },
    /// ];
    /// let curve = KaplanMeierCurve::from_counts(&rows)?;
    /// assert_eq!(curve.survival_prob, vec![0.5, 0.25]);
    /// # Ok::<(), statview_stats::survival::SurvivalCurveError>(())
    /// ```
    pub fn from_counts(rows: &[CountRow]) -> Result<Self, SurvivalCurveError> {
        let total = rows.iter().map(|row| row.events + row.censored).sum();
        Self::with_initial_at_risk(rows, total)
    }

    /// Computes the curve with an explicitly supplied initial at-risk pool.
    ///
    /// Use this when the study population is larger than the subjects
    /// appearing in `rows` (subjects still under observation at study end
    /// contribute to the pool but produce no event or censor row).
    #[expect(clippy::cast_precision_loss)]
    pub fn with_initial_at_risk(
        rows: &[CountRow],
        initial_at_risk: u64,
    ) -> Result<Self, SurvivalCurveError> {
        let mut pool = initial_at_risk;
        let mut survival = 1.0;

        let mut plot = vec![(0.0, 1.0)];
        let mut censors = vec![];
        let mut times = vec![];
        let mut survival_prob = vec![];
        let mut at_risk = vec![];
        let mut events = vec![];

        for row in rows {
            if pool == 0 {
                return Err(SurvivalCurveError::RiskSetExhausted { time: row.time });
            }
            let Some(remaining) = pool.checked_sub(row.events) else {
                return Err(SurvivalCurveError::RiskSetUnderflow {
                    time: row.time,
                    at_risk: pool,
                    events: row.events,
                    censored: row.censored,
                });
            };

            let step_ratio = remaining as f64 / pool as f64;
            let previous = survival;
            // Running product over all step ratios seen so far for this group.
            survival *= step_ratio;

            // Horizontal segment at the previous level, then the vertical drop.
            plot.push((row.time, previous));
            plot.push((row.time, survival));

            times.push(row.time);
            survival_prob.push(survival);
            at_risk.push(pool);
            events.push(row.events);

            pool = remaining
                .checked_sub(row.censored)
                .ok_or(SurvivalCurveError::RiskSetUnderflow {
                    time: row.time,
                    at_risk: pool,
                    events: row.events,
                    censored: row.censored,
                })?;

            if row.censored > 0 {
                censors.push((row.time, survival));
            }
        }

        Ok(Self {
            plot,
            censors,
            times,
            survival_prob,
            at_risk,
            events,
        })
    }

    /// Returns the median survival time, if the curve reaches 50%.
    ///
    /// The median is the first time the survival probability drops to 0.5 or
    /// below, linearly interpolated between the surrounding step times.
    ///
    /// # Examples
    ///
    /// ```
    /// use statview_stats::survival::{CountRow, KaplanMeierCurve};
    ///
    /// let rows = [
    ///     CountRow { time: 10.0, events: 1, censored: 0 },
    ///     CountRow { time: 20.0, events: 1, censored: 0 },
    /// ];
    /// let curve = KaplanMeierCurve::from_counts(&rows)?;
    /// assert_eq!(curve.median_survival(), Some(10.0));
    /// # Ok::<(), statview_stats::survival::SurvivalCurveError>(())
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        for i in 0..self.survival_prob.len() {
            if self.survival_prob[i] <= 0.5 {
                if i == 0 {
                    return Some(self.times[0]);
                }
                let t0 = self.times[i - 1];
                let t1 = self.times[i];
                let s0 = self.survival_prob[i - 1];
                let s1 = self.survival_prob[i];
                return Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0));
            }
        }
        None
    }

    /// Returns the survival probability at `time`.
    ///
    /// Step-function lookup: the probability is constant between event times
    /// and `1.0` before the first one.
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        for i in (0..self.times.len()).rev() {
            if self.times[i] <= time {
                return self.survival_prob[i];
            }
        }
        1.0
    }
}
