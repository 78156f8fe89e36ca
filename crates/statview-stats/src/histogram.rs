use std::ops::Range;

/// An equal-width histogram of a numeric column.
///
/// The data-explorer widget renders one of these per numeric column: the
/// value range `[min, max]` is split into a fixed number of bins of equal
/// width, and each value is counted into the bin covering it. The maximum
/// value is counted into the last bin, so every value lands somewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending value order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive
    /// end, except the last bin which includes its end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Builds an equal-width histogram over the full value range.
    ///
    /// Returns an empty histogram when there are no values or `num_bins` is
    /// zero. A dataset concentrated at a single value yields one bin holding
    /// everything.
    ///
    /// # Examples
    ///
    /// ```
    /// # use statview_stats::histogram::Histogram;
    /// let values = [1.0, 2.0, 2.5, 3.0, 9.0, 10.0];
    /// let histogram = Histogram::equal_width(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
    /// assert_eq!(total, 6);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn equal_width<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() || num_bins == 0 {
            return Self { bins: vec![] };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max - min < f64::EPSILON {
            // Degenerate range: everything in one bin.
            return Self {
                bins: vec![HistogramBin {
                    range: min..max,
                    count: values.len() as u64,
                }],
            };
        }

        let width = (max - min) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|i| HistogramBin {
                // Recompute boundaries per bin instead of accumulating width,
                // keeping the last bin's end exactly at max.
                range: (min + i as f64 * width)..(min + (i + 1) as f64 * width),
                count: 0,
            })
            .collect::<Vec<_>>();

        for &value in &values {
            let position = (value - min) / width;
            let idx = (position.floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Returns the largest bin count, used by renderers to scale bar heights.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
