// ---------------------------------------------------------------------------
// Histogram binning and box-plot summaries
// ---------------------------------------------------------------------------

/// Sturges' rule: `ceil(log2 n) + 1` bins, 0 when there is nothing to bin.
pub fn auto_bin_count(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Resolve a user-entered bin count, where 0 means "pick for me".
pub fn resolve_bin_count(requested: u32, n: usize) -> usize {
    if requested == 0 {
        auto_bin_count(n)
    } else {
        requested as usize
    }
}

/// Equal-width bins shared by several series so their bars line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    pub min: f64,
    /// Largest value seen when the span was built. Kept separately from
    /// `min + width * count`, which can round below it.
    pub max: f64,
    pub width: f64,
    pub count: usize,
}

impl BinEdges {
    /// Bins spanning the finite values of all `series`. `None` if there are
    /// no finite values or `bins` is 0.
    pub fn spanning<'a>(
        series: impl IntoIterator<Item = &'a [f64]>,
        bins: usize,
    ) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let (min, max) = series
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return None;
        }
        let range = max - min;
        let width = if range > 0.0 { range / bins as f64 } else { 1.0 };
        Some(Self {
            min,
            max,
            width,
            count: bins,
        })
    }

    /// Per-bin counts. The last bin is closed on the right; values outside
    /// the span and non-finite values are ignored.
    pub fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.count];
        for &v in values {
            if !v.is_finite() || v < self.min || v > self.max {
                continue;
            }
            let idx = (((v - self.min) / self.width).floor() as usize).min(self.count - 1);
            counts[idx] += 1;
        }
        counts
    }

    pub fn center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.width
    }
}

/// Quartiles and Tukey whiskers of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);

        // Whiskers reach the most extreme observations inside the fences.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// Linear-interpolated quantile of already sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sturges_bin_counts() {
        assert_eq!(auto_bin_count(0), 0);
        assert_eq!(auto_bin_count(1), 1);
        assert_eq!(auto_bin_count(8), 4);
        assert_eq!(auto_bin_count(342), 10);
    }

    #[test]
    fn zero_request_means_automatic() {
        assert_eq!(resolve_bin_count(0, 8), 4);
        assert_eq!(resolve_bin_count(15, 8), 15);
    }

    #[test]
    fn shared_bins_cover_every_series() {
        let a = [3000.0, 3500.0];
        let b = [5000.0, 6000.0];
        let edges = BinEdges::spanning([&a[..], &b[..]], 6).unwrap();
        assert_eq!(edges.min, 3000.0);
        assert_eq!(edges.width, 500.0);
        assert_eq!(edges.counts(&a), vec![1, 1, 0, 0, 0, 0]);
        assert_eq!(edges.counts(&b), vec![0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let values = [0.0, 10.0];
        let edges = BinEdges::spanning([&values[..]], 2).unwrap();
        assert_eq!(edges.counts(&values), vec![1, 1]);
        assert_eq!(edges.center(0), 2.5);
    }

    #[test]
    fn float_span_keeps_the_largest_value() {
        // total_bill range of the tips table; min + width * 11 rounds below 50.81
        let values = [3.07, 20.0, 50.81];
        let edges = BinEdges::spanning([&values[..]], 11).unwrap();
        let counts = edges.counts(&values);
        assert_eq!(counts.iter().sum::<usize>(), 3);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[10], 1);
    }

    #[test]
    fn values_outside_the_span_are_ignored() {
        let edges = BinEdges::spanning([&[10.0, 20.0][..]], 2).unwrap();
        assert_eq!(edges.counts(&[5.0, 10.0, 20.0, 25.0]), vec![1, 1]);
    }

    #[test]
    fn degenerate_and_empty_inputs() {
        assert!(BinEdges::spanning(std::iter::empty::<&[f64]>(), 5).is_none());
        assert!(BinEdges::spanning([&[1.0][..]], 0).is_none());
        assert!(BinEdges::spanning([&[f64::NAN][..]], 3).is_none());

        let same = [4.0, 4.0, 4.0];
        let edges = BinEdges::spanning([&same[..]], 3).unwrap();
        assert_eq!(edges.width, 1.0);
        assert_eq!(edges.counts(&same), vec![3, 0, 0]);
    }

    #[test]
    fn box_summary_quartiles_and_whiskers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = BoxSummary::from_values(&values).unwrap();
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        // 100 is an outlier beyond q3 + 1.5 * IQR
        assert_eq!(summary.upper_whisker, 5.0);
    }

    #[test]
    fn box_summary_of_nothing() {
        assert!(BoxSummary::from_values(&[]).is_none());
        let one = BoxSummary::from_values(&[7.0]).unwrap();
        assert_eq!(one.median, 7.0);
        assert_eq!(one.upper_whisker, 7.0);
    }
}
