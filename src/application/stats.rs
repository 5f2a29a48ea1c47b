//! Descriptive statistics over plain `f64` slices.
//!
//! Conventions follow what a dataframe user would expect:
//! - quantiles interpolate linearly between closest ranks
//! - standard deviation is the sample (n - 1) estimate
//! - histogram edges are equal-width over [min, max] with the last bin closed
//!
//! Functions that need at least one observation return `Option`.

/// Upper bound on the bins the `Auto` rule may choose.
pub const MAX_AUTO_BINS: usize = 256;

/// Sort a copy of the values ascending. NaN sorts last.
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())));
    out
}

/// Median of the values; mean of the two middle values for even counts.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(quantile_sorted(&sorted(values), 0.5))
}

/// Linearly interpolated quantile of already sorted data.
///
/// `q` is clamped to [0, 1]. Returns NaN for empty input.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation. NaN for a single observation.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(f64::NAN);
    }
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    /// Row labels in display order.
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in the same order as [`Self::LABELS`].
    #[must_use]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

#[must_use]
pub fn describe(values: &[f64]) -> Option<Describe> {
    let mean = mean(values)?;
    let std = sample_std(values)?;
    let sorted = sorted(values);
    Some(Describe {
        count: values.len(),
        mean,
        std,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Pearson correlation coefficient.
///
/// NaN when the lengths differ, fewer than two observations exist, or
/// either side has zero variance.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Pairwise Pearson matrix; symmetric with 1.0 on the diagonal for every
/// column that has variance.
#[must_use]
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i], &columns[j]);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Count occurrences, most frequent first; ties keep first-appearance order.
/// Missing entries (`None`) are not counted.
pub fn value_counts<'a, I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items.into_iter().flatten() {
        match counts.iter_mut().find(|(label, _)| label == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item.to_string(), 1)),
        }
    }
    // Stable sort preserves first appearance among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// How to choose histogram bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinRule {
    /// Fixed number of equal-width bins.
    Count(usize),
    /// Larger of the Sturges and Freedman-Diaconis bin counts, capped at
    /// [`MAX_AUTO_BINS`].
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Outline of the bars as a polyline: up, across, and down each bin.
    #[must_use]
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(self.counts.len() * 2 + 2);
        for (i, &count) in self.counts.iter().enumerate() {
            let (lo, hi) = (self.edges[i], self.edges[i + 1]);
            if i == 0 {
                points.push((lo, 0.0));
            }
            points.push((lo, count as f64));
            points.push((hi, count as f64));
        }
        if let Some(&last) = self.edges.last() {
            points.push((last, 0.0));
        }
        points
    }
}

fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }
    let sturges_width = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(sorted, 0.75) - quantile_sorted(sorted, 0.25);
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };
    ((range / width).ceil() as usize).clamp(1, MAX_AUTO_BINS)
}

/// Bin the values. `None` for empty input.
#[must_use]
pub fn histogram(values: &[f64], rule: BinRule) -> Option<Histogram> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let bins = match rule {
        BinRule::Count(n) => n.max(1),
        BinRule::Auto => auto_bin_count(&sorted),
    };

    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for &v in &sorted {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate evaluated on `points` evenly spaced
/// positions across the data range, using Scott's bandwidth.
///
/// Empty when there are fewer than two observations or no spread.
#[must_use]
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let Some(std) = sample_std(values) else {
        return Vec::new();
    };
    if points < 2 || !std.is_finite() || std <= 0.0 {
        return Vec::new();
    }
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Box-and-whisker summary with 1.5 IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within 1.5 IQR below Q1.
    pub lower_whisker: f64,
    /// Largest observation within 1.5 IQR above Q3.
    pub upper_whisker: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lowest and highest value drawn, outliers included.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.outliers.first().map_or(self.lower_whisker, |&o| o.min(self.lower_whisker));
        let hi = self.outliers.last().map_or(self.upper_whisker, |&o| o.max(self.upper_whisker));
        (lo, hi)
    }
}

#[must_use]
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside = sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let lower_whisker = inside.clone().next().unwrap_or(q1);
    let upper_whisker = inside.last().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxStats {
        count: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}
