use anyhow::Result;

/// Bin edges for a speed histogram, from `start` up to but not including `end`
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedBins {
    edges: Vec<f64>,
}

impl SpeedBins {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        ensure!(
            start.is_finite() && end.is_finite() && step.is_finite() && step > 0.0,
            "Bad speed bins from {} to {} by {}",
            start,
            end,
            step
        );
        let mut edges = Vec::new();
        loop {
            let edge = start + edges.len() as f64 * step;
            if edge >= end {
                break;
            }
            edges.push(edge);
        }
        if edges.len() < 2 {
            bail!(
                "Speed bins from {} to {} by {} don't make a single bin",
                start,
                end,
                step
            );
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .map(|pair| format!("[{}, {})", pair[0], pair[1]))
            .collect()
    }

    /// Each bin includes its lower edge and excludes its upper edge, except the last bin, which
    /// includes both. Values outside all bins and undefined speeds are skipped.
    pub fn histogram<I: IntoIterator<Item = Option<f64>>>(&self, values: I) -> Vec<usize> {
        let mut counts = vec![0; self.num_bins()];
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        for value in values.into_iter().flatten() {
            if !(value >= first && value <= last) {
                continue;
            }
            let idx = self.edges.partition_point(|edge| *edge <= value) - 1;
            counts[idx.min(self.num_bins() - 1)] += 1;
        }
        counts
    }
}

/// What a boxplot of average speeds draws
#[derive(Clone, Debug, PartialEq)]
pub struct BoxplotStats {
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// The most extreme values within 1.5 IQR of the box
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// How many values fall outside the whiskers
    pub outliers: usize,
}

impl BoxplotStats {
    /// None if there's no defined value
    pub fn new<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<Self> {
        let mut sorted: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|x| x.is_finite())
            .collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_limit = q1 - 1.5 * iqr;
        let high_limit = q3 + 1.5 * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .cloned()
            .filter(|x| *x >= low_limit && *x <= high_limit)
            .collect();
        // The quartiles always lie inside the limits, so there's at least one value here
        let whisker_low = inside.first().cloned().unwrap_or(q1);
        let whisker_high = inside.last().cloned().unwrap_or(q3);

        Some(Self {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers: sorted.len() - inside.len(),
        })
    }
}

// Linear interpolation between the closest ranks. Input must be sorted and non-empty.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
