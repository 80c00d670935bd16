use serde::{Deserialize, Serialize};

/// Conventional median of an ascending slice: the middle value, or the mean
/// of the two middle values for an even length.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Value at index `floor(n * q)` of an ascending slice.
pub fn index_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(Self {
            q1: index_quantile(sorted, 0.25)?,
            median: median(sorted)?,
            q3: index_quantile(sorted, 0.75)?,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Closed interval `median ± k·IQR`.
    pub fn fence(&self, k: f64) -> (f64, f64) {
        let spread = k * self.iqr();
        (self.median - spread, self.median + spread)
    }
}

/// Box-plot figures for a distribution.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    pub const MIN_SAMPLES: usize = 5;

    /// `None` below [`Self::MIN_SAMPLES`] values, where a box plot says little.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        if sorted.len() < Self::MIN_SAMPLES {
            return None;
        }
        let q = Quartiles::from_sorted(sorted)?;
        Some(Self {
            min: *sorted.first()?,
            q1: q.q1,
            median: q.median,
            q3: q.q3,
            max: *sorted.last()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[1.0, 2.0, 9.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 4.0, 9.0]), Some(3.0));
    }

    #[test]
    fn quartiles_use_floor_index() {
        let v: Vec<f64> = (0..14).map(|i| 200.0 + 10.0 * i as f64).collect();
        let q = Quartiles::from_sorted(&v).unwrap();
        assert_eq!(q.q1, 230.0);
        assert_eq!(q.median, 265.0);
        assert_eq!(q.q3, 300.0);
        assert_eq!(q.iqr(), 70.0);
        assert_eq!(q.fence(3.0), (55.0, 475.0));
    }

    #[test]
    fn single_value_quartiles() {
        let q = Quartiles::from_sorted(&[412.0]).unwrap();
        assert_eq!((q.q1, q.median, q.q3), (412.0, 412.0, 412.0));
    }

    #[test]
    fn five_numbers_need_five_samples() {
        assert!(FiveNumberSummary::from_sorted(&[1.0, 2.0, 3.0, 4.0]).is_none());
        let s = FiveNumberSummary::from_sorted(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (1.0, 2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn sorts_numerically() {
        let mut v = vec![300.5, 20.0, 1000.0, 99.9];
        sort_ascending(&mut v);
        assert_eq!(v, vec![20.0, 99.9, 300.5, 1000.0]);
    }
}
