/// Summary of a generation's fitness distribution.
///
/// Tracks the mean and both extremes, plus the indices of every individual
/// that achieved the maximum (ties are possible with integer-valued
/// fitness).
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessSummary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Indices of the individual(s) whose fitness equals `max`.
    pub best: Vec<usize>,
}

impl FitnessSummary {
    /// Computes a summary over the fitness values of one generation, indexed
    /// by individual.
    ///
    /// Returns `None` for an empty generation.
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let mut max = first;
        let mut min = first;
        let mut sum = 0.0;
        for &value in values {
            max = max.max(value);
            min = min.min(value);
            sum += value;
        }
        let best = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == max)
            .map(|(i, _)| i)
            .collect();
        #[expect(clippy::cast_precision_loss)]
        let mean = sum / values.len() as f64;
        Some(Self {
            mean,
            max,
            min,
            best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_distinct_values() {
        let summary = FitnessSummary::new(&[3.0, 9.0, 6.0]).unwrap();
        assert_eq!(summary.mean, 6.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.best, vec![1]);
    }

    #[test]
    fn test_summary_reports_all_tied_maxima() {
        let summary = FitnessSummary::new(&[5.0, 2.0, 5.0]).unwrap();
        assert_eq!(summary.best, vec![0, 2]);
    }

    #[test]
    fn test_summary_of_empty_generation_is_none() {
        assert!(FitnessSummary::new(&[]).is_none());
    }
}
