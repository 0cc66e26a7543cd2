/// Averages several trials' per-tick rows columnwise.
///
/// Each trial is a sequence of equally-shaped numeric rows (one per tick).
/// The result has one row per tick up to the shortest trial, where each cell
/// is the mean of that cell across all trials. Used by the head-to-head
/// evaluation mode to reduce independent trial runs to a single time series.
///
/// Returns an empty series when `trials` is empty or any trial is empty.
#[must_use]
pub fn average_columnwise(trials: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    let Some(rows) = trials.iter().map(Vec::len).min() else {
        return Vec::new();
    };
    #[expect(clippy::cast_precision_loss)]
    let trial_count = trials.len() as f64;

    (0..rows)
        .map(|row| {
            let width = trials
                .iter()
                .map(|trial| trial[row].len())
                .min()
                .unwrap_or(0);
            (0..width)
                .map(|column| {
                    trials.iter().map(|trial| trial[row][column]).sum::<f64>() / trial_count
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages_cells_across_trials() {
        let trials = vec![
            vec![vec![0.0, 2.0], vec![4.0, 6.0]],
            vec![vec![2.0, 4.0], vec![8.0, 10.0]],
        ];
        let averaged = average_columnwise(&trials);
        assert_eq!(averaged, vec![vec![1.0, 3.0], vec![6.0, 8.0]]);
    }

    #[test]
    fn test_truncates_to_shortest_trial() {
        let trials = vec![
            vec![vec![1.0], vec![2.0], vec![3.0]],
            vec![vec![3.0], vec![4.0]],
        ];
        let averaged = average_columnwise(&trials);
        assert_eq!(averaged, vec![vec![2.0], vec![3.0]]);
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(average_columnwise(&[]).is_empty());
    }
}
