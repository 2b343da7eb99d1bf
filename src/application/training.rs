//! Dataset construction and evaluation for the offline training job.

use crate::application::ml::dense_net::DenseNet;
use ndarray::Array1;

/// Window length used for training examples and inference input.
pub const SEQUENCE_LENGTH: usize = 60;

/// Out-of-sample regression metrics.
#[derive(Debug, Clone, Copy)]
pub struct RegressionReport {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Fixed-length sliding windows over the scaled corpus; each label is the
/// next scaled value after its window. Windows stay chronological so a
/// train/test split on the result is a split in time.
pub fn build_dataset(scaled: &[f64], window: usize) -> (Vec<Array1<f64>>, Vec<f64>) {
    let mut inputs = Vec::new();
    let mut targets = Vec::new();

    for i in window..scaled.len() {
        inputs.push(Array1::from_iter(scaled[i - window..i].iter().copied()));
        targets.push(scaled[i]);
    }

    (inputs, targets)
}

pub fn evaluate(model: &DenseNet, inputs: &[Array1<f64>], targets: &[f64]) -> RegressionReport {
    if inputs.is_empty() {
        return RegressionReport {
            rmse: 0.0,
            mae: 0.0,
            r2: 0.0,
        };
    }

    let n = inputs.len() as f64;
    let mut sq_err = 0.0;
    let mut abs_err = 0.0;
    for (input, &target) in inputs.iter().zip(targets) {
        let predicted = model.forward(input);
        sq_err += (predicted - target).powi(2);
        abs_err += (predicted - target).abs();
    }

    let mean = targets.iter().sum::<f64>() / n;
    let variance = targets.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
    let mse = sq_err / n;

    RegressionReport {
        rmse: mse.sqrt(),
        mae: abs_err / n,
        r2: if variance > 0.0 { 1.0 - mse / variance } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_shapes() {
        let scaled: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let (inputs, targets) = build_dataset(&scaled, SEQUENCE_LENGTH);

        assert_eq!(inputs.len(), 100 - SEQUENCE_LENGTH);
        assert_eq!(targets.len(), inputs.len());
        assert_eq!(inputs[0].len(), SEQUENCE_LENGTH);
    }

    #[test]
    fn test_labels_are_the_next_value() {
        let scaled: Vec<f64> = (0..70).map(|i| i as f64).collect();
        let (inputs, targets) = build_dataset(&scaled, SEQUENCE_LENGTH);

        // First window covers 0..60, so its label is 60.
        assert_eq!(targets[0], 60.0);
        assert_eq!(inputs[0][0], 0.0);
        assert_eq!(inputs[0][SEQUENCE_LENGTH - 1], 59.0);

        // Last window's label is the final value.
        assert_eq!(*targets.last().unwrap(), 69.0);
    }

    #[test]
    fn test_corpus_at_window_length_yields_no_examples() {
        let scaled = vec![0.5; SEQUENCE_LENGTH];
        let (inputs, targets) = build_dataset(&scaled, SEQUENCE_LENGTH);
        assert!(inputs.is_empty());
        assert!(targets.is_empty());
    }

    #[test]
    fn test_evaluate_on_empty_test_set_is_zeroed() {
        let model = DenseNet::new(4, 2);
        let report = evaluate(&model, &[], &[]);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.mae, 0.0);
    }
}
