use super::predictor::SequenceModel;
use crate::domain::errors::ForecastError;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Activation applied by a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Tanh,
    Linear,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Tanh => 1.0 - x.tanh().powi(2),
            Activation::Linear => 1.0,
        }
    }
}

/// A fully connected layer; weights are stored as (outputs, inputs).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Xavier-initialized layer.
    fn new(inputs: usize, outputs: usize, activation: Activation) -> Self {
        let std_dev = (2.0 / (inputs + outputs) as f64).sqrt();
        let normal = Normal::new(0.0, std_dev).expect("std dev is finite and positive");
        let mut rng = rand::rng();

        Self {
            weights: Array2::from_shape_fn((outputs, inputs), |_| normal.sample(&mut rng)),
            biases: Array1::zeros(outputs),
            activation,
        }
    }

    fn preactivation(&self, input: &Array1<f64>) -> Array1<f64> {
        self.weights.dot(input) + &self.biases
    }
}

/// A small feedforward regressor over a fixed window of normalized prices.
///
/// This is the artifact `train_model` produces and the server loads once at
/// startup. Inference never mutates the network, so one loaded instance is
/// shared read-only across all requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNet {
    layers: Vec<DenseLayer>,
    window: usize,
}

impl DenseNet {
    /// window -> hidden (tanh) -> hidden (tanh) -> scalar (linear).
    pub fn new(window: usize, hidden: usize) -> Self {
        let layers = vec![
            DenseLayer::new(window, hidden, Activation::Tanh),
            DenseLayer::new(hidden, hidden, Activation::Tanh),
            DenseLayer::new(hidden, 1, Activation::Linear),
        ];

        Self { layers, window }
    }

    /// Forward pass producing the scalar regression output.
    pub fn forward(&self, input: &Array1<f64>) -> f64 {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer
                .preactivation(&current)
                .mapv(|z| layer.activation.apply(z));
        }
        current[0]
    }

    /// Forward pass keeping per-layer preactivations and activations for
    /// backpropagation. `activations[0]` is the input itself.
    fn forward_trace(&self, input: &Array1<f64>) -> (Vec<Array1<f64>>, Vec<Array1<f64>>) {
        let mut preactivations = Vec::with_capacity(self.layers.len());
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.clone());

        for layer in &self.layers {
            let z = layer.preactivation(&activations[activations.len() - 1]);
            activations.push(z.mapv(|v| layer.activation.apply(v)));
            preactivations.push(z);
        }

        (preactivations, activations)
    }

    /// One epoch of mini-batch gradient descent on squared error, visiting
    /// the samples in a fresh shuffled order. Returns the epoch's mean
    /// squared error.
    pub fn train_epoch(
        &mut self,
        inputs: &[Array1<f64>],
        targets: &[f64],
        batch_size: usize,
        learning_rate: f64,
    ) -> f64 {
        let mut indices: Vec<usize> = (0..inputs.len()).collect();
        indices.shuffle(&mut rand::rng());

        let mut epoch_sq_err = 0.0;
        for batch in indices.chunks(batch_size.max(1)) {
            let mut grads_w: Vec<Array2<f64>> = self
                .layers
                .iter()
                .map(|l| Array2::zeros(l.weights.raw_dim()))
                .collect();
            let mut grads_b: Vec<Array1<f64>> = self
                .layers
                .iter()
                .map(|l| Array1::zeros(l.biases.raw_dim()))
                .collect();

            for &i in batch {
                let (preactivations, activations) = self.forward_trace(&inputs[i]);
                let prediction = activations[activations.len() - 1][0];
                let err = prediction - targets[i];
                epoch_sq_err += err * err;

                // Output delta for half-squared-error, then chain rule back
                // through the stack.
                let last = self.layers.len() - 1;
                let mut delta = Array1::from_elem(1, err)
                    * preactivations[last].mapv(|z| self.layers[last].activation.derivative(z));

                for l in (0..self.layers.len()).rev() {
                    let outer = delta
                        .view()
                        .insert_axis(Axis(1))
                        .dot(&activations[l].view().insert_axis(Axis(0)));
                    grads_w[l] += &outer;
                    grads_b[l] += &delta;

                    if l > 0 {
                        delta = self.layers[l].weights.t().dot(&delta)
                            * preactivations[l - 1]
                                .mapv(|z| self.layers[l - 1].activation.derivative(z));
                    }
                }
            }

            let scale = learning_rate / batch.len() as f64;
            for (l, layer) in self.layers.iter_mut().enumerate() {
                layer.weights.scaled_add(-scale, &grads_w[l]);
                layer.biases.scaled_add(-scale, &grads_b[l]);
            }
        }

        epoch_sq_err / inputs.len().max(1) as f64
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating artifact directory {:?}", parent))?;
        }

        let file = File::create(path)
            .with_context(|| format!("creating model artifact {:?}", path))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("serializing model artifact {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening model artifact {:?}", path))?;
        let model: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("deserializing model artifact {:?}", path))?;

        info!("Loaded model artifact from {:?} (window {})", path, model.window);
        Ok(model)
    }
}

impl SequenceModel for DenseNet {
    fn predict_next(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.window {
            return Err(ForecastError::Inference {
                reason: format!(
                    "window length {} does not match model input {}",
                    window.len(),
                    self.window
                ),
            });
        }

        Ok(self.forward(&Array1::from_vec(window.to_vec())))
    }

    fn window_size(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "Dense feedforward regressor"
    }

    fn version(&self) -> &str {
        "v1"
    }
}
