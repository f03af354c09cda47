use std::path::Path;

use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::network::config::NetworkConfig;
use crate::train::{epoch, paged};
use crate::train::page::PageReader;

/// A bias-free, fully connected feed-forward network.
///
/// Layers run input side first: `total_hidden_layers` hidden layers of
/// `total_hidden_layer_neurons` each, then one output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    config: NetworkConfig,
    pub(crate) layers: Vec<Layer>,
}

impl Network {
    /// Builds a network with weights drawn from the thread-local RNG.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    /// Builds a network with weights drawn from `rng`, for reproducible runs.
    pub fn with_rng<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        let layers = config
            .layer_shapes()
            .into_iter()
            .map(|(size, input_size)| Layer::new(size, input_size, rng))
            .collect();
        Ok(Network { config, layers })
    }

    /// Assembles a network from already-built layers, checking every layer
    /// against the shapes `config` implies.
    pub fn from_layers(config: NetworkConfig, layers: Vec<Layer>) -> Result<Network> {
        config.validate()?;
        let shapes = config.layer_shapes();
        if layers.len() != shapes.len() {
            return Err(Error::bad_param(format!(
                "expected {} layers, found {}",
                shapes.len(),
                layers.len()
            )));
        }
        for (i, (layer, (size, input_size))) in layers.iter().zip(shapes).enumerate() {
            if layer.size() != size {
                return Err(Error::bad_param(format!(
                    "layer {i} should have {size} neurons, found {}",
                    layer.size()
                )));
            }
            if let Some(j) = layer.neurons.iter().position(|n| n.weights.len() != input_size) {
                return Err(Error::bad_param(format!(
                    "neuron {j} of layer {i} should have {input_size} weights, found {}",
                    layer.neurons[j].weights.len()
                )));
            }
        }
        Ok(Network { config, layers })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn total_input_neurons(&self) -> usize {
        self.config.total_input_neurons
    }

    pub fn total_output_neurons(&self) -> usize {
        self.config.total_output_neurons
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub fn epochs(&self) -> usize {
        self.config.epochs
    }

    pub fn activation(&self) -> ActivationFunction {
        self.config.activation_function
    }

    /// Forward pass; overwrites every neuron's `output` and every layer's
    /// output cache, which the backward pass reads afterwards.
    pub fn forward_pass(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.config.total_input_neurons {
            return Err(Error::bad_param(format!(
                "input has {} values, network expects {}",
                input.len(),
                self.config.total_input_neurons
            )));
        }
        Ok(self.feed(input))
    }

    /// Unchecked forward pass used by the training loop.
    pub(crate) fn feed(&mut self, input: &[f64]) -> Vec<f64> {
        let activator = self.config.activation_function;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current, activator).to_vec();
        }
        current
    }

    /// One online pass over `inputs`: every sample is forwarded, backpropagated
    /// and applied before the next sample is seen.
    ///
    /// Returns the mean squared error of the pre-update outputs.
    pub fn train_epoch(&mut self, inputs: &[Vec<f64>], expected: &[Vec<f64>]) -> Result<f64> {
        self.check_rows(inputs, expected, None)?;
        Ok(epoch::run_epoch(self, inputs, expected))
    }

    /// Trains on data held fully in memory for `epochs` epochs.
    ///
    /// Returns the loss of the last epoch.
    pub fn train(&mut self, inputs: &[Vec<f64>], expected: &[Vec<f64>]) -> Result<f64> {
        self.check_rows(inputs, expected, None)?;
        let mut loss = 0.0;
        for _ in 0..self.config.epochs {
            loss = epoch::run_epoch(self, inputs, expected);
        }
        Ok(loss)
    }

    /// Paged training with scratch files in the system temp directory.
    ///
    /// See [`Network::train_batch_in`].
    pub fn train_batch<R: PageReader + ?Sized>(
        &mut self,
        total_records: usize,
        reader: &mut R,
        page_size: usize,
    ) -> Result<f64> {
        self.train_batch_in(std::env::temp_dir(), total_records, reader, page_size)
    }

    /// Pulls `ceil(total_records / page_size)` pages from `reader` once,
    /// stages them in scratch files under `scratch_dir`, then replays those
    /// files for `epochs` epochs. The scratch files are removed on every exit
    /// path.
    ///
    /// Returns the loss of the last epoch.
    pub fn train_batch_in<P: AsRef<Path>, R: PageReader + ?Sized>(
        &mut self,
        scratch_dir: P,
        total_records: usize,
        reader: &mut R,
        page_size: usize,
    ) -> Result<f64> {
        paged::train_paged(self, scratch_dir.as_ref(), total_records, reader, page_size)
    }

    /// Shape checks shared by in-memory training and page ingest.
    pub(crate) fn check_rows(
        &self,
        inputs: &[Vec<f64>],
        expected: &[Vec<f64>],
        page_size: Option<usize>,
    ) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::bad_param("input data is empty"));
        }
        if let Some(limit) = page_size {
            if inputs.len() > limit {
                return Err(Error::bad_param(format!(
                    "page holds {} records, more than the page size {limit}",
                    inputs.len()
                )));
            }
        }
        let input_width = self.config.total_input_neurons;
        if let Some(i) = inputs.iter().position(|row| row.len() != input_width) {
            return Err(Error::bad_param(format!(
                "input row {i} has {} values, network expects {input_width}",
                inputs[i].len()
            )));
        }
        if expected.is_empty() {
            return Err(Error::bad_param("expected output data is empty"));
        }
        if expected.len() != inputs.len() {
            return Err(Error::bad_param(format!(
                "{} expected output rows for {} input rows",
                expected.len(),
                inputs.len()
            )));
        }
        let output_width = self.config.total_output_neurons;
        if let Some(i) = expected.iter().position(|row| row.len() != output_width) {
            return Err(Error::bad_param(format!(
                "expected output row {i} has {} values, network expects {output_width}",
                expected[i].len()
            )));
        }
        Ok(())
    }
}
