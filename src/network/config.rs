use serde::{Serialize, Deserialize};
use std::io::Write;
use std::path::Path;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EPOCHS: usize = 100_000;
pub const DEFAULT_HIDDEN_LAYER_NEURONS: usize = 128;
pub const DEFAULT_HIDDEN_LAYERS: usize = 1;

/// Hyperparameters that fully determine a network's topology and training
/// schedule.
///
/// Field names match the keys of a saved network document, so a config can be
/// stored on its own before any training happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub total_input_neurons: usize,
    pub total_output_neurons: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub total_hidden_layer_neurons: usize,
    pub total_hidden_layers: usize,
    pub activation_function: ActivationFunction,
}

impl NetworkConfig {
    pub fn new(total_input_neurons: usize, total_output_neurons: usize) -> NetworkConfig {
        NetworkConfig {
            total_input_neurons,
            total_output_neurons,
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
            total_hidden_layer_neurons: DEFAULT_HIDDEN_LAYER_NEURONS,
            total_hidden_layers: DEFAULT_HIDDEN_LAYERS,
            activation_function: ActivationFunction::default(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_hidden_layers(mut self, layers: usize, neurons_per_layer: usize) -> Self {
        self.total_hidden_layers = layers;
        self.total_hidden_layer_neurons = neurons_per_layer;
        self
    }

    pub fn with_activation(mut self, activation: ActivationFunction) -> Self {
        self.activation_function = activation;
        self
    }

    /// Rejects topologies that cannot carry a signal from input to output.
    pub fn validate(&self) -> Result<()> {
        if self.total_input_neurons == 0 {
            return Err(Error::bad_param("total_input_neurons must be at least 1"));
        }
        if self.total_output_neurons == 0 {
            return Err(Error::bad_param("total_output_neurons must be at least 1"));
        }
        if self.total_hidden_layers > 0 && self.total_hidden_layer_neurons == 0 {
            return Err(Error::bad_param(
                "total_hidden_layer_neurons must be at least 1 when hidden layers are requested",
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(Error::bad_param(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Expected `(size, input_size)` of every layer, input side first.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut shapes = Vec::with_capacity(self.total_hidden_layers + 1);
        let mut input_size = self.total_input_neurons;
        for _ in 0..self.total_hidden_layers {
            shapes.push((self.total_hidden_layer_neurons, input_size));
            input_size = self.total_hidden_layer_neurons;
        }
        shapes.push((self.total_output_neurons, input_size));
        shapes
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)
            .map_err(|e| Error::bad_param(format!("malformed network config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_constants() {
        let config = NetworkConfig::new(3, 2);
        assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(config.epochs, DEFAULT_EPOCHS);
        assert_eq!(config.total_hidden_layer_neurons, DEFAULT_HIDDEN_LAYER_NEURONS);
        assert_eq!(config.total_hidden_layers, DEFAULT_HIDDEN_LAYERS);
        assert_eq!(config.activation_function, ActivationFunction::Sigmoid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn layer_shapes_chain_widths() {
        let config = NetworkConfig::new(2, 1).with_hidden_layers(2, 4);
        assert_eq!(config.layer_shapes(), vec![(4, 2), (4, 4), (1, 4)]);
    }

    #[test]
    fn no_hidden_layers_connects_input_to_output() {
        let config = NetworkConfig::new(5, 3).with_hidden_layers(0, 0);
        assert!(config.validate().is_ok());
        assert_eq!(config.layer_shapes(), vec![(3, 5)]);
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        let bad = [
            NetworkConfig::new(0, 1),
            NetworkConfig::new(1, 0),
            NetworkConfig::new(1, 1).with_hidden_layers(1, 0),
            NetworkConfig::new(1, 1).with_learning_rate(f64::NAN),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::BadNetworkParameter(_))));
        }
    }

    #[test]
    fn unknown_activation_in_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"total_input_neurons":2,"total_output_neurons":1,"learning_rate":0.1,
                "epochs":10,"total_hidden_layer_neurons":4,"total_hidden_layers":1,
                "activation_function":"tanh"}"#,
        )
        .unwrap();
        let result = NetworkConfig::load_json(&path);
        assert!(matches!(result, Err(Error::BadNetworkParameter(_))));
    }

    #[test]
    fn json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = NetworkConfig::new(2, 1)
            .with_epochs(500)
            .with_learning_rate(0.05)
            .with_activation(ActivationFunction::ReLU);
        config.save_json(&path).unwrap();
        assert_eq!(NetworkConfig::load_json(&path).unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_is_reported() {
        let result = NetworkConfig::new(2, 1).save_json("/dev/full");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
