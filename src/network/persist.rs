use std::io::Write;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::layers::neuron::Neuron;
use crate::network::config::NetworkConfig;
use crate::network::network::Network;

/// On-disk form of a network: the hyperparameters at the top level, then
/// every neuron's state layer by layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedNetwork {
    #[serde(flatten)]
    pub config: NetworkConfig,
    pub layers: Vec<SavedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLayer {
    pub neurons: Vec<SavedNeuron>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedNeuron {
    pub weights: Vec<f64>,
    pub output: f64,
    pub delta: f64,
}

impl From<&Network> for SavedNetwork {
    fn from(network: &Network) -> Self {
        let layers = network
            .layers()
            .iter()
            .map(|layer| SavedLayer {
                neurons: layer
                    .neurons
                    .iter()
                    .map(|n| SavedNeuron { weights: n.weights.clone(), output: n.output, delta: n.delta })
                    .collect(),
            })
            .collect();
        SavedNetwork { config: network.config().clone(), layers }
    }
}

impl TryFrom<SavedNetwork> for Network {
    type Error = Error;

    /// Rebuilds the layers straight from the saved neurons; no random
    /// initialisation happens.
    fn try_from(saved: SavedNetwork) -> Result<Network> {
        let layers = saved
            .layers
            .into_iter()
            .map(|layer| {
                Layer::from_neurons(
                    layer
                        .neurons
                        .into_iter()
                        .map(|n| Neuron::from_parts(n.weights, n.output, n.delta))
                        .collect(),
                )
            })
            .collect();
        Network::from_layers(saved.config, layers)
    }
}

impl Network {
    /// Serializes the network to a pretty-printed JSON file.
    ///
    /// JSON cannot hold NaN or infinity, so a network carrying one is refused
    /// before the file is touched.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.check_finite()?;
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &SavedNetwork::from(self))
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        writer.flush()?;
        Ok(())
    }

    fn check_finite(&self) -> Result<()> {
        if !self.learning_rate().is_finite() {
            return Err(Error::bad_param(format!(
                "learning_rate is {}, cannot be saved",
                self.learning_rate()
            )));
        }
        for (i, layer) in self.layers().iter().enumerate() {
            for (j, neuron) in layer.neurons.iter().enumerate() {
                let finite = neuron.output.is_finite()
                    && neuron.delta.is_finite()
                    && neuron.weights.iter().all(|w| w.is_finite());
                if !finite {
                    return Err(Error::bad_param(format!(
                        "neuron {j} of layer {i} holds a non-finite value, cannot be saved"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`. Malformed documents and topologies that disagree with the
    /// saved hyperparameters are rejected.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let saved: SavedNetwork = serde_json::from_reader(reader)
            .map_err(|e| Error::bad_param(format!("malformed network document: {e}")))?;
        Network::try_from(saved)
    }
}
