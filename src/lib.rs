pub mod activation;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use error::{Error, Result};
pub use layers::dense::Layer;
pub use layers::neuron::Neuron;
pub use network::config::NetworkConfig;
pub use network::network::Network;
pub use network::persist::SavedNetwork;
pub use optim::sgd::Sgd;
pub use train::page::{MemoryPageReader, Page, PageReader};
