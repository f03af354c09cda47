use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::layers::neuron::Neuron;

/// A fully connected layer. Every neuron has `input_size` weights.
///
/// `output` caches the vector produced by the last call to `feed_from`; the
/// backward pass and weight update read it, so a forward pass must finish
/// before backprop starts and must not be interleaved with another one.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
    pub output: Vec<f64>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let neurons = (0..size).map(|_| Neuron::new(input_size, rng)).collect();
        Layer { neurons, output: vec![0.0; size] }
    }

    /// Rebuilds a layer from stored neurons; the output cache is taken from
    /// each neuron's last output.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Layer {
        let output = neurons.iter().map(|n| n.output).collect();
        Layer { neurons, output }
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    /// Number of weights per neuron, `None` for an empty layer.
    pub fn input_size(&self) -> Option<usize> {
        self.neurons.first().map(|n| n.weights.len())
    }

    pub fn feed_from(&mut self, input: &[f64], activator: ActivationFunction) -> &[f64] {
        for (neuron, out) in self.neurons.iter_mut().zip(self.output.iter_mut()) {
            neuron.output = activator.function(neuron.weighted_sum(input));
            *out = neuron.output;
        }
        &self.output
    }
}
