use crate::layers::dense::Layer;

/// Plain per-sample gradient step, no momentum and no averaging.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// `w += lr * delta * input` for every weight of every neuron in `layer`.
    pub fn step(&self, layer: &mut Layer, input: &[f64]) {
        for neuron in &mut layer.neurons {
            let scale = self.learning_rate * neuron.delta;
            for (weight, x) in neuron.weights.iter_mut().zip(input.iter()) {
                *weight += scale * x;
            }
        }
    }
}
