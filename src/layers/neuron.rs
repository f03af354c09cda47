use rand::Rng;

/// A single unit: one incoming weight per neuron of the previous layer, plus
/// the state left behind by the most recent forward and backward passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub weights: Vec<f64>,
    /// Activated output from the last forward pass.
    pub output: f64,
    /// Error gradient from the last backward pass.
    pub delta: f64,
}

impl Neuron {
    /// Draws every weight uniformly from [0, 1).
    pub fn new<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Neuron {
        let weights = (0..input_size).map(|_| rng.gen::<f64>()).collect();
        Neuron { weights, output: 0.0, delta: 0.0 }
    }

    pub fn from_parts(weights: Vec<f64>, output: f64, delta: f64) -> Neuron {
        Neuron { weights, output, delta }
    }

    /// Weighted sum of `input`, no bias.
    pub fn weighted_sum(&self, input: &[f64]) -> f64 {
        self.weights.iter().zip(input.iter()).map(|(w, x)| w * x).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weights_are_uniform_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let neuron = Neuron::new(256, &mut rng);
        assert_eq!(neuron.weights.len(), 256);
        assert!(neuron.weights.iter().all(|w| (0.0..1.0).contains(w)));
        assert_eq!(neuron.output, 0.0);
        assert_eq!(neuron.delta, 0.0);
    }

    #[test]
    fn same_seed_same_weights() {
        let a = Neuron::new(8, &mut StdRng::seed_from_u64(42));
        let b = Neuron::new(8, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn weighted_sum_is_plain_dot_product() {
        let neuron = Neuron::from_parts(vec![0.5, -2.0, 1.0], 0.0, 0.0);
        assert_eq!(neuron.weighted_sum(&[2.0, 1.0, 3.0]), 2.0);
    }
}
