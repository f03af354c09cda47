use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;

/// Runs one online epoch over already-validated rows and returns the mean
/// loss. Rows must match the network's input/output widths.
pub(crate) fn run_epoch(network: &mut Network, inputs: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    let optimizer = Sgd::new(network.learning_rate());
    let mut total_loss = 0.0;

    for (input, target) in inputs.iter().zip(expected.iter()) {
        let output = network.feed(input);
        total_loss += MseLoss::loss(&output, target);

        backpropagate(network, target);

        // Update input side first; each layer sees the previous layer's cached output.
        for i in 0..network.layers.len() {
            let (before, rest) = network.layers.split_at_mut(i);
            let layer_input: &[f64] = match before.last() {
                Some(previous) => previous.output.as_slice(),
                None => input.as_slice(),
            };
            optimizer.step(&mut rest[0], layer_input);
        }
    }

    total_loss / inputs.len() as f64
}

/// Fills every neuron's `delta` from the last forward pass.
fn backpropagate(network: &mut Network, target: &[f64]) {
    let activator = network.activation();
    let Some(output_layer) = network.layers.last_mut() else {
        return;
    };

    for (neuron, expected) in output_layer.neurons.iter_mut().zip(target.iter()) {
        let error = MseLoss::error(neuron.output, *expected);
        neuron.delta = error * activator.derivative(neuron.output);
    }

    for i in (0..network.layers.len().saturating_sub(1)).rev() {
        let (head, tail) = network.layers.split_at_mut(i + 1);
        let next = &tail[0];
        for (j, neuron) in head[i].neurons.iter_mut().enumerate() {
            let error: f64 = next.neurons.iter().map(|k| k.delta * k.weights[j]).sum();
            neuron.delta = error * activator.derivative(neuron.output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;
    use crate::layers::neuron::Neuron;
    use crate::network::config::NetworkConfig;

    fn tiny(activation: ActivationFunction, learning_rate: f64) -> Network {
        let config = NetworkConfig::new(2, 1)
            .with_hidden_layers(1, 2)
            .with_activation(activation)
            .with_learning_rate(learning_rate);
        let layers = vec![
            Layer::from_neurons(vec![
                Neuron::from_parts(vec![0.5, 0.25], 0.0, 0.0),
                Neuron::from_parts(vec![0.1, 0.2], 0.0, 0.0),
            ]),
            Layer::from_neurons(vec![Neuron::from_parts(vec![1.0, 2.0], 0.0, 0.0)]),
        ];
        Network::from_layers(config, layers).unwrap()
    }

    #[test]
    fn relu_single_step_by_hand() {
        let mut network = tiny(ActivationFunction::ReLU, 0.1);
        let loss = run_epoch(&mut network, &[vec![1.0, 2.0]], &[vec![2.0]]);

        // hidden = [1.0, 0.5], output = 1.0 + 1.0 = 2.0 -> zero error
        assert_eq!(loss, 0.0);
        assert_eq!(network.layers[1].neurons[0].delta, 0.0);
        assert_eq!(network.layers[0].neurons[0].weights, vec![0.5, 0.25]);

        let loss = run_epoch(&mut network, &[vec![1.0, 2.0]], &[vec![3.0]]);
        assert_eq!(loss, 1.0);
        // output delta = (3 - 2) * 1; hidden deltas = [1 * 1.0, 1 * 2.0]
        let out = &network.layers[1].neurons[0];
        assert_eq!(out.delta, 1.0);
        assert!((out.weights[0] - 1.1).abs() < 1e-12);
        assert!((out.weights[1] - 2.05).abs() < 1e-12);
        let hidden = &network.layers[0].neurons;
        assert_eq!(hidden[0].delta, 1.0);
        assert_eq!(hidden[1].delta, 2.0);
        assert!((hidden[0].weights[0] - 0.6).abs() < 1e-12);
        assert!((hidden[0].weights[1] - 0.45).abs() < 1e-12);
        assert!((hidden[1].weights[0] - 0.3).abs() < 1e-12);
        assert!((hidden[1].weights[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn sigmoid_output_delta_uses_activated_value() {
        let mut network = tiny(ActivationFunction::Sigmoid, 0.0);
        run_epoch(&mut network, &[vec![0.0, 0.0]], &[vec![1.0]]);
        let out = &network.layers[1].neurons[0];
        // all hidden outputs are sigmoid(0) = 0.5, output = sigmoid(1.5)
        let y = 1.0 / (1.0 + (-1.5f64).exp());
        assert!((out.output - y).abs() < 1e-12);
        assert!((out.delta - (1.0 - y) * y * (1.0 - y)).abs() < 1e-12);
        let expected_hidden = out.delta * 2.0 * 0.25;
        assert!((network.layers[0].neurons[1].delta - expected_hidden).abs() < 1e-12);
    }

    #[test]
    fn later_samples_see_updated_weights() {
        let mut a = tiny(ActivationFunction::ReLU, 0.1);
        let mut b = a.clone();
        let sample = vec![1.0, 2.0];
        run_epoch(&mut a, &[sample.clone(), sample.clone()], &[vec![3.0], vec![3.0]]);
        run_epoch(&mut b, &[sample.clone()], &[vec![3.0]]);
        run_epoch(&mut b, &[sample], &[vec![3.0]]);
        assert_eq!(a, b);
    }
}
