pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Signed error of one output, `expected - predicted`. Backprop scales it
    /// by the activation derivative and adds the step, so the sign is the
    /// opposite of the usual gradient.
    pub fn error(predicted: f64, expected: f64) -> f64 {
        expected - predicted
    }
}
