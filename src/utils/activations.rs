//! Sigmoid threshold function and its derivative.

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative evaluated at a pre-activation sum `x` (a theta).
///
/// Returns sigmoid(x) * (1 - sigmoid(x))
pub fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}
