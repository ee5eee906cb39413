//! Activation functions used by the NAC weight shaping and the NALU gate.

/// Sigmoid activation: 1 / (1 + exp(-x)).
///
/// Evaluated on the side that cannot overflow, so large negative inputs
/// return a tiny positive value instead of going through `exp(+inf)`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Sigmoid derivative assuming s = sigmoid(z).
///
/// Returns the derivative: s * (1 - s)
pub fn sigmoid_derivative(s: f64) -> f64 {
    s * (1.0 - s)
}

/// Tanh derivative assuming t = tanh(z).
pub fn tanh_derivative(t: f64) -> f64 {
    1.0 - t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_sigmoid_zero() {
        assert!((sigmoid(0.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for &x in &[0.1, 1.0, 3.5, 12.0] {
            assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_sigmoid_extreme_inputs_are_finite() {
        assert_eq!(sigmoid(1000.0), 1.0);
        let low = sigmoid(-1000.0);
        assert!(low >= 0.0 && low.is_finite());
    }

    #[test]
    fn test_sigmoid_derivative_at_half() {
        assert!((sigmoid_derivative(0.5) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_tanh_derivative_at_zero() {
        assert!((tanh_derivative(0.0f64.tanh()) - 1.0).abs() < EPSILON);
    }
}
