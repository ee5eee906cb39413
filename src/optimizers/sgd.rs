//! Stochastic Gradient Descent (SGD) optimizer implementation
//!
//! Performs the basic gradient descent update:
//! `parameter = parameter - learning_rate * gradient`

use crate::layers::Parameter;
use crate::optimizers::Optimizer;

/// Stochastic Gradient Descent optimizer.
///
/// `w = w - η * ∇L/∂w`
///
/// # Example
///
/// ```
/// use neural_arithmetic::layers::Parameter;
/// use neural_arithmetic::optimizers::{Optimizer, Sgd};
/// use neural_arithmetic::tensor::Tensor;
///
/// let mut optimizer = Sgd::new(0.1);
/// let mut param = Parameter::new("w", Tensor::from_vec(1, 2, vec![1.0, 2.0]).unwrap());
/// param.accumulate(&Tensor::from_vec(1, 2, vec![0.1, 0.2]).unwrap()).unwrap();
///
/// optimizer.update(&mut param);
/// assert!((param.value().data()[0] - 0.99).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn update(&mut self, parameter: &mut Parameter) {
        let (values, grads) = parameter.split_mut();
        for (param, grad) in values.iter_mut().zip(grads.iter()) {
            *param -= self.learning_rate * grad;
        }
    }

    fn reset(&mut self) {
        // Vanilla SGD has no state to reset
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
