//! Optimizer abstractions for parameter updates
//!
//! Optimizers are the only writers of layer parameters during training. A layer
//! hands each of its [`Parameter`]s to the optimizer in
//! [`Layer::update_parameters`](crate::layers::Layer::update_parameters); the
//! optimizer reads the accumulated gradient and updates the value in place.
//!
//! # Available Optimizers
//!
//! - SGD: Vanilla stochastic gradient descent
//! - Adam: Adaptive moment estimation with bias correction
//!
//! # Example
//!
//! ```ignore
//! use neural_arithmetic::optimizers::{Adam, Optimizer};
//!
//! let mut optimizer = Adam::new(0.01, 0.9, 0.999, 1e-8);
//! layer.update_parameters(&mut optimizer);
//! layer.zero_grad();
//! ```

pub mod adam;
pub mod sgd;

pub use adam::Adam;
pub use sgd::Sgd;

use crate::layers::Parameter;

/// Core trait for optimizers.
///
/// Stateful optimizers (Adam) keep their moment estimates keyed by parameter
/// name, so every parameter updated through one optimizer needs a distinct
/// name.
pub trait Optimizer {
    /// Apply one update step to `parameter` using its accumulated gradient.
    ///
    /// # Arguments
    ///
    /// * `parameter` - Named value and gradient; the value is updated in place
    ///
    /// # Notes
    ///
    /// - The gradient is read, never cleared
    /// - Stateful optimizers look up their state under `parameter.name()`
    fn update(&mut self, parameter: &mut Parameter);

    /// Clear any accumulated optimizer state.
    ///
    /// For stateless optimizers like vanilla SGD, this is a no-op.
    fn reset(&mut self);

    /// Base learning rate.
    fn learning_rate(&self) -> f64;

    /// Set the base learning rate.
    fn set_learning_rate(&mut self, lr: f64);
}
