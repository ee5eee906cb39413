//! Layer trait definition for the arithmetic layers.
//!
//! A layer holds its trainable parameters and exposes a pure forward transform
//! plus an analytic backward pass. Parameter updates happen only through
//! `update_parameters`, driven by an external optimizer.

use crate::error::Result;
use crate::optimizers::Optimizer;
use crate::tensor::Tensor;

/// Core trait for trainable layers.
///
/// # Example
///
/// ```ignore
/// let output = layer.forward(&input)?;
/// let grad_input = layer.backward(&input, &grad_output)?;
/// layer.update_parameters(&mut optimizer);
/// layer.zero_grad();
/// ```
pub trait Layer {
    /// Forward propagation through the layer.
    ///
    /// The trailing dimension of `input` must equal `input_size()`; every
    /// leading dimension is an independent row. The result keeps the leading
    /// dimensions and has a trailing dimension of `output_size()`.
    ///
    /// # Arguments
    ///
    /// * `input` - Input tensor whose last dimension holds the features
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the trailing dimension is wrong.
    fn forward(&self, input: &Tensor) -> Result<Tensor>;

    /// Backward propagation through the layer.
    ///
    /// Recomputes whatever the forward pass derived from `input`, adds the
    /// parameter gradients into each parameter's accumulator, and returns the
    /// gradient with respect to `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The input used for the corresponding forward pass
    /// * `grad_output` - Gradient of the loss with respect to the layer output
    ///
    /// # Notes
    ///
    /// - Gradients add up across calls until `zero_grad`
    /// - Parameter gradients are summed over rows, not averaged
    fn backward(&mut self, input: &Tensor, grad_output: &Tensor) -> Result<Tensor>;

    /// Update layer parameters using accumulated gradients.
    ///
    /// Hands every trainable parameter to `optimizer`, which reads its
    /// gradient and writes the new value in place.
    ///
    /// # Arguments
    ///
    /// * `optimizer` - Update rule applied to each parameter
    ///
    /// # Notes
    ///
    /// - Call after one or more backward passes
    /// - Gradients are left untouched; call `zero_grad` before the next batch
    fn update_parameters(&mut self, optimizer: &mut dyn Optimizer);

    /// Clears accumulated gradients.
    fn zero_grad(&mut self);

    /// Prefixes every parameter name with `prefix`.
    ///
    /// Stateful optimizers key their state by parameter name, so layers that
    /// share one optimizer need distinct prefixes. [`Model::new`] assigns
    /// `layer{i}` to each layer.
    ///
    /// [`Model::new`]: crate::model::Model::new
    fn set_name_prefix(&mut self, prefix: &str);

    /// Expected number of input features per row.
    fn input_size(&self) -> usize;

    /// Number of output features per row.
    fn output_size(&self) -> usize;

    /// Total count of trainable scalars.
    fn parameter_count(&self) -> usize;

    /// Short layer kind, e.g. `"nac"`.
    fn name(&self) -> &'static str;
}
