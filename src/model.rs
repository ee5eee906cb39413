//! Sequential stack of arithmetic layers.

use log::debug;

use crate::error::{NaluError, Result};
use crate::layers::Layer;
use crate::optimizers::Optimizer;
use crate::tensor::Tensor;

/// Layers applied in order, each feeding the next.
pub struct Model {
    layers: Vec<Box<dyn Layer>>,
}

impl Model {
    /// Wraps `layers`, checking that each layer's output size matches the next
    /// layer's input size.
    ///
    /// Every layer's parameters are renamed under `layer{i}`, so one stateful
    /// optimizer keeps separate state per layer.
    pub fn new(mut layers: Vec<Box<dyn Layer>>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NaluError::config("model must contain at least one layer"));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(NaluError::config(format!(
                    "layer {} output size {} does not match layer {} input size {}",
                    i,
                    pair[0].output_size(),
                    i + 1,
                    pair[1].input_size()
                )));
            }
        }
        for (i, layer) in layers.iter_mut().enumerate() {
            layer.set_name_prefix(&format!("layer{i}"));
        }
        let model = Self { layers };
        debug!(
            "built model [{}] with {} parameters",
            model.describe(),
            model.parameter_count()
        );
        Ok(model)
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|l| l.parameter_count()).sum()
    }

    /// Layer kinds and sizes, e.g. `nalu(2->2), nalu(2->1)`.
    pub fn describe(&self) -> String {
        self.layers
            .iter()
            .map(|l| format!("{}({}->{})", l.name(), l.input_size(), l.output_size()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let mut activation = input.clone();
        for layer in &self.layers {
            activation = layer.forward(&activation)?;
        }
        Ok(activation)
    }

    /// Backpropagates `grad_output` through every layer, accumulating parameter
    /// gradients. Returns the gradient with respect to `input`.
    pub fn backward(&mut self, input: &Tensor, grad_output: &Tensor) -> Result<Tensor> {
        // Inputs of each layer, recomputed from the network input.
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut activation = input.clone();
        for layer in &self.layers {
            let next = layer.forward(&activation)?;
            inputs.push(activation);
            activation = next;
        }

        let mut grad = grad_output.clone();
        for (layer, layer_input) in self.layers.iter_mut().zip(inputs.iter()).rev() {
            grad = layer.backward(layer_input, &grad)?;
        }
        Ok(grad)
    }

    /// Applies `optimizer` to every layer's parameters.
    pub fn step(&mut self, optimizer: &mut dyn Optimizer) {
        for layer in &mut self.layers {
            layer.update_parameters(optimizer);
        }
    }

    pub fn zero_grad(&mut self) {
        for layer in &mut self.layers {
            layer.zero_grad();
        }
    }
}
