//! Named trainable tensor with its gradient accumulator.

use crate::error::{NaluError, Result};
use crate::tensor::Tensor;

/// Trainable weight owned by exactly one layer.
///
/// The gradient buffer always has the same shape as the value. Backward passes
/// add into it and optimizers read it; neither touches another parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Tensor,
    grad: Tensor,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Tensor) -> Self {
        let grad = Tensor::zeros(value.shape());
        Self {
            name: name.into(),
            value,
            grad,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    pub fn grad(&self) -> &Tensor {
        &self.grad
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replaces the value. The new tensor must keep the parameter's shape.
    pub fn set_value(&mut self, value: Tensor) -> Result<()> {
        if value.shape() != self.value.shape() {
            return Err(NaluError::ShapeMismatch {
                expected: self.value.shape().to_vec(),
                got: value.shape().to_vec(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Adds `delta` into the gradient buffer.
    pub fn accumulate(&mut self, delta: &Tensor) -> Result<()> {
        self.grad = self.grad.add(delta)?;
        Ok(())
    }

    pub fn zero_grad(&mut self) {
        self.grad.data_mut().fill(0.0);
    }

    /// Value and gradient slices for an in-place optimizer step.
    pub fn split_mut(&mut self) -> (&mut [f64], &[f64]) {
        (self.value.data_mut(), self.grad.data())
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
