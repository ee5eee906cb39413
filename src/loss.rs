//! Mean squared error loss.

use crate::error::Result;
use crate::tensor::Tensor;

/// Mean of squared differences over every element.
pub fn mse(prediction: &Tensor, target: &Tensor) -> Result<f64> {
    let diff = prediction.sub(target)?;
    if diff.is_empty() {
        return Ok(0.0);
    }
    Ok(diff.data().iter().map(|d| d * d).sum::<f64>() / diff.len() as f64)
}

/// Gradient of [`mse`] with respect to `prediction`: `2 (p - t) / N`.
pub fn mse_grad(prediction: &Tensor, target: &Tensor) -> Result<Tensor> {
    let n = prediction.len().max(1) as f64;
    prediction.zip_map(target, |p, t| 2.0 * (p - t) / n)
}
