//! Neural Accumulator (NAC) layer
//!
//! A linear layer without bias whose effective weight matrix is
//! `tanh(W_hat) ⊙ sigmoid(M_hat)`. Every effective weight lies in (-1, 1) and
//! saturates toward -1, 0, or 1, so the layer learns sums and differences of
//! its inputs instead of arbitrary scalings.

use log::debug;
use rand::Rng;

use crate::error::{NaluError, Result};
use crate::layers::{Layer, Parameter};
use crate::optimizers::Optimizer;
use crate::tensor::Tensor;
use crate::utils::{kaiming_uniform, sigmoid, sigmoid_derivative, tanh_derivative};

/// Neural Accumulator.
///
/// Holds two independently trainable `(n_out, n_in)` matrices, `W_hat` and
/// `M_hat`. The effective weights are derived from them on every call and
/// never cached, since an optimizer may change either between calls.
///
/// # Example
///
/// ```
/// use neural_arithmetic::layers::{Layer, Nac};
/// use neural_arithmetic::tensor::Tensor;
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
/// let nac = Nac::new(2, 1, &mut rng).unwrap();
/// let input = Tensor::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let output = nac.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[3, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Nac {
    n_in: usize,
    n_out: usize,
    w_hat: Parameter,
    m_hat: Parameter,
}

impl Nac {
    /// Create a new NAC with Kaiming uniform initialization.
    ///
    /// `W_hat` and `M_hat` are drawn independently from
    /// `U[-sqrt(6 / n_in), sqrt(6 / n_in))`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if either size is zero.
    pub fn new<R: Rng + ?Sized>(n_in: usize, n_out: usize, rng: &mut R) -> Result<Self> {
        if n_in == 0 || n_out == 0 {
            return Err(NaluError::InvalidDimensions { n_in, n_out });
        }
        let mut w_hat = Tensor::zeros(&[n_out, n_in]);
        let mut m_hat = Tensor::zeros(&[n_out, n_in]);
        kaiming_uniform(w_hat.data_mut(), n_in, rng);
        kaiming_uniform(m_hat.data_mut(), n_in, rng);
        debug!("initialized NAC({n_in} -> {n_out})");
        Ok(Self::assemble(n_in, n_out, w_hat, m_hat))
    }

    /// Build a NAC from fixed `W_hat` and `M_hat` matrices.
    ///
    /// Both must be 2-D with the same `(n_out, n_in)` shape.
    pub fn from_weights(w_hat: Tensor, m_hat: Tensor) -> Result<Self> {
        let (n_out, n_in) = match w_hat.shape() {
            [rows, cols] => (*rows, *cols),
            other => {
                return Err(NaluError::ShapeMismatch {
                    expected: vec![0, 0],
                    got: other.to_vec(),
                })
            }
        };
        if n_in == 0 || n_out == 0 {
            return Err(NaluError::InvalidDimensions { n_in, n_out });
        }
        if m_hat.shape() != w_hat.shape() {
            return Err(NaluError::ShapeMismatch {
                expected: w_hat.shape().to_vec(),
                got: m_hat.shape().to_vec(),
            });
        }
        Ok(Self::assemble(n_in, n_out, w_hat, m_hat))
    }

    fn assemble(n_in: usize, n_out: usize, w_hat: Tensor, m_hat: Tensor) -> Self {
        Self {
            n_in,
            n_out,
            w_hat: Parameter::new("nac.w_hat", w_hat),
            m_hat: Parameter::new("nac.m_hat", m_hat),
        }
    }

    pub fn w_hat(&self) -> &Parameter {
        &self.w_hat
    }

    pub fn m_hat(&self) -> &Parameter {
        &self.m_hat
    }

    pub fn w_hat_mut(&mut self) -> &mut Parameter {
        &mut self.w_hat
    }

    pub fn m_hat_mut(&mut self) -> &mut Parameter {
        &mut self.m_hat
    }

    /// Effective weights `tanh(W_hat) ⊙ sigmoid(M_hat)`, shape `(n_out, n_in)`.
    pub fn effective_weights(&self) -> Tensor {
        let mut weights = self.w_hat.value().map(f64::tanh);
        for (w, &m) in weights.data_mut().iter_mut().zip(self.m_hat.value().data()) {
            *w *= sigmoid(m);
        }
        weights
    }
}

impl Layer for Nac {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        input.linear(&self.effective_weights())
    }

    fn backward(&mut self, input: &Tensor, grad_output: &Tensor) -> Result<Tensor> {
        let tanh_w = self.w_hat.value().map(f64::tanh);
        let sig_m = self.m_hat.value().map(sigmoid);
        let weights = tanh_w.mul(&sig_m)?;

        let grad_input = grad_output.matmul_weight(&weights)?;
        let grad_weights = grad_output.outer_sum(input)?;

        // dW/dW_hat = (1 - tanh²) σ(M_hat), dW/dM_hat = tanh(W_hat) σ'(M_hat)
        let grad_w_hat = grad_weights
            .mul(&sig_m)?
            .mul(&tanh_w.map(tanh_derivative))?;
        let grad_m_hat = grad_weights
            .mul(&tanh_w)?
            .mul(&sig_m.map(sigmoid_derivative))?;
        self.w_hat.accumulate(&grad_w_hat)?;
        self.m_hat.accumulate(&grad_m_hat)?;

        Ok(grad_input)
    }

    fn update_parameters(&mut self, optimizer: &mut dyn Optimizer) {
        optimizer.update(&mut self.w_hat);
        optimizer.update(&mut self.m_hat);
    }

    fn zero_grad(&mut self) {
        self.w_hat.zero_grad();
        self.m_hat.zero_grad();
    }

    fn set_name_prefix(&mut self, prefix: &str) {
        self.w_hat.rename(format!("{prefix}.w_hat"));
        self.m_hat.rename(format!("{prefix}.m_hat"));
    }

    fn input_size(&self) -> usize {
        self.n_in
    }

    fn output_size(&self) -> usize {
        self.n_out
    }

    fn parameter_count(&self) -> usize {
        self.w_hat.len() + self.m_hat.len()
    }

    fn name(&self) -> &'static str {
        "nac"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_nac_creation() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let nac = Nac::new(10, 5, &mut rng).unwrap();

        assert_eq!(nac.input_size(), 10);
        assert_eq!(nac.output_size(), 5);
        assert_eq!(nac.w_hat().value().shape(), &[5, 10]);
        assert_eq!(nac.m_hat().value().shape(), &[5, 10]);
        assert_eq!(nac.parameter_count(), 100);
    }

    #[test]
    fn test_nac_rejects_zero_sizes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert!(matches!(
            Nac::new(0, 3, &mut rng),
            Err(NaluError::InvalidDimensions { n_in: 0, n_out: 3 })
        ));
        assert!(Nac::new(3, 0, &mut rng).is_err());
    }

    #[test]
    fn test_kaiming_initialization_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let nac = Nac::new(24, 8, &mut rng).unwrap();

        // sqrt(6 / 24) = 0.5
        for &v in nac.w_hat().value().data().iter().chain(nac.m_hat().value().data()) {
            assert!((-0.5..0.5).contains(&v));
        }
        assert_ne!(nac.w_hat().value(), nac.m_hat().value());
    }

    #[test]
    fn test_deterministic_initialization() {
        let a = Nac::new(4, 3, &mut Xoshiro256PlusPlus::seed_from_u64(9)).unwrap();
        let b = Nac::new(4, 3, &mut Xoshiro256PlusPlus::seed_from_u64(9)).unwrap();
        assert_eq!(a.w_hat(), b.w_hat());
        assert_eq!(a.m_hat(), b.m_hat());
    }

    #[test]
    fn test_from_weights_shape_checks() {
        let w = Tensor::zeros(&[1, 2]);
        assert!(Nac::from_weights(w.clone(), Tensor::zeros(&[2, 1])).is_err());
        assert!(Nac::from_weights(Tensor::zeros(&[2]), Tensor::zeros(&[2])).is_err());
        assert!(Nac::from_weights(w.clone(), w).is_ok());
    }

    #[test]
    fn test_name_prefix() {
        let mut nac = Nac::from_weights(Tensor::zeros(&[1, 1]), Tensor::zeros(&[1, 1])).unwrap();
        nac.set_name_prefix("layer0");
        assert_eq!(nac.w_hat().name(), "layer0.w_hat");
        assert_eq!(nac.m_hat().name(), "layer0.m_hat");
    }
}
