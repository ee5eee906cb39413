//! Neural Arithmetic Logic Unit (NALU) layer
//!
//! Wraps a NAC and blends two paths through it with a learned gate:
//!
//! ```text
//! g  = sigmoid(x · Gᵗ)
//! y1 = g * NAC(x)
//! y2 = (1 - g) * exp(NAC(ln(|x| + eps)))
//! y  = y1 + y2
//! ```
//!
//! The first path adds and subtracts; the second does the same in log space,
//! which multiplies, divides, and raises to powers. The absolute value drops
//! the input sign, so the multiplicative path cannot produce negative results.

use log::debug;
use rand::Rng;

use crate::error::{NaluError, Result};
use crate::layers::{Layer, Nac, Parameter};
use crate::optimizers::Optimizer;
use crate::tensor::Tensor;
use crate::utils::{kaiming_uniform, sigmoid, sigmoid_derivative};

/// Neural Arithmetic Logic Unit.
///
/// Exclusively owns its NAC and a `(1, n_in)` gate weight `G`.
#[derive(Debug, Clone)]
pub struct Nalu {
    nac: Nac,
    gate: Parameter,
    eps: f64,
}

/// Intermediate values of one forward pass, reused by the backward pass.
struct NaluTrace {
    gate: Tensor,
    additive: Tensor,
    log_input: Tensor,
    multiplicative: Tensor,
}

impl Nalu {
    /// Floor added to `|x|` before taking the logarithm.
    pub const EPSILON: f64 = 1e-6;

    /// Create a new NALU with Kaiming uniform initialization of the owned NAC
    /// and the gate weights.
    pub fn new<R: Rng + ?Sized>(n_in: usize, n_out: usize, rng: &mut R) -> Result<Self> {
        let nac = Nac::new(n_in, n_out, rng)?;
        let mut gate = Tensor::zeros(&[1, n_in]);
        kaiming_uniform(gate.data_mut(), n_in, rng);
        debug!("initialized NALU({n_in} -> {n_out})");
        Self::from_parts(nac, gate)
    }

    /// Build a NALU from a NAC and a fixed `(1, n_in)` gate matrix.
    pub fn from_parts(nac: Nac, gate: Tensor) -> Result<Self> {
        let expected = [1, nac.input_size()];
        if gate.shape() != expected {
            return Err(NaluError::ShapeMismatch {
                expected: expected.to_vec(),
                got: gate.shape().to_vec(),
            });
        }
        Ok(Self {
            nac,
            gate: Parameter::new("nalu.g", gate),
            eps: Self::EPSILON,
        })
    }

    pub fn nac(&self) -> &Nac {
        &self.nac
    }

    pub fn nac_mut(&mut self) -> &mut Nac {
        &mut self.nac
    }

    pub fn gate_weights(&self) -> &Parameter {
        &self.gate
    }

    pub fn gate_weights_mut(&mut self) -> &mut Parameter {
        &mut self.gate
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Gate values `sigmoid(x · Gᵗ)`, one per row, shape `(..., 1)`.
    pub fn gate(&self, input: &Tensor) -> Result<Tensor> {
        Ok(input.linear(self.gate.value())?.map(sigmoid))
    }

    /// `ln(|x| + eps)`, the input of the multiplicative path.
    fn log_input(&self, input: &Tensor) -> Tensor {
        let eps = self.eps;
        input.map(|x| (x.abs() + eps).ln())
    }

    fn trace(&self, input: &Tensor) -> Result<NaluTrace> {
        let gate = self.gate(input)?;
        let additive = self.nac.forward(input)?;
        let log_input = self.log_input(input);
        let multiplicative = self.nac.forward(&log_input)?.map(f64::exp);
        Ok(NaluTrace {
            gate,
            additive,
            log_input,
            multiplicative,
        })
    }
}

impl Layer for Nalu {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let trace = self.trace(input)?;
        let y1 = trace.additive.mul_column(&trace.gate)?;
        let y2 = trace
            .multiplicative
            .mul_column(&trace.gate.map(|g| 1.0 - g))?;
        y1.add(&y2)
    }

    fn backward(&mut self, input: &Tensor, grad_output: &Tensor) -> Result<Tensor> {
        let trace = self.trace(input)?;
        let one_minus_gate = trace.gate.map(|g| 1.0 - g);

        // Gate: dy/dg = a - m per output, summed across outputs per row.
        let grad_gate = grad_output
            .mul(&trace.additive.sub(&trace.multiplicative)?)?
            .row_sums();
        let grad_logit = grad_gate.zip_map(&trace.gate, |d, g| d * sigmoid_derivative(g))?;
        self.gate.accumulate(&grad_logit.outer_sum(input)?)?;
        let grad_from_gate = grad_logit.matmul_weight(self.gate.value())?;

        // Additive path.
        let grad_additive = grad_output.mul_column(&trace.gate)?;
        let grad_from_additive = self.nac.backward(input, &grad_additive)?;

        // Multiplicative path: d exp(z)/dz = exp(z), then d ln(|x|+eps)/dx.
        let grad_log_out = grad_output
            .mul_column(&one_minus_gate)?
            .mul(&trace.multiplicative)?;
        let grad_log_in = self.nac.backward(&trace.log_input, &grad_log_out)?;
        let eps = self.eps;
        let grad_from_log = grad_log_in.zip_map(input, |g, x| {
            if x == 0.0 {
                0.0
            } else {
                g * x.signum() / (x.abs() + eps)
            }
        })?;

        grad_from_additive.add(&grad_from_log)?.add(&grad_from_gate)
    }

    fn update_parameters(&mut self, optimizer: &mut dyn Optimizer) {
        self.nac.update_parameters(optimizer);
        optimizer.update(&mut self.gate);
    }

    fn zero_grad(&mut self) {
        self.nac.zero_grad();
        self.gate.zero_grad();
    }

    fn set_name_prefix(&mut self, prefix: &str) {
        self.nac.set_name_prefix(&format!("{prefix}.nac"));
        self.gate.rename(format!("{prefix}.g"));
    }

    fn input_size(&self) -> usize {
        self.nac.input_size()
    }

    fn output_size(&self) -> usize {
        self.nac.output_size()
    }

    fn parameter_count(&self) -> usize {
        self.nac.parameter_count() + self.gate.len()
    }

    fn name(&self) -> &'static str {
        "nalu"
    }
}
