//! Adam (Adaptive Moment Estimation) optimizer implementation
//!
//! Combines momentum and adaptive learning rates with bias correction.

use std::collections::HashMap;

use crate::layers::Parameter;
use crate::optimizers::Optimizer;

/// Adam optimizer.
///
/// The update rule is:
///
/// ```text
/// m_t = β1 * m_{t-1} + (1 - β1) * gradient
/// v_t = β2 * v_{t-1} + (1 - β2) * gradient²
/// m_hat = m_t / (1 - β1^t)
/// v_hat = v_t / (1 - β2^t)
/// parameter = parameter - α * m_hat / (√v_hat + ε)
/// ```
///
/// Moment estimates and the step counter `t` are tracked per parameter name.
///
/// # Reference
///
/// Kingma, D. P., & Ba, J. (2014). Adam: A method for stochastic optimization.
/// arXiv preprint arXiv:1412.6980.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    state: HashMap<String, MomentState>,
}

#[derive(Debug, Clone, PartialEq)]
struct MomentState {
    /// First moment estimates (momentum)
    m: Vec<f64>,
    /// Second moment estimates (adaptive learning rate)
    v: Vec<f64>,
    /// Time step counter for bias correction
    t: i32,
}

impl MomentState {
    fn new(len: usize) -> Self {
        Self {
            m: vec![0.0; len],
            v: vec![0.0; len],
            t: 0,
        }
    }
}

impl Adam {
    /// Creates a new Adam optimizer.
    ///
    /// The Adam paper recommends `beta1 = 0.9`, `beta2 = 0.999`,
    /// `epsilon = 1e-8`.
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            state: HashMap::new(),
        }
    }

    /// Adam with the paper's default betas and epsilon.
    pub fn with_learning_rate(learning_rate: f64) -> Self {
        Self::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    /// Number of update steps taken for the named parameter.
    pub fn step_count(&self, name: &str) -> usize {
        self.state.get(name).map(|s| s.t as usize).unwrap_or(0)
    }
}

impl Optimizer for Adam {
    fn update(&mut self, parameter: &mut Parameter) {
        let len = parameter.len();
        let state = self
            .state
            .entry(parameter.name().to_string())
            .or_insert_with(|| MomentState::new(len));

        // A parameter that changed size under the same name starts fresh.
        if state.m.len() != len {
            *state = MomentState::new(len);
        }

        state.t += 1;
        let bias_correction1 = 1.0 - self.beta1.powi(state.t);
        let bias_correction2 = 1.0 - self.beta2.powi(state.t);

        let (values, grads) = parameter.split_mut();
        for (i, (param, &grad)) in values.iter_mut().zip(grads.iter()).enumerate() {
            state.m[i] = self.beta1 * state.m[i] + (1.0 - self.beta1) * grad;
            state.v[i] = self.beta2 * state.v[i] + (1.0 - self.beta2) * grad * grad;

            let m_hat = state.m[i] / bias_correction1;
            let v_hat = state.v[i] / bias_correction2;

            *param -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }

    fn reset(&mut self) {
        self.state.clear();
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
