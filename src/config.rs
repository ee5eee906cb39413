//! Configuration structures for training
//!
//! A training configuration names the arithmetic task, the optimizer and its
//! hyperparameters, the sampling ranges, and the architecture to train.

use serde::Deserialize;
use std::fs;

use crate::architecture::{validate_architecture, ArchitectureConfig};
use crate::error::{NaluError, Result};
use crate::optimizers::{Adam, Optimizer, Sgd};
use crate::tasks::ArithmeticTask;

const OPTIMIZERS: [&str; 2] = ["sgd", "adam"];

/// Training configuration parsed from JSON.
///
/// # Example
///
/// ```json
/// {
///   "task": "mul",
///   "optimizer": "adam",
///   "learning_rate": 0.01,
///   "epochs": 2000,
///   "batch_size": 64,
///   "train_samples": 1000,
///   "test_samples": 1000,
///   "train_range": [1.0, 10.0],
///   "test_range": [10.0, 100.0],
///   "seed": 42,
///   "log_interval": 100,
///   "architecture": {
///     "layers": [{ "layer_type": "nalu", "input_size": 2, "output_size": 1 }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Arithmetic task: "add", "sub", "mul", "div", "square", or "sqrt"
    pub task: String,

    /// Optimizer: "sgd" or "adam"
    pub optimizer: String,

    pub learning_rate: f64,

    pub epochs: usize,

    pub batch_size: usize,

    /// Number of training samples drawn from `train_range`
    #[serde(default = "default_samples")]
    pub train_samples: usize,

    /// Number of samples drawn from each evaluation range
    #[serde(default = "default_samples")]
    pub test_samples: usize,

    /// Operand range seen during training (interpolation is measured here)
    pub train_range: [f64; 2],

    /// Operand range used to measure extrapolation
    pub test_range: [f64; 2],

    /// RNG seed for initialization, sampling, and shuffling (default 0)
    pub seed: Option<u64>,

    /// Epochs between progress log lines (default 100)
    pub log_interval: Option<usize>,

    pub architecture: ArchitectureConfig,
}

fn default_samples() -> usize {
    1000
}

impl TrainingConfig {
    /// Parsed task name.
    pub fn task(&self) -> Result<ArithmeticTask> {
        self.task.parse()
    }

    /// Optimizer named by the configuration, at `learning_rate`.
    pub fn build_optimizer(&self) -> Result<Box<dyn Optimizer>> {
        match self.optimizer.to_lowercase().as_str() {
            "sgd" => Ok(Box::new(Sgd::new(self.learning_rate))),
            "adam" => Ok(Box::new(Adam::with_learning_rate(self.learning_rate))),
            other => Err(invalid_optimizer(other)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval.unwrap_or(100).max(1)
    }
}

/// Loads a training configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use neural_arithmetic::config::load_config;
///
/// let cfg = load_config("config/nalu_mul.json").unwrap();
/// assert_eq!(cfg.task, "mul");
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates field values and that the architecture fits the task.
pub fn validate_config(config: &TrainingConfig) -> Result<()> {
    let task = config.task()?;

    if !OPTIMIZERS.contains(&config.optimizer.to_lowercase().as_str()) {
        return Err(invalid_optimizer(&config.optimizer));
    }

    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(NaluError::config("learning_rate must be positive"));
    }

    if config.epochs == 0 {
        return Err(NaluError::config("epochs must be positive"));
    }

    if config.batch_size == 0 {
        return Err(NaluError::config("batch_size must be positive"));
    }

    if config.train_samples == 0 || config.test_samples == 0 {
        return Err(NaluError::config("sample counts must be positive"));
    }

    task.validate_range(config.train_range)?;
    task.validate_range(config.test_range)?;

    validate_architecture(&config.architecture)?;

    if config.architecture.input_size() != Some(task.input_size()) {
        return Err(NaluError::config(format!(
            "task '{}' takes {} input(s) but the first layer expects {:?}",
            task,
            task.input_size(),
            config.architecture.input_size()
        )));
    }

    if config.architecture.output_size() != Some(1) {
        return Err(NaluError::config("the last layer must have output_size 1"));
    }

    Ok(())
}

fn invalid_optimizer(name: &str) -> NaluError {
    NaluError::config(format!(
        "Invalid optimizer '{}'. Must be one of: {}",
        name,
        OPTIMIZERS.join(", ")
    ))
}
