//! Neural arithmetic layers
//!
//! Neural Accumulator (NAC) and Neural Arithmetic Logic Unit (NALU) layers with
//! analytic backward passes, plus the pieces needed to train them on simple
//! arithmetic and measure how far they extrapolate.
//!
//! # Modules
//!
//! - `tensor`: Row-major tensor with the linear primitives the layers need
//! - `layers`: Layer trait, Parameter, NAC and NALU
//! - `optimizers`: Optimizer trait with SGD and Adam
//! - `model`: Sequential stack of layers
//! - `architecture`: JSON architecture configs and model building
//! - `config`: JSON training configs
//! - `tasks`: Static arithmetic datasets
//! - `train`: Training loop and evaluation
//! - `utils`: Activations and fan-in uniform initialization

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod loss;
pub mod model;
pub mod optimizers;
pub mod tasks;
pub mod tensor;
pub mod train;
pub mod utils;

pub use error::{NaluError, Result};
