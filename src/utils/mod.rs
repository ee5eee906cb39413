//! Shared numeric helpers: activations and parameter initialization.

pub mod activations;
pub mod init;

pub use activations::{sigmoid, sigmoid_derivative, tanh_derivative};
pub use init::{kaiming_uniform, kaiming_uniform_bound};
