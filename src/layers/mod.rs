//! Layer abstractions for arithmetic networks
//!
//! This module provides the Layer trait, the Parameter container, and the two
//! arithmetic layers: the Neural Accumulator and the Neural Arithmetic Logic
//! Unit.

mod r#trait;
pub mod nac;
pub mod nalu;
pub mod parameter;

// Re-export the Layer trait for convenience
pub use nac::Nac;
pub use nalu::Nalu;
pub use parameter::Parameter;
pub use r#trait::Layer;
