//! Architecture configuration structures
//!
//! Defines stacks of NAC and NALU layers via JSON configuration files so that
//! depth and width can be changed without code changes.

use log::debug;
use rand::Rng;
use serde::Deserialize;
use std::fs;

use crate::error::{NaluError, Result};
use crate::layers::{Layer, Nac, Nalu};
use crate::model::Model;

const LAYER_TYPES: [&str; 2] = ["nac", "nalu"];

/// Configuration for a single layer.
///
/// Both layer types require `input_size` and `output_size`.
///
/// # Example
///
/// ```json
/// {
///   "layer_type": "nalu",
///   "input_size": 2,
///   "output_size": 1
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Type of layer: "nac" or "nalu"
    pub layer_type: String,
    /// Number of input features
    pub input_size: Option<usize>,
    /// Number of output features
    pub output_size: Option<usize>,
}

/// Configuration for the entire network.
///
/// Layers are applied in the order they appear.
///
/// # Example
///
/// ```json
/// {
///   "layers": [
///     { "layer_type": "nalu", "input_size": 2, "output_size": 2 },
///     { "layer_type": "nalu", "input_size": 2, "output_size": 1 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    pub layers: Vec<LayerConfig>,
}

impl ArchitectureConfig {
    /// Input size of the first layer, if configured.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().and_then(|l| l.input_size)
    }

    /// Output size of the last layer, if configured.
    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().and_then(|l| l.output_size)
    }
}

/// Loads an architecture configuration from a JSON file and validates it.
///
/// # Examples
///
/// ```no_run
/// use neural_arithmetic::architecture::load_architecture;
///
/// let arch = load_architecture("config/architectures/nalu_2_1.json").unwrap();
/// assert!(!arch.layers.is_empty());
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Checks layer types, sizes, and that consecutive layers connect.
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.layers.is_empty() {
        return Err(NaluError::config(
            "Architecture must contain at least one layer",
        ));
    }

    let mut sizes = Vec::with_capacity(config.layers.len());
    for (i, layer) in config.layers.iter().enumerate() {
        sizes.push(validate_layer(layer, i)?);
    }

    for (i, pair) in sizes.windows(2).enumerate() {
        let (_, prev_out) = pair[0];
        let (next_in, _) = pair[1];
        if prev_out != next_in {
            return Err(NaluError::config(format!(
                "Layer {} output size ({}) does not match layer {} input size ({})",
                i,
                prev_out,
                i + 1,
                next_in
            )));
        }
    }

    Ok(())
}

/// Validates one layer and returns its `(input_size, output_size)`.
fn validate_layer(layer: &LayerConfig, index: usize) -> Result<(usize, usize)> {
    let layer_type = layer.layer_type.to_lowercase();
    if !LAYER_TYPES.contains(&layer_type.as_str()) {
        return Err(NaluError::config(format!(
            "Layer {}: Invalid layer type '{}'. Must be one of: {}",
            index,
            layer.layer_type,
            LAYER_TYPES.join(", ")
        )));
    }

    let input_size = layer.input_size.ok_or_else(|| {
        NaluError::config(format!("Layer {}: {} layer missing input_size", index, layer_type))
    })?;
    let output_size = layer.output_size.ok_or_else(|| {
        NaluError::config(format!("Layer {}: {} layer missing output_size", index, layer_type))
    })?;

    if input_size == 0 || output_size == 0 {
        return Err(NaluError::config(format!(
            "Layer {}: input_size and output_size must be positive",
            index
        )));
    }

    Ok((input_size, output_size))
}

/// Builds the layers described by `config`, in order.
///
/// Each layer's parameters are prefixed `layer{i}` so optimizer state stays
/// separate per layer.
pub fn build_layers<R: Rng + ?Sized>(
    config: &ArchitectureConfig,
    rng: &mut R,
) -> Result<Vec<Box<dyn Layer>>> {
    validate_architecture(config)?;
    let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(config.layers.len());

    for (i, layer_config) in config.layers.iter().enumerate() {
        let (input_size, output_size) = validate_layer(layer_config, i)?;

        let mut layer: Box<dyn Layer> = match layer_config.layer_type.to_lowercase().as_str() {
            "nac" => Box::new(Nac::new(input_size, output_size, rng)?),
            "nalu" => Box::new(Nalu::new(input_size, output_size, rng)?),
            other => {
                return Err(NaluError::config(format!(
                    "Layer {}: Invalid layer type '{}'",
                    i, other
                )));
            }
        };
        layer.set_name_prefix(&format!("layer{i}"));
        debug!("layer {i}: {} ({input_size} -> {output_size})", layer_config.layer_type);
        layers.push(layer);
    }

    Ok(layers)
}

/// Builds a [`Model`] from a validated configuration.
///
/// # Examples
///
/// ```no_run
/// use neural_arithmetic::architecture::{build_model, load_architecture};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let config = load_architecture("config/architectures/nalu_2_1.json").unwrap();
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
/// let model = build_model(&config, &mut rng).unwrap();
/// assert_eq!(model.layers().len(), config.layers.len());
/// ```
pub fn build_model<R: Rng + ?Sized>(config: &ArchitectureConfig, rng: &mut R) -> Result<Model> {
    Model::new(build_layers(config, rng)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(layer_type: &str, input_size: Option<usize>, output_size: Option<usize>) -> LayerConfig {
        LayerConfig {
            layer_type: layer_type.to_string(),
            input_size,
            output_size,
        }
    }

    #[test]
    fn test_validate_single_layer() {
        let config = ArchitectureConfig {
            layers: vec![layer("nalu", Some(2), Some(1))],
        };
        assert!(validate_architecture(&config).is_ok());
    }

    #[test]
    fn test_validate_missing_fields() {
        let config = ArchitectureConfig {
            layers: vec![layer("nac", Some(2), None)],
        };
        let err = validate_architecture(&config).unwrap_err();
        assert!(err.to_string().contains("missing output_size"));
    }

    #[test]
    fn test_validate_invalid_layer_type() {
        let config = ArchitectureConfig {
            layers: vec![layer("dense", Some(2), Some(1))],
        };
        let err = validate_architecture(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid layer type"));
    }

    #[test]
    fn test_validate_zero_size() {
        let config = ArchitectureConfig {
            layers: vec![layer("nac", Some(0), Some(1))],
        };
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_validate_empty_architecture() {
        let config = ArchitectureConfig { layers: vec![] };
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_layer_type_is_case_insensitive() {
        let config = ArchitectureConfig {
            layers: vec![layer("NALU", Some(2), Some(1))],
        };
        assert!(validate_architecture(&config).is_ok());
    }
}
