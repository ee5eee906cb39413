//! Tests for training configuration parsing
//!
//! - Loading the bundled JSON configs
//! - Defaults for optional fields
//! - Rejecting invalid values, invalid JSON, and missing files

use neural_arithmetic::config::load_config;
use neural_arithmetic::optimizers::Optimizer;
use neural_arithmetic::tasks::ArithmeticTask;
use neural_arithmetic::NaluError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

fn config_json(task: &str, optimizer: &str, learning_rate: f64, range: &str, layers: &str) -> String {
    format!(
        r#"{{
  "task": "{task}",
  "optimizer": "{optimizer}",
  "learning_rate": {learning_rate},
  "epochs": 10,
  "batch_size": 8,
  "train_range": {range},
  "test_range": [10.0, 100.0],
  "architecture": {{ "layers": {layers} }}
}}"#
    )
}

const SINGLE_NALU: &str = r#"[{ "layer_type": "nalu", "input_size": 2, "output_size": 1 }]"#;

fn load(contents: &str) -> Result<neural_arithmetic::config::TrainingConfig, NaluError> {
    let file = write_temp_config(contents);
    load_config(file.path().to_str().unwrap())
}

// ============================================================================
// Bundled Config Tests
// ============================================================================

mod bundled_config_tests {
    use super::*;

    #[test]
    fn test_load_nalu_mul_config() {
        let config = load_config("config/nalu_mul.json").expect("Failed to load nalu_mul config");

        assert_eq!(config.task().unwrap(), ArithmeticTask::Mul);
        assert_eq!(config.optimizer, "adam");
        assert_eq!(config.train_range, [1.0, 10.0]);
        assert_eq!(config.test_range, [10.0, 100.0]);
        assert_eq!(config.seed(), 42);
        assert_eq!(config.architecture.layers.len(), 1);
    }

    #[test]
    fn test_load_nac_add_config() {
        let config = load_config("config/nac_add.json").expect("Failed to load nac_add config");

        assert_eq!(config.task().unwrap(), ArithmeticTask::Add);
        assert_eq!(config.architecture.layers[0].layer_type, "nac");
        assert_eq!(config.log_interval(), 50);
    }

    #[test]
    fn test_load_nalu_div_config() {
        let config = load_config("config/nalu_div.json").expect("Failed to load nalu_div config");
        assert_eq!(config.task().unwrap(), ArithmeticTask::Div);
    }
}

// ============================================================================
// Defaults
// ============================================================================

mod default_tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let config = load(&config_json("mul", "sgd", 0.1, "[1.0, 10.0]", SINGLE_NALU)).unwrap();

        assert_eq!(config.seed, None);
        assert_eq!(config.seed(), 0);
        assert_eq!(config.log_interval(), 100);
        assert_eq!(config.train_samples, 1000);
        assert_eq!(config.test_samples, 1000);
    }

    #[test]
    fn test_build_optimizer() {
        let config = load(&config_json("add", "SGD", 0.25, "[1.0, 10.0]", SINGLE_NALU)).unwrap();
        let optimizer = config.build_optimizer().unwrap();
        assert_eq!(optimizer.learning_rate(), 0.25);

        let config = load(&config_json("add", "adam", 0.01, "[1.0, 10.0]", SINGLE_NALU)).unwrap();
        assert_eq!(config.build_optimizer().unwrap().learning_rate(), 0.01);
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    fn assert_invalid(contents: &str, needle: &str) {
        match load(contents) {
            Err(NaluError::InvalidConfig(message)) => {
                assert!(message.contains(needle), "'{}' does not mention '{}'", message, needle)
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_task() {
        assert_invalid(&config_json("pow", "adam", 0.1, "[1.0, 10.0]", SINGLE_NALU), "Invalid task");
    }

    #[test]
    fn test_unknown_optimizer() {
        assert_invalid(
            &config_json("mul", "rmsprop", 0.1, "[1.0, 10.0]", SINGLE_NALU),
            "Invalid optimizer",
        );
    }

    #[test]
    fn test_non_positive_learning_rate() {
        assert_invalid(&config_json("mul", "adam", 0.0, "[1.0, 10.0]", SINGLE_NALU), "learning_rate");
        assert_invalid(&config_json("mul", "adam", -0.1, "[1.0, 10.0]", SINGLE_NALU), "learning_rate");
    }

    #[test]
    fn test_reversed_range() {
        assert_invalid(&config_json("mul", "adam", 0.1, "[10.0, 1.0]", SINGLE_NALU), "low < high");
    }

    #[test]
    fn test_div_range_containing_zero() {
        assert_invalid(&config_json("div", "adam", 0.1, "[-1.0, 1.0]", SINGLE_NALU), "zero");
    }

    #[test]
    fn test_architecture_input_must_match_task() {
        let layers = r#"[{ "layer_type": "nalu", "input_size": 3, "output_size": 1 }]"#;
        assert_invalid(&config_json("mul", "adam", 0.1, "[1.0, 10.0]", layers), "first layer");
    }

    #[test]
    fn test_architecture_output_must_be_scalar() {
        let layers = r#"[{ "layer_type": "nac", "input_size": 2, "output_size": 2 }]"#;
        assert_invalid(&config_json("add", "adam", 0.1, "[1.0, 10.0]", layers), "output_size 1");
    }

    #[test]
    fn test_unary_task_takes_one_input() {
        let layers = r#"[{ "layer_type": "nalu", "input_size": 1, "output_size": 1 }]"#;
        assert!(load(&config_json("square", "adam", 0.1, "[1.0, 10.0]", layers)).is_ok());
    }

    #[test]
    fn test_zero_epochs() {
        let contents = config_json("mul", "adam", 0.1, "[1.0, 10.0]", SINGLE_NALU)
            .replace("\"epochs\": 10", "\"epochs\": 0");
        assert_invalid(&contents, "epochs");
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = load_config("config/does_not_exist.json");
        assert!(matches!(result, Err(NaluError::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(load("{ not json"), Err(NaluError::Json(_))));
    }

    #[test]
    fn test_missing_required_field() {
        let contents = r#"{ "task": "mul", "optimizer": "adam" }"#;
        assert!(matches!(load(contents), Err(NaluError::Json(_))));
    }
}
