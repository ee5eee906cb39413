use std::env;
use std::process;

use log::error;
use neural_arithmetic::config::load_config;
use neural_arithmetic::train::{run, TrainingReport};

// Train a NAC/NALU stack on one arithmetic task and report how well it
// interpolates and extrapolates.
const DEFAULT_CONFIG: &str = "config/nalu_mul.json";

/// Config path from the command line, or the bundled multiplication setup.
fn config_path(args: &[String]) -> String {
    args.get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string())
}

fn format_report(task: &str, report: &TrainingReport) -> String {
    format!(
        "Task: {}\nEpochs: {}\nFinal training loss: {:.6e}\nInterpolation MSE: {:.6e}\nExtrapolation MSE: {:.6e}",
        task,
        report.epochs,
        report.final_train_loss,
        report.interpolation_loss,
        report.extrapolation_loss
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let path = config_path(&args);
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("could not load {}: {}", path, e);
            process::exit(1);
        }
    };

    match run(&config) {
        Ok(report) => println!("{}", format_report(&config.task, &report)),
        Err(e) => {
            error!("training failed: {}", e);
            process::exit(1);
        }
    }
}
