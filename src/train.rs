//! Mini-batch training and evaluation on arithmetic datasets.

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::architecture::build_model;
use crate::config::{validate_config, TrainingConfig};
use crate::error::Result;
use crate::loss::{mse, mse_grad};
use crate::model::Model;
use crate::optimizers::Optimizer;
use crate::tasks::Dataset;

/// Outcome of a configured training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Mean batch loss over the last epoch
    pub final_train_loss: f64,
    /// MSE on fresh samples from the training range
    pub interpolation_loss: f64,
    /// MSE on samples from the test range
    pub extrapolation_loss: f64,
    /// Epochs actually completed
    pub epochs: usize,
}

/// Hyperparameters of the training loop itself.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub epochs: usize,
    pub batch_size: usize,
    pub log_interval: usize,
}

/// Trains `model` on `data` and returns the mean batch loss of the last epoch
/// together with the number of completed epochs.
///
/// Rows are reshuffled every epoch. Training stops early with a warning if the
/// loss becomes non-finite.
pub fn fit<R: Rng + ?Sized>(
    model: &mut Model,
    optimizer: &mut dyn Optimizer,
    data: &Dataset,
    options: FitOptions,
    rng: &mut R,
) -> Result<(f64, usize)> {
    let batch_size = options.batch_size.max(1);
    let mut indices: Vec<usize> = (0..data.len()).collect();
    let mut epoch_loss = f64::NAN;

    for epoch in 0..options.epochs {
        indices.shuffle(rng);
        let mut total = 0.0;
        let mut batches = 0usize;

        for chunk in indices.chunks(batch_size) {
            let batch = data.select(chunk)?;
            let prediction = model.forward(batch.inputs())?;
            total += mse(&prediction, batch.targets())?;
            batches += 1;

            let grad = mse_grad(&prediction, batch.targets())?;
            model.zero_grad();
            model.backward(batch.inputs(), &grad)?;
            model.step(optimizer);
        }

        epoch_loss = total / batches.max(1) as f64;
        if !epoch_loss.is_finite() {
            warn!("epoch {}: loss became non-finite, stopping", epoch + 1);
            return Ok((epoch_loss, epoch + 1));
        }
        if (epoch + 1) % options.log_interval.max(1) == 0 {
            info!("epoch {:>6}: loss {:.6e}", epoch + 1, epoch_loss);
        }
    }

    Ok((epoch_loss, options.epochs))
}

/// Mean squared error of `model` over all of `data`.
pub fn evaluate(model: &Model, data: &Dataset) -> Result<f64> {
    let prediction = model.forward(data.inputs())?;
    mse(&prediction, data.targets())
}

/// Builds, trains, and evaluates the model described by `config`.
pub fn run(config: &TrainingConfig) -> Result<TrainingReport> {
    validate_config(config)?;
    let task = config.task()?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed());

    let mut model = build_model(&config.architecture, &mut rng)?;
    let mut optimizer = config.build_optimizer()?;
    info!(
        "task {} | model [{}] | {} parameters | optimizer {} (lr {})",
        task,
        model.describe(),
        model.parameter_count(),
        config.optimizer,
        config.learning_rate
    );

    let train = task.generate(config.train_samples, config.train_range, &mut rng)?;
    let interpolation = task.generate(config.test_samples, config.train_range, &mut rng)?;
    let extrapolation = task.generate(config.test_samples, config.test_range, &mut rng)?;

    let options = FitOptions {
        epochs: config.epochs,
        batch_size: config.batch_size,
        log_interval: config.log_interval(),
    };
    let (final_train_loss, epochs) =
        fit(&mut model, optimizer.as_mut(), &train, options, &mut rng)?;

    let report = TrainingReport {
        final_train_loss,
        interpolation_loss: evaluate(&model, &interpolation)?,
        extrapolation_loss: evaluate(&model, &extrapolation)?,
        epochs,
    };
    info!(
        "interpolation mse {:.6e} | extrapolation mse {:.6e}",
        report.interpolation_loss, report.extrapolation_loss
    );
    Ok(report)
}
