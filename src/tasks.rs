//! Static arithmetic datasets.
//!
//! Each sample draws operands uniformly from a range and targets the result
//! of one arithmetic operation. Training on one range and testing on a wider
//! one measures extrapolation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::{NaluError, Result};
use crate::tensor::Tensor;

/// Arithmetic operation learned by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticTask {
    Add,
    Sub,
    Mul,
    Div,
    Square,
    Sqrt,
}

impl ArithmeticTask {
    pub const ALL: [ArithmeticTask; 6] = [
        ArithmeticTask::Add,
        ArithmeticTask::Sub,
        ArithmeticTask::Mul,
        ArithmeticTask::Div,
        ArithmeticTask::Square,
        ArithmeticTask::Sqrt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArithmeticTask::Add => "add",
            ArithmeticTask::Sub => "sub",
            ArithmeticTask::Mul => "mul",
            ArithmeticTask::Div => "div",
            ArithmeticTask::Square => "square",
            ArithmeticTask::Sqrt => "sqrt",
        }
    }

    /// Number of operands.
    pub fn input_size(self) -> usize {
        match self {
            ArithmeticTask::Square | ArithmeticTask::Sqrt => 1,
            _ => 2,
        }
    }

    /// Result for the operands in `x`.
    ///
    /// # Errors
    ///
    /// `DataLength` unless `x` holds exactly `input_size()` operands.
    pub fn apply(self, x: &[f64]) -> Result<f64> {
        if x.len() != self.input_size() {
            return Err(NaluError::DataLength {
                expected: self.input_size(),
                got: x.len(),
            });
        }
        Ok(match self {
            ArithmeticTask::Add => x[0] + x[1],
            ArithmeticTask::Sub => x[0] - x[1],
            ArithmeticTask::Mul => x[0] * x[1],
            ArithmeticTask::Div => x[0] / x[1],
            ArithmeticTask::Square => x[0] * x[0],
            ArithmeticTask::Sqrt => x[0].sqrt(),
        })
    }

    /// Rejects operand ranges on which the operation is undefined.
    pub fn validate_range(self, range: [f64; 2]) -> Result<()> {
        let [low, high] = range;
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(NaluError::config(format!(
                "range [{low}, {high}] must be finite with low < high"
            )));
        }
        match self {
            ArithmeticTask::Div if low <= 0.0 && high >= 0.0 => Err(NaluError::config(format!(
                "div range [{low}, {high}] must not contain zero"
            ))),
            ArithmeticTask::Sqrt if low < 0.0 => Err(NaluError::config(format!(
                "sqrt range [{low}, {high}] must be non-negative"
            ))),
            _ => Ok(()),
        }
    }

    /// Samples `samples` rows with operands from `U[low, high)`.
    pub fn generate<R: Rng + ?Sized>(
        self,
        samples: usize,
        range: [f64; 2],
        rng: &mut R,
    ) -> Result<Dataset> {
        self.validate_range(range)?;
        let width = self.input_size();
        let mut inputs = Vec::with_capacity(samples * width);
        let mut targets = Vec::with_capacity(samples);
        for _ in 0..samples {
            let start = inputs.len();
            for _ in 0..width {
                inputs.push(rng.random_range(range[0]..range[1]));
            }
            targets.push(self.apply(&inputs[start..])?);
        }
        Dataset::new(
            Tensor::from_vec(samples, width, inputs)?,
            Tensor::from_vec(samples, 1, targets)?,
        )
    }
}

impl fmt::Display for ArithmeticTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArithmeticTask {
    type Err = NaluError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        ArithmeticTask::ALL
            .into_iter()
            .find(|task| task.as_str() == lowered)
            .ok_or_else(|| {
                let names: Vec<_> = ArithmeticTask::ALL.iter().map(|t| t.as_str()).collect();
                NaluError::config(format!(
                    "Invalid task '{}'. Must be one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Paired inputs `(n, features)` and targets `(n, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Tensor,
    targets: Tensor,
}

impl Dataset {
    pub fn new(inputs: Tensor, targets: Tensor) -> Result<Self> {
        if inputs.rows() != targets.rows() {
            return Err(NaluError::ShapeMismatch {
                expected: vec![inputs.rows()],
                got: vec![targets.rows()],
            });
        }
        Ok(Self { inputs, targets })
    }

    pub fn inputs(&self) -> &Tensor {
        &self.inputs
    }

    pub fn targets(&self) -> &Tensor {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Dataset> {
        Dataset::new(
            gather_rows(&self.inputs, indices)?,
            gather_rows(&self.targets, indices)?,
        )
    }
}

fn gather_rows(tensor: &Tensor, indices: &[usize]) -> Result<Tensor> {
    let cols = tensor.features();
    let mut data = Vec::with_capacity(indices.len() * cols);
    for &i in indices {
        data.extend_from_slice(&tensor.data()[i * cols..(i + 1) * cols]);
    }
    Tensor::from_vec(indices.len(), cols, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_apply() {
        assert_eq!(ArithmeticTask::Add.apply(&[2.0, 3.0]).unwrap(), 5.0);
        assert_eq!(ArithmeticTask::Sub.apply(&[2.0, 3.0]).unwrap(), -1.0);
        assert_eq!(ArithmeticTask::Mul.apply(&[2.0, 3.0]).unwrap(), 6.0);
        assert_eq!(ArithmeticTask::Div.apply(&[3.0, 2.0]).unwrap(), 1.5);
        assert_eq!(ArithmeticTask::Square.apply(&[3.0]).unwrap(), 9.0);
        assert_eq!(ArithmeticTask::Sqrt.apply(&[9.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_apply_checks_operand_count() {
        assert!(matches!(
            ArithmeticTask::Add.apply(&[2.0]),
            Err(NaluError::DataLength { expected: 2, got: 1 })
        ));
        assert!(matches!(
            ArithmeticTask::Sqrt.apply(&[4.0, 9.0]),
            Err(NaluError::DataLength { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_parse_task() {
        assert_eq!("MUL".parse::<ArithmeticTask>().unwrap(), ArithmeticTask::Mul);
        assert!("pow".parse::<ArithmeticTask>().is_err());
        for task in ArithmeticTask::ALL {
            assert_eq!(task.to_string().parse::<ArithmeticTask>().unwrap(), task);
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(ArithmeticTask::Div.validate_range([-1.0, 1.0]).is_err());
        assert!(ArithmeticTask::Div.validate_range([0.1, 1.0]).is_ok());
        assert!(ArithmeticTask::Sqrt.validate_range([-1.0, 1.0]).is_err());
        assert!(ArithmeticTask::Add.validate_range([1.0, 1.0]).is_err());
        assert!(ArithmeticTask::Add.validate_range([-5.0, 5.0]).is_ok());
    }

    #[test]
    fn test_generate_shapes_and_targets() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let data = ArithmeticTask::Mul.generate(50, [1.0, 10.0], &mut rng).unwrap();

        assert_eq!(data.len(), 50);
        assert_eq!(data.inputs().shape(), &[50, 2]);
        assert_eq!(data.targets().shape(), &[50, 1]);
        for (x, y) in data.inputs().row_iter().zip(data.targets().data()) {
            assert!(x.iter().all(|v| (1.0..10.0).contains(v)));
            assert_eq!(x[0] * x[1], *y);
        }
    }

    #[test]
    fn test_select_rows() {
        let inputs = Tensor::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let targets = Tensor::from_vec(3, 1, vec![10.0, 20.0, 30.0]).unwrap();
        let data = Dataset::new(inputs, targets).unwrap();

        let picked = data.select(&[2, 0]).unwrap();
        assert_eq!(picked.inputs().data(), &[3.0, 1.0]);
        assert_eq!(picked.targets().data(), &[30.0, 10.0]);
    }
}
