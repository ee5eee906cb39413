//! Dense row-major tensor used as the input, output, and parameter storage
//! of every layer.
//!
//! The last dimension is always the feature dimension. All leading dimensions
//! are flattened into independent rows, so a `(2, 3, 4)` tensor is treated as
//! 6 rows of 4 features. A 1-D tensor is a single row.

use crate::error::{NaluError, Result};

/// Row-major `f64` tensor with an arbitrary shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    /// Creates a tensor from a shape and backing data.
    ///
    /// Fails with `DataLength` when `data.len()` is not the product of `shape`.
    pub fn new(shape: &[usize], data: Vec<f64>) -> Result<Self> {
        if shape.is_empty() {
            return Err(NaluError::DataLength {
                expected: 0,
                got: data.len(),
            });
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(NaluError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Creates a 2-D `(rows, cols)` tensor.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        Self::new(&[rows, cols], data)
    }

    /// Creates a 2-D tensor from nested rows. All rows must share a length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NaluError::ShapeMismatch {
                    expected: vec![cols],
                    got: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    /// Zero-filled tensor of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the trailing (feature) dimension.
    pub fn features(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    /// Number of independent rows: the product of all leading dimensions.
    pub fn rows(&self) -> usize {
        self.shape[..self.shape.len().saturating_sub(1)].iter().product()
    }

    /// Element access for 2-D tensors.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.features() + col]
    }

    /// Iterator over rows as feature slices.
    pub fn row_iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.features().max(1))
    }

    /// Applies `f` to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tensor {
        Tensor {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Combines two equally shaped tensors elementwise.
    pub fn zip_map(&self, other: &Tensor, f: impl Fn(f64, f64) -> f64) -> Result<Tensor> {
        self.ensure_same_shape(other)?;
        Ok(Tensor {
            shape: self.shape.clone(),
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn add(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_map(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_map(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_map(other, |a, b| a * b)
    }

    /// Multiplies every row by the matching entry of a `(..., 1)` column,
    /// broadcasting it across the feature dimension.
    pub fn mul_column(&self, column: &Tensor) -> Result<Tensor> {
        if column.features() != 1 || column.rows() != self.rows() {
            let mut expected = self.shape.clone();
            if let Some(last) = expected.last_mut() {
                *last = 1;
            }
            return Err(NaluError::ShapeMismatch {
                expected,
                got: column.shape.clone(),
            });
        }
        let cols = self.features();
        let mut data = self.data.clone();
        for (row, &scale) in data.chunks_exact_mut(cols.max(1)).zip(column.data.iter()) {
            for value in row.iter_mut() {
                *value *= scale;
            }
        }
        Ok(Tensor {
            shape: self.shape.clone(),
            data,
        })
    }

    /// Sums each row into a single value, producing shape `(..., 1)`.
    pub fn row_sums(&self) -> Tensor {
        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = 1;
        }
        let data = self.row_iter().map(|row| row.iter().sum()).collect();
        Tensor { shape, data }
    }

    /// Linear map without bias: `self · weightᵗ`.
    ///
    /// `weight` is `(n_out, n_in)` and the trailing dimension of `self` must be
    /// `n_in`. The result keeps the leading dimensions of `self` and has a
    /// trailing dimension of `n_out`.
    pub fn linear(&self, weight: &Tensor) -> Result<Tensor> {
        let (n_out, n_in) = weight.matrix_dims()?;
        if self.features() != n_in {
            return Err(self.feature_mismatch(n_in));
        }
        let rows = self.rows();
        let mut data = vec![0.0; rows * n_out];
        for (x, out) in self.row_iter().zip(data.chunks_exact_mut(n_out.max(1))) {
            for (o, value) in out.iter_mut().enumerate() {
                let w = &weight.data[o * n_in..(o + 1) * n_in];
                *value = x.iter().zip(w.iter()).map(|(a, b)| a * b).sum();
            }
        }
        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = n_out;
        }
        Ok(Tensor { shape, data })
    }

    /// Product with an untransposed weight: `self · weight`.
    ///
    /// This is the input gradient of [`Tensor::linear`]: `self` has trailing
    /// dimension `n_out` and the result has trailing dimension `n_in`.
    pub fn matmul_weight(&self, weight: &Tensor) -> Result<Tensor> {
        let (n_out, n_in) = weight.matrix_dims()?;
        if self.features() != n_out {
            return Err(self.feature_mismatch(n_out));
        }
        let rows = self.rows();
        let mut data = vec![0.0; rows * n_in];
        for (g, out) in self.row_iter().zip(data.chunks_exact_mut(n_in.max(1))) {
            for (o, &scale) in g.iter().enumerate() {
                let w = &weight.data[o * n_in..(o + 1) * n_in];
                for (value, &wv) in out.iter_mut().zip(w.iter()) {
                    *value += scale * wv;
                }
            }
        }
        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = n_in;
        }
        Ok(Tensor { shape, data })
    }

    /// Weight gradient of [`Tensor::linear`]: `selfᵗ · input`, summed over rows.
    ///
    /// `self` holds output gradients `(..., n_out)`, `input` holds `(..., n_in)`;
    /// the result is `(n_out, n_in)`.
    pub fn outer_sum(&self, input: &Tensor) -> Result<Tensor> {
        if self.rows() != input.rows() {
            return Err(NaluError::ShapeMismatch {
                expected: vec![self.rows()],
                got: vec![input.rows()],
            });
        }
        let n_out = self.features();
        let n_in = input.features();
        let mut data = vec![0.0; n_out * n_in];
        for (g, x) in self.row_iter().zip(input.row_iter()) {
            for (o, &go) in g.iter().enumerate() {
                let target = &mut data[o * n_in..(o + 1) * n_in];
                for (value, &xi) in target.iter_mut().zip(x.iter()) {
                    *value += go * xi;
                }
            }
        }
        Tensor::from_vec(n_out, n_in, data)
    }

    /// True when every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    fn matrix_dims(&self) -> Result<(usize, usize)> {
        match self.shape.as_slice() {
            [rows, cols] => Ok((*rows, *cols)),
            other => Err(NaluError::ShapeMismatch {
                expected: vec![0, 0],
                got: other.to_vec(),
            }),
        }
    }

    fn ensure_same_shape(&self, other: &Tensor) -> Result<()> {
        if self.shape != other.shape {
            return Err(NaluError::ShapeMismatch {
                expected: self.shape.clone(),
                got: other.shape.clone(),
            });
        }
        Ok(())
    }

    fn feature_mismatch(&self, expected_features: usize) -> NaluError {
        let mut expected = self.shape.clone();
        if let Some(last) = expected.last_mut() {
            *last = expected_features;
        }
        NaluError::ShapeMismatch {
            expected,
            got: self.shape.clone(),
        }
    }
}
