use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Dense row-major matrix.
///
/// One row per object, so a single object's factors are always a contiguous
/// slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    n_rows: usize,
    n_cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            values: vec![0.0; n_rows * n_cols],
        }
    }

    /// Builds a matrix from a flat row-major vector.
    pub fn from_values(n_rows: usize, n_cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != n_rows * n_cols {
            return Err(Error::ShapeMismatch(format!(
                "expected {n_rows}×{n_cols} = {} values, got {}",
                n_rows * n_cols,
                values.len(),
            )));
        }
        Ok(Self {
            n_rows,
            n_cols,
            values,
        })
    }

    pub(crate) fn from_fn(n_rows: usize, n_cols: usize, mut f: impl FnMut() -> f64) -> Self {
        Self {
            n_rows,
            n_cols,
            values: (0..n_rows * n_cols).map(|_| f()).collect(),
        }
    }

    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[f64] {
        &self.values[index * self.n_cols..(index + 1) * self.n_cols]
    }

    /// Flat row-major view of all the values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn par_rows_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = &mut [f64]> + '_ {
        self.values.par_chunks_mut(self.n_cols)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|value| value.is_finite())
    }
}
