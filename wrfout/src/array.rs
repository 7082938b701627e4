//! Row-major two dimensional sample storage.

use crate::WrfoutError;
use std::ops::Range;

/// Base floating point type used for all field values and
/// coordinates.
pub type C = f64;

/// A two dimensional field slice.
///
/// Rows follow the file's `south_north` axis, so row 0 is the
/// southern edge of the domain. Use [`Array2::flipud`] to get image
/// (north-up) orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2 {
    /// Number of (rows, columns).
    dimensions: (usize, usize),

    /// Samples in row-major order.
    samples: Box<[C]>,
}

impl Array2 {
    /// Returns an array of `rows` by `cols` backed by `samples`.
    pub fn new(rows: usize, cols: usize, samples: Vec<C>) -> Result<Self, WrfoutError> {
        if samples.len() != rows * cols {
            return Err(WrfoutError::Shape {
                name: "array".into(),
                len: samples.len(),
                shape: vec![rows, cols],
            });
        }
        Ok(Self {
            dimensions: (rows, cols),
            samples: samples.into_boxed_slice(),
        })
    }

    /// Returns an array with each sample produced by `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> C) -> Self {
        let mut samples = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                samples.push(f(row, col));
            }
        }
        Self {
            dimensions: (rows, cols),
            samples: samples.into_boxed_slice(),
        }
    }

    /// Returns (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.dimensions
    }

    pub fn rows(&self) -> usize {
        self.dimensions.0
    }

    pub fn cols(&self) -> usize {
        self.dimensions.1
    }

    /// Returns the number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> C {
        self.samples[row * self.dimensions.1 + col]
    }

    pub fn as_slice(&self) -> &[C] {
        &self.samples
    }

    /// Returns a copy of the block `rows x cols`.
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        let width = self.dimensions.1;
        let samples: Vec<C> = rows
            .clone()
            .flat_map(|row| self.samples[row * width + cols.start..row * width + cols.end].iter())
            .copied()
            .collect();
        Self {
            dimensions: (rows.len(), cols.len()),
            samples: samples.into_boxed_slice(),
        }
    }

    /// Returns the array with row order reversed.
    pub fn flipud(&self) -> Self {
        let (rows, cols) = self.dimensions;
        Self::from_fn(rows, cols, |row, col| self.get(rows - 1 - row, col))
    }

    /// Returns the (min, max) of all finite samples, if any.
    pub fn min_max(&self) -> Option<(C, C)> {
        finite_min_max(self.samples.iter().copied())
    }

    /// Returns the largest finite sample, if any.
    pub fn max(&self) -> Option<C> {
        self.min_max().map(|(_, max)| max)
    }
}

/// Returns the (min, max) of the finite values in `values`.
pub fn finite_min_max(values: impl IntoIterator<Item = C>) -> Option<(C, C)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::{finite_min_max, Array2};

    #[allow(clippy::cast_precision_loss)]
    fn ramp(rows: usize, cols: usize) -> Array2 {
        Array2::from_fn(rows, cols, |row, col| (row * cols + col) as f64)
    }

    #[test]
    fn test_new_checks_len() {
        assert!(Array2::new(2, 3, vec![0.0; 6]).is_ok());
        assert!(Array2::new(2, 3, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_slice() {
        let a = ramp(4, 5);
        let s = a.slice(0..3, 0..4);
        assert_eq!(s.shape(), (3, 4));
        assert_eq!(s.get(0, 0), 0.0);
        assert_eq!(s.get(2, 3), 13.0);
    }

    #[test]
    fn test_flipud() {
        let a = ramp(3, 2);
        let f = a.flipud();
        assert_eq!(f.get(0, 0), 4.0);
        assert_eq!(f.get(0, 1), 5.0);
        assert_eq!(f.get(2, 0), 0.0);
        assert_eq!(f.flipud(), a);
    }

    #[test]
    fn test_min_max_skips_nan() {
        assert_eq!(finite_min_max([f64::NAN, 2.0, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(finite_min_max([f64::NAN]), None);
        assert_eq!(ramp(2, 2).max(), Some(3.0));
    }
}
