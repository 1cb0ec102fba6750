//! Column-compressed sparse matrices as handed over by the host.

use crate::error::{Result, TrainError};

/// Compressed Sparse Column (CSC) matrix.
///
/// `col_ptr[j]..col_ptr[j + 1]` indexes the entries of column `j` in
/// `row_idx` and `values`. Row indices are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    nrows: usize,
    ncols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CscMatrix {
    /// Create a matrix from raw compressed-column parts, checking their structure.
    pub fn new(
        nrows: usize,
        ncols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if col_ptr.len() != ncols + 1 {
            return Err(TrainError::Format(format!(
                "column pointer array has {} entries, expected {}",
                col_ptr.len(),
                ncols + 1
            )));
        }
        if row_idx.len() != values.len() {
            return Err(TrainError::Format(
                "row index and value arrays differ in length".to_string(),
            ));
        }
        if col_ptr[0] != 0 || col_ptr[ncols] != values.len() {
            return Err(TrainError::Format(
                "column pointers do not span the stored entries".to_string(),
            ));
        }
        if col_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(TrainError::Format(
                "column pointers must be non-decreasing".to_string(),
            ));
        }
        for j in 0..ncols {
            let rows = &row_idx[col_ptr[j]..col_ptr[j + 1]];
            if rows.iter().any(|&r| r >= nrows) {
                return Err(TrainError::Format(format!(
                    "row index out of bounds in column {}",
                    j
                )));
            }
            if rows.windows(2).any(|w| w[0] >= w[1]) {
                return Err(TrainError::Format(format!(
                    "row indices of column {} are not strictly increasing",
                    j
                )));
            }
        }
        Ok(Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// An all-zero matrix with the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            col_ptr: vec![0; ncols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a CSC matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate entries are summed, like the host's `sparse()` constructor.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        if let Some(&(r, c, _)) = triplets.iter().find(|&&(r, c, _)| r >= nrows || c >= ncols) {
            return Err(TrainError::Format(format!(
                "entry ({}, {}) lies outside a {}x{} matrix",
                r, c, nrows, ncols
            )));
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));

        let mut col_ptr = vec![0usize; ncols + 1];
        let mut row_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (r, c, v) in sorted {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            row_idx.push(r);
            values.push(v);
            col_ptr[c + 1] += 1;
            last = Some((r, c));
        }
        for j in 0..ncols {
            col_ptr[j + 1] += col_ptr[j];
        }

        Ok(Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Stored `(row, value)` pairs of column `j`, in ascending row order.
    pub fn column(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        self.row_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Transpose, keeping row indices sorted within every column.
    pub fn transpose(&self) -> CscMatrix {
        let mut col_ptr = vec![0usize; self.nrows + 1];
        for &r in &self.row_idx {
            col_ptr[r + 1] += 1;
        }
        for i in 0..self.nrows {
            col_ptr[i + 1] += col_ptr[i];
        }

        let nnz = self.nnz();
        let mut row_idx = vec![0usize; nnz];
        let mut values = vec![0.0f64; nnz];
        // Visiting source columns in order leaves each output column sorted
        let mut cursor = col_ptr[..self.nrows].to_vec();
        for j in 0..self.ncols {
            for (r, v) in self.column(j) {
                let pos = cursor[r];
                row_idx[pos] = j;
                values[pos] = v;
                cursor[r] += 1;
            }
        }

        CscMatrix {
            nrows: self.ncols,
            ncols: self.nrows,
            col_ptr,
            row_idx,
            values,
        }
    }
}
