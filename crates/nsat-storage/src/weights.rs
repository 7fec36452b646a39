//! Delimited weight/connectivity matrix files
//!
//! The engine reads one matrix per projection: one row per pre-synaptic
//! neuron, one column per post-synaptic neuron, values separated by
//! whitespace and printed with a fixed number of decimals.

use crate::error::{Result, StorageError};

use rand::Rng;
use std::fmt::Write as _;
use std::ops::Range;
use std::path::Path;

/// Dense row-major weight matrix
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

/// How a matrix is printed to text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    /// Digits after the decimal point
    pub precision: usize,
    /// Separator between values on a row
    pub delimiter: &'static str,
}

impl TextFormat {
    /// Projection weight files: two decimals, single space
    pub const CONNECTIONS: Self = Self {
        precision: 2,
        delimiter: " ",
    };

    /// Layer-to-layer matrices: one decimal, double space
    pub const MATRIX: Self = Self {
        precision: 1,
        delimiter: "  ",
    };
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::CONNECTIONS
    }
}

impl WeightMatrix {
    /// Create an all-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(StorageError::invalid_format(format!(
                    "row {} has {} values, expected {}",
                    i + 1,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Each entry is 0 or 1 with equal probability, scaled by `factor`
    pub fn random_binary<R: Rng + ?Sized>(rows: usize, cols: usize, factor: f32, rng: &mut R) -> Self {
        let data = (0..rows * cols)
            .map(|_| if rng.gen::<bool>() { factor } else { 0.0 })
            .collect();
        Self { rows, cols, data }
    }

    /// Square zero matrix whose diagonal holds integers drawn from `range`
    pub fn random_diagonal<R: Rng + ?Sized>(n: usize, range: Range<i32>, rng: &mut R) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.set(i, i, rng.gen_range(range.clone()) as f32);
        }
        matrix
    }

    /// Matrix of integers drawn from `range`
    pub fn random_integer<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        range: Range<i32>,
        rng: &mut R,
    ) -> Self {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(range.clone()) as f32)
            .collect();
        Self { rows, cols, data }
    }

    /// Number of rows (pre-synaptic neurons)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (post-synaptic neurons)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite the entry at `(row, col)`
    ///
    /// # Panics
    /// Panics if the position is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(row < self.rows && col < self.cols, "({}, {}) outside {}x{}", row, col, self.rows, self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Values of one row
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on zero; an empty-column matrix has no values anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// All values in row-major order
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Transposed copy
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Multiply every entry by `factor`
    pub fn scale(&mut self, factor: f32) {
        self.data.iter_mut().for_each(|w| *w *= factor);
    }

    /// Number of non-zero entries
    pub fn nonzero_count(&self) -> usize {
        self.data.iter().filter(|&&w| w != 0.0).count()
    }

    /// Smallest and largest entry
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut it = self.data.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), w| (lo.min(w), hi.max(w))))
    }

    /// Check the matrix against expected pre/post population sizes
    pub fn expect_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() != (rows, cols) {
            return Err(StorageError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Render as delimited text, one row per line
    pub fn to_text(&self, format: TextFormat) -> String {
        let mut out = String::new();
        for row in self.iter_rows() {
            for (i, w) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str(format.delimiter);
                }
                // Writing into a String cannot fail.
                let _ = write!(out, "{:.*}", format.precision, w);
            }
            out.push('\n');
        }
        out
    }

    /// Write as delimited text
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: TextFormat) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_text(format))?;
        log::info!("wrote {}x{} matrix to {}", self.rows, self.cols, path.display());
        Ok(())
    }

    /// Parse whitespace-delimited text; blank lines are skipped
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f32>().map_err(|e| {
                        StorageError::invalid_format(format!(
                            "line {}: '{}' is not a number ({})",
                            line_no + 1,
                            tok,
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<f32>>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Read a delimited matrix file
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let matrix = Self::parse(&text)?;
        log::debug!("read {}x{} matrix from {}", matrix.rows, matrix.cols, path.display());
        Ok(matrix)
    }

    /// Read a matrix and check it connects `rows` pre- to `cols` post-synaptic neurons
    pub fn read_with_shape<P: AsRef<Path>>(path: P, rows: usize, cols: usize) -> Result<Self> {
        let matrix = Self::read_from_file(path)?;
        matrix.expect_shape(rows, cols)?;
        Ok(matrix)
    }
}
