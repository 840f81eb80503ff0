use std::ops::{Index, IndexMut};

use crate::{element::Element, error::MatrixError};

/// A dense two-dimensional matrix with owned, row-major data.
///
/// `DenseMatrix` is the substrate every algorithm in the workspace operates on.
/// It owns a contiguous buffer of `rows * cols` elements where element
/// `(r, c)` lives at offset `r * cols + c`.
///
/// # Invariants
///
/// * `rows >= 1` and `cols >= 1`.
/// * `data.len() == rows * cols`.
///
/// Cloning copies the buffer and [`DenseMatrix::transpose`] allocates a new one,
/// so two matrices never share storage.
///
/// # Examples
///
/// ```
/// use pixalg_matrix::DenseMatrix;
///
/// let m = DenseMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(m.shape(), [2, 3]);
/// assert_eq!(m.get(1, 2).unwrap(), 6.0);
///
/// let t = m.transpose();
/// assert_eq!(t.shape(), [3, 2]);
/// assert_eq!(t.get(2, 1).unwrap(), 6.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix<T = f64> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

fn check_shape(rows: usize, cols: usize) -> Result<(), MatrixError> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::EmptyShape { rows, cols });
    }
    Ok(())
}

impl<T: Element> DenseMatrix<T> {
    /// Create a matrix from a row-major data buffer.
    ///
    /// # Arguments
    ///
    /// * `rows` - The number of rows.
    /// * `cols` - The number of columns.
    /// * `data` - The elements in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::EmptyShape`] if a dimension is zero and
    /// [`MatrixError::InvalidShape`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        check_shape(rows, cols)?;
        if data.len() != rows * cols {
            return Err(MatrixError::InvalidShape {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Self::from_shape_val(rows, cols, T::zero())
    }

    /// Create a matrix filled with the same value.
    pub fn from_shape_val(rows: usize, cols: usize, val: T) -> Result<Self, MatrixError> {
        check_shape(rows, cols)?;
        Ok(Self {
            data: vec![val; rows * cols],
            rows,
            cols,
        })
    }

    /// Create a matrix whose elements are produced by `f(row, col)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::<f64>::from_fn(2, 2, |r, c| (r * 2 + c) as f64).unwrap();
    /// assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, MatrixError> {
        check_shape(rows, cols)?;
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Ok(Self { data, rows, cols })
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        Self::from_fn(n, n, |r, c| if r == c { T::one() } else { T::zero() })
    }

    /// Create a square matrix with `diag` on its main diagonal.
    pub fn from_diagonal(diag: &[T]) -> Result<Self, MatrixError> {
        let n = diag.len();
        Self::from_fn(n, n, |r, c| if r == c { diag[r] } else { T::zero() })
    }

    /// Create a matrix from a slice of rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::RaggedRows`] if the rows have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
    /// assert_eq!(m.shape(), [2, 2]);
    /// assert!(DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        check_shape(nrows, ncols)?;
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: ncols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    /// The number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The shape as `[rows, cols]`.
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Whether the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The row-major data buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The mutable row-major data buffer.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the matrix and returns its row-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfBounds`] if the index is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::index_out_of_bounds(row, col, self.shape()));
        }
        Ok(self.data[row * self.cols + col])
    }

    /// Set the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IndexOutOfBounds`] if the index is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::index_out_of_bounds(row, col, self.shape()));
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Borrow a row as a slice.
    pub fn row(&self, row: usize) -> Result<&[T], MatrixError> {
        if row >= self.rows {
            return Err(MatrixError::index_out_of_bounds(row, 0, self.shape()));
        }
        Ok(&self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Copy a column into a new vector.
    pub fn col(&self, col: usize) -> Result<Vec<T>, MatrixError> {
        if col >= self.cols {
            return Err(MatrixError::index_out_of_bounds(0, col, self.shape()));
        }
        Ok((0..self.rows).map(|r| self.data[r * self.cols + col]).collect())
    }

    /// Iterate over the rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.cols)
    }

    /// Return the transpose as a new matrix.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c]);
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Apply `f` to every element and return the result as a new matrix.
    pub fn map<U: Element>(&self, f: impl Fn(T) -> U) -> DenseMatrix<U> {
        DenseMatrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Convert the elements to another element type.
    pub fn cast<U: Element>(&self) -> DenseMatrix<U> {
        self.map(|x| U::from_double(x.to_double()))
    }

    /// Copy the matrix into double precision.
    pub fn to_f64(&self) -> DenseMatrix<f64> {
        self.cast()
    }

    /// Copy the matrix into single precision.
    pub fn to_f32(&self) -> DenseMatrix<f32> {
        self.cast()
    }

    /// Matrix product `self * rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if `self.cols() != rhs.rows()`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self, MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::dimension_mismatch(
                "inner dimensions of the product must agree",
                [self.cols, rhs.cols],
                rhs.shape(),
            ));
        }
        let mut out = vec![T::zero(); self.rows * rhs.cols];
        for i in 0..self.rows {
            let out_row = &mut out[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == T::zero() {
                    continue;
                }
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, &b) in out_row.iter_mut().zip(rhs_row) {
                    *o = *o + a * b;
                }
            }
        }
        Ok(Self {
            data: out,
            rows: self.rows,
            cols: rhs.cols,
        })
    }

    fn zip_with(&self, rhs: &Self, op: &str, f: impl Fn(T, T) -> T) -> Result<Self, MatrixError> {
        if self.shape() != rhs.shape() {
            return Err(MatrixError::dimension_mismatch(
                format!("operands of {op} must have the same shape"),
                self.shape(),
                rhs.shape(),
            ));
        }
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Element-wise sum.
    pub fn add(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn sub(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| x * factor)
    }

    /// Sum of the main diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] for rectangular matrices.
    pub fn trace(&self) -> Result<T, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((0..self.rows).fold(T::zero(), |acc, i| acc + self[(i, i)]))
    }

    /// Copy of the main diagonal.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows.min(self.cols)).map(|i| self[(i, i)]).collect()
    }

    /// Maximum absolute column sum.
    pub fn norm1(&self) -> T {
        (0..self.cols)
            .map(|c| (0..self.rows).fold(T::zero(), |acc, r| acc + self[(r, c)].abs()))
            .fold(T::zero(), T::max)
    }

    /// Maximum absolute row sum.
    pub fn norm_inf(&self) -> T {
        self.row_iter()
            .map(|row| row.iter().fold(T::zero(), |acc, &x| acc + x.abs()))
            .fold(T::zero(), T::max)
    }

    /// Frobenius norm, the square root of the sum of squares.
    pub fn norm_frobenius(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.hypot(x))
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }

    /// Largest absolute element-wise difference between two same-shaped matrices.
    pub fn max_abs_diff(&self, rhs: &Self) -> Result<T, MatrixError> {
        Ok(self.sub(rhs)?.max_abs())
    }

    /// Whether `|a[i][j] - a[j][i]| <= tol` for all `i, j`.
    ///
    /// Rectangular matrices are never symmetric.
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        (0..self.rows).all(|i| (0..i).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol))
    }

    /// Copy of the block `rows r0..r1`, `cols c0..c1` (half-open ranges).
    ///
    /// # Errors
    ///
    /// Returns an error if a range is empty or exceeds the matrix.
    pub fn submatrix(
        &self,
        r0: usize,
        r1: usize,
        c0: usize,
        c1: usize,
    ) -> Result<Self, MatrixError> {
        if r1 > self.rows || c1 > self.cols {
            return Err(MatrixError::index_out_of_bounds(r1, c1, self.shape()));
        }
        let rows = r1.saturating_sub(r0);
        let cols = c1.saturating_sub(c0);
        Self::from_fn(rows, cols, |r, c| self[(r0 + r, c0 + c)])
    }

    /// Copy of the rows listed in `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self, MatrixError> {
        check_shape(indices.len(), self.cols)?;
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &r in indices {
            data.extend_from_slice(self.row(r)?);
        }
        Ok(Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        })
    }
}

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    /// Panics if the index is out of bounds, like slice indexing.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for matrix of shape {}x{}",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for matrix of shape {}x{}",
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

impl<T: Element> std::fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x:.6}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_checks_shape() {
        assert_eq!(
            DenseMatrix::<f64>::new(0, 2, vec![]),
            Err(MatrixError::EmptyShape { rows: 0, cols: 2 })
        );
        assert_eq!(
            DenseMatrix::new(2, 3, vec![1.0f32; 5]),
            Err(MatrixError::InvalidShape {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_get_set() -> Result<(), MatrixError> {
        let mut m = DenseMatrix::<f32>::zeros(2, 3)?;
        m.set(1, 2, 5.0)?;
        assert_eq!(m.get(1, 2)?, 5.0);
        assert_eq!(m.as_slice(), &[0.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        assert_eq!(
            m.get(2, 0),
            Err(MatrixError::IndexOutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        assert!(m.set(0, 3, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn test_transpose_does_not_alias() -> Result<(), MatrixError> {
        let m = DenseMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        let mut t = m.transpose();
        assert_eq!(t.shape(), [3, 2]);
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        t.set(0, 0, 100.0)?;
        assert_eq!(m.get(0, 0)?, 1.0);

        let mut c = m.clone();
        c.set(1, 1, -1.0)?;
        assert_eq!(m.get(1, 1)?, 5.0);
        Ok(())
    }

    #[test]
    fn test_matmul() -> Result<(), MatrixError> {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
        let b = DenseMatrix::from_rows(&[[1.0, 0.0, 2.0], [0.0, 1.0, 3.0]])?;
        let c = a.matmul(&b)?;
        assert_eq!(c.shape(), [3, 3]);
        #[rustfmt::skip]
        assert_eq!(
            c.as_slice(),
            &[
                1.0, 2.0, 8.0,
                3.0, 4.0, 18.0,
                5.0, 6.0, 28.0,
            ]
        );
        assert!(matches!(
            a.matmul(&a),
            Err(MatrixError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_norms_and_trace() -> Result<(), MatrixError> {
        let m = DenseMatrix::from_rows(&[[1.0, -2.0], [-3.0, 4.0]])?;
        assert_eq!(m.norm1(), 6.0);
        assert_eq!(m.norm_inf(), 7.0);
        assert_relative_eq!(m.norm_frobenius(), 30.0f64.sqrt(), epsilon = 1e-12);
        assert_eq!(m.trace()?, 5.0);
        assert_eq!(m.trace()?, m.transpose().trace()?);
        assert_eq!(m.max_abs(), 4.0);

        let r = DenseMatrix::<f64>::zeros(2, 3)?;
        assert_eq!(r.trace(), Err(MatrixError::NotSquare { rows: 2, cols: 3 }));
        Ok(())
    }

    #[test]
    fn test_symmetry() -> Result<(), MatrixError> {
        let s = DenseMatrix::from_rows(&[[2.0, 1.0], [1.0 + 1e-12, 2.0]])?;
        assert!(s.is_symmetric(1e-9));
        assert!(!s.is_symmetric(0.0));
        assert!(!DenseMatrix::<f64>::zeros(2, 3)?.is_symmetric(1.0));
        Ok(())
    }

    #[test]
    fn test_submatrix_and_select_rows() -> Result<(), MatrixError> {
        let m = DenseMatrix::<f64>::from_fn(3, 3, |r, c| (r * 3 + c) as f64)?;
        let s = m.submatrix(1, 3, 0, 2)?;
        assert_eq!(s.as_slice(), &[3.0, 4.0, 6.0, 7.0]);
        let p = m.select_rows(&[2, 0])?;
        assert_eq!(p.as_slice(), &[6.0, 7.0, 8.0, 0.0, 1.0, 2.0]);
        assert!(m.submatrix(0, 4, 0, 1).is_err());
        Ok(())
    }

    #[test]
    fn test_cast_roundtrip() -> Result<(), MatrixError> {
        let m = DenseMatrix::<f32>::from_rows(&[[0.5f32, 1.25], [-2.0, 3.0]])?;
        let d = m.to_f64();
        assert_eq!(d.as_slice(), &[0.5f64, 1.25, -2.0, 3.0]);
        assert_eq!(d.to_f32(), m);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let m = DenseMatrix::<f64>::identity(2).unwrap();
        let _ = m[(2, 0)];
    }
}
