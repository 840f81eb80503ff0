//! Adapters between opaque single-channel image planes and [`DenseMatrix`].
//!
//! Image containers stay outside of this workspace. Anything that can report
//! its size and read a pixel by `(row, col)` implements [`Plane`] and can be
//! fed to the linear algebra and FFT engines through [`DenseMatrix::from_plane`].

use crate::{element::Element, error::MatrixError, matrix::DenseMatrix};

/// A read-only two-dimensional plane of float samples.
pub trait Plane {
    /// Number of rows (image height).
    fn height(&self) -> usize;

    /// Number of columns (image width).
    fn width(&self) -> usize;

    /// The sample at `(row, col)`.
    ///
    /// Callers only ask for `row < height()` and `col < width()`.
    fn value(&self, row: usize, col: usize) -> f32;
}

/// A writable two-dimensional plane of float samples.
pub trait PlaneMut: Plane {
    /// Overwrite the sample at `(row, col)`.
    fn set_value(&mut self, row: usize, col: usize, value: f32);
}

impl<T: Element> Plane for DenseMatrix<T> {
    fn height(&self) -> usize {
        self.rows()
    }

    fn width(&self) -> usize {
        self.cols()
    }

    fn value(&self, row: usize, col: usize) -> f32 {
        self[(row, col)].to_double() as f32
    }
}

impl<T: Element> PlaneMut for DenseMatrix<T> {
    fn set_value(&mut self, row: usize, col: usize, value: f32) {
        self[(row, col)] = T::from_double(value as f64);
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Copy a plane into a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::EmptyShape`] if the plane has no samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixalg_matrix::{DenseMatrix, Plane};
    ///
    /// let src = DenseMatrix::<f32>::from_rows(&[[1.0f32, 2.0], [3.0, 4.0]]).unwrap();
    /// let m = DenseMatrix::<f64>::from_plane(&src).unwrap();
    /// assert_eq!(m.get(1, 0).unwrap(), 3.0);
    /// ```
    pub fn from_plane<P: Plane + ?Sized>(plane: &P) -> Result<Self, MatrixError> {
        Self::from_fn(plane.height(), plane.width(), |r, c| {
            T::from_double(plane.value(r, c) as f64)
        })
    }

    /// Copy the matrix into a plane of the same size.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if the plane has another size.
    pub fn write_plane<P: PlaneMut + ?Sized>(&self, plane: &mut P) -> Result<(), MatrixError> {
        let plane_shape = [plane.height(), plane.width()];
        if plane_shape != self.shape() {
            return Err(MatrixError::dimension_mismatch(
                "destination plane must match the matrix size",
                self.shape(),
                plane_shape,
            ));
        }
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                plane.set_value(r, c, self[(r, c)].to_double() as f32);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Column-major plane standing in for an external image type.
    struct ColumnMajorPlane {
        width: usize,
        height: usize,
        data: Vec<f32>,
    }

    impl Plane for ColumnMajorPlane {
        fn height(&self) -> usize {
            self.height
        }

        fn width(&self) -> usize {
            self.width
        }

        fn value(&self, row: usize, col: usize) -> f32 {
            self.data[col * self.height + row]
        }
    }

    impl PlaneMut for ColumnMajorPlane {
        fn set_value(&mut self, row: usize, col: usize, value: f32) {
            self.data[col * self.height + row] = value;
        }
    }

    #[test]
    fn test_from_plane_reads_row_col() -> Result<(), MatrixError> {
        let plane = ColumnMajorPlane {
            width: 3,
            height: 2,
            data: vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0],
        };
        let m = DenseMatrix::<f64>::from_plane(&plane)?;
        assert_eq!(m.shape(), [2, 3]);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_write_plane() -> Result<(), MatrixError> {
        let m = DenseMatrix::<f64>::from_fn(2, 3, |r, c| (r * 3 + c) as f64 * 0.5)?;
        let mut plane = ColumnMajorPlane {
            width: 3,
            height: 2,
            data: vec![0.0; 6],
        };
        m.write_plane(&mut plane)?;
        assert_eq!(plane.data, vec![0.0, 1.5, 0.5, 2.0, 1.0, 2.5]);

        let mut wrong = ColumnMajorPlane {
            width: 2,
            height: 3,
            data: vec![0.0; 6],
        };
        assert!(matches!(
            m.write_plane(&mut wrong),
            Err(MatrixError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_empty_plane() {
        let plane = ColumnMajorPlane {
            width: 0,
            height: 4,
            data: vec![],
        };
        assert_eq!(
            DenseMatrix::<f32>::from_plane(&plane),
            Err(MatrixError::EmptyShape { rows: 4, cols: 0 })
        );
    }
}
