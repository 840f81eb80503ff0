use num_traits::Float;

/// Trait for the real element types a [`crate::DenseMatrix`] can hold.
///
/// Implemented for `f32` (the image boundary type) and `f64` (the precision
/// used inside every decomposition and transform).
pub trait Element: Float + Default + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static {
    /// Convert a `f64` value to the element type.
    fn from_double(x: f64) -> Self;

    /// Convert the element to `f64`.
    fn to_double(self) -> f64;
}

impl Element for f32 {
    #[inline]
    fn from_double(x: f64) -> Self {
        x as f32
    }

    #[inline]
    fn to_double(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    #[inline]
    fn from_double(x: f64) -> Self {
        x
    }

    #[inline]
    fn to_double(self) -> f64 {
        self
    }
}
