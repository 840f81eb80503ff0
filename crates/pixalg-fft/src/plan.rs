//! One-dimensional FFT plans.
//!
//! A plan precomputes everything that depends only on the transform length.
//! Power-of-two lengths use the iterative radix-2 Cooley-Tukey algorithm.
//! Every other length is mapped onto a power-of-two circular convolution with
//! Bluestein's chirp-z algorithm, so any length `n >= 1` is supported without
//! padding the output.
//!
//! Both directions are unnormalized: `inverse(forward(x)) == n * x`.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::FftError;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `X[k] = sum_j x[j] * exp(-2*pi*i*j*k/n)`
    Forward,
    /// `x[j] = sum_k X[k] * exp(+2*pi*i*j*k/n)`, without the `1/n` factor.
    Inverse,
}

/// Iterative radix-2 decimation in time for power-of-two lengths.
#[derive(Debug, Clone)]
struct Radix2 {
    len: usize,
    /// `exp(-2*pi*i*k/len)` for `k < len / 2`.
    twiddles: Vec<Complex64>,
}

impl Radix2 {
    fn new(len: usize) -> Self {
        debug_assert!(len.is_power_of_two());
        let twiddles = (0..len / 2)
            .map(|k| Complex64::from_polar(1.0, -2.0 * PI * k as f64 / len as f64))
            .collect();
        Self { len, twiddles }
    }

    fn process(&self, buf: &mut [Complex64], direction: Direction) {
        let n = self.len;
        debug_assert_eq!(buf.len(), n);
        if n <= 1 {
            return;
        }

        // bit-reversal permutation
        let bits = n.trailing_zeros();
        for i in 0..n {
            let j = i.reverse_bits() >> (usize::BITS - bits);
            if i < j {
                buf.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let w = match direction {
                        Direction::Forward => self.twiddles[k * stride],
                        Direction::Inverse => self.twiddles[k * stride].conj(),
                    };
                    let even = buf[start + k];
                    let odd = buf[start + k + half] * w;
                    buf[start + k] = even + odd;
                    buf[start + k + half] = even - odd;
                }
            }
            len *= 2;
        }
    }
}

/// Bluestein's algorithm for arbitrary lengths.
#[derive(Debug, Clone)]
struct Bluestein {
    len: usize,
    /// `exp(-pi*i*k^2/len)` for `k < len`.
    chirp: Vec<Complex64>,
    /// Forward transform of the conjugate chirp, wrapped to the inner length.
    kernel: Vec<Complex64>,
    inner: Radix2,
}

impl Bluestein {
    fn new(len: usize) -> Self {
        let inner_len = (2 * len - 1).next_power_of_two();
        let inner = Radix2::new(inner_len);

        // k^2 is reduced modulo 2 * len to keep the angle small
        let chirp: Vec<Complex64> = (0..len)
            .map(|k| {
                let k2 = (k as u128 * k as u128) % (2 * len as u128);
                Complex64::from_polar(1.0, -PI * k2 as f64 / len as f64)
            })
            .collect();

        let mut kernel = vec![Complex64::default(); inner_len];
        kernel[0] = chirp[0].conj();
        for k in 1..len {
            kernel[k] = chirp[k].conj();
            kernel[inner_len - k] = chirp[k].conj();
        }
        inner.process(&mut kernel, Direction::Forward);

        Self {
            len,
            chirp,
            kernel,
            inner,
        }
    }

    fn process(&self, buf: &mut [Complex64], direction: Direction) {
        let n = self.len;
        let m = self.inner.len;
        debug_assert_eq!(buf.len(), n);

        // the inverse transform is conj(forward(conj(x)))
        if direction == Direction::Inverse {
            buf.iter_mut().for_each(|x| *x = x.conj());
        }

        let mut work = vec![Complex64::default(); m];
        for ((w, x), c) in work.iter_mut().zip(buf.iter()).zip(&self.chirp) {
            *w = x * c;
        }
        self.inner.process(&mut work, Direction::Forward);
        for (w, k) in work.iter_mut().zip(&self.kernel) {
            *w *= *k;
        }
        self.inner.process(&mut work, Direction::Inverse);

        let scale = 1.0 / m as f64;
        for ((x, w), c) in buf.iter_mut().zip(&work).zip(&self.chirp) {
            *x = w * c * scale;
        }

        if direction == Direction::Inverse {
            buf.iter_mut().for_each(|x| *x = x.conj());
        }
    }
}

#[derive(Debug, Clone)]
enum Kernel {
    Radix2(Radix2),
    Bluestein(Bluestein),
}

/// A reusable one-dimensional FFT of a fixed length.
///
/// Plans are plain values with no shared state: build as many as needed and
/// use them from any thread.
///
/// # Examples
///
/// ```
/// use num_complex::Complex64;
/// use pixalg_fft::plan::FftPlan;
///
/// let plan = FftPlan::new(3).unwrap();
/// let mut buf = vec![Complex64::new(1.0, 0.0); 3];
/// plan.forward(&mut buf).unwrap();
/// assert!((buf[0].re - 3.0).abs() < 1e-12);
/// assert!(buf[1].norm() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FftPlan {
    size: usize,
    kernel: Kernel,
}

impl FftPlan {
    /// Plan a transform of `size` points.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidLength`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self, FftError> {
        if size == 0 {
            return Err(FftError::InvalidLength { length: size });
        }
        let kernel = if size.is_power_of_two() {
            Kernel::Radix2(Radix2::new(size))
        } else {
            Kernel::Bluestein(Bluestein::new(size))
        };
        Ok(Self { size, kernel })
    }

    /// Number of points of the transform.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the plan runs through Bluestein's algorithm.
    pub fn is_bluestein(&self) -> bool {
        matches!(self.kernel, Kernel::Bluestein(_))
    }

    /// Transform `buf` in place.
    ///
    /// # Errors
    ///
    /// Returns [`FftError::InvalidArgument`] if `buf` does not hold exactly
    /// [`Self::size`] points.
    pub fn process(&self, buf: &mut [Complex64], direction: Direction) -> Result<(), FftError> {
        if buf.len() != self.size {
            return Err(FftError::InvalidArgument {
                reason: format!(
                    "buffer holds {} points, the plan expects {}",
                    buf.len(),
                    self.size
                ),
            });
        }
        match &self.kernel {
            Kernel::Radix2(k) => k.process(buf, direction),
            Kernel::Bluestein(k) => k.process(buf, direction),
        }
        Ok(())
    }

    /// Forward transform of `buf` in place.
    ///
    /// # Errors
    ///
    /// See [`Self::process`].
    pub fn forward(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        self.process(buf, Direction::Forward)
    }

    /// Unnormalized inverse transform of `buf` in place.
    ///
    /// # Errors
    ///
    /// See [`Self::process`].
    pub fn inverse(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        self.process(buf, Direction::Inverse)
    }
}
