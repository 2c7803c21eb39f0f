use num_traits::Float;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Complex<F = f64> {
    pub real: F,
    pub imaginary: F,
}

impl<F: Float> Complex<F> {
    pub fn new(real: F, imaginary: F) -> Self {
        Self { real, imaginary }
    }

    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.real, -self.imaginary)
    }

    pub fn norm_squared(self) -> F {
        self.real * self.real + self.imaginary * self.imaginary
    }

    /// `z * z + constant`, written out on the components.
    pub fn square_add(self, constant: Self) -> Self {
        let two = F::one() + F::one();
        Self {
            real: self.real * self.real - self.imaginary * self.imaginary + constant.real,
            imaginary: two * self.real * self.imaginary + constant.imaginary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Complex;

    #[test]
    fn square_add_matches_complex_multiplication() {
        // (1 + 2i)^2 + (0.5 - i) = (1 - 4 + 0.5) + (4 - 1)i
        let z = Complex::new(1.0, 2.0).square_add(Complex::new(0.5, -1.0));
        assert_eq!(z, Complex::new(-2.5, 3.0));
    }

    #[test]
    fn conjugate_flips_imaginary_part() {
        assert_eq!(Complex::new(0.25, -0.5).conjugate(), Complex::new(0.25, 0.5));
    }
}
