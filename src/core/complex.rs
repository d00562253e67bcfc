/// Complex amplitude scalar.
///
/// Each basis state of the register carries one amplitude α = re + im·i;
/// |α|² is the Born-rule probability of observing that basis state.
/// On the wire an amplitude is the object `{"real": re, "imag": im}`.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Complex {
    #[serde(rename = "real")]
    pub re: f64,
    #[serde(rename = "imag")]
    pub im: f64,
}

impl Complex {
    #[inline(always)]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self { re: 0.0, im: 0.0 }
    }

    #[inline(always)]
    pub const fn one() -> Self {
        Self { re: 1.0, im: 0.0 }
    }

    /// Squared magnitude: |z|² = re² + im²
    #[inline(always)]
    pub fn norm_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude: |z| = sqrt(re² + im²)
    #[inline(always)]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Scale by a real scalar
    #[inline(always)]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }

    /// Both components are finite (no NaN, no ±∞).
    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Exactly zero in both components.
    #[inline(always)]
    pub fn is_exact_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

/// Complex multiplication: (a + bi)(c + di) = (ac - bd) + (ad + bc)i
impl Mul for Complex {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

/// Approximate equality, tolerance 1e-10 per component.
impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        (self.re - other.re).abs() < 1e-10 && (self.im - other.im).abs() < 1e-10
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{:.6} + {:.6}i", self.re, self.im)
        } else {
            write!(f, "{:.6} - {:.6}i", self.re, self.im.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        assert_eq!(a + b, Complex::new(4.0, 6.0));
    }

    #[test]
    fn test_mul() {
        // (1 + 2i)(3 + 4i) = (3 - 8) + (4 + 6)i = -5 + 10i
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        assert_eq!(a * b, Complex::new(-5.0, 10.0));
    }

    #[test]
    fn test_norm() {
        // |3 + 4i| = 5
        let z = Complex::new(3.0, 4.0);
        assert!((z.norm() - 5.0).abs() < 1e-10);
        assert!((z.norm_sq() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_finite_checks() {
        assert!(Complex::new(1.0, -1.0).is_finite());
        assert!(!Complex::new(f64::NAN, 0.0).is_finite());
        assert!(!Complex::new(0.0, f64::INFINITY).is_finite());
        assert!(Complex::zero().is_exact_zero());
        assert!(!Complex::new(1e-300, 0.0).is_exact_zero());
    }

    #[test]
    fn test_wire_format() {
        let z = Complex::new(0.5, -0.25);
        let json = serde_json::to_string(&z).unwrap();
        assert_eq!(json, r#"{"real":0.5,"imag":-0.25}"#);
        let back: Complex = serde_json::from_str(r#"{"imag":-0.25,"real":0.5}"#).unwrap();
        assert_eq!(back, z);
    }

    #[test]
    fn test_display() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1.000000 - 2.000000i");
        assert_eq!(Complex::new(0.5, 0.0).to_string(), "0.500000 + 0.000000i");
    }
}
