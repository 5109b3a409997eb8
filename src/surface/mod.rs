//! Mesh generation for complex functions.
//!
//! [`plane::PlaneSampler`] samples a rectangle of the complex plane into a
//! domain-colored height field, [`riemann::RiemannSampler`] unwraps a polar
//! region over several turns into stacked sheets with a grid-line overlay.
//! Both sample through [`crate::FunctionExpression`] and color through
//! [`color::DomainColorizer`].

use num_complex::Complex64;

use crate::evaluator::EvalError;

pub mod color;
pub mod grid_lines;
pub mod mesh;
pub mod plane;
pub mod riemann;

/// One evaluated grid sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
  /// Outer grid index.
  pub i: usize,
  /// Inner grid index.
  pub j: usize,
  /// `(x, y)` for the plane, `(r, theta)` for the polar grid.
  pub coords: (f64, f64),
  pub output: Result<Complex64, EvalError>,
}

impl SamplePoint {
  pub fn modulus(&self) -> Option<f64> {
    self.output.as_ref().ok().map(|w| w.norm())
  }

  /// Principal argument in (-pi, pi].
  pub fn argument(&self) -> Option<f64> {
    self.output.as_ref().ok().map(|w| w.arg())
  }

  pub fn is_failure(&self) -> bool {
    self.output.is_err()
  }
}
