use log::{debug, error};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::SamplePoint;
use super::color::{BLACK, DomainColorizer};
use super::mesh::MeshBuffers;
use crate::ComplexityError;
use crate::evaluator::{DEFAULT_MAX_EXPRESSION_LEN, FunctionExpression};

/// Vertical scale applied to normalized heights in relief mode.
pub const HEIGHT_SCALE: f64 = 1.5;

/// How the planar mesh uses the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightMode {
  /// Every vertex at height 0 (2D view).
  #[serde(rename = "2d")]
  Flat,
  /// Height follows the log-compressed modulus (3D view).
  #[default]
  #[serde(rename = "3d")]
  Relief,
}

/// Axis-aligned rectangle of the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneDomain {
  pub re_min: f64,
  pub re_max: f64,
  pub im_min: f64,
  pub im_max: f64,
}

impl Default for PlaneDomain {
  fn default() -> Self {
    PlaneDomain {
      re_min: -2.0,
      re_max: 2.0,
      im_min: -2.0,
      im_max: 2.0,
    }
  }
}

impl PlaneDomain {
  pub fn new(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Self {
    PlaneDomain {
      re_min,
      re_max,
      im_min,
      im_max,
    }
  }

  /// Square domain `[-half, half]^2`.
  pub fn centered(half: f64) -> Self {
    Self::new(-half, half, -half, half)
  }

  pub fn validate(&self) -> Result<(), ComplexityError> {
    let bounds = [self.re_min, self.re_max, self.im_min, self.im_max];
    if bounds.iter().any(|&b| !within_vertex_range(b)) {
      return Err(ComplexityError::InvalidDomain(format!(
        "bounds {bounds:?} are not finite f32 coordinates"
      )));
    }
    if self.re_min >= self.re_max || self.im_min >= self.im_max {
      return Err(ComplexityError::InvalidDomain(format!(
        "empty rectangle re [{}, {}], im [{}, {}]",
        self.re_min, self.re_max, self.im_min, self.im_max
      )));
    }
    Ok(())
  }
}

/// Vertex coordinates are stored as `f32`; anything beyond its range (and so
/// any overflowing extent) cannot be placed.
pub(crate) fn within_vertex_range(value: f64) -> bool {
  value.is_finite() && value.abs() <= f32::MAX as f64
}

/// Samples a rectangle of the complex plane into a domain-colored mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSampler {
  pub height_scale: f64,
  pub max_expression_len: usize,
}

impl Default for PlaneSampler {
  fn default() -> Self {
    PlaneSampler {
      height_scale: HEIGHT_SCALE,
      max_expression_len: DEFAULT_MAX_EXPRESSION_LEN,
    }
  }
}

impl PlaneSampler {
  /// Generates the mesh for `function`. Any expression or domain error
  /// yields the empty mesh; the reason is logged.
  pub fn generate(
    &self,
    function: &str,
    domain: &PlaneDomain,
    resolution: usize,
    mode: HeightMode,
  ) -> MeshBuffers {
    match self.try_generate(function, domain, resolution, mode) {
      Ok(mesh) => mesh,
      Err(e) => {
        error!("plane mesh for {function:?} not generated: {e}");
        MeshBuffers::empty()
      }
    }
  }

  pub fn try_generate(
    &self,
    function: &str,
    domain: &PlaneDomain,
    resolution: usize,
    mode: HeightMode,
  ) -> Result<MeshBuffers, ComplexityError> {
    if resolution == 0 {
      return Err(ComplexityError::InvalidResolution(resolution));
    }
    domain.validate()?;
    let function =
      FunctionExpression::parse_with_limit(function, self.max_expression_len)?;
    Ok(self.mesh_for(&function, domain, resolution, mode))
  }

  /// Builds the mesh for an already parsed function. The domain and
  /// resolution are assumed valid.
  pub fn mesh_for(
    &self,
    function: &FunctionExpression,
    domain: &PlaneDomain,
    resolution: usize,
    mode: HeightMode,
  ) -> MeshBuffers {
    let samples = sample_grid(function, domain, resolution);
    let max_modulus = max_modulus(&samples);
    debug!(
      "plane: {} samples of {:?}, max modulus {max_modulus}",
      samples.len(),
      function.normalized()
    );

    let mut mesh = MeshBuffers::with_capacity(
      samples.len(),
      2 * resolution * resolution,
    );
    for sample in &samples {
      let (x, y) = sample.coords;
      let (height, color) = match sample.output {
        Ok(w) => {
          let height = match mode {
            HeightMode::Flat => 0.0,
            HeightMode::Relief => {
              DomainColorizer::normalize_height(w.norm(), max_modulus)
                * self.height_scale
            }
          };
          (height, DomainColorizer::color_for(w, max_modulus))
        }
        Err(_) => (0.0, BLACK),
      };
      mesh.push_vertex([x, y, height], color);
    }
    mesh.push_grid_triangles(0, resolution);
    mesh.compute_vertex_normals();
    mesh
  }
}

/// First pass: evaluates `function` on the `(resolution + 1)^2` grid,
/// `x = re_min + i * dx` outer, `y = im_min + j * dy` inner.
pub fn sample_grid(
  function: &FunctionExpression,
  domain: &PlaneDomain,
  resolution: usize,
) -> Vec<SamplePoint> {
  let n = resolution as f64;
  let re_step = (domain.re_max - domain.re_min) / n;
  let im_step = (domain.im_max - domain.im_min) / n;

  let mut samples = Vec::with_capacity((resolution + 1) * (resolution + 1));
  for i in 0..=resolution {
    let x = domain.re_min + i as f64 * re_step;
    for j in 0..=resolution {
      let y = domain.im_min + j as f64 * im_step;
      let z = Complex64::new(x, y);
      samples.push(SamplePoint {
        i,
        j,
        coords: (x, y),
        output: function.evaluate(z),
      });
    }
  }
  samples
}

/// Largest modulus among successful samples, 0 when none succeeded.
pub fn max_modulus(samples: &[SamplePoint]) -> f64 {
  samples
    .iter()
    .filter_map(SamplePoint::modulus)
    .fold(0.0, f64::max)
}
