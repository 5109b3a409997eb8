use std::f64::consts::TAU;

use log::{debug, error};
use num_complex::Complex64;

use super::SamplePoint;
use super::color::{BLACK, DomainColorizer};
use super::grid_lines::{
  DEFAULT_GRID_DENSITY, DEFAULT_LINE_WIDTH, SurfaceGrid, append_grid_lines,
};
use super::mesh::MeshBuffers;
use super::plane::within_vertex_range;
use crate::ComplexityError;
use crate::evaluator::{DEFAULT_MAX_EXPRESSION_LEN, FunctionExpression};

/// Inner radius of the sampled annulus; keeps the origin, where the
/// argument is undefined, out of the grid.
pub const R_MIN: f64 = 0.01;
/// Vertical distance between stacked sheets.
pub const SHEET_GAP: f64 = 1.2;

/// Annulus `r_min..=r_max` swept through `sheet_count` full turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarDomain {
  pub r_min: f64,
  pub r_max: f64,
  pub sheet_count: usize,
}

impl PolarDomain {
  pub fn with_radius(radius: f64, sheet_count: usize) -> Self {
    PolarDomain {
      r_min: R_MIN,
      r_max: radius,
      sheet_count,
    }
  }

  pub fn angular_extent(&self) -> f64 {
    TAU * self.sheet_count as f64
  }

  pub fn validate(&self) -> Result<(), ComplexityError> {
    if !(within_vertex_range(self.r_min) && within_vertex_range(self.r_max)) {
      return Err(ComplexityError::InvalidDomain(format!(
        "radii [{}, {}] are not finite f32 coordinates",
        self.r_min, self.r_max
      )));
    }
    if self.r_min <= 0.0 || self.r_min >= self.r_max {
      return Err(ComplexityError::InvalidDomain(format!(
        "radii must satisfy 0 < r_min < r_max, got [{}, {}]",
        self.r_min, self.r_max
      )));
    }

    if self.sheet_count == 0 {
      return Err(ComplexityError::InvalidDomain(
        "at least one sheet is required".into(),
      ));
    }
    Ok(())
  }
}

/// Sheet of outer grid row `i` out of `resolution`, i.e.
/// `floor(theta / 2pi)` computed exactly. The closing row at
/// `theta = 2pi * sheet_count` stays on the last sheet.
pub fn sheet_index(i: usize, resolution: usize, sheet_count: usize) -> usize {
  if resolution == 0 || sheet_count == 0 {
    return 0;
  }
  (i * sheet_count / resolution).min(sheet_count - 1)
}

/// Unwraps a function over several turns around the origin into stacked
/// sheets whose height encodes the phase of the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiemannSampler {
  pub grid_density: usize,
  pub line_width: f64,
  pub max_expression_len: usize,
}

impl Default for RiemannSampler {
  fn default() -> Self {
    RiemannSampler {
      grid_density: DEFAULT_GRID_DENSITY,
      line_width: DEFAULT_LINE_WIDTH,
      max_expression_len: DEFAULT_MAX_EXPRESSION_LEN,
    }
  }
}

impl RiemannSampler {
  /// Generates the Riemann mesh for `function`. Any expression or domain
  /// error yields the empty mesh; the reason is logged.
  pub fn generate(
    &self,
    function: &str,
    sheet_count: usize,
    resolution: usize,
    radius: f64,
  ) -> MeshBuffers {
    match self.try_generate(function, sheet_count, resolution, radius) {
      Ok(mesh) => mesh,
      Err(e) => {
        error!("riemann mesh for {function:?} not generated: {e}");
        MeshBuffers::empty()
      }
    }
  }

  pub fn try_generate(
    &self,
    function: &str,
    sheet_count: usize,
    resolution: usize,
    radius: f64,
  ) -> Result<MeshBuffers, ComplexityError> {
    if resolution == 0 {
      return Err(ComplexityError::InvalidResolution(resolution));
    }
    let domain = PolarDomain::with_radius(radius, sheet_count);
    domain.validate()?;
    let function =
      FunctionExpression::parse_with_limit(function, self.max_expression_len)?;
    Ok(self.mesh_for(&function, &domain, resolution))
  }

  /// Builds surface and overlay for an already parsed function. The
  /// domain and resolution are assumed valid.
  pub fn mesh_for(
    &self,
    function: &FunctionExpression,
    domain: &PolarDomain,
    resolution: usize,
  ) -> MeshBuffers {
    let samples = sample_polar_grid(function, domain, resolution);
    let failures = samples.iter().filter(|s| s.is_failure()).count();
    debug!(
      "riemann: {} samples of {:?} over {} sheets, {failures} failed",
      samples.len(),
      function.normalized(),
      domain.sheet_count
    );

    let mut mesh = MeshBuffers::with_capacity(
      samples.len(),
      2 * resolution * resolution,
    );
    let mut points = Vec::with_capacity(samples.len());
    for sample in &samples {
      let (r, theta) = sample.coords;
      let sheet = sheet_index(sample.i, resolution, domain.sheet_count);
      let base_height = sheet as f64 * SHEET_GAP;
      let (height, color) = match sample.argument() {
        Some(argument) => {
          let phase = DomainColorizer::phase_fraction(argument);
          (base_height + phase, DomainColorizer::color_for_sheet(phase))
        }
        None => (base_height, BLACK),
      };
      let point = [r * theta.cos(), height, r * theta.sin()];
      mesh.push_vertex(point, color);
      points.push(point);
    }
    mesh.push_grid_triangles(0, resolution);

    let grid = SurfaceGrid {
      points: &points,
      resolution,
    };
    let quads =
      append_grid_lines(&mut mesh, &grid, self.grid_density, self.line_width);
    debug!("riemann: {quads} grid line quads");

    mesh.compute_vertex_normals();
    mesh
  }
}

/// Evaluates `function` on the polar grid: `theta = i * dtheta` outer,
/// `r = r_min + j * dr` inner.
pub fn sample_polar_grid(
  function: &FunctionExpression,
  domain: &PolarDomain,
  resolution: usize,
) -> Vec<SamplePoint> {
  let n = resolution as f64;
  let theta_step = domain.angular_extent() / n;
  let r_step = (domain.r_max - domain.r_min) / n;

  let mut samples = Vec::with_capacity((resolution + 1) * (resolution + 1));
  for i in 0..=resolution {
    let theta = i as f64 * theta_step;
    for j in 0..=resolution {
      let r = domain.r_min + j as f64 * r_step;
      let z = Complex64::from_polar(r, theta);
      samples.push(SamplePoint {
        i,
        j,
        coords: (r, theta),
        output: function.evaluate(z),
      });
    }
  }
  samples
}
