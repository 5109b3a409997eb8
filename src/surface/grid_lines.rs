//! Wireframe overlay for the Riemann surface: thin dark quads traced along
//! grid lines of the already sampled surface.

use super::color::Rgb;
use super::mesh::MeshBuffers;

pub const DEFAULT_GRID_DENSITY: usize = 20;
pub const DEFAULT_LINE_WIDTH: f64 = 0.02;
pub const LINE_COLOR: Rgb = Rgb::gray(0.2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFamily {
  /// Fixed outer index `i`, running over `j`.
  ConstantAngle,
  /// Fixed inner index `j`, running over `i`.
  ConstantRadius,
}

/// Evenly spaced, distinct grid indices `round(k * resolution / density)`
/// for `k = 0..=density`. Both grid edges are always included.
pub fn line_indices(resolution: usize, density: usize) -> Vec<usize> {
  if density == 0 {
    return Vec::new();
  }
  let mut indices: Vec<usize> = (0..=density)
    .map(|k| (2 * k * resolution + density) / (2 * density))
    .collect();
  indices.dedup();
  indices
}

/// Surface points of the `(resolution + 1)^2` grid, laid out like the
/// mesh vertices (`i * (resolution + 1) + j`).
pub struct SurfaceGrid<'a> {
  pub points: &'a [[f64; 3]],
  pub resolution: usize,
}

impl SurfaceGrid<'_> {
  fn at(&self, i: usize, j: usize) -> [f64; 3] {
    self.points[i * (self.resolution + 1) + j]
  }

  /// Consecutive point pairs along one grid line.
  fn segments(
    &self,
    family: LineFamily,
    line: usize,
  ) -> impl Iterator<Item = ([f64; 3], [f64; 3])> + '_ {
    (0..self.resolution).map(move |k| match family {
      LineFamily::ConstantAngle => (self.at(line, k), self.at(line, k + 1)),
      LineFamily::ConstantRadius => (self.at(k, line), self.at(k + 1, line)),
    })
  }
}

/// Appends one quad per segment of every selected grid line of both
/// families. Returns the number of quads added.
pub fn append_grid_lines(
  mesh: &mut MeshBuffers,
  grid: &SurfaceGrid<'_>,
  density: usize,
  half_width: f64,
) -> usize {
  let lines = line_indices(grid.resolution, density);
  let mut quads = 0;
  for family in [LineFamily::ConstantAngle, LineFamily::ConstantRadius] {
    for &line in &lines {
      for (p1, p2) in grid.segments(family, line) {
        push_segment_quad(mesh, p1, p2, half_width);
        quads += 1;
      }
    }
  }
  quads
}

/// A quad around segment `p1 -> p2`, widened along the horizontal (x/z)
/// perpendicular of the segment. Vertical segments collapse to zero width.
fn push_segment_quad(
  mesh: &mut MeshBuffers,
  p1: [f64; 3],
  p2: [f64; 3],
  half_width: f64,
) {
  let dx = p2[0] - p1[0];
  let dz = p2[2] - p1[2];
  let len = dx.hypot(dz);
  let offset = if len < 1e-15 {
    [0.0; 3]
  } else {
    [-dz / len * half_width, 0.0, dx / len * half_width]
  };
  let add = |p: [f64; 3]| [p[0] + offset[0], p[1], p[2] + offset[2]];
  let sub = |p: [f64; 3]| [p[0] - offset[0], p[1], p[2] - offset[2]];

  let base = mesh.push_vertex(add(p1), LINE_COLOR);
  mesh.push_vertex(sub(p1), LINE_COLOR);
  mesh.push_vertex(add(p2), LINE_COLOR);
  mesh.push_vertex(sub(p2), LINE_COLOR);
  mesh.push_triangle(base, base + 1, base + 2);
  mesh.push_triangle(base + 1, base + 3, base + 2);
}
