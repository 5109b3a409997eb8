use serde::Serialize;

use super::color::Rgb;

/// Flat position/color/index buffers ready to hand to a triangle renderer.
///
/// `positions`, `colors` and `normals` hold 3 floats per vertex, `indices`
/// 3 vertex indices per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshBuffers {
  pub positions: Vec<f32>,
  pub colors: Vec<f32>,
  pub normals: Vec<f32>,
  pub indices: Vec<u32>,
}

impl MeshBuffers {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
    MeshBuffers {
      positions: Vec::with_capacity(vertices * 3),
      colors: Vec::with_capacity(vertices * 3),
      normals: Vec::new(),
      indices: Vec::with_capacity(triangles * 3),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty() && self.indices.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len() / 3
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Appends a vertex and returns its index.
  pub fn push_vertex(&mut self, position: [f64; 3], color: Rgb) -> u32 {
    let index = self.vertex_count() as u32;
    self
      .positions
      .extend(position.iter().map(|&c| c as f32));
    self.colors.extend(color.to_array());
    index
  }

  pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
    self.indices.extend([a, b, c]);
  }

  pub fn position(&self, vertex: usize) -> [f32; 3] {
    let p = &self.positions[vertex * 3..vertex * 3 + 3];
    [p[0], p[1], p[2]]
  }

  pub fn color(&self, vertex: usize) -> [f32; 3] {
    let c = &self.colors[vertex * 3..vertex * 3 + 3];
    [c[0], c[1], c[2]]
  }

  pub fn normal(&self, vertex: usize) -> Option<[f32; 3]> {
    let n = self.normals.get(vertex * 3..vertex * 3 + 3)?;
    Some([n[0], n[1], n[2]])
  }

  /// Triangulates a `(resolution + 1)^2` grid whose vertices start at
  /// `base` and are laid out row by row (outer index `i`, inner `j`).
  /// Each quad contributes `{a, b, c}` and `{b, d, c}`.
  ///
  /// Normals follow the right-hand rule on that order, which puts them on
  /// the `(i, j, i x j)` side: with `i` along +x and `j` along +y that is -z
  /// for the plane, and -y for the polar layout (radius outward, angle
  /// counter-clockwise seen from +y). Renderers must draw both faces.
  pub fn push_grid_triangles(&mut self, base: u32, resolution: usize) {
    let row = resolution as u32 + 1;
    for i in 0..resolution as u32 {
      for j in 0..resolution as u32 {
        let a = base + i * row + j;
        let b = a + 1;
        let c = a + row;
        let d = c + 1;
        self.push_triangle(a, b, c);
        self.push_triangle(b, d, c);
      }
    }
  }

  /// Smooth per-vertex normals: the sum of the (area weighted) face
  /// normals of every triangle touching a vertex, normalized. Vertices
  /// without a non-degenerate face get a zero normal.
  pub fn compute_vertex_normals(&mut self) {
    let mut acc = vec![[0.0f64; 3]; self.vertex_count()];

    for tri in self.indices.chunks_exact(3) {
      let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
      let pa = self.position(a).map(f64::from);
      let pb = self.position(b).map(f64::from);
      let pc = self.position(c).map(f64::from);
      let u = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
      let v = [pc[0] - pa[0], pc[1] - pa[1], pc[2] - pa[2]];
      let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
      ];
      for &vertex in &[a, b, c] {
        for k in 0..3 {
          acc[vertex][k] += n[k];
        }
      }
    }

    self.normals = acc
      .iter()
      .flat_map(|n| {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len < 1e-15 {
          [0.0f32; 3]
        } else {
          [(n[0] / len) as f32, (n[1] / len) as f32, (n[2] / len) as f32]
        }
      })
      .collect();
  }

  /// Checks the buffer invariants: parallel attribute arrays, whole
  /// triangles and in-range indices.
  pub fn is_consistent(&self) -> bool {
    let vertices = self.vertex_count();
    self.positions.len() % 3 == 0
      && self.colors.len() == self.positions.len()
      && (self.normals.is_empty() || self.normals.len() == self.positions.len())
      && self.indices.len() % 3 == 0
      && self.indices.iter().all(|&i| (i as usize) < vertices)
      && self.colors.iter().all(|c| (0.0..=1.0).contains(c))
  }
}
