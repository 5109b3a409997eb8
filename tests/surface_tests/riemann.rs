use super::*;
use complexity::ComplexityError;
use complexity::surface::riemann::{SHEET_GAP, sheet_index};

fn riemann(function: &str, sheets: usize, resolution: usize) -> MeshBuffers {
  RiemannSampler::default().generate(function, sheets, resolution, 3.0)
}

fn surface_vertex(resolution: usize, i: usize, j: usize) -> usize {
  i * (resolution + 1) + j
}

mod counts {
  use super::*;

  #[test]
  fn surface_plus_overlay() {
    for resolution in [1, 4, 10, 25] {
      let mesh = riemann("sqrt(z)", 2, resolution);
      let lines = line_indices(resolution, 20).len();
      let quads = 2 * lines * resolution;
      let surface = (resolution + 1) * (resolution + 1);
      assert_eq!(mesh.vertex_count(), surface + 4 * quads);
      assert_eq!(
        mesh.indices.len(),
        6 * resolution * resolution + 6 * quads
      );
      assert_eq!(mesh.normals.len(), mesh.positions.len());
      assert!(mesh.is_consistent());
    }
  }

  #[test]
  fn ten_by_ten_grid() {
    let mesh = riemann("z", 2, 10);
    // 11 lines per family, 10 segments per line
    assert_eq!(mesh.vertex_count(), 121 + 4 * 220);
    assert_eq!(mesh.triangle_count(), 200 + 2 * 220);
  }

  #[test]
  fn overlay_vertices_are_dark_gray() {
    let mesh = riemann("z^2", 3, 6);
    let gray = [0.2f32; 3];
    assert!((49..mesh.vertex_count()).all(|v| mesh.color(v) == gray));
  }
}

mod sheets {
  use super::*;

  #[test]
  fn closing_row_sits_on_the_last_sheet() {
    let resolution = 10;
    let mesh = riemann("z", 2, resolution);
    for j in 0..=resolution {
      let y = mesh.position(surface_vertex(resolution, resolution, j))[1];
      assert!((1.2..2.2).contains(&y), "height {y} at j = {j}");
    }
  }

  #[test]
  fn first_row_sits_on_sheet_zero() {
    let resolution = 8;
    let mesh = riemann("z", 2, resolution);
    for j in 0..=resolution {
      // theta = 0, so w = r has phase fraction one half
      let y = mesh.position(surface_vertex(resolution, 0, j))[1];
      assert!((y - 0.5).abs() < 1e-6, "height {y} at j = {j}");
    }
  }

  #[test]
  fn rows_follow_their_sheet() {
    let resolution = 12;
    let sheets = 3;
    let mesh = riemann("exp(z)", sheets, resolution);
    for i in 0..=resolution {
      let sheet = sheet_index(i, resolution, sheets);
      let base = (sheet as f64 * SHEET_GAP) as f32;
      for j in 0..=resolution {
        let y = mesh.position(surface_vertex(resolution, i, j))[1];
        assert!(y >= base - 1e-5 && y < base + 1.0 + 1e-5);
      }
    }
  }

  #[test]
  fn polar_layout_with_y_up() {
    let resolution = 10;
    let mesh = riemann("z", 1, resolution);
    // theta = 0 at the outer rim
    let [x, _, z] = mesh.position(surface_vertex(resolution, 0, resolution));
    assert!((x - 3.0).abs() < 1e-5);
    assert!(z.abs() < 1e-6);
    // Inner rim at r_min
    let [x, _, _] = mesh.position(surface_vertex(resolution, 0, 0));
    assert!((x - 0.01).abs() < 1e-6);
  }
}

mod coloring {
  use super::*;

  #[test]
  fn surface_color_follows_phase() {
    let resolution = 8;
    let mesh = riemann("z", 2, resolution);
    // theta = 0 on the first row, so w = r and the phase is one half
    let expected = DomainColorizer::color_for_sheet(0.5).to_array();
    for j in 0..=resolution {
      assert_eq!(mesh.color(surface_vertex(resolution, 0, j)), expected);
    }
  }

  #[test]
  fn phase_and_color_agree_everywhere() {
    let resolution = 12;
    let sheets = 3;
    let mesh = riemann("sqrt(z)", sheets, resolution);
    for i in 0..=resolution {
      let sheet = sheet_index(i, resolution, sheets);
      let base = sheet as f64 * SHEET_GAP;
      for j in 0..=resolution {
        let v = surface_vertex(resolution, i, j);
        let phase = mesh.position(v)[1] as f64 - base;
        let [r, g, b] = mesh.color(v);
        let [er, eg, eb] = DomainColorizer::color_for_sheet(phase).to_array();
        assert!((r - er).abs() < 1e-4, "{i},{j}");
        assert!((g - eg).abs() < 1e-4, "{i},{j}");
        assert!((b - eb).abs() < 1e-4, "{i},{j}");
      }
    }
  }

  #[test]
  fn level_surface_normals_face_negative_y() {
    let resolution = 8;
    let mesh = riemann("1", 1, resolution);
    for v in 0..(resolution + 1) * (resolution + 1) {
      let n = mesh.normal(v).unwrap();
      assert!(n[0].abs() < 1e-6 && n[2].abs() < 1e-6);
      assert!((n[1] + 1.0).abs() < 1e-6, "normal {n:?} at {v}");
    }
  }
}

mod failures {
  use super::*;

  #[test]
  fn failed_samples_are_black_at_sheet_base() {
    let resolution = 6;
    let sheets = 2;
    let mesh = riemann("1/(z - z)", sheets, resolution);
    for i in 0..=resolution {
      let sheet = sheet_index(i, resolution, sheets);
      let base = (sheet as f64 * SHEET_GAP) as f32;
      for j in 0..=resolution {
        let v = surface_vertex(resolution, i, j);
        assert_eq!(mesh.color(v), [0.0; 3]);
        assert_eq!(mesh.position(v)[1], base);
      }
    }
  }

  #[test]
  fn isolated_pole_keeps_geometry() {
    let mesh = riemann("1/(z - 1)", 2, 10);
    assert_eq!(mesh.vertex_count(), 121 + 4 * 220);
    assert!(mesh.is_consistent());
  }

  #[test]
  fn malformed_expression_gives_empty_mesh() {
    assert_empty(&riemann("z^^", 2, 10));
    assert_empty(&riemann("sqrt(z", 2, 10));
  }

  #[test]
  fn degenerate_inputs_give_empty_mesh() {
    let sampler = RiemannSampler::default();
    assert_empty(&sampler.generate("z", 0, 10, 3.0));
    assert_empty(&sampler.generate("z", 2, 0, 3.0));
    assert_empty(&sampler.generate("z", 2, 10, 0.005));
    assert!(matches!(
      sampler.try_generate("z", 2, 0, 3.0),
      Err(ComplexityError::InvalidResolution(0))
    ));
    assert!(matches!(
      sampler.try_generate("z", 0, 10, 3.0),
      Err(ComplexityError::InvalidDomain(_))
    ));
  }
}

mod determinism {
  use super::*;

  #[test]
  fn regeneration_is_identical() {
    assert_eq!(riemann("log(z)", 3, 15), riemann("log(z)", 3, 15));
  }

  #[test]
  fn grid_density_controls_overlay() {
    let sampler = RiemannSampler {
      grid_density: 0,
      ..RiemannSampler::default()
    };
    let mesh = sampler.generate("z", 2, 10, 3.0);
    assert_eq!(mesh.vertex_count(), 121);
    assert_eq!(mesh.triangle_count(), 200);
  }
}
