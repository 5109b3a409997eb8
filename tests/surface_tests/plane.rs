use super::*;

mod counts {
  use super::*;

  #[test]
  fn vertex_and_index_counts() {
    for resolution in 1..=6 {
      let mesh = plane("z^2 + 1", resolution, HeightMode::Relief);
      let n = resolution + 1;
      assert_eq!(mesh.positions.len(), 3 * n * n);
      assert_eq!(mesh.colors.len(), 3 * n * n);
      assert_eq!(mesh.normals.len(), 3 * n * n);
      assert_eq!(mesh.indices.len(), 6 * resolution * resolution);
      assert!(mesh.is_consistent());
    }
  }

  #[test]
  fn quad_winding() {
    let mesh = plane("z", 2, HeightMode::Flat);
    // First quad: a = 0, b = 1, c = 3, d = 4
    assert_eq!(&mesh.indices[..6], &[0, 1, 3, 1, 4, 3]);
  }
}

mod failures {
  use super::*;
  use complexity::ComplexityError;

  #[test]
  fn malformed_expression_gives_empty_mesh() {
    for text in ["z^^", "sin(", "z +", "foo(z)", "x"] {
      assert_empty(&plane(text, 4, HeightMode::Relief));
    }
  }

  #[test]
  fn try_generate_reports_the_reason() {
    let sampler = PlaneSampler::default();
    let result =
      sampler.try_generate("z^^", &unit_square(), 4, HeightMode::Relief);
    assert!(matches!(result, Err(ComplexityError::ParseError(_))));
  }

  #[test]
  fn zero_resolution_gives_empty_mesh() {
    assert_empty(&plane("z", 0, HeightMode::Relief));
  }

  #[test]
  fn empty_domain_gives_empty_mesh() {
    let sampler = PlaneSampler::default();
    for domain in [
      PlaneDomain::new(1.0, 1.0, -1.0, 1.0),
      PlaneDomain::new(-1.0, 1.0, 2.0, -2.0),
      PlaneDomain::new(f64::NAN, 1.0, -1.0, 1.0),
      PlaneDomain::new(-1e308, 1e308, -1.0, 1.0),
      PlaneDomain::new(-1.0, 1.0, -f64::MAX, f64::MAX),
      PlaneDomain::new(-1e39, 1.0, -1.0, 1.0),
    ] {
      assert_empty(&sampler.generate("z", &domain, 4, HeightMode::Relief));
      assert!(matches!(
        sampler.try_generate("z", &domain, 4, HeightMode::Relief),
        Err(ComplexityError::InvalidDomain(_))
      ));
    }
  }

  #[test]
  fn pole_keeps_full_geometry_with_black_vertex() {
    let mesh = plane("1/z", 2, HeightMode::Relief);
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.indices.len(), 24);
    // z = 0 is at i = 1, j = 1
    assert_eq!(mesh.position(4), [0.0, 0.0, 0.0]);
    assert_eq!(mesh.color(4), [0.0, 0.0, 0.0]);
    assert_ne!(mesh.color(0), [0.0, 0.0, 0.0]);
  }

  #[test]
  fn all_points_failing_renders_black_and_flat() {
    let mesh = plane("1/(z - z)", 3, HeightMode::Relief);
    assert_eq!(mesh.vertex_count(), 16);
    assert!(mesh.colors.iter().all(|&c| c == 0.0));
    assert!((0..16).all(|v| mesh.position(v)[2] == 0.0));
  }

  #[test]
  fn overflowing_modulus_is_a_black_hole() {
    let sampler = PlaneSampler::default();
    let domain = PlaneDomain::new(-1.5, 1.5, -1.5, 1.5);
    let mesh = sampler.generate("z*1e308", &domain, 2, HeightMode::Relief);
    assert!(mesh.is_consistent());
    assert!(mesh.positions.iter().all(|p| p.is_finite()));
    assert!(mesh.normals.iter().all(|n| n.is_finite()));
    // |(-1.5 - 1.5i) * 1e308| exceeds f64::MAX
    assert_eq!(mesh.color(0), [0.0; 3]);
    assert_eq!(mesh.position(0), [-1.5, -1.5, 0.0]);
    // (0, -1.5e308) still has a finite modulus
    assert_ne!(mesh.color(3), [0.0; 3]);
  }

  #[test]
  fn zero_function_stays_finite() {
    let mesh = plane("0", 3, HeightMode::Relief);
    assert!(mesh.is_consistent());
    assert!((0..16).all(|v| mesh.position(v)[2] == 0.0));
  }
}

mod coloring {
  use super::*;

  #[test]
  fn positive_real_axis_has_hue_one_half() {
    let mesh = plane("z", 2, HeightMode::Relief);
    // z = 1 + 0i is at i = 2, j = 1
    let v = 2 * 3 + 1;
    let p = mesh.position(v);
    assert_eq!((p[0], p[1]), (1.0, 0.0));

    let w = Complex64::new(1.0, 0.0);
    assert_eq!(DomainColorizer::hue(w), 0.5);
    let expected = DomainColorizer::color_for(w, 2f64.sqrt()).to_array();
    assert_eq!(mesh.color(v), expected);
    let [r, g, b] = mesh.color(v);
    assert!((g - b).abs() < 1e-6 && r < g);
  }

  #[test]
  fn colors_are_in_unit_range() {
    let mesh = plane("exp(z) / (z^2 + 0.1)", 12, HeightMode::Relief);
    assert!(mesh.colors.iter().all(|c| (0.0..=1.0).contains(c)));
  }
}

mod heights {
  use super::*;

  #[test]
  fn maximum_modulus_reaches_full_scale() {
    let mesh = plane("z", 4, HeightMode::Relief);
    // Corners carry the largest modulus, sqrt(2)
    let corner = mesh.position(0)[2];
    assert!((corner - 1.5).abs() < 1e-6, "corner height {corner}");
    let max = (0..mesh.vertex_count())
      .map(|v| mesh.position(v)[2])
      .fold(f32::MIN, f32::max);
    assert!((max - 1.5).abs() < 1e-6);
    // Center of the domain is z = 0
    assert_eq!(mesh.position(12)[2], 0.0);
  }

  #[test]
  fn flat_mode_heights_are_zero() {
    let mesh = plane("z^3 - 2z + 5", 10, HeightMode::Flat);
    assert!((0..mesh.vertex_count()).all(|v| mesh.position(v)[2] == 0.0));
  }

  #[test]
  fn flat_mode_normals_face_negative_z() {
    let mesh = plane("z^2", 4, HeightMode::Flat);
    for v in 0..mesh.vertex_count() {
      assert_eq!(mesh.normal(v), Some([0.0, 0.0, -1.0]));
    }
  }

  #[test]
  fn flat_mode_keeps_colors() {
    let flat = plane("z^2", 5, HeightMode::Flat);
    let relief = plane("z^2", 5, HeightMode::Relief);
    assert_eq!(flat.colors, relief.colors);
  }

  #[test]
  fn custom_height_scale() {
    let sampler = PlaneSampler {
      height_scale: 3.0,
      ..PlaneSampler::default()
    };
    let mesh = sampler.generate("z", &unit_square(), 2, HeightMode::Relief);
    assert!((mesh.position(0)[2] - 3.0).abs() < 1e-6);
  }
}

mod determinism {
  use super::*;

  #[test]
  fn regeneration_is_identical() {
    let a = plane("sin(z) / z", 20, HeightMode::Relief);
    let b = plane("sin(z) / z", 20, HeightMode::Relief);
    assert_eq!(a, b);
  }
}
