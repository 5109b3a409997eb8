use super::*;
use complexity::config::Config;
use complexity::visualization::{
  GenerationState, MainVisualization, PlotInput, RiemannVisualization,
};

fn small_input(function: &str, config: &Config) -> PlotInput {
  let mut input = PlotInput::new(function, config);
  input.domain = unit_square();
  input.resolution = 6;
  input
}

mod main_view {
  use super::*;

  #[test]
  fn unchanged_input_does_not_regenerate() {
    let config = Config::default();
    let mut view = MainVisualization::new(&config);
    let input = small_input("z^2", &config);
    let first = view.update(&input).mesh().clone();
    let second = view.update(&input).mesh().clone();
    assert_eq!(view.generations(), 1);
    assert_eq!(first, second);
    assert_eq!(first.vertex_count(), 49);
  }

  #[test]
  fn any_changed_input_regenerates() {
    let config = Config::default();
    let mut view = MainVisualization::new(&config);
    let mut input = small_input("z^2", &config);
    view.update(&input);
    input.mode = HeightMode::Flat;
    view.update(&input);
    input.resolution = 4;
    view.update(&input);
    input.function_text = "z^3".to_string();
    view.update(&input);
    assert_eq!(view.generations(), 4);
    assert_eq!(view.mesh().vertex_count(), 25);
  }

  #[test]
  fn rejected_expression_carries_diagnostic() {
    let config = Config::default();
    let mut view = MainVisualization::new(&config);
    let state = view.update(&small_input("z^^", &config));
    assert!(matches!(state, GenerationState::Failed(_)));
    assert!(state.diagnostic().is_some());
    assert!(view.mesh().is_empty());

    view.update(&small_input("z", &config));
    assert!(matches!(view.state(), GenerationState::Ready(_)));
    assert_eq!(view.state().diagnostic(), None);
  }

  #[test]
  fn resolution_is_capped() {
    let mut config = Config::default();
    config.plane.resolution.max = 8.0;
    let mut view = MainVisualization::new(&config);
    let mut input = small_input("z", &config);
    input.resolution = 50;
    assert_eq!(view.update(&input).mesh().vertex_count(), 81);
  }

  #[test]
  fn expression_length_limit_applies() {
    let config = Config {
      max_expression_len: 5,
      ..Config::default()
    };
    let mut view = MainVisualization::new(&config);
    let state = view.update(&small_input("z + z + z", &config));
    let message = state.diagnostic().unwrap_or_default();
    assert!(message.contains("too long"), "{message}");
  }
}

mod riemann_view {
  use super::*;

  #[test]
  fn plane_only_inputs_are_ignored() {
    let config = Config::default();
    let mut view = RiemannVisualization::new(&config);
    let mut input = small_input("sqrt(z)", &config);
    input.sheet_count = Some(2);
    view.update(&input);
    input.mode = HeightMode::Flat;
    input.domain = PlaneDomain::centered(4.0);
    view.update(&input);
    assert_eq!(view.generations(), 1);

    input.radius = Some(2.0);
    view.update(&input);
    assert_eq!(view.generations(), 2);
  }

  #[test]
  fn defaults_come_from_config() {
    let config = Config::default();
    let mut view = RiemannVisualization::new(&config);
    let input = small_input("z", &config);
    let expected = RiemannSampler::default().generate("z", 4, 6, 3.0);
    assert_eq!(view.update(&input).mesh(), &expected);
  }

  #[test]
  fn sessions_are_independent() {
    let config = Config::default();
    let mut main = MainVisualization::new(&config);
    let mut riemann = RiemannVisualization::new(&config);

    let plane_mesh = main.update(&small_input("z", &config)).mesh().clone();
    riemann.update(&small_input("log(z)", &config));
    riemann.update(&small_input("z^^", &config));

    assert_eq!(main.mesh(), &plane_mesh);
    assert_eq!(main.generations(), 1);
    assert!(riemann.mesh().is_empty());
    assert!(!main.mesh().is_empty());
  }
}
