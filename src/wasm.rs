use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::surface::mesh::MeshBuffers;
use crate::visualization::{
  GenerationState, MainVisualization, PlotInput, RiemannVisualization,
};
use crate::{HeightMode, PlaneDomain};

/// Mesh buffers exposed to JavaScript as typed arrays.
#[wasm_bindgen]
pub struct WasmMesh {
  mesh: MeshBuffers,
  diagnostic: Option<String>,
}

#[wasm_bindgen]
impl WasmMesh {
  pub fn positions(&self) -> Vec<f32> {
    self.mesh.positions.clone()
  }

  pub fn colors(&self) -> Vec<f32> {
    self.mesh.colors.clone()
  }

  pub fn normals(&self) -> Vec<f32> {
    self.mesh.normals.clone()
  }

  pub fn indices(&self) -> Vec<u32> {
    self.mesh.indices.clone()
  }

  /// Why the mesh is empty, if generation failed.
  pub fn diagnostic(&self) -> Option<String> {
    self.diagnostic.clone()
  }
}

fn to_wasm(state: &GenerationState) -> WasmMesh {
  WasmMesh {
    mesh: state.mesh().clone(),
    diagnostic: state.diagnostic().map(str::to_string),
  }
}

/// Main plot session; one per canvas.
#[wasm_bindgen]
pub struct PlaneView {
  view: MainVisualization,
  config: Config,
}

#[wasm_bindgen]
impl PlaneView {
  #[wasm_bindgen(constructor)]
  pub fn new() -> PlaneView {
    let config = Config::default();
    PlaneView {
      view: MainVisualization::new(&config),
      config,
    }
  }

  #[allow(clippy::too_many_arguments)]
  pub fn update(
    &mut self,
    function: &str,
    re_min: f64,
    re_max: f64,
    im_min: f64,
    im_max: f64,
    resolution: usize,
    is_2d: bool,
  ) -> WasmMesh {
    let mut input = PlotInput::new(function, &self.config);
    input.domain = PlaneDomain::new(re_min, re_max, im_min, im_max);
    input.resolution = resolution;
    input.mode = if is_2d {
      HeightMode::Flat
    } else {
      HeightMode::Relief
    };
    to_wasm(self.view.update(&input))
  }
}

impl Default for PlaneView {
  fn default() -> Self {
    Self::new()
  }
}

/// Riemann surface session, isolated from any `PlaneView`.
#[wasm_bindgen]
pub struct RiemannView {
  view: RiemannVisualization,
  config: Config,
}

#[wasm_bindgen]
impl RiemannView {
  #[wasm_bindgen(constructor)]
  pub fn new() -> RiemannView {
    let config = Config::default();
    RiemannView {
      view: RiemannVisualization::new(&config),
      config,
    }
  }

  pub fn update(
    &mut self,
    function: &str,
    sheets: usize,
    resolution: usize,
    radius: f64,
  ) -> WasmMesh {
    let mut input = PlotInput::new(function, &self.config);
    input.resolution = resolution;
    input.sheet_count = Some(sheets);
    input.radius = Some(radius);
    to_wasm(self.view.update(&input))
  }
}

impl Default for RiemannView {
  fn default() -> Self {
    Self::new()
  }
}
