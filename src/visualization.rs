//! The main plot and the Riemann view as independent sessions.
//!
//! Each session owns its sampler and its current mesh and regenerates only
//! when its inputs change. A new mesh replaces the previous one wholesale;
//! the two sessions never see each other's buffers.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::surface::mesh::MeshBuffers;
use crate::surface::plane::{HeightMode, PlaneDomain, PlaneSampler};
use crate::surface::riemann::RiemannSampler;

static EMPTY_MESH: MeshBuffers = MeshBuffers {
  positions: Vec::new(),
  colors: Vec::new(),
  normals: Vec::new(),
  indices: Vec::new(),
};

/// What the UI layer hands over on every input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotInput {
  pub function_text: String,
  pub domain: PlaneDomain,
  pub resolution: usize,
  #[serde(default)]
  pub mode: HeightMode,
  #[serde(default)]
  pub sheet_count: Option<usize>,
  #[serde(default)]
  pub radius: Option<f64>,
}

impl PlotInput {
  pub fn new(function_text: &str, config: &Config) -> Self {
    PlotInput {
      function_text: function_text.to_string(),
      domain: config.plane.domain,
      resolution: config.plane.resolution.value as usize,
      mode: HeightMode::Relief,
      sheet_count: None,
      radius: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
  Idle,
  Ready(MeshBuffers),
  /// The expression or domain was rejected; carries the diagnostic.
  Failed(String),
}

impl GenerationState {
  /// The renderable mesh; empty unless `Ready`.
  pub fn mesh(&self) -> &MeshBuffers {
    match self {
      GenerationState::Ready(mesh) => mesh,
      _ => &EMPTY_MESH,
    }
  }

  pub fn diagnostic(&self) -> Option<&str> {
    match self {
      GenerationState::Failed(message) => Some(message),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
struct PlaneRequest {
  function_text: String,
  domain: PlaneDomain,
  resolution: usize,
  mode: HeightMode,
}

/// Domain-colored plot of the complex plane.
#[derive(Debug)]
pub struct MainVisualization {
  sampler: PlaneSampler,
  max_resolution: usize,
  last: Option<PlaneRequest>,
  state: GenerationState,
  generations: u64,
}

impl MainVisualization {
  pub fn new(config: &Config) -> Self {
    MainVisualization {
      sampler: config.plane_sampler(),
      max_resolution: config.plane.resolution.max as usize,
      last: None,
      state: GenerationState::Idle,
      generations: 0,
    }
  }

  /// Regenerates the mesh if any input the plot depends on changed.
  /// Resolutions above the configured maximum are capped.
  pub fn update(&mut self, input: &PlotInput) -> &GenerationState {
    let request = PlaneRequest {
      function_text: input.function_text.clone(),
      domain: input.domain,
      resolution: input.resolution.min(self.max_resolution),
      mode: input.mode,
    };
    if self.last.as_ref() == Some(&request) {
      return &self.state;
    }

    debug!("main: regenerating for {:?}", request.function_text);
    self.state = match self.sampler.try_generate(
      &request.function_text,
      &request.domain,
      request.resolution,
      request.mode,
    ) {
      Ok(mesh) => {
        info!(
          "main: {} vertices, {} triangles",
          mesh.vertex_count(),
          mesh.triangle_count()
        );
        GenerationState::Ready(mesh)
      }
      Err(e) => {
        warn!("main: {e}");
        GenerationState::Failed(e.to_string())
      }
    };
    self.last = Some(request);
    self.generations += 1;
    &self.state
  }

  pub fn state(&self) -> &GenerationState {
    &self.state
  }

  pub fn mesh(&self) -> &MeshBuffers {
    self.state.mesh()
  }

  /// Number of meshes generated so far.
  pub fn generations(&self) -> u64 {
    self.generations
  }
}

#[derive(Debug, Clone, PartialEq)]
struct RiemannRequest {
  function_text: String,
  sheet_count: usize,
  resolution: usize,
  radius: f64,
}

/// Multi-sheet unwrapping of the same function.
#[derive(Debug)]
pub struct RiemannVisualization {
  sampler: RiemannSampler,
  default_sheets: usize,
  default_radius: f64,
  max_resolution: usize,
  last: Option<RiemannRequest>,
  state: GenerationState,
  generations: u64,
}

impl RiemannVisualization {
  pub fn new(config: &Config) -> Self {
    let sheets = &config.riemann.sheets;
    RiemannVisualization {
      sampler: config.riemann_sampler(),
      default_sheets: sheets.clamp_count(sheets.value),
      default_radius: config.riemann.radius.value,
      max_resolution: config.riemann.resolution.max as usize,
      last: None,
      state: GenerationState::Idle,
      generations: 0,
    }
  }

  /// Regenerates when the function text, sheet count, resolution or
  /// radius changed. The plane domain and height mode are ignored.
  pub fn update(&mut self, input: &PlotInput) -> &GenerationState {
    let request = RiemannRequest {
      function_text: input.function_text.clone(),
      sheet_count: input.sheet_count.unwrap_or(self.default_sheets),
      resolution: input.resolution.min(self.max_resolution),
      radius: input.radius.unwrap_or(self.default_radius),
    };
    if self.last.as_ref() == Some(&request) {
      return &self.state;
    }

    debug!(
      "riemann: regenerating for {:?} with {} sheets",
      request.function_text, request.sheet_count
    );
    self.state = match self.sampler.try_generate(
      &request.function_text,
      request.sheet_count,
      request.resolution,
      request.radius,
    ) {
      Ok(mesh) => {
        info!(
          "riemann: {} vertices, {} triangles",
          mesh.vertex_count(),
          mesh.triangle_count()
        );
        GenerationState::Ready(mesh)
      }
      Err(e) => {
        warn!("riemann: {e}");
        GenerationState::Failed(e.to_string())
      }
    };
    self.last = Some(request);
    self.generations += 1;
    &self.state
  }

  pub fn state(&self) -> &GenerationState {
    &self.state
  }

  pub fn mesh(&self) -> &MeshBuffers {
    self.state.mesh()
  }

  pub fn generations(&self) -> u64 {
    self.generations
  }
}
