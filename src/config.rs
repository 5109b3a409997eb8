//! Defaults and limits for the two visualizations.
//!
//! Every section carries `#[serde(default)]`, so a JSON config file only
//! needs the keys it changes:
//!
//! ```json
//! { "riemann": { "grid_density": 10 }, "max_expression_len": 200 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ComplexityError;
use crate::evaluator::DEFAULT_MAX_EXPRESSION_LEN;
use crate::surface::grid_lines::{DEFAULT_GRID_DENSITY, DEFAULT_LINE_WIDTH};
use crate::surface::plane::{HEIGHT_SCALE, PlaneDomain, PlaneSampler};
use crate::surface::riemann::RiemannSampler;

/// A bounded, stepped numeric control with its initial value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
  pub value: f64,
  pub min: f64,
  pub max: f64,
  pub step: f64,
}

impl SliderRange {
  pub const fn new(value: f64, min: f64, max: f64, step: f64) -> Self {
    SliderRange {
      value,
      min,
      max,
      step,
    }
  }

  /// Clamps `value` into `[min, max]` and snaps it to the nearest step
  /// counted from `min`.
  pub fn clamp(&self, value: f64) -> f64 {
    if !value.is_finite() {
      return self.value;
    }
    let clamped = value.clamp(self.min, self.max);
    if self.step <= 0.0 {
      return clamped;
    }
    let steps = ((clamped - self.min) / self.step).round();
    (self.min + steps * self.step).min(self.max)
  }

  pub fn clamp_count(&self, value: f64) -> usize {
    self.clamp(value).round().max(0.0) as usize
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
  pub domain: PlaneDomain,
  pub resolution: SliderRange,
  pub height_scale: f64,
}

impl Default for PlaneConfig {
  fn default() -> Self {
    PlaneConfig {
      domain: PlaneDomain::centered(5.0),
      resolution: SliderRange::new(150.0, 50.0, 300.0, 10.0),
      height_scale: HEIGHT_SCALE,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiemannConfig {
  pub sheets: SliderRange,
  pub resolution: SliderRange,
  pub radius: SliderRange,
  pub grid_density: usize,
  pub line_width: f64,
}

impl Default for RiemannConfig {
  fn default() -> Self {
    RiemannConfig {
      sheets: SliderRange::new(4.0, 1.0, 6.0, 1.0),
      resolution: SliderRange::new(150.0, 50.0, 300.0, 10.0),
      radius: SliderRange::new(3.0, 1.0, 5.0, 0.5),
      grid_density: DEFAULT_GRID_DENSITY,
      line_width: DEFAULT_LINE_WIDTH,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub plane: PlaneConfig,
  pub riemann: RiemannConfig,
  pub max_expression_len: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      plane: PlaneConfig::default(),
      riemann: RiemannConfig::default(),
      max_expression_len: DEFAULT_MAX_EXPRESSION_LEN,
    }
  }
}

impl Config {
  pub fn from_json_str(json: &str) -> Result<Self, ComplexityError> {
    serde_json::from_str(json)
      .map_err(|e| ComplexityError::Config(e.to_string()))
  }

  pub fn load(path: &Path) -> Result<Self, ComplexityError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
      ComplexityError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    Self::from_json_str(&text)
  }

  pub fn plane_sampler(&self) -> PlaneSampler {
    PlaneSampler {
      height_scale: self.plane.height_scale,
      max_expression_len: self.max_expression_len,
    }
  }

  pub fn riemann_sampler(&self) -> RiemannSampler {
    RiemannSampler {
      grid_density: self.riemann.grid_density,
      line_width: self.riemann.line_width,
      max_expression_len: self.max_expression_len,
    }
  }
}
