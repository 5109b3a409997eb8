use std::f64::consts::{PI, TAU};

use num_complex::Complex64;
use serde::Serialize;

pub const SATURATION: f64 = 0.85;
pub const SHEET_LIGHTNESS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
  pub r: f64,
  pub g: f64,
  pub b: f64,
}

pub const BLACK: Rgb = Rgb {
  r: 0.0,
  g: 0.0,
  b: 0.0,
};

impl Rgb {
  pub const fn new(r: f64, g: f64, b: f64) -> Self {
    Self { r, g, b }
  }

  pub const fn gray(level: f64) -> Self {
    Self::new(level, level, level)
  }

  /// HSL to RGB. Hue wraps into [0, 1); saturation and lightness are
  /// clamped to [0, 1].
  pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
      return Self::gray(l);
    }
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Self::new(
      hue_to_channel(p, q, h + 1.0 / 3.0),
      hue_to_channel(p, q, h),
      hue_to_channel(p, q, h - 1.0 / 3.0),
    )
  }

  pub fn to_array(self) -> [f32; 3] {
    [self.r as f32, self.g as f32, self.b as f32]
  }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
  let t = t.rem_euclid(1.0);
  if t < 1.0 / 6.0 {
    p + (q - p) * 6.0 * t
  } else if t < 0.5 {
    q
  } else if t < 2.0 / 3.0 {
    p + (q - p) * 6.0 * (2.0 / 3.0 - t)
  } else {
    p
  }
}

/// Log-compressed ratio `log1p(|value|) / log1p(max_value)`, carrying the
/// sign of `value`. Zero when `max_value` is not positive.
fn log_ratio(value: f64, max_value: f64) -> f64 {
  if max_value <= 0.0 {
    return 0.0;
  }
  let ratio = value.abs().ln_1p() / max_value.ln_1p();
  if value < 0.0 { -ratio } else { ratio }
}

/// Maps complex values to colors so that hue always encodes phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainColorizer;

impl DomainColorizer {
  /// Phase mapped linearly onto [0, 1): `(arg(w) + pi) / 2pi`.
  pub fn hue(w: Complex64) -> f64 {
    Self::phase_fraction(w.arg())
  }

  /// Same mapping for an already computed argument.
  pub fn phase_fraction(argument: f64) -> f64 {
    ((argument + PI) / TAU).rem_euclid(1.0)
  }

  /// Lightness input in [0, 1]: `log1p(|w|) / log1p(max_modulus)`.
  pub fn normalized_modulus(w: Complex64, max_modulus: f64) -> f64 {
    log_ratio(w.norm(), max_modulus)
  }

  pub fn color_for(w: Complex64, max_modulus: f64) -> Rgb {
    let lightness = 0.4 + 0.3 * Self::normalized_modulus(w, max_modulus);
    Rgb::from_hsl(Self::hue(w), SATURATION, lightness)
  }

  /// One full hue cycle per sheet.
  pub fn color_for_sheet(phase_fraction: f64) -> Rgb {
    Rgb::from_hsl(phase_fraction.rem_euclid(1.0), SATURATION, SHEET_LIGHTNESS)
  }

  /// Bounded, sign-preserving relief height.
  pub fn normalize_height(value: f64, max_value: f64) -> f64 {
    log_ratio(value, max_value)
  }
}
