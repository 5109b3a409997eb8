use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use complexity::config::Config;
use complexity::visualization::{
  GenerationState, MainVisualization, PlotInput, RiemannVisualization,
};
use complexity::syntax::expr_to_string;
use complexity::{DomainColorizer, FunctionExpression, HeightMode, MeshBuffers};
use log::info;
use num_complex::Complex64;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// JSON file overriding the built-in defaults
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a function at a single point
  Eval {
    /// Function of z, e.g. "z^2 + 1"
    function: String,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    re: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    im: f64,
  },
  /// Domain-colored mesh over a rectangle of the complex plane
  Plane {
    function: String,
    #[arg(long, allow_hyphen_values = true)]
    re_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    re_max: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    im_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    im_max: Option<f64>,
    #[arg(long)]
    resolution: Option<usize>,
    /// Flat 2D plot instead of the modulus relief
    #[arg(long)]
    flat: bool,
    /// Print the mesh buffers as JSON
    #[arg(long)]
    json: bool,
  },
  /// Multi-sheet Riemann surface with grid lines
  Riemann {
    function: String,
    #[arg(long)]
    sheets: Option<usize>,
    #[arg(long)]
    resolution: Option<usize>,
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long)]
    json: bool,
  },
}

fn print_mesh(state: &GenerationState, json: bool) -> anyhow::Result<()> {
  let mesh: &MeshBuffers = match state {
    GenerationState::Ready(mesh) => mesh,
    GenerationState::Failed(message) => bail!("{message}"),
    GenerationState::Idle => bail!("nothing generated"),
  };
  if json {
    println!("{}", serde_json::to_string(mesh)?);
  } else {
    let black = (0..mesh.vertex_count())
      .filter(|&v| mesh.color(v) == [0.0; 3])
      .count();
    println!(
      "{} vertices, {} triangles, {} failed samples",
      mesh.vertex_count(),
      mesh.triangle_count(),
      black
    );
  }
  Ok(())
}

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();

  let cli = Cli::parse();
  let config = match &cli.config {
    Some(path) => Config::load(path)
      .with_context(|| format!("loading config {}", path.display()))?,
    None => Config::default(),
  };

  match cli.command {
    Commands::Eval { function, re, im } => {
      let f = FunctionExpression::parse_with_limit(
        &function,
        config.max_expression_len,
      )?;
      info!(
        "normalized: {}, parsed: {}",
        f.normalized(),
        expr_to_string(f.expr())
      );
      let z = Complex64::new(re, im);
      match f.evaluate(z) {
        Ok(w) => println!(
          "f({z}) = {w}  |w| = {}  arg = {}  hue = {}",
          w.norm(),
          w.arg(),
          DomainColorizer::hue(w)
        ),
        Err(e) => println!("f({z}): {e}"),
      }
    }
    Commands::Plane {
      function,
      re_min,
      re_max,
      im_min,
      im_max,
      resolution,
      flat,
      json,
    } => {
      let mut input = PlotInput::new(&function, &config);
      let domain = &mut input.domain;
      domain.re_min = re_min.unwrap_or(domain.re_min);
      domain.re_max = re_max.unwrap_or(domain.re_max);
      domain.im_min = im_min.unwrap_or(domain.im_min);
      domain.im_max = im_max.unwrap_or(domain.im_max);
      input.resolution = resolution.unwrap_or(input.resolution);
      input.mode = if flat {
        HeightMode::Flat
      } else {
        HeightMode::Relief
      };
      let mut main_view = MainVisualization::new(&config);
      print_mesh(main_view.update(&input), json)?;
    }
    Commands::Riemann {
      function,
      sheets,
      resolution,
      radius,
      json,
    } => {
      let mut input = PlotInput::new(&function, &config);
      input.resolution = resolution
        .unwrap_or(config.riemann.resolution.value as usize);
      input.sheet_count = sheets;
      input.radius = radius;
      let mut riemann_view = RiemannVisualization::new(&config);
      print_mesh(riemann_view.update(&input), json)?;
    }
  }

  Ok(())
}
