use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod config;
pub mod evaluator;
pub mod surface;
pub mod syntax;
pub mod visualization;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use evaluator::{EvalError, FunctionExpression, normalize};
pub use surface::color::{DomainColorizer, Rgb};
pub use surface::mesh::MeshBuffers;
pub use surface::plane::{HeightMode, PlaneDomain, PlaneSampler};
pub use surface::riemann::{PolarDomain, RiemannSampler};

#[derive(Parser)]
#[grammar = "expression.pest"]
pub struct ExpressionParser;

#[derive(Error, Debug)]
pub enum ComplexityError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Unknown function: {0}")]
  UnknownFunction(String),
  #[error("Unknown identifier: {0} (the only variable is z)")]
  UnknownIdentifier(String),
  #[error("{name} expects {expected} argument(s), got {got}")]
  Arity {
    name: String,
    expected: String,
    got: usize,
  },
  #[error("Function expression too long ({len} > {max} characters)")]
  ExpressionTooLong { len: usize, max: usize },
  #[error("Invalid resolution: {0} (must be at least 1)")]
  InvalidResolution(usize),
  #[error("Invalid domain: {0}")]
  InvalidDomain(String),
  #[error("Config error: {0}")]
  Config(String),
}

impl ExpressionParser {
  pub fn parse_expression(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Runs the raw grammar over `input` without building an expression tree.
pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  ExpressionParser::parse_expression(input)
}

/// Normalizes and parses `text` with the default expression length limit.
pub fn compile(text: &str) -> Result<FunctionExpression, ComplexityError> {
  FunctionExpression::parse(text)
}
