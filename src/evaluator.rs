use std::f64::consts::{E, PI, TAU};

use num_complex::Complex64;
use thiserror::Error;

use crate::syntax::{
  BinaryOperator, Builtin, Constant, Expr, UnaryOperator, pair_to_expr,
};
use crate::{ComplexityError, parse};

/// Longest accepted function text, counted in characters.
pub const DEFAULT_MAX_EXPRESSION_LEN: usize = 100;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Failure while evaluating an expression at a single point.
///
/// These never abort a grid scan: the sampler renders the point as a
/// sentinel and moves on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
  #[error("division by zero")]
  DivisionByZero,
  #[error("result is not a finite complex number")]
  NonFinite,
}

fn is_token_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Length of the numeric exponent literal (`-?\d*\.?\d+`) at the start of
/// `chars`, if there is one.
fn exponent_literal_len(chars: &[char]) -> Option<usize> {
  let mut pos = 0;
  if chars.first() == Some(&'-') {
    pos += 1;
  }
  let int_start = pos;
  while pos < chars.len() && chars[pos].is_ascii_digit() {
    pos += 1;
  }
  let mut has_digits = pos > int_start;
  let fraction = chars.get(pos) == Some(&'.')
    && chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit());
  if fraction {
    pos += 1;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
      pos += 1;
    }
    has_digits = true;
  }
  if has_digits { Some(pos) } else { None }
}

/// Rewrites caret exponents into explicit `pow` calls.
///
/// `z^2` becomes `pow(z, 2)`, `z^-1` becomes `pow(z, -1)` and `2z^2.5`
/// becomes `2pow(z, 2.5)`. A caret whose left side is not an alphanumeric
/// token or whose right side is not a numeric literal is left in place, and
/// so is a literal followed by another caret (`z^2^3` keeps its right
/// associativity). Empty input becomes the identity function `z`.
pub fn normalize(text: &str) -> String {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return "z".to_string();
  }

  let chars: Vec<char> = trimmed.chars().collect();
  let mut out: Vec<char> = Vec::with_capacity(chars.len() + 8);
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    if c != '^' {
      out.push(c);
      i += 1;
      continue;
    }

    // The base token is the trailing run of token chars already emitted.
    // A leading coefficient like the `2` in `2z` stays outside the call.
    let run_start = out
      .iter()
      .rposition(|&ch| !is_token_char(ch))
      .map_or(0, |p| p + 1);
    let base_start = out[run_start..]
      .iter()
      .position(|ch| ch.is_ascii_alphabetic())
      .map_or(run_start, |p| run_start + p);

    let rest = &chars[i + 1..];
    let literal = exponent_literal_len(rest)
      .filter(|&len| rest.get(len) != Some(&'^'));

    match literal {
      Some(len) if base_start < out.len() => {
        let base: String = out.drain(base_start..).collect();
        let exponent: String = rest[..len].iter().collect();
        out.extend(format!("pow({base}, {exponent})").chars());
        i += 1 + len;
      }
      _ => {
        out.push('^');
        i += 1;
      }
    }
  }

  out.into_iter().collect()
}

/// A parsed single-variable complex function, ready to be sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
  source: String,
  normalized: String,
  expr: Expr,
}

impl FunctionExpression {
  /// Normalizes and parses `text` with the default length limit.
  pub fn parse(text: &str) -> Result<Self, ComplexityError> {
    Self::parse_with_limit(text, DEFAULT_MAX_EXPRESSION_LEN)
  }

  pub fn parse_with_limit(
    text: &str,
    max_len: usize,
  ) -> Result<Self, ComplexityError> {
    let len = text.trim().chars().count();
    if len > max_len {
      return Err(ComplexityError::ExpressionTooLong { len, max: max_len });
    }

    let normalized = normalize(text);
    let program = parse(&normalized)?
      .next()
      .ok_or(ComplexityError::EmptyInput)?;
    let expr = pair_to_expr(program)?;

    Ok(FunctionExpression {
      source: text.to_string(),
      normalized,
      expr,
    })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn normalized(&self) -> &str {
    &self.normalized
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }

  /// Evaluates the function at `z`. Results whose parts or modulus are
  /// not finite are errors.
  pub fn evaluate(&self, z: Complex64) -> Result<Complex64, EvalError> {
    let w = eval_expr(&self.expr, z)?;
    if w.is_finite() && w.norm().is_finite() {
      Ok(w)
    } else {
      Err(EvalError::NonFinite)
    }
  }
}

fn divide(num: Complex64, den: Complex64) -> Result<Complex64, EvalError> {
  if den == ZERO {
    Err(EvalError::DivisionByZero)
  } else {
    Ok(num / den)
  }
}

fn pow(base: Complex64, exponent: Complex64) -> Result<Complex64, EvalError> {
  let integral = exponent.im == 0.0
    && exponent.re.fract() == 0.0
    && exponent.re.abs() <= i32::MAX as f64;
  if integral {
    let n = exponent.re as i32;
    if n < 0 && base == ZERO {
      return Err(EvalError::DivisionByZero);
    }
    return Ok(base.powi(n));
  }
  if base == ZERO {
    return if exponent.re > 0.0 {
      Ok(ZERO)
    } else {
      Err(EvalError::DivisionByZero)
    };
  }
  Ok(base.powc(exponent))
}

fn real(x: f64) -> Complex64 {
  Complex64::new(x, 0.0)
}

fn call(name: Builtin, args: &[Complex64]) -> Result<Complex64, EvalError> {
  let a = args[0];
  Ok(match name {
    Builtin::Sin => a.sin(),
    Builtin::Cos => a.cos(),
    Builtin::Tan => a.tan(),
    Builtin::Sec => divide(real(1.0), a.cos())?,
    Builtin::Csc => divide(real(1.0), a.sin())?,
    Builtin::Cot => divide(a.cos(), a.sin())?,
    Builtin::Asin => a.asin(),
    Builtin::Acos => a.acos(),
    Builtin::Atan => a.atan(),
    Builtin::Sinh => a.sinh(),
    Builtin::Cosh => a.cosh(),
    Builtin::Tanh => a.tanh(),
    Builtin::Asinh => a.asinh(),
    Builtin::Acosh => a.acosh(),
    Builtin::Atanh => a.atanh(),
    Builtin::Exp => a.exp(),
    Builtin::Log | Builtin::Ln => match args.get(1) {
      Some(&base) => divide(a.ln(), base.ln())?,
      None => a.ln(),
    },
    Builtin::Log10 => a.log10(),
    Builtin::Log2 => a.log2(),
    Builtin::Sqrt => a.sqrt(),
    Builtin::Cbrt => a.cbrt(),
    Builtin::Abs => real(a.norm()),
    Builtin::Arg => real(a.arg()),
    Builtin::Conj => a.conj(),
    Builtin::Re => real(a.re),
    Builtin::Im => real(a.im),
    Builtin::Pow => pow(a, args[1])?,
  })
}

fn eval_expr(expr: &Expr, z: Complex64) -> Result<Complex64, EvalError> {
  match expr {
    Expr::Real(x) => Ok(real(*x)),
    Expr::Constant(c) => Ok(match c {
      Constant::I => Complex64::i(),
      Constant::Pi => real(PI),
      Constant::E => real(E),
      Constant::Tau => real(TAU),
    }),
    Expr::Variable => Ok(z),
    Expr::UnaryOp {
      op: UnaryOperator::Minus,
      operand,
    } => Ok(-eval_expr(operand, z)?),
    Expr::BinaryOp { op, left, right } => {
      let l = eval_expr(left, z)?;
      let r = eval_expr(right, z)?;
      match op {
        BinaryOperator::Plus => Ok(l + r),
        BinaryOperator::Minus => Ok(l - r),
        BinaryOperator::Times => Ok(l * r),
        BinaryOperator::Divide => divide(l, r),
        BinaryOperator::Power => pow(l, r),
      }
    }
    Expr::FunctionCall { name, args } => {
      let values = args
        .iter()
        .map(|a| eval_expr(a, z))
        .collect::<Result<Vec<_>, _>>()?;
      call(*name, &values)
    }
  }
}
