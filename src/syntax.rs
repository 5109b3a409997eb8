use pest::iterators::Pair;

use crate::{ComplexityError, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
  I,
  Pi,
  E,
  Tau,
}

impl Constant {
  fn lookup(name: &str) -> Option<Self> {
    Some(match name {
      "i" | "I" => Constant::I,
      "pi" | "PI" => Constant::Pi,
      "e" | "E" => Constant::E,
      "tau" => Constant::Tau,
      _ => return None,
    })
  }

  pub fn name(self) -> &'static str {
    match self {
      Constant::I => "i",
      Constant::Pi => "pi",
      Constant::E => "e",
      Constant::Tau => "tau",
    }
  }
}

/// Named functions understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
  Sin,
  Cos,
  Tan,
  Sec,
  Csc,
  Cot,
  Asin,
  Acos,
  Atan,
  Sinh,
  Cosh,
  Tanh,
  Asinh,
  Acosh,
  Atanh,
  Exp,
  Log,
  Ln,
  Log10,
  Log2,
  Sqrt,
  Cbrt,
  Abs,
  Arg,
  Conj,
  Re,
  Im,
  Pow,
}

impl Builtin {
  fn lookup(name: &str) -> Option<Self> {
    Some(match name {
      "sin" => Builtin::Sin,
      "cos" => Builtin::Cos,
      "tan" => Builtin::Tan,
      "sec" => Builtin::Sec,
      "csc" => Builtin::Csc,
      "cot" => Builtin::Cot,
      "asin" => Builtin::Asin,
      "acos" => Builtin::Acos,
      "atan" => Builtin::Atan,
      "sinh" => Builtin::Sinh,
      "cosh" => Builtin::Cosh,
      "tanh" => Builtin::Tanh,
      "asinh" => Builtin::Asinh,
      "acosh" => Builtin::Acosh,
      "atanh" => Builtin::Atanh,
      "exp" => Builtin::Exp,
      "log" => Builtin::Log,
      "ln" => Builtin::Ln,
      "log10" => Builtin::Log10,
      "log2" => Builtin::Log2,
      "sqrt" => Builtin::Sqrt,
      "cbrt" => Builtin::Cbrt,
      "abs" => Builtin::Abs,
      "arg" => Builtin::Arg,
      "conj" => Builtin::Conj,
      "re" => Builtin::Re,
      "im" => Builtin::Im,
      "pow" => Builtin::Pow,
      _ => return None,
    })
  }

  pub fn name(self) -> &'static str {
    match self {
      Builtin::Sin => "sin",
      Builtin::Cos => "cos",
      Builtin::Tan => "tan",
      Builtin::Sec => "sec",
      Builtin::Csc => "csc",
      Builtin::Cot => "cot",
      Builtin::Asin => "asin",
      Builtin::Acos => "acos",
      Builtin::Atan => "atan",
      Builtin::Sinh => "sinh",
      Builtin::Cosh => "cosh",
      Builtin::Tanh => "tanh",
      Builtin::Asinh => "asinh",
      Builtin::Acosh => "acosh",
      Builtin::Atanh => "atanh",
      Builtin::Exp => "exp",
      Builtin::Log => "log",
      Builtin::Ln => "ln",
      Builtin::Log10 => "log10",
      Builtin::Log2 => "log2",
      Builtin::Sqrt => "sqrt",
      Builtin::Cbrt => "cbrt",
      Builtin::Abs => "abs",
      Builtin::Arg => "arg",
      Builtin::Conj => "conj",
      Builtin::Re => "re",
      Builtin::Im => "im",
      Builtin::Pow => "pow",
    }
  }

  /// Accepted argument counts as an inclusive range.
  fn arity(self) -> (usize, usize) {
    match self {
      Builtin::Pow => (2, 2),
      Builtin::Log => (1, 2),
      _ => (1, 1),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Real(f64),
  Constant(Constant),
  /// The free variable `z`.
  Variable,
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  FunctionCall {
    name: Builtin,
    args: Vec<Expr>,
  },
}

fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
  Expr::BinaryOp {
    op,
    left: Box::new(left),
    right: Box::new(right),
  }
}

/// Converts a parsed `Program` (or any inner rule) into an `Expr`,
/// resolving identifiers and checking call arities.
pub fn pair_to_expr(pair: Pair<Rule>) -> Result<Expr, ComplexityError> {
  match pair.as_rule() {
    Rule::Program | Rule::Expression => {
      let inner = pair
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or(ComplexityError::EmptyInput)?;
      pair_to_expr(inner)
    }
    Rule::Sum | Rule::Product => {
      let mut inner = pair.into_inner();
      let first = inner.next().ok_or(ComplexityError::EmptyInput)?;
      let mut acc = pair_to_expr(first)?;
      while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
          "+" => BinaryOperator::Plus,
          "-" => BinaryOperator::Minus,
          "*" => BinaryOperator::Times,
          _ => BinaryOperator::Divide,
        };
        let rhs = inner.next().ok_or(ComplexityError::EmptyInput)?;
        acc = binary(op, acc, pair_to_expr(rhs)?);
      }
      Ok(acc)
    }
    Rule::Unary => {
      let mut negations = 0;
      let mut operand = None;
      for p in pair.into_inner() {
        match p.as_rule() {
          Rule::Negate => {
            if p.as_str() == "-" {
              negations += 1;
            }
          }
          _ => operand = Some(pair_to_expr(p)?),
        }
      }
      let operand = operand.ok_or(ComplexityError::EmptyInput)?;
      if negations % 2 == 1 {
        Ok(Expr::UnaryOp {
          op: UnaryOperator::Minus,
          operand: Box::new(operand),
        })
      } else {
        Ok(operand)
      }
    }
    Rule::Implicit => {
      let mut inner = pair.into_inner();
      let first = inner.next().ok_or(ComplexityError::EmptyInput)?;
      let mut acc = pair_to_expr(first)?;
      for factor in inner {
        acc = binary(BinaryOperator::Times, acc, pair_to_expr(factor)?);
      }
      Ok(acc)
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base =
        pair_to_expr(inner.next().ok_or(ComplexityError::EmptyInput)?)?;
      match inner.next() {
        Some(exponent) => {
          Ok(binary(BinaryOperator::Power, base, pair_to_expr(exponent)?))
        }
        None => Ok(base),
      }
    }
    Rule::Call => {
      let mut inner = pair.into_inner();
      let ident = inner.next().ok_or(ComplexityError::EmptyInput)?;
      let fname = ident.as_str();
      let name = Builtin::lookup(fname)
        .ok_or_else(|| ComplexityError::UnknownFunction(fname.to_string()))?;
      let args = inner.map(pair_to_expr).collect::<Result<Vec<_>, _>>()?;
      let (min, max) = name.arity();
      if args.len() < min || args.len() > max {
        let expected = if min == max {
          min.to_string()
        } else {
          format!("{min} to {max}")
        };
        return Err(ComplexityError::Arity {
          name: fname.to_string(),
          expected,
          got: args.len(),
        });
      }
      Ok(Expr::FunctionCall { name, args })
    }
    Rule::Identifier => {
      let name = pair.as_str();
      if name == "z" {
        Ok(Expr::Variable)
      } else if let Some(c) = Constant::lookup(name) {
        Ok(Expr::Constant(c))
      } else if Builtin::lookup(name).is_some() {
        Err(ComplexityError::UnknownIdentifier(format!(
          "{name} (did you mean {name}(z)?)"
        )))
      } else {
        Err(ComplexityError::UnknownIdentifier(name.to_string()))
      }
    }
    Rule::Number => {
      let text = pair.as_str();
      text.parse::<f64>().map(Expr::Real).map_err(|_| {
        ComplexityError::UnknownIdentifier(format!("malformed number {text}"))
      })
    }
    other => Err(ComplexityError::UnknownIdentifier(format!("{other:?}"))),
  }
}

fn precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::BinaryOp { op, .. } => match op {
      BinaryOperator::Plus | BinaryOperator::Minus => 1,
      BinaryOperator::Times | BinaryOperator::Divide => 2,
      BinaryOperator::Power => 4,
    },
    Expr::UnaryOp { .. } => 3,
    _ => 5,
  }
}

fn wrap(expr: &Expr, min: u8) -> String {
  let s = expr_to_string(expr);
  if precedence(expr) < min {
    format!("({s})")
  } else {
    s
  }
}

fn format_real(x: f64) -> String {
  if x.fract() == 0.0 && x.abs() < 1e15 {
    format!("{}", x as i64)
  } else {
    format!("{x}")
  }
}

/// Renders an expression back to source text with explicit operators and
/// only the parentheses precedence requires.
pub fn expr_to_string(expr: &Expr) -> String {
  match expr {
    Expr::Real(x) => format_real(*x),
    Expr::Constant(c) => c.name().to_string(),
    Expr::Variable => "z".to_string(),
    Expr::UnaryOp { operand, .. } => format!("-{}", wrap(operand, 3)),
    Expr::BinaryOp { op, left, right } => match op {
      BinaryOperator::Plus => {
        format!("{} + {}", wrap(left, 1), wrap(right, 1))
      }
      BinaryOperator::Minus => {
        format!("{} - {}", wrap(left, 1), wrap(right, 2))
      }
      BinaryOperator::Times => {
        format!("{} * {}", wrap(left, 2), wrap(right, 2))
      }
      BinaryOperator::Divide => {
        format!("{} / {}", wrap(left, 2), wrap(right, 3))
      }
      BinaryOperator::Power => {
        format!("{}^{}", wrap(left, 5), wrap(right, 4))
      }
    },
    Expr::FunctionCall { name, args } => {
      let parts: Vec<String> = args.iter().map(expr_to_string).collect();
      format!("{}({})", name.name(), parts.join(", "))
    }
  }
}
