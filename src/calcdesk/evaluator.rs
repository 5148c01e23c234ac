//! # Expression Evaluator
//!
//! Evaluates scientific-calculator expressions with [`evalexpr`].
//!
//! Input text is first lexed by [`crate::calcdesk::expression`], then rendered
//! into evalexpr syntax (float literals, explicit multiplication, `fact(...)`
//! for postfix `!`) and evaluated against a context that binds the constants
//! and every supported function.
//!
//! ## Supported syntax
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `^` (also `**`), unary minus,
//!   implicit multiplication (`2π`, `3(4+1)`)
//! - **Trigonometric**: `sin()`, `cos()`, `tan()`, `asin()`, `acos()`, `atan()`,
//!   interpreted in the evaluator's [`AngleMode`]
//! - **Hyperbolic**: `sinh()`, `cosh()`, `tanh()`
//! - **Roots and logarithms**: `sqrt()`/`√()`, `cbrt()`, `ln()`, `log()` and
//!   `log10()` (base 10), `log2()`, `exp()`
//! - **Rounding**: `abs()`, `floor()`, `ceil()`, `round()`
//! - **Factorial**: postfix `!` on non-negative integers
//! - **Constants**: `pi`/`π`, `e`
//!
//! ```rust
//! use calcdesk::evaluator::{AngleMode, Evaluator};
//!
//! let degrees = Evaluator::new(AngleMode::Degrees);
//! assert!((degrees.evaluate("sin(30)").unwrap() - 0.5).abs() < 1e-12);
//!
//! let radians = Evaluator::new(AngleMode::Radians);
//! assert!((radians.evaluate("cos(π)").unwrap() + 1.0).abs() < 1e-12);
//! ```
//!
//! ## Error Handling
//!
//! Malformed input, unknown symbols, domain errors (`sqrt(-1)`), division by
//! zero and overflow all come back as [`CalculatorError`].

use crate::calcdesk::expression::{render_for_evaluation, tokenize, Lexeme, Token};
use evalexpr::{
    ContextWithMutableFunctions, ContextWithMutableVariables, DefaultNumericTypes, Function,
    HashMapContext, Value,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Largest integer whose factorial still fits in an `f64`.
const MAX_FACTORIAL: f64 = 170.0;

/// Trig results closer to zero than this are reported as exactly zero, so
/// `sin(180)` in degrees shows `0` instead of `1.22e-16`.
const TRIG_ZERO_SNAP: f64 = 1e-12;

/// Error type for calculator operations
///
/// Contains a descriptive error message for any calculation failures.
///
/// # Examples
///
/// ```rust
/// use calcdesk::evaluator::CalculatorError;
///
/// let error = CalculatorError::new("Division by zero");
/// assert_eq!(error.to_string(), "Calculator error: Division by zero");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorError {
    message: String,
}

impl CalculatorError {
    pub fn new(message: impl Into<String>) -> Self {
        CalculatorError {
            message: message.into(),
        }
    }

    /// The bare message, without the `Calculator error:` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CalculatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calculator error: {}", self.message)
    }
}

impl Error for CalculatorError {}

/// Result type for calculator operations
pub type CalculatorResult = Result<f64, CalculatorError>;

/// How trigonometric functions read and return angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle.to_radians(),
            AngleMode::Radians => angle,
        }
    }

    fn from_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle.to_degrees(),
            AngleMode::Radians => angle,
        }
    }
}

/// An evaluation context bound to one [`AngleMode`].
///
/// The trig bindings are fixed when the evaluator is built; switching modes
/// means building a new evaluator, never mutating a shared one.
#[derive(Clone)]
pub struct Evaluator {
    angle_mode: AngleMode,
    context: HashMapContext<DefaultNumericTypes>,
}

impl Evaluator {
    pub fn new(angle_mode: AngleMode) -> Self {
        Evaluator {
            angle_mode,
            context: build_context(angle_mode),
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Evaluate expression text as typed on the calculator.
    pub fn evaluate(&self, expression: &str) -> CalculatorResult {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(CalculatorError::new("Empty expression"));
        }
        let mut lexemes = tokenize(expression)?;

        // Close groups left open at the end (`sin(30` reads as `sin(30)`).
        let mut depth: i32 = 0;
        for lexeme in &lexemes {
            match lexeme.token {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
        }
        for _ in 0..depth.max(0) {
            lexemes.push(Lexeme {
                token: Token::RParen,
                span: expression.len()..expression.len(),
            });
        }
        self.evaluate_lexemes(&lexemes)
    }

    /// Evaluate an already lexed expression or sub-expression.
    pub fn evaluate_lexemes(&self, lexemes: &[Lexeme]) -> CalculatorResult {
        if lexemes.is_empty() {
            return Err(CalculatorError::new("Empty expression"));
        }
        let prepared = render_for_evaluation(lexemes)?;
        log::debug!("Evaluator::evaluate_lexemes: `{}`", prepared);

        let value = evalexpr::eval_with_context(&prepared, &self.context)
            .map_err(|e| CalculatorError::new(format!("Evaluation error: {}", e)))?;
        let number = value
            .as_number()
            .map_err(|_| CalculatorError::new("Result is not a number"))?;

        if number.is_nan() {
            Err(CalculatorError::new("Result is not a real number"))
        } else if number.is_infinite() {
            Err(CalculatorError::new(
                "Result is infinite (division by zero or overflow)",
            ))
        } else {
            Ok(number)
        }
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("angle_mode", &self.angle_mode)
            .finish_non_exhaustive()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}

fn build_context(mode: AngleMode) -> HashMapContext<DefaultNumericTypes> {
    let mut context = HashMapContext::<DefaultNumericTypes>::new();
    let _ = context.set_value("pi".to_string(), Value::Float(std::f64::consts::PI));
    let _ = context.set_value("e".to_string(), Value::Float(std::f64::consts::E));

    let functions: Vec<(&str, Function<DefaultNumericTypes>)> = vec![
        ("sin", unary(move |x| snap_zero(mode.to_radians(x).sin()))),
        ("cos", unary(move |x| snap_zero(mode.to_radians(x).cos()))),
        ("tan", unary(move |x| snap_zero(mode.to_radians(x).tan()))),
        ("asin", unary(move |x| mode.from_radians(x.asin()))),
        ("acos", unary(move |x| mode.from_radians(x.acos()))),
        ("atan", unary(move |x| mode.from_radians(x.atan()))),
        ("sinh", unary(f64::sinh)),
        ("cosh", unary(f64::cosh)),
        ("tanh", unary(f64::tanh)),
        ("sqrt", unary(f64::sqrt)),
        ("cbrt", unary(f64::cbrt)),
        ("ln", unary(f64::ln)),
        ("log", unary(f64::log10)),
        ("log10", unary(f64::log10)),
        ("log2", unary(f64::log2)),
        ("exp", unary(f64::exp)),
        ("abs", unary(f64::abs)),
        ("floor", unary(f64::floor)),
        ("ceil", unary(f64::ceil)),
        ("round", unary(f64::round)),
        ("fact", unary(factorial)),
    ];

    for (name, function) in functions {
        if let Err(e) = context.set_function(name.to_string(), function) {
            log::error!("Evaluator: could not bind `{}`: {}", name, e);
        }
    }
    context
}

fn unary<F>(f: F) -> Function<DefaultNumericTypes>
where
    F: Fn(f64) -> f64 + Send + Sync + Clone + 'static,
{
    Function::new(move |argument: &Value<DefaultNumericTypes>| {
        let x = argument.as_number()?;
        Ok(Value::Float(f(x)))
    })
}

fn snap_zero(value: f64) -> f64 {
    if value.abs() < TRIG_ZERO_SNAP {
        0.0
    } else {
        value
    }
}

/// `n!` for non-negative integers; NaN otherwise, which the evaluator then
/// reports as a domain error.
fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 {
        return f64::NAN;
    }
    if n > MAX_FACTORIAL {
        return f64::INFINITY;
    }
    (2..=n as u64).fold(1.0, |acc, k| acc * k as f64)
}
