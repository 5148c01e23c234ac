//! # Scientific Calculator Engine
//!
//! Unlike the [standard calculator](crate::calcdesk::basic) this engine does
//! not accumulate: it builds an expression string key by key and hands the
//! whole thing to its [`Evaluator`] on `=`.
//!
//! The engine alternates between two states:
//!
//! ```text
//!   editing ──calculate()──▶ result
//!      ▲                       │
//!      ├──── digit (fresh) ────┤
//!      └── operator (chain) ───┘
//! ```
//!
//! A failed evaluation also lands in the result state, with `Error` on the
//! display and the diagnostic in the expression line, until the user clears or
//! starts typing again.
//!
//! ```rust
//! use calcdesk::scientific::{Function, ScientificCalculator};
//! use calcdesk::basic::Operator;
//!
//! let mut calc = ScientificCalculator::new();
//! calc.input_digit('2');
//! calc.input_function(Function::Power);
//! calc.input_digit('1');
//! calc.input_digit('0');
//! calc.calculate();
//! assert_eq!(calc.display(), "1024");
//!
//! // Operators chain from the previous result.
//! calc.input_operator(Operator::Add);
//! calc.input_digit('1');
//! calc.calculate();
//! assert_eq!(calc.display(), "1025");
//! ```

use crate::calcdesk::basic::{Operator, ERROR_DISPLAY};
use crate::calcdesk::config::CalcDeskConfig;
use crate::calcdesk::evaluator::{AngleMode, Evaluator};
use crate::calcdesk::expression::{
    enclosing_start, is_unary, operand_literal, operand_start, tokenize, Token,
};
use crate::calcdesk::format::format_result;
use crate::calcdesk::history::{History, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Default number of entries the scientific history keeps.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Function and structure keys of the scientific keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    /// Base-10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
    Exp,
    /// `x²`
    Square,
    /// `xʸ`
    Power,
    /// `10ˣ`
    TenPower,
    Factorial,
    OpenParen,
    CloseParen,
    Pi,
    E,
}

impl Function {
    /// Text inserted into the expression.
    pub fn text(self) -> &'static str {
        match self {
            Function::Sin => "sin(",
            Function::Cos => "cos(",
            Function::Tan => "tan(",
            Function::Asin => "asin(",
            Function::Acos => "acos(",
            Function::Atan => "atan(",
            Function::Sqrt => "√(",
            Function::Log => "log(",
            Function::Ln => "ln(",
            Function::Exp => "exp(",
            Function::Square => "^2",
            Function::Power => "^",
            Function::TenPower => "10^",
            Function::Factorial => "!",
            Function::OpenParen => "(",
            Function::CloseParen => ")",
            Function::Pi => "π",
            Function::E => "e",
        }
    }

    /// Keys that operate on what is already there (`x²`, `n!`, `)`), as
    /// opposed to keys that begin a new operand.
    fn continues_operand(self) -> bool {
        matches!(
            self,
            Function::Square | Function::Power | Function::Factorial | Function::CloseParen
        )
    }
}

/// Serializable snapshot of a [`ScientificCalculator`].
///
/// The evaluator is not part of the snapshot; it is rebuilt from `angle_mode` by
/// [`ScientificCalculator::from_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientificCalculatorState {
    pub expression: String,
    pub display: String,
    pub history: History,
    pub is_result: bool,
    pub angle_mode: AngleMode,
    pub memory: f64,
}

impl Default for ScientificCalculatorState {
    fn default() -> Self {
        Self {
            expression: String::new(),
            display: "0".to_string(),
            history: History::bounded(DEFAULT_HISTORY_LIMIT),
            is_result: false,
            angle_mode: AngleMode::default(),
            memory: 0.0,
        }
    }
}

/// The scientific calculator engine. Each instance owns its evaluator.
#[derive(Debug, Clone)]
pub struct ScientificCalculator {
    state: ScientificCalculatorState,
    evaluator: Evaluator,
}

impl ScientificCalculator {
    pub fn new() -> Self {
        Self::from_state(ScientificCalculatorState::default())
    }

    /// Build an engine with the configured history cap and angle mode.
    pub fn with_config(config: &CalcDeskConfig) -> Self {
        Self::from_state(ScientificCalculatorState {
            history: History::bounded(config.scientific_history_limit),
            angle_mode: config.default_angle_mode,
            ..ScientificCalculatorState::default()
        })
    }

    pub fn from_state(state: ScientificCalculatorState) -> Self {
        let evaluator = Evaluator::new(state.angle_mode);
        Self { state, evaluator }
    }

    pub fn state(&self) -> &ScientificCalculatorState {
        &self.state
    }

    pub fn into_state(self) -> ScientificCalculatorState {
        self.state
    }

    pub fn expression(&self) -> &str {
        &self.state.expression
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn is_result(&self) -> bool {
        self.state.is_result
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.state.angle_mode
    }

    pub fn memory(&self) -> f64 {
        self.state.memory
    }

    fn shows_error(&self) -> bool {
        self.state.display == ERROR_DISPLAY
    }

    /// Type a digit or the decimal point.
    pub fn input_digit(&mut self, digit: char) {
        if !(digit.is_ascii_digit() || digit == '.') {
            log::warn!(
                "ScientificCalculator::input_digit ignoring {:?}",
                digit
            );
            return;
        }

        if self.state.is_result {
            self.state.expression.clear();
            self.state.is_result = false;
        }

        if digit == '.' {
            if self.trailing_number().is_some_and(|n| n.contains('.')) {
                return;
            }
            if self.trailing_number().is_none() {
                self.state.expression.push('0');
            }
            self.state.expression.push('.');
        } else if self.state.expression == "0" {
            self.state.expression = digit.to_string();
        } else {
            self.state.expression.push(digit);
        }
        self.sync_display();
    }

    /// Append a binary operator. In the result state the chain continues
    /// from the displayed result.
    pub fn input_operator(&mut self, operator: Operator) {
        if self.state.is_result {
            self.state.expression = if self.shows_error() {
                "0".to_string()
            } else {
                operand_literal(&self.state.display)
            };
            self.state.is_result = false;
        }

        if self.state.expression.is_empty() {
            if operator == Operator::Subtract {
                self.state.expression.push('-');
            } else {
                self.state.expression.push('0');
                self.state.expression.push(operator.ascii());
            }
            self.sync_display();
            return;
        }

        // Pressing a second operator replaces the first (`5+*` → `5*`).
        let ends_with_operator = self
            .state
            .expression
            .chars()
            .last()
            .is_some_and(|c| matches!(c, '+' | '-' | '*' | '/'));
        if ends_with_operator && !self.state.expression.ends_with("(-") {
            self.state.expression.pop();
            if self.state.expression.is_empty() && operator != Operator::Subtract {
                self.state.expression.push('0');
            }
        }
        self.state.expression.push(operator.ascii());
        self.sync_display();
    }

    /// Insert a function, constant, parenthesis or postfix operator.
    pub fn input_function(&mut self, function: Function) {
        if self.state.is_result {
            if function.continues_operand() && !self.shows_error() {
                self.state.expression = operand_literal(&self.state.display);
            } else {
                self.state.expression.clear();
            }
            self.state.is_result = false;
        }

        if self.state.expression == "0" && !function.continues_operand() {
            self.state.expression.clear();
        }
        self.state.expression.push_str(function.text());
        self.sync_display();
    }

    /// Evaluate the expression and move to the result state.
    pub fn calculate(&mut self) {
        if self.state.is_result || self.state.expression.trim().is_empty() {
            return;
        }

        match self.evaluator.evaluate(&self.state.expression) {
            Ok(value) => {
                let result = format_result(value);
                self.state
                    .history
                    .record(HistoryEntry::new(self.state.expression.clone(), result.clone()));
                self.state.display = result;
            }
            Err(e) => {
                log::debug!(
                    "ScientificCalculator::calculate failed for `{}`: {}",
                    self.state.expression,
                    e
                );
                self.state.display = ERROR_DISPLAY.to_string();
                self.state.expression = e.message().to_string();
            }
        }
        self.state.is_result = true;
    }

    pub fn clear(&mut self) {
        self.state.expression.clear();
        self.state.display = "0".to_string();
        self.state.is_result = false;
    }

    /// Remove the last key press. A trailing function name goes as a whole.
    pub fn backspace(&mut self) {
        if self.state.is_result {
            self.clear();
            return;
        }
        let expression = &mut self.state.expression;
        let function_prefix = ["asin(", "acos(", "atan(", "sin(", "cos(", "tan(", "log(", "ln(", "exp(", "√("]
            .iter()
            .find(|prefix| expression.ends_with(*prefix));
        match function_prefix {
            Some(prefix) => {
                let keep = expression.len() - prefix.len();
                expression.truncate(keep);
            }
            None => {
                expression.pop();
            }
        }
        self.sync_display();
    }

    /// Negate the result, or toggle a leading minus on the whole expression
    /// while editing.
    pub fn toggle_sign(&mut self) {
        if self.state.is_result {
            if let Ok(value) = self.state.display.parse::<f64>() {
                self.state.display = format_result(-value);
            }
            return;
        }

        let expression = &mut self.state.expression;
        if expression.is_empty() || expression == "0" {
            return;
        }
        if let Some(rest) = expression.strip_prefix('-') {
            *expression = rest.to_string();
        } else {
            expression.insert(0, '-');
        }
        self.sync_display();
    }

    /// Percent key.
    ///
    /// On a result this divides by 100. While editing, the trailing operand
    /// becomes a percentage of the sub-expression before it when they are
    /// joined by `+` or `-` (`200+10%` → `200+(10/100)*200`) and a plain
    /// fraction after `*` or `/` (`50*10%` → `50*(10/100)`). Without a
    /// preceding term the whole expression is divided by 100.
    pub fn input_percent(&mut self) {
        if self.state.is_result {
            if let Ok(value) = self.state.display.parse::<f64>() {
                self.state.display = format_result(value / 100.0);
            }
            return;
        }
        if self.state.expression.trim().is_empty() {
            return;
        }

        let rewritten = self
            .percent_of_preceding_term()
            .unwrap_or_else(|| format!("({})/100", self.state.expression));
        self.state.expression = rewritten;
        self.sync_display();
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        if mode == self.state.angle_mode {
            return;
        }
        self.state.angle_mode = mode;
        self.evaluator = Evaluator::new(mode);
    }

    pub fn memory_add(&mut self) {
        if let Some(value) = self.display_number() {
            self.state.memory += value;
        }
    }

    pub fn memory_subtract(&mut self) {
        if let Some(value) = self.display_number() {
            self.state.memory -= value;
        }
    }

    /// Insert the memory value into the expression. After a complete operand
    /// the value is joined with `*`, so `12` then MR gives `12*5`.
    pub fn memory_recall(&mut self) {
        let text = operand_literal(&format_result(self.state.memory));
        if self.state.is_result || self.state.expression.is_empty() || self.state.expression == "0"
        {
            self.state.expression = text;
            self.state.is_result = false;
        } else {
            let follows_operand = self
                .state
                .expression
                .chars()
                .last()
                .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | ')' | '!' | 'π' | 'e'));
            if follows_operand {
                self.state.expression.push('*');
            }
            if self.state.memory < 0.0 {
                self.state.expression.push_str(&format!("({})", text));
            } else {
                self.state.expression.push_str(&text);
            }
        }
        self.sync_display();
    }

    pub fn memory_clear(&mut self) {
        self.state.memory = 0.0;
    }

    pub fn clear_history(&mut self) {
        self.state.history.clear();
    }

    fn sync_display(&mut self) {
        self.state.display = if self.state.expression.is_empty() {
            "0".to_string()
        } else {
            self.state.expression.clone()
        };
    }

    fn display_number(&self) -> Option<f64> {
        match self.state.display.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                log::debug!(
                    "ScientificCalculator: `{}` is not a number, memory unchanged",
                    self.state.display
                );
                None
            }
        }
    }

    fn trailing_number(&self) -> Option<&str> {
        let start = self
            .state
            .expression
            .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
            .map(|i| i + self.state.expression[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let tail = &self.state.expression[start..];
        (!tail.is_empty()).then_some(tail)
    }

    /// Structural percent rewrite; `None` when there is no preceding term or
    /// it cannot be evaluated.
    fn percent_of_preceding_term(&self) -> Option<String> {
        let expression = &self.state.expression;
        let lexemes = tokenize(expression).ok()?;
        let mut start = operand_start(&lexemes, lexemes.len())?;

        // A sign directly in front of the operand belongs to it.
        if start > 0 && is_unary(&lexemes, start - 1) {
            start -= 1;
        }
        let operator_index = start.checked_sub(1)?;
        let Token::Operator(operator) = lexemes[operator_index].token else {
            return None;
        };

        let operand_text = &expression[lexemes[start].span.start..];
        let prefix = &expression[..lexemes[start].span.start];

        match operator {
            '+' | '-' => {
                let base_start = enclosing_start(&lexemes, operator_index);
                let base = self
                    .evaluator
                    .evaluate_lexemes(&lexemes[base_start..operator_index])
                    .ok()?;
                let base_text = if base < 0.0 {
                    format!("({})", format_result(base))
                } else {
                    format_result(base)
                };
                Some(format!("{}({}/100)*{}", prefix, operand_text, base_text))
            }
            '*' | '/' => Some(format!("{}({}/100)", prefix, operand_text)),
            _ => None,
        }
    }
}

impl Default for ScientificCalculator {
    fn default() -> Self {
        Self::new()
    }
}
