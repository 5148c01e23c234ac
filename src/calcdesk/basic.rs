//! # Standard Calculator Engine
//!
//! A classic four-function accumulator: the user types a number, picks an
//! operator, types a second number and presses equals. Chained operators
//! compute eagerly (`2 + 3 ×` shows `5`), so there is never more than one
//! pending operator.
//!
//! ```rust
//! use calcdesk::basic::{BasicCalculator, Operator};
//!
//! let mut calc = BasicCalculator::new();
//! calc.input_digit('2');
//! calc.handle_operator(Operator::Add);
//! calc.input_digit('3');
//! calc.handle_equals();
//!
//! assert_eq!(calc.display_value(), "5");
//! assert_eq!(calc.history().latest().unwrap().expression, "2 + 3");
//! ```
//!
//! All arithmetic happens in `f64` and every result is rounded to 15
//! significant digits before it is displayed or reused as an operand.
//! Dividing by zero is not an exception: the display shows `Error` and all
//! pending state is dropped, leaving the calculator ready for new input.

use crate::calcdesk::format::{format_number, round_significant, SIGNIFICANT_DIGITS};
use crate::calcdesk::history::{History, HistoryEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display value shown after an arithmetic failure.
pub const ERROR_DISPLAY: &str = "Error";

/// One of the four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Glyph shown to the user.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Plain ASCII form used inside expression text.
    pub fn ascii(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }

    /// Accepts both the display glyph and the ASCII spelling.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Subtract),
            '*' | '×' | 'x' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Operator::from_char(c).ok_or_else(|| format!("Unknown operator: {}", s))
            }
            _ => Err(format!("Unknown operator: {}", s)),
        }
    }
}

/// Serializable state of the standard calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicCalculatorState {
    pub display_value: String,
    pub full_expression: String,
    pub first_operand: Option<f64>,
    pub operator: Option<Operator>,
    pub waiting_for_second_operand: bool,
    pub history: History,
}

impl Default for BasicCalculatorState {
    fn default() -> Self {
        Self {
            display_value: "0".to_string(),
            full_expression: String::new(),
            first_operand: None,
            operator: None,
            waiting_for_second_operand: false,
            history: History::unbounded(),
        }
    }
}

/// The standard calculator engine.
///
/// Every method runs to completion and leaves the engine in a displayable
/// state; read it back through the accessors or [`BasicCalculator::state`].
#[derive(Debug, Clone, Default)]
pub struct BasicCalculator {
    state: BasicCalculatorState,
}

impl BasicCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously saved state.
    pub fn from_state(state: BasicCalculatorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BasicCalculatorState {
        &self.state
    }

    pub fn into_state(self) -> BasicCalculatorState {
        self.state
    }

    pub fn display_value(&self) -> &str {
        &self.state.display_value
    }

    pub fn full_expression(&self) -> &str {
        &self.state.full_expression
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.state.operator
    }

    pub fn first_operand(&self) -> Option<f64> {
        self.state.first_operand
    }

    pub fn is_waiting_for_second_operand(&self) -> bool {
        self.state.waiting_for_second_operand
    }

    fn shows_error(&self) -> bool {
        self.state.display_value == ERROR_DISPLAY
    }

    /// Type a single digit. Anything other than `0`–`9` is ignored.
    pub fn input_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            log::warn!("BasicCalculator::input_digit ignoring non-digit {:?}", digit);
            return;
        }
        let state = &mut self.state;
        if state.waiting_for_second_operand {
            state.display_value = digit.to_string();
            state.waiting_for_second_operand = false;
        } else if state.display_value == "0" || state.display_value == ERROR_DISPLAY {
            state.display_value = digit.to_string();
        } else {
            state.display_value.push(digit);
        }
    }

    pub fn input_decimal(&mut self) {
        if self.state.waiting_for_second_operand || self.shows_error() {
            self.state.display_value = "0.".to_string();
            self.state.waiting_for_second_operand = false;
            return;
        }
        if !self.state.display_value.contains('.') {
            self.state.display_value.push('.');
        }
    }

    pub fn toggle_sign(&mut self) {
        let display = &mut self.state.display_value;
        if display == "0" || display == ERROR_DISPLAY {
            return;
        }
        if let Some(unsigned) = display.strip_prefix('-') {
            *display = unsigned.to_string();
        } else {
            display.insert(0, '-');
        }
    }

    /// Convert the display to a percentage.
    ///
    /// With a pending `a op` the display becomes `display% of a`, so
    /// `200 + 10 %` turns the `10` into `20`. Without one it is simply divided
    /// by 100.
    pub fn handle_percent(&mut self) {
        let Some(current) = self.display_number() else {
            return;
        };
        let result = match (self.state.operator, self.state.first_operand) {
            (Some(_), Some(first)) => current / 100.0 * first,
            _ => current / 100.0,
        };
        self.state.display_value = format_number(result);
    }

    pub fn backspace(&mut self) {
        if self.state.waiting_for_second_operand {
            return;
        }
        if self.shows_error() {
            self.state.display_value = "0".to_string();
            return;
        }
        let display = &mut self.state.display_value;
        display.pop();
        if display.is_empty() || display == "-" {
            *display = "0".to_string();
        }
    }

    /// Choose the next operator, computing any pending operation first.
    pub fn handle_operator(&mut self, next: Operator) {
        if self.state.operator.is_some() && self.state.waiting_for_second_operand {
            self.state.operator = Some(next);
            self.replace_trailing_operator(next);
            return;
        }

        let Some(input) = self.display_number() else {
            return;
        };

        match (self.state.first_operand, self.state.operator) {
            (Some(first), Some(pending)) => {
                let Some(result) = self.compute(first, pending, input) else {
                    self.enter_error();
                    return;
                };
                let result_text = format_number(result);
                self.state.history.record(HistoryEntry::new(
                    operation_text(first, pending, input),
                    result_text.clone(),
                ));
                self.state.display_value = result_text;
                self.state.first_operand = Some(result);
                self.push_trail(input, next);
            }
            _ => {
                self.state.first_operand = Some(input);
                self.state.full_expression.clear();
                self.push_trail(input, next);
            }
        }

        self.state.waiting_for_second_operand = true;
        self.state.operator = Some(next);
    }

    /// Apply the pending operator to the display value.
    pub fn handle_equals(&mut self) {
        let (Some(first), Some(operator)) = (self.state.first_operand, self.state.operator) else {
            return;
        };
        let Some(second) = self.display_number() else {
            return;
        };

        let Some(result) = self.compute(first, operator, second) else {
            self.enter_error();
            return;
        };

        let result_text = format_number(result);
        self.state.history.record(HistoryEntry::new(
            operation_text(first, operator, second),
            result_text.clone(),
        ));
        self.state
            .full_expression
            .push_str(&format!("{} =", format_number(second)));
        self.state.display_value = result_text;
        self.state.first_operand = None;
        self.state.operator = None;
        self.state.waiting_for_second_operand = false;
    }

    pub fn clear_input(&mut self) {
        let history = std::mem::take(&mut self.state.history);
        self.state = BasicCalculatorState {
            history,
            ..BasicCalculatorState::default()
        };
    }

    pub fn clear_history(&mut self) {
        self.state.history.clear();
    }

    fn display_number(&self) -> Option<f64> {
        self.state
            .display_value
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// `None` means the operation has no finite result.
    fn compute(&self, first: f64, operator: Operator, second: f64) -> Option<f64> {
        if operator == Operator::Divide && second == 0.0 {
            log::debug!("BasicCalculator: division by zero ({} ÷ 0)", first);
            return None;
        }
        let result = round_significant(operator.apply(first, second), SIGNIFICANT_DIGITS);
        result.is_finite().then_some(result)
    }

    fn enter_error(&mut self) {
        self.state.display_value = ERROR_DISPLAY.to_string();
        self.state.full_expression.clear();
        self.state.first_operand = None;
        self.state.operator = None;
        self.state.waiting_for_second_operand = false;
    }

    fn push_trail(&mut self, operand: f64, operator: Operator) {
        self.state
            .full_expression
            .push_str(&format!("{} {} ", format_number(operand), operator));
    }

    fn replace_trailing_operator(&mut self, operator: Operator) {
        let trail = self.state.full_expression.trim_end();
        if let Some(last) = trail.chars().last() {
            if Operator::from_char(last).is_some() {
                let keep = trail.len() - last.len_utf8();
                let mut replaced = trail[..keep].to_string();
                replaced.push(operator.symbol());
                replaced.push(' ');
                self.state.full_expression = replaced;
            }
        }
    }
}

fn operation_text(first: f64, operator: Operator, second: f64) -> String {
    format!(
        "{} {} {}",
        format_number(first),
        operator.symbol(),
        format_number(second)
    )
}
