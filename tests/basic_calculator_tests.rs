//! Test suite for the standard (accumulator) calculator
//!
//! Tests cover:
//! - Digit and decimal entry
//! - Immediate-execution chaining and the expression trail
//! - Percent, sign toggle and backspace
//! - Division by zero and recovery from the error state
//! - History bookkeeping

use calcdesk::basic::{BasicCalculator, BasicCalculatorState, Operator};

fn type_number(calc: &mut BasicCalculator, text: &str) {
    for c in text.chars() {
        if c == '.' {
            calc.input_decimal();
        } else {
            calc.input_digit(c);
        }
    }
}

#[test]
fn test_digits_build_a_single_numeral() {
    let mut calc = BasicCalculator::new();
    assert_eq!(calc.display_value(), "0");

    calc.input_digit('0');
    assert_eq!(calc.display_value(), "0");
    calc.input_digit('1');
    calc.input_decimal();
    calc.input_digit('2');
    calc.input_decimal();
    calc.input_digit('3');
    calc.input_decimal();
    assert_eq!(calc.display_value(), "1.23");
    assert_eq!(calc.display_value().matches('.').count(), 1);

    calc.input_digit('x');
    assert_eq!(calc.display_value(), "1.23");
}

#[test]
fn test_decimal_after_operator_starts_fresh_operand() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "7");
    calc.handle_operator(Operator::Add);
    calc.input_decimal();
    assert_eq!(calc.display_value(), "0.");
    calc.input_digit('5');
    calc.handle_equals();
    assert_eq!(calc.display_value(), "7.5");
}

#[test]
fn test_simple_addition_records_history() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "2");
    calc.handle_operator(Operator::Add);
    type_number(&mut calc, "3");
    calc.handle_equals();

    assert_eq!(calc.display_value(), "5");
    let entry = calc.history().latest().unwrap();
    assert!(entry.expression.contains('2'));
    assert!(entry.expression.contains('3'));
    assert_eq!(entry.result, "5");
    assert_eq!(calc.full_expression(), "2 + 3 =");
    assert!(calc.pending_operator().is_none());
    assert!(calc.first_operand().is_none());
}

#[test]
fn test_chained_operators_compute_eagerly() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "2");
    calc.handle_operator(Operator::Add);
    type_number(&mut calc, "3");
    calc.handle_operator(Operator::Multiply);

    assert_eq!(calc.display_value(), "5");
    assert_eq!(calc.first_operand(), Some(5.0));
    assert!(calc.is_waiting_for_second_operand());

    type_number(&mut calc, "4");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "20");
    assert_eq!(calc.full_expression(), "2 + 3 × 4 =");

    let expressions: Vec<String> = calc.history().iter().map(|e| e.expression.clone()).collect();
    assert_eq!(expressions, vec!["5 × 4", "2 + 3"]);
}

#[test]
fn test_second_operator_replaces_the_first() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "5");
    calc.handle_operator(Operator::Add);
    calc.handle_operator(Operator::Multiply);

    assert_eq!(calc.pending_operator(), Some(Operator::Multiply));
    assert_eq!(calc.full_expression(), "5 × ");
    assert!(calc.history().is_empty());

    type_number(&mut calc, "3");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "15");
}

#[test]
fn test_float_noise_is_rounded_away() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "0.1");
    calc.handle_operator(Operator::Add);
    type_number(&mut calc, "0.2");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "0.3");
}

#[test]
fn test_division_by_zero_shows_error_and_resets() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "6");
    calc.handle_operator(Operator::Divide);
    type_number(&mut calc, "0");
    calc.handle_equals();

    assert_eq!(calc.display_value(), "Error");
    assert!(calc.first_operand().is_none());
    assert!(calc.pending_operator().is_none());
    assert!(calc.history().is_empty());

    // Typing recovers immediately.
    calc.input_digit('7');
    assert_eq!(calc.display_value(), "7");
}

#[test]
fn test_equals_without_pending_operation_is_noop() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "42");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "42");
    assert!(calc.history().is_empty());
}

#[test]
fn test_percent_without_operator_divides_by_hundred() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "50");
    calc.handle_percent();
    assert_eq!(calc.display_value(), "0.5");
    calc.handle_percent();
    assert_eq!(calc.display_value(), "0.005");
}

#[test]
fn test_percent_of_first_operand() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "200");
    calc.handle_operator(Operator::Add);
    type_number(&mut calc, "10");
    calc.handle_percent();
    assert_eq!(calc.display_value(), "20");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "220");
}

#[test]
fn test_toggle_sign() {
    let mut calc = BasicCalculator::new();
    calc.toggle_sign();
    assert_eq!(calc.display_value(), "0");

    type_number(&mut calc, "12");
    calc.toggle_sign();
    assert_eq!(calc.display_value(), "-12");
    calc.toggle_sign();
    assert_eq!(calc.display_value(), "12");
}

#[test]
fn test_backspace() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "123");
    calc.backspace();
    assert_eq!(calc.display_value(), "12");
    calc.backspace();
    calc.backspace();
    assert_eq!(calc.display_value(), "0");

    type_number(&mut calc, "5");
    calc.toggle_sign();
    calc.backspace();
    assert_eq!(calc.display_value(), "0");
}

#[test]
fn test_backspace_ignored_while_waiting_for_operand() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "45");
    calc.handle_operator(Operator::Subtract);
    calc.backspace();
    assert_eq!(calc.display_value(), "45");
}

#[test]
fn test_clear_input_keeps_history() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "9");
    calc.handle_operator(Operator::Subtract);
    type_number(&mut calc, "4");
    calc.handle_equals();
    type_number(&mut calc, "1");

    calc.clear_input();
    assert_eq!(calc.display_value(), "0");
    assert_eq!(calc.full_expression(), "");
    assert_eq!(calc.history().len(), 1);
    assert_eq!(calc.history().latest().unwrap().expression, "9 − 4");

    calc.clear_history();
    assert!(calc.history().is_empty());
}

#[test]
fn test_state_survives_serialization() {
    let mut calc = BasicCalculator::new();
    type_number(&mut calc, "8");
    calc.handle_operator(Operator::Divide);

    let json = serde_json::to_string(calc.state()).unwrap();
    let restored: BasicCalculatorState = serde_json::from_str(&json).unwrap();
    let mut calc = BasicCalculator::from_state(restored);

    type_number(&mut calc, "2");
    calc.handle_equals();
    assert_eq!(calc.display_value(), "4");
}

#[test]
fn test_operator_parsing() {
    assert_eq!("×".parse::<Operator>(), Ok(Operator::Multiply));
    assert_eq!("-".parse::<Operator>(), Ok(Operator::Subtract));
    assert!("%".parse::<Operator>().is_err());
    assert_eq!(Operator::Divide.to_string(), "÷");
}
