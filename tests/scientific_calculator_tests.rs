//! Test suite for the scientific (expression) calculator
//!
//! Tests cover:
//! - Expression building from keypad input
//! - Evaluation, result formatting and chaining
//! - Error display and recovery
//! - Percent, sign toggle, backspace and memory keys
//! - Angle modes, history capping and snapshots

use calcdesk::basic::Operator;
use calcdesk::evaluator::AngleMode;
use calcdesk::scientific::{Function, ScientificCalculator, ScientificCalculatorState};
use calcdesk::CalcDeskConfig;

fn type_text(calc: &mut ScientificCalculator, text: &str) {
    for c in text.chars() {
        match c {
            '0'..='9' | '.' => calc.input_digit(c),
            '+' => calc.input_operator(Operator::Add),
            '-' => calc.input_operator(Operator::Subtract),
            '*' => calc.input_operator(Operator::Multiply),
            '/' => calc.input_operator(Operator::Divide),
            '^' => calc.input_function(Function::Power),
            '!' => calc.input_function(Function::Factorial),
            '(' => calc.input_function(Function::OpenParen),
            ')' => calc.input_function(Function::CloseParen),
            other => panic!("no key for {:?}", other),
        }
    }
}

#[test]
fn test_power_expression() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2^10");
    assert_eq!(calc.expression(), "2^10");
    assert_eq!(calc.display(), "2^10");

    calc.calculate();
    assert_eq!(calc.display(), "1024");
    assert!(calc.is_result());
    let entry = calc.history().latest().unwrap();
    assert_eq!(entry.expression, "2^10");
    assert_eq!(entry.result, "1024");
}

#[test]
fn test_precedence_and_parentheses() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2+3*4");
    calc.calculate();
    assert_eq!(calc.display(), "14");

    type_text(&mut calc, "(2+3)*4");
    calc.calculate();
    assert_eq!(calc.display(), "20");
}

#[test]
fn test_digit_after_result_starts_new_expression() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "1+1");
    calc.calculate();
    calc.input_digit('7');
    assert_eq!(calc.expression(), "7");
    assert!(!calc.is_result());
}

#[test]
fn test_operator_after_result_chains() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "6*7");
    calc.calculate();
    calc.input_operator(Operator::Subtract);
    assert_eq!(calc.expression(), "42-");
    type_text(&mut calc, "2");
    calc.calculate();
    assert_eq!(calc.display(), "40");
}

#[test]
fn test_repeated_operator_replaces_previous() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "5+");
    calc.input_operator(Operator::Multiply);
    assert_eq!(calc.expression(), "5*");
}

#[test]
fn test_single_decimal_point_per_number() {
    let mut calc = ScientificCalculator::new();
    calc.input_digit('.');
    assert_eq!(calc.expression(), "0.");
    calc.input_digit('5');
    calc.input_digit('.');
    assert_eq!(calc.expression(), "0.5");

    calc.input_operator(Operator::Add);
    calc.input_digit('1');
    calc.input_digit('.');
    calc.input_digit('5');
    assert_eq!(calc.expression(), "0.5+1.5");
    calc.calculate();
    assert_eq!(calc.display(), "2");
}

#[test]
fn test_functions_and_constants() {
    let mut calc = ScientificCalculator::new();
    calc.input_function(Function::Sqrt);
    type_text(&mut calc, "16)");
    assert_eq!(calc.expression(), "√(16)");
    calc.calculate();
    assert_eq!(calc.display(), "4");

    calc.input_function(Function::Log);
    type_text(&mut calc, "1000");
    calc.calculate();
    assert_eq!(calc.display(), "3");

    type_text(&mut calc, "2");
    calc.input_function(Function::Pi);
    calc.calculate();
    assert!(calc.display().starts_with("6.28318"));
}

#[test]
fn test_factorial_on_result() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2+3");
    calc.calculate();
    calc.input_function(Function::Factorial);
    assert_eq!(calc.expression(), "5!");
    calc.calculate();
    assert_eq!(calc.display(), "120");
}

#[test]
fn test_large_results_use_exponent_notation() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "123456");
    calc.calculate();
    assert_eq!(calc.display(), "1.23456e+5");

    // The formatted result is a valid operand for chaining.
    calc.input_operator(Operator::Multiply);
    type_text(&mut calc, "2");
    calc.calculate();
    assert_eq!(calc.display(), "2.46912e+5");
}

#[test]
fn test_e_key_followed_by_digits_multiplies() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2");
    calc.input_function(Function::E);
    type_text(&mut calc, "5");
    assert_eq!(calc.expression(), "2e5");
    calc.calculate();
    let expected = 10.0 * std::f64::consts::E;
    assert!((calc.display().parse::<f64>().unwrap() - expected).abs() < 1e-9);

    calc.clear();
    type_text(&mut calc, "2");
    calc.input_function(Function::E);
    type_text(&mut calc, "+3");
    calc.calculate();
    let expected = 2.0 * std::f64::consts::E + 3.0;
    assert!((calc.display().parse::<f64>().unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_chained_exponent_result_keeps_its_value() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "123456");
    calc.calculate();
    calc.input_operator(Operator::Add);
    assert_eq!(calc.expression(), "1.23456E+5+");
    type_text(&mut calc, "4");
    calc.calculate();
    assert_eq!(calc.display(), "1.2346e+5");
}

#[test]
fn test_degrees_and_radians() {
    let mut calc = ScientificCalculator::new();
    assert_eq!(calc.angle_mode(), AngleMode::Degrees);
    calc.input_function(Function::Sin);
    type_text(&mut calc, "30)");
    calc.calculate();
    assert_eq!(calc.display(), "0.5");

    calc.set_angle_mode(AngleMode::Radians);
    calc.input_function(Function::Cos);
    calc.input_function(Function::Pi);
    calc.input_function(Function::CloseParen);
    calc.calculate();
    assert_eq!(calc.display(), "-1");
}

#[test]
fn test_open_parenthesis_is_closed_on_calculate() {
    let mut calc = ScientificCalculator::new();
    calc.input_function(Function::Sin);
    type_text(&mut calc, "90");
    calc.calculate();
    assert_eq!(calc.display(), "1");
}

#[test]
fn test_error_then_recovery() {
    let mut calc = ScientificCalculator::new();
    calc.input_function(Function::Sqrt);
    calc.input_operator(Operator::Subtract);
    type_text(&mut calc, "1)");
    calc.calculate();

    assert_eq!(calc.display(), "Error");
    assert_eq!(calc.expression(), "Result is not a real number");
    assert!(calc.is_result());
    assert!(calc.history().is_empty());

    type_text(&mut calc, "3");
    assert_eq!(calc.expression(), "3");
    assert_eq!(calc.display(), "3");
}

#[test]
fn test_division_by_zero_is_an_error() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "1/0");
    calc.calculate();
    assert_eq!(calc.display(), "Error");
    assert!(calc.is_result());
}

#[test]
fn test_percent_additive_and_multiplicative() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "200+10");
    calc.input_percent();
    assert_eq!(calc.expression(), "200+(10/100)*200");
    calc.calculate();
    assert_eq!(calc.display(), "220");

    type_text(&mut calc, "50*10");
    calc.input_percent();
    assert_eq!(calc.expression(), "50*(10/100)");
    calc.calculate();
    assert_eq!(calc.display(), "5");

    type_text(&mut calc, "50");
    calc.input_percent();
    assert_eq!(calc.expression(), "(50)/100");
    calc.calculate();
    assert_eq!(calc.display(), "0.5");

    calc.input_percent();
    assert_eq!(calc.display(), "0.005");
}

#[test]
fn test_toggle_sign() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2+3");
    calc.toggle_sign();
    assert_eq!(calc.expression(), "-2+3");
    calc.toggle_sign();
    assert_eq!(calc.expression(), "2+3");

    calc.calculate();
    calc.toggle_sign();
    assert_eq!(calc.display(), "-5");
}

#[test]
fn test_backspace_removes_whole_function_name() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "2+");
    calc.input_function(Function::Asin);
    assert_eq!(calc.expression(), "2+asin(");
    calc.backspace();
    assert_eq!(calc.expression(), "2+");
    calc.backspace();
    calc.backspace();
    assert_eq!(calc.expression(), "");
    assert_eq!(calc.display(), "0");
}

#[test]
fn test_memory_keys() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "5");
    calc.calculate();
    calc.memory_add();
    calc.memory_add();
    assert_eq!(calc.memory(), 10.0);

    type_text(&mut calc, "15");
    calc.calculate();
    calc.memory_subtract();
    assert_eq!(calc.memory(), -5.0);

    calc.clear();
    calc.memory_recall();
    assert_eq!(calc.expression(), "-5");

    type_text(&mut calc, "*");
    calc.memory_recall();
    assert_eq!(calc.expression(), "-5*(-5)");
    calc.calculate();
    assert_eq!(calc.display(), "25");

    calc.memory_clear();
    assert_eq!(calc.memory(), 0.0);
}

#[test]
fn test_memory_recall_after_a_number_multiplies() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "5");
    calc.calculate();
    calc.memory_add();

    type_text(&mut calc, "12");
    calc.memory_recall();
    assert_eq!(calc.expression(), "12*5");
    calc.calculate();
    assert_eq!(calc.display(), "60");

    type_text(&mut calc, "3+");
    calc.memory_recall();
    assert_eq!(calc.expression(), "3+5");
}

#[test]
fn test_memory_ignores_non_numeric_display() {
    let mut calc = ScientificCalculator::new();
    type_text(&mut calc, "1/0");
    calc.calculate();
    calc.memory_add();
    assert_eq!(calc.memory(), 0.0);

    type_text(&mut calc, "2+");
    calc.memory_subtract();
    assert_eq!(calc.memory(), 0.0);
}

#[test]
fn test_history_is_capped_at_fifty() {
    let mut calc = ScientificCalculator::new();
    for i in 0..51 {
        type_text(&mut calc, &format!("{}+1", i));
        calc.calculate();
        assert!(calc.history().len() <= 50);
    }
    assert_eq!(calc.history().len(), 50);
    assert_eq!(calc.history().latest().unwrap().expression, "50+1");
    let oldest = calc.history().iter().last().unwrap();
    assert_eq!(oldest.expression, "1+1");

    calc.clear_history();
    assert!(calc.history().is_empty());
}

#[test]
fn test_config_sets_limit_and_angle_mode() {
    let config = CalcDeskConfig {
        scientific_history_limit: 2,
        default_angle_mode: AngleMode::Radians,
        ..CalcDeskConfig::default()
    };
    let mut calc = ScientificCalculator::with_config(&config);
    assert_eq!(calc.angle_mode(), AngleMode::Radians);
    for expression in ["1+1", "2+2", "3+3"] {
        type_text(&mut calc, expression);
        calc.calculate();
    }
    assert_eq!(calc.history().len(), 2);
    assert_eq!(calc.history().latest().unwrap().result, "6");
}

#[test]
fn test_snapshot_restores_angle_mode() {
    let mut calc = ScientificCalculator::new();
    calc.set_angle_mode(AngleMode::Radians);
    type_text(&mut calc, "1+");

    let json = serde_json::to_string(calc.state()).unwrap();
    let state: ScientificCalculatorState = serde_json::from_str(&json).unwrap();
    let mut restored = ScientificCalculator::from_state(state);

    assert_eq!(restored.angle_mode(), AngleMode::Radians);
    assert_eq!(restored.expression(), "1+");
    restored.input_function(Function::Sin);
    restored.input_digit('0');
    restored.calculate();
    assert_eq!(restored.display(), "1");
}
