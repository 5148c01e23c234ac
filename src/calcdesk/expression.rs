//! Lexing and structural helpers for scientific-calculator expressions.
//!
//! The scientific calculator keeps its input as free text (`2×sin(30)+√(16)`),
//! but percent handling, factorial rewriting and evaluation all need to know
//! where operands start and end. [`tokenize`] turns the text into spanned
//! [`Lexeme`]s and the helpers below answer structural questions on them
//! without any regular-expression guessing.

use crate::calcdesk::evaluator::CalculatorError;
use std::ops::Range;

/// Named constants understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Identifier bound in the evaluator context.
    pub fn identifier(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal, kept verbatim (`3.5`, `1.2E+5`).
    Number(String),
    Constant(Constant),
    /// Function name; always followed by an opening parenthesis.
    Function(String),
    /// One of `+ - * / ^`.
    Operator(char),
    LParen,
    RParen,
    /// Postfix factorial.
    Bang,
}

impl Token {
    /// Tokens after which an operand has just been completed.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Constant(_) | Token::RParen | Token::Bang
        )
    }

    /// Tokens that can start a new operand.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Constant(_) | Token::Function(_) | Token::LParen
        )
    }
}

/// A token together with the byte range it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub span: Range<usize>,
}

const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "sqrt", "cbrt", "log",
    "log10", "log2", "ln", "exp", "abs", "floor", "ceil", "round", "fact",
];

/// Exponent marker inside number literals (`1.5E+3`).
pub const EXPONENT_MARKER: char = 'E';

/// Rewrite a formatted result (`1.23456e+5`) as an expression operand
/// (`1.23456E+5`).
pub fn operand_literal(formatted: &str) -> String {
    formatted.replace('e', "E")
}

/// Whether `name` is a function the evaluator knows.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Split expression text into spanned tokens.
///
/// Display glyphs are normalised here: `π` becomes [`Constant::Pi`], `√` the
/// `sqrt` function, `×`/`÷`/`−` the ASCII operators and `**` a power.
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, CalculatorError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map(|(pos, _)| *pos).unwrap_or(input.len());
    let mut lexemes = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut j = i;
            let mut seen_dot = false;
            while j < chars.len() && (chars[j].1.is_ascii_digit() || chars[j].1 == '.') {
                if chars[j].1 == '.' {
                    if seen_dot {
                        return Err(CalculatorError::new(format!(
                            "Malformed number near position {}",
                            chars[j].0
                        )));
                    }
                    seen_dot = true;
                }
                j += 1;
            }
            // Exponent part: `E5`, `E+5`, `E-5`. Only the uppercase marker
            // counts; a lowercase `e` after a number is always the constant.
            if j < chars.len() && chars[j].1 == EXPONENT_MARKER {
                let mut k = j + 1;
                if k < chars.len() && (chars[k].1 == '+' || chars[k].1 == '-') {
                    k += 1;
                }
                if k < chars.len() && chars[k].1.is_ascii_digit() {
                    while k < chars.len() && chars[k].1.is_ascii_digit() {
                        k += 1;
                    }
                    j = k;
                }
            }
            let span = start..end_of(j);
            let text = &input[span.clone()];
            if text == "." {
                return Err(CalculatorError::new("Malformed number"));
            }
            lexemes.push(Lexeme {
                token: Token::Number(text.to_string()),
                span,
            });
            i = j;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let mut j = i;
            while j < chars.len() && chars[j].1.is_ascii_alphabetic() {
                j += 1;
            }
            // `log10` and `log2` carry digits in their names.
            let mut m = j;
            while m < chars.len() && chars[m].1.is_ascii_digit() {
                m += 1;
            }
            if m > j && is_function(&input[start..end_of(m)]) {
                j = m;
            }
            let span = start..end_of(j);
            let word = &input[span.clone()];
            let mut k = j;
            while k < chars.len() && chars[k].1.is_whitespace() {
                k += 1;
            }
            let called = k < chars.len() && chars[k].1 == '(';
            let token = if called {
                if !is_function(word) {
                    return Err(CalculatorError::new(format!("Unknown function: {}", word)));
                }
                Token::Function(word.to_string())
            } else {
                match word {
                    "pi" | "PI" => Token::Constant(Constant::Pi),
                    "e" => Token::Constant(Constant::E),
                    _ if is_function(word) => {
                        return Err(CalculatorError::new(format!(
                            "Function {} needs parentheses",
                            word
                        )))
                    }
                    _ => {
                        return Err(CalculatorError::new(format!("Unknown symbol: {}", word)))
                    }
                }
            };
            lexemes.push(Lexeme { token, span });
            i = j;
            continue;
        }

        let single_span = start..end_of(i + 1);
        let single = |token: Token| Lexeme {
            token,
            span: single_span.clone(),
        };
        let lexeme = match c {
            'π' => single(Token::Constant(Constant::Pi)),
            '√' => single(Token::Function("sqrt".to_string())),
            '+' => single(Token::Operator('+')),
            '-' | '−' => single(Token::Operator('-')),
            '×' => single(Token::Operator('*')),
            '÷' | '/' => single(Token::Operator('/')),
            '^' => single(Token::Operator('^')),
            '*' => {
                if chars.get(i + 1).map(|(_, n)| *n) == Some('*') {
                    i += 1;
                    Lexeme {
                        token: Token::Operator('^'),
                        span: start..end_of(i + 1),
                    }
                } else {
                    single(Token::Operator('*'))
                }
            }
            '(' => single(Token::LParen),
            ')' => single(Token::RParen),
            '!' => single(Token::Bang),
            other => {
                return Err(CalculatorError::new(format!(
                    "Unexpected character: {}",
                    other
                )))
            }
        };
        lexemes.push(lexeme);
        i += 1;
    }

    Ok(lexemes)
}

/// Index of the first lexeme of the operand that ends just before `end`.
///
/// An operand is a number, a constant, a parenthesised group (including the
/// function name in front of it) or any of those followed by `!`.
pub fn operand_start(lexemes: &[Lexeme], end: usize) -> Option<usize> {
    if end == 0 || end > lexemes.len() {
        return None;
    }
    let last = end - 1;
    match lexemes[last].token {
        Token::Number(_) | Token::Constant(_) => Some(last),
        Token::Bang => operand_start(lexemes, last),
        Token::RParen => {
            let open = matching_open(lexemes, last)?;
            match lexemes.get(open.wrapping_sub(1)).map(|l| &l.token) {
                Some(Token::Function(_)) if open > 0 => Some(open - 1),
                _ => Some(open),
            }
        }
        _ => None,
    }
}

fn matching_open(lexemes: &[Lexeme], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for index in (0..=close).rev() {
        match lexemes[index].token {
            Token::RParen => depth += 1,
            Token::LParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Start of the sub-expression that ends just before `end` and stays inside
/// the innermost parenthesis still open at that point.
pub fn enclosing_start(lexemes: &[Lexeme], end: usize) -> usize {
    let mut depth = 0usize;
    for index in (0..end.min(lexemes.len())).rev() {
        match lexemes[index].token {
            Token::RParen => depth += 1,
            Token::LParen => {
                if depth == 0 {
                    return index + 1;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    0
}

/// Whether the operator lexeme at `index` is a unary sign rather than a
/// binary operator.
pub fn is_unary(lexemes: &[Lexeme], index: usize) -> bool {
    matches!(lexemes[index].token, Token::Operator('-') | Token::Operator('+'))
        && (index == 0 || !lexemes[index - 1].token.ends_operand())
}

/// Render lexemes in the syntax the evaluator consumes.
///
/// Numbers are written as float literals so integer-looking input never
/// triggers integer division, implicit multiplication (`2π`, `3(4)`) gets an
/// explicit `*`, and postfix `!` becomes a `fact(...)` call around its
/// operand.
pub fn render_for_evaluation(lexemes: &[Lexeme]) -> Result<String, CalculatorError> {
    let mut out = String::new();
    let mut starts: Vec<usize> = Vec::with_capacity(lexemes.len());

    for (index, lexeme) in lexemes.iter().enumerate() {
        if index > 0 && lexemes[index - 1].token.ends_operand() && lexeme.token.starts_operand() {
            out.push('*');
        }
        let start = out.len();
        match &lexeme.token {
            Token::Number(text) => out.push_str(&float_literal(text)?),
            Token::Constant(constant) => out.push_str(constant.identifier()),
            Token::Function(name) => out.push_str(name),
            Token::Operator(op) => out.push(*op),
            Token::LParen => out.push('('),
            Token::RParen => out.push(')'),
            Token::Bang => {
                let operand = operand_start(lexemes, index)
                    .ok_or_else(|| CalculatorError::new("Factorial without an operand"))?;
                let inner = out.split_off(starts[operand]);
                out.push_str("fact(");
                out.push_str(&inner);
                out.push(')');
                starts.push(starts[operand]);
                continue;
            }
        }
        starts.push(start);
    }

    Ok(out)
}

fn float_literal(text: &str) -> Result<String, CalculatorError> {
    let value: f64 = text
        .parse()
        .map_err(|_| CalculatorError::new(format!("Malformed number: {}", text)))?;
    // Display never uses exponent notation for f64, so the literal never
    // contains a sign the evaluator would read as an operator.
    let plain = format!("{}", value);
    if plain.contains('.') {
        Ok(plain)
    } else {
        Ok(format!("{}.0", plain))
    }
}
