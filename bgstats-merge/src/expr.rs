//! Arithmetic evaluator for score formulas.
//!
//! Players often record a score as the sum of its parts (`"12+7+3"`). Only
//! numeric literals, `+ - * /` (also `× ÷ −`), unary signs and parentheses
//! are accepted. Anything else is rejected at tokenization.

use thiserror::Error;

/// Nesting limit for parentheses and unary signs.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("Empty expression")]
    Empty,
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("Expression nested too deeply")]
    TooDeep,
    #[error("Division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' | '\u{2212}' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' | '\u{00D7}' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' | '\u{00F7}' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        literal.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| ExprError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let (value, pos) = parse_add_sub(&tokens, 0, 0)?;
    if pos != tokens.len() {
        return Err(ExprError::UnexpectedToken(pos));
    }
    Ok(value)
}

fn parse_add_sub(tokens: &[Token], pos: usize, depth: usize) -> Result<(f64, usize), ExprError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos, depth)?;

    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Plus => {
                let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
                left += right;
                pos = new_pos;
            }
            Token::Minus => {
                let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
                left -= right;
                pos = new_pos;
            }
            _ => break,
        }
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize, depth: usize) -> Result<(f64, usize), ExprError> {
    let (mut left, mut pos) = parse_unary(tokens, pos, depth)?;

    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Star => {
                let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
                left *= right;
                pos = new_pos;
            }
            Token::Slash => {
                let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
                if right == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                left /= right;
                pos = new_pos;
            }
            _ => break,
        }
    }

    Ok((left, pos))
}

fn parse_unary(tokens: &[Token], pos: usize, depth: usize) -> Result<(f64, usize), ExprError> {
    if depth > MAX_DEPTH {
        return Err(ExprError::TooDeep);
    }
    match tokens.get(pos) {
        Some(Token::Minus) => {
            let (value, pos) = parse_unary(tokens, pos + 1, depth + 1)?;
            Ok((-value, pos))
        }
        Some(Token::Plus) => parse_unary(tokens, pos + 1, depth + 1),
        _ => parse_primary(tokens, pos, depth),
    }
}

fn parse_primary(tokens: &[Token], pos: usize, depth: usize) -> Result<(f64, usize), ExprError> {
    match tokens.get(pos) {
        None => Err(ExprError::UnexpectedEnd),
        Some(Token::Number(n)) => Ok((*n, pos + 1)),
        Some(Token::LParen) => {
            let (value, pos) = parse_add_sub(tokens, pos + 1, depth + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((value, pos + 1)),
                Some(_) => Err(ExprError::UnexpectedToken(pos)),
                None => Err(ExprError::UnexpectedEnd),
            }
        }
        Some(_) => Err(ExprError::UnexpectedToken(pos)),
    }
}
