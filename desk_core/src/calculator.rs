//! # Calculator
//!
//! The four arithmetic operations behind `calc_cli`, plus parsing of the
//! operands and operator the user types in.
//!
//! ## Example
//!
//! ```rust
//! use desk_core::calculator::{evaluate, format_result, Operator};
//!
//! let op: Operator = "/".parse().unwrap();
//! let result = evaluate(10.0, op, 2.0).unwrap();
//! assert_eq!(format_result(result), "5.0");
//!
//! assert!(evaluate(10.0, op, 0.0).is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DeskError, DeskResult};

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in menu order
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Subtract, Operator::Multiply, Operator::Divide];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl FromStr for Operator {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| DeskError::invalid_operator(symbol))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divide `a` by `b`, refusing a zero divisor instead of producing infinity.
pub fn divide(a: f64, b: f64) -> DeskResult<f64> {
    if b == 0.0 {
        return Err(DeskError::DivisionByZero);
    }
    Ok(a / b)
}

/// Apply `op` to the two operands
pub fn evaluate(a: f64, op: Operator, b: f64) -> DeskResult<f64> {
    match op {
        Operator::Add => Ok(add(a, b)),
        Operator::Subtract => Ok(subtract(a, b)),
        Operator::Multiply => Ok(multiply(a, b)),
        Operator::Divide => divide(a, b),
    }
}

/// Parse a user-typed number (surrounding whitespace ignored).
pub fn parse_number(input: &str) -> DeskResult<f64> {
    input
        .trim()
        .parse()
        .map_err(|_| DeskError::invalid_number(input.trim()))
}

/// Render a result the way the menu prints it.
///
/// Whole numbers keep one decimal place (`5.0`), everything else uses the
/// shortest representation that round-trips.
pub fn format_result(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
