//! Plain literal values used as `Literal[...]` arguments.
//!
//! Only numbers, strings, booleans and `None` are understood; anything else is
//! rejected instead of being evaluated.

pub mod cursor;
mod parse;

use std::fmt;

use thiserror::Error;

pub use parse::parse_literal_tuple;

/// A single literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i128),
    /// Decimal digits, with an optional leading `-`, of an integer outside the
    /// `i128` range.
    BigInt(String),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

impl LiteralValue {
    /// Canonical display form, as the documented language would print it.
    pub fn repr(&self) -> String {
        match self {
            LiteralValue::Int(i) => i.to_string(),
            LiteralValue::BigInt(digits) => digits.clone(),
            LiteralValue::Float(f) => float_repr(*f),
            LiteralValue::Str(s) => str_repr(s),
            LiteralValue::Bool(true) => "True".to_string(),
            LiteralValue::Bool(false) => "False".to_string(),
            LiteralValue::None => "None".to_string(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// Errors raised while reading a literal body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("literal body contains no values")]
    Empty,

    #[error("expected a literal value at offset {0}")]
    ExpectedValue(usize),

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unsupported name {name:?} at offset {offset}")]
    UnsupportedName { name: String, offset: usize },
}

/// Quote a string the way the documented language's `repr` does.
pub fn str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (0x7f..0xa0).contains(&(c as u32)) => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Shortest round-trip float form: positional for exponents in `-4..16`,
/// scientific with a signed two-digit exponent otherwise.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs());
    }
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }
    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        let padding = "0".repeat(int_len - digits.len());
        format!("{sign}{digits}{padding}.0")
    } else {
        let (int_part, frac_part) = digits.split_at(int_len);
        format!("{sign}{int_part}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_quoting() {
        assert_eq!(str_repr("abc"), "'abc'");
        assert_eq!(str_repr("it's"), "\"it's\"");
        assert_eq!(str_repr("say \"hi\" it's"), "'say \"hi\" it\\'s'");
        assert_eq!(str_repr("a\\b\n"), "'a\\\\b\\n'");
        assert_eq!(str_repr("\u{1}"), "'\\x01'");
    }

    #[test]
    fn float_positional_range() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(1.5), "1.5");
        assert_eq!(float_repr(1500.0), "1500.0");
        assert_eq!(float_repr(0.001), "0.001");
        assert_eq!(float_repr(-2.25), "-2.25");
        assert_eq!(float_repr(0.0), "0.0");
    }

    #[test]
    fn float_scientific_range() {
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(1.5e-5), "1.5e-05");
        assert_eq!(float_repr(-1e100), "-1e+100");
    }

    #[test]
    fn value_repr() {
        assert_eq!(LiteralValue::Int(-3).repr(), "-3");
        assert_eq!(LiteralValue::Bool(true).repr(), "True");
        assert_eq!(LiteralValue::None.repr(), "None");
        assert_eq!(LiteralValue::Str("x".into()).to_string(), "'x'");
    }
}
