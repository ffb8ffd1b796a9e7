use super::cursor::Cursor;
use super::{LiteralError, LiteralValue};

/// Parse a comma-separated tuple of plain literal values.
///
/// A single trailing comma is accepted; an empty body is not.
pub fn parse_literal_tuple(body: &str) -> Result<Vec<LiteralValue>, LiteralError> {
    LiteralParser {
        cursor: Cursor::new(body),
    }
    .parse_tuple()
}

struct LiteralParser<'src> {
    cursor: Cursor<'src>,
}

impl LiteralParser<'_> {
    fn parse_tuple(&mut self) -> Result<Vec<LiteralValue>, LiteralError> {
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            if self.cursor.is_eof() {
                if values.is_empty() {
                    return Err(LiteralError::Empty);
                }
                break;
            }
            values.push(self.parse_value()?);
            self.skip_whitespace();
            match self.cursor.peek() {
                None => break,
                Some(',') => {
                    self.cursor.advance();
                }
                Some(found) => {
                    return Err(LiteralError::UnexpectedChar {
                        found,
                        offset: self.cursor.offset(),
                    });
                }
            }
        }
        Ok(values)
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(char::is_whitespace);
    }

    fn parse_value(&mut self) -> Result<LiteralValue, LiteralError> {
        let start = self.cursor.offset();
        match self.cursor.peek() {
            Some(q @ ('\'' | '"')) => self.parse_strings(q),
            Some(c @ ('+' | '-')) => {
                self.cursor.advance();
                self.skip_whitespace();
                match self.cursor.peek() {
                    Some(d) if starts_number(d, self.cursor.peek_second()) => {
                        self.parse_number(c == '-', start)
                    }
                    _ => Err(LiteralError::ExpectedValue(self.cursor.offset())),
                }
            }
            Some(c) if starts_number(c, self.cursor.peek_second()) => {
                self.parse_number(false, start)
            }
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_name(start),
            _ => Err(LiteralError::ExpectedValue(start)),
        }
    }

    fn parse_name(&mut self, start: usize) -> Result<LiteralValue, LiteralError> {
        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
        match self.cursor.slice_from(start) {
            "True" => Ok(LiteralValue::Bool(true)),
            "False" => Ok(LiteralValue::Bool(false)),
            "None" => Ok(LiteralValue::None),
            name => Err(LiteralError::UnsupportedName {
                name: name.to_string(),
                offset: start,
            }),
        }
    }

    /// One string, or several adjacent ones which are concatenated.
    fn parse_strings(&mut self, quote: char) -> Result<LiteralValue, LiteralError> {
        let mut value = self.parse_string(quote)?;
        loop {
            self.skip_whitespace();
            match self.cursor.peek() {
                Some(q @ ('\'' | '"')) => value.push_str(&self.parse_string(q)?),
                _ => return Ok(LiteralValue::Str(value)),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.cursor.offset();
        self.cursor.advance();
        let mut value = String::new();
        loop {
            match self.cursor.advance() {
                None | Some('\n') => return Err(LiteralError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => self.parse_escape(&mut value, start)?,
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_escape(
        &mut self,
        value: &mut String,
        string_start: usize,
    ) -> Result<(), LiteralError> {
        let offset = self.cursor.offset() - 1;
        let c = self
            .cursor
            .advance()
            .ok_or(LiteralError::UnterminatedString(string_start))?;
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0' => value.push('\0'),
            'a' => value.push('\x07'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0c'),
            'v' => value.push('\x0b'),
            '\\' | '\'' | '"' => value.push(c),
            '\n' => {}
            'x' => value.push(self.parse_hex_escape(2, offset)?),
            'u' => value.push(self.parse_hex_escape(4, offset)?),
            'U' => value.push(self.parse_hex_escape(8, offset)?),
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Ok(())
    }

    fn parse_hex_escape(&mut self, len: usize, offset: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .cursor
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::InvalidEscape(offset))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(offset))
    }

    fn parse_number(&mut self, negative: bool, start: usize) -> Result<LiteralValue, LiteralError> {
        let digits_start = self.cursor.offset();
        let invalid = |cursor: &Cursor<'_>| LiteralError::InvalidNumber {
            text: cursor.slice_from(start).to_string(),
            offset: start,
        };

        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_second(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.cursor.advance();
            let radix = match self.cursor.advance() {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            let body_start = self.cursor.offset();
            self.cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let body = self.cursor.slice_from(body_start);
            let body = body.strip_prefix('_').unwrap_or(body);
            return clean_digits(body)
                .and_then(|digits| int_value(&digits, radix, negative))
                .ok_or_else(|| invalid(&self.cursor));
        }

        let mut is_float = false;
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.cursor.peek() == Some('.') {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if self
            .cursor
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
            return Err(invalid(&self.cursor));
        }

        let text = self.cursor.slice_from(digits_start);
        let digits = clean_digits(text).ok_or_else(|| invalid(&self.cursor))?;
        if is_float {
            let value: f64 = digits.parse().map_err(|_| invalid(&self.cursor))?;
            return Ok(LiteralValue::Float(if negative { -value } else { value }));
        }
        if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
            return Err(invalid(&self.cursor));
        }
        int_value(&digits, 10, negative).ok_or_else(|| invalid(&self.cursor))
    }
}

fn int_value(digits: &str, radix: u32, negative: bool) -> Option<LiteralValue> {
    if let Ok(value) = i128::from_str_radix(digits, radix) {
        return Some(LiteralValue::Int(if negative { -value } else { value }));
    }
    let decimal = big_decimal(digits, radix)?;
    Some(LiteralValue::BigInt(if negative {
        format!("-{decimal}")
    } else {
        decimal
    }))
}

/// Decimal text of an unsigned integer of any size written in `radix`.
fn big_decimal(digits: &str, radix: u32) -> Option<String> {
    const BASE: u64 = 1_000_000_000;
    // Little-endian base 10^9 limbs.
    let mut limbs: Vec<u64> = vec![0];
    for c in digits.chars() {
        let mut carry = u64::from(c.to_digit(radix)?);
        for limb in limbs.iter_mut() {
            let value = *limb * u64::from(radix) + carry;
            *limb = value % BASE;
            carry = value / BASE;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }
    let mut limbs = limbs.iter().rev();
    let mut out = limbs.next()?.to_string();
    for limb in limbs {
        out.push_str(&format!("{limb:09}"));
    }
    Some(out)
}

fn starts_number(c: char, next: Option<char>) -> bool {
    c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit()))
}

/// Strip `_` digit separators, which must sit between two digits.
fn clean_digits(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            let is_digit = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_hexdigit());
            if !is_digit(before) || !is_digit(after) {
                return None;
            }
        }
    }
    Some(text.replace('_', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(body: &str) -> Vec<LiteralValue> {
        parse_literal_tuple(body).unwrap()
    }

    #[test]
    fn integers_in_all_bases() {
        assert_eq!(
            values("1, -2, 0x1F, 0o17, 0b101, 1_000, 0"),
            vec![
                LiteralValue::Int(1),
                LiteralValue::Int(-2),
                LiteralValue::Int(31),
                LiteralValue::Int(15),
                LiteralValue::Int(5),
                LiteralValue::Int(1000),
                LiteralValue::Int(0),
            ]
        );
    }

    #[test]
    fn integers_beyond_i128_keep_exact_value() {
        assert_eq!(
            values(
                "170141183460469231731687303715884105728, \
                 -2_000000000000000000000000000000000000000"
            ),
            vec![
                LiteralValue::BigInt("170141183460469231731687303715884105728".into()),
                LiteralValue::BigInt("-2000000000000000000000000000000000000000".into()),
            ]
        );
        assert_eq!(
            values("0x1_0000_0000_0000_0000_0000_0000_0000_0000"),
            vec![LiteralValue::BigInt("340282366920938463463374607431768211456".into())]
        );
        assert_eq!(
            values("170141183460469231731687303715884105727"),
            vec![LiteralValue::Int(i128::MAX)]
        );
    }

    #[test]
    fn floats() {
        assert_eq!(
            values("1.5, .5, 2e3, -1.25E-2"),
            vec![
                LiteralValue::Float(1.5),
                LiteralValue::Float(0.5),
                LiteralValue::Float(2000.0),
                LiteralValue::Float(-0.0125),
            ]
        );
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(
            values(r#"'a', "b'c", 'x\ny', '\x41é', "ab" 'cd'"#),
            vec![
                LiteralValue::Str("a".into()),
                LiteralValue::Str("b'c".into()),
                LiteralValue::Str("x\ny".into()),
                LiteralValue::Str("Aé".into()),
                LiteralValue::Str("abcd".into()),
            ]
        );
    }

    #[test]
    fn keywords_and_trailing_comma() {
        assert_eq!(
            values(" True, False, None, "),
            vec![
                LiteralValue::Bool(true),
                LiteralValue::Bool(false),
                LiteralValue::None,
            ]
        );
    }

    #[test]
    fn empty_body() {
        assert_eq!(parse_literal_tuple(""), Err(LiteralError::Empty));
        assert_eq!(parse_literal_tuple("   "), Err(LiteralError::Empty));
    }

    #[test]
    fn doubled_comma() {
        assert_eq!(parse_literal_tuple("1,,2"), Err(LiteralError::ExpectedValue(2)));
    }

    #[test]
    fn missing_separator() {
        assert_eq!(
            parse_literal_tuple("1 2"),
            Err(LiteralError::UnexpectedChar {
                found: '2',
                offset: 2
            })
        );
    }

    #[test]
    fn names_are_not_evaluated() {
        assert_eq!(
            parse_literal_tuple("Color.RED"),
            Err(LiteralError::UnsupportedName {
                name: "Color".into(),
                offset: 0
            })
        );
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            parse_literal_tuple("1, 'abc"),
            Err(LiteralError::UnterminatedString(3))
        );
    }

    #[test]
    fn invalid_numbers() {
        for body in ["012", "1__0", "1_", "0xZZ", "12abc", "1e"] {
            assert!(
                matches!(parse_literal_tuple(body), Err(LiteralError::InvalidNumber { .. })),
                "{body}"
            );
        }
    }
}
