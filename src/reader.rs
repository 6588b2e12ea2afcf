// ABOUTME: Streaming S-expression reader over a byte source

use std::io::Read;

use crate::error::ReadError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Symbols run up to this many bytes before the reader gives up, matching
/// the reference's 999-usable-byte buffer.
const MAX_TOKEN_LEN: usize = 999;

fn is_delimiter(c: u8) -> bool {
    c.is_ascii_whitespace() || matches!(c, b'(' | b')' | b'"' | b';')
}

fn is_initial(c: u8) -> bool {
    c.is_ascii_alphabetic() || matches!(c, b'*' | b'/' | b'>' | b'<' | b'=' | b'?' | b'!')
}

fn is_symbol_continuation(c: u8) -> bool {
    is_initial(c) || c.is_ascii_digit() || matches!(c, b'+' | b'-')
}

/// A one-byte-pushback reader over any `Read`, mirroring the reference's
/// `getc`/`ungetc`/`peek` triad.
pub struct Reader<R: Read> {
    inner: R,
    pending: Option<u8>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Reader {
            inner,
            pending: None,
        }
    }

    fn getc(&mut self) -> Option<u8> {
        if let Some(c) = self.pending.take() {
            return Some(c);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }

    fn ungetc(&mut self, c: u8) {
        self.pending = Some(c);
    }

    fn peek(&mut self) -> Option<u8> {
        let c = self.getc()?;
        self.ungetc(c);
        Some(c)
    }

    fn eat_whitespace(&mut self) {
        while let Some(c) = self.getc() {
            if c.is_ascii_whitespace() {
                continue;
            }
            if c == b';' {
                while let Some(c2) = self.getc() {
                    if c2 == b'\n' {
                        break;
                    }
                }
                continue;
            }
            self.ungetc(c);
            return;
        }
    }

    fn expect_delimiter(&mut self, err: ReadError) -> Result<(), ReadError> {
        match self.peek() {
            None => Ok(()),
            Some(c) if is_delimiter(c) => Ok(()),
            Some(_) => Err(err),
        }
    }

    fn eat_expected_string(&mut self, s: &str) -> Result<(), ReadError> {
        for expected in s.bytes() {
            match self.getc() {
                Some(c) if c == expected => continue,
                Some(c) => return Err(ReadError::UnexpectedChar(c as char)),
                None => return Err(ReadError::UnexpectedEof),
            }
        }
        Ok(())
    }

    fn read_character(&mut self) -> Result<Value, ReadError> {
        let c = self.getc().ok_or(ReadError::UnexpectedEof)?;
        match c {
            b's' if self.peek() == Some(b'p') => {
                self.eat_expected_string("pace")?;
                self.expect_delimiter(ReadError::CharLiteralNotDelimited)?;
                Ok(Value::Character(b' '))
            }
            b'n' if self.peek() == Some(b'e') => {
                self.eat_expected_string("ewline")?;
                self.expect_delimiter(ReadError::CharLiteralNotDelimited)?;
                Ok(Value::Character(b'\n'))
            }
            _ => {
                self.expect_delimiter(ReadError::CharLiteralNotDelimited)?;
                Ok(Value::Character(c))
            }
        }
    }

    fn read_string(&mut self) -> Result<Value, ReadError> {
        let mut buf = Vec::new();
        loop {
            let c = self.getc().ok_or(ReadError::UnterminatedString)?;
            if c == b'"' {
                break;
            }
            let byte = if c == b'\\' {
                let escaped = self.getc().ok_or(ReadError::UnterminatedString)?;
                if escaped == b'n' {
                    b'\n'
                } else {
                    escaped
                }
            } else {
                c
            };
            if buf.len() >= MAX_TOKEN_LEN {
                return Err(ReadError::StringTooLong);
            }
            buf.push(byte);
        }
        Ok(Value::Str(String::from_utf8_lossy(&buf).into_owned().into()))
    }

    fn read_fixnum(&mut self, first_digit: u8, negative: bool) -> Result<Value, ReadError> {
        let mut n: i64 = (first_digit - b'0') as i64;
        while let Some(c) = self.getc() {
            if c.is_ascii_digit() {
                n = n.wrapping_mul(10).wrapping_add((c - b'0') as i64);
            } else {
                self.ungetc(c);
                break;
            }
        }
        self.expect_delimiter(ReadError::NumberNotDelimited)?;
        Ok(Value::Fixnum(if negative { -n } else { n }))
    }

    fn read_symbol(&mut self, interp: &Interpreter, first: u8) -> Result<Value, ReadError> {
        let mut buf = vec![first];
        while let Some(c) = self.getc() {
            if is_symbol_continuation(c) {
                if buf.len() >= MAX_TOKEN_LEN {
                    return Err(ReadError::SymbolTooLong);
                }
                buf.push(c);
            } else {
                self.ungetc(c);
                break;
            }
        }
        self.expect_delimiter(ReadError::SymbolNotDelimited)?;
        let name = String::from_utf8_lossy(&buf).into_owned();
        Ok(Value::Symbol(interp.intern(&name)))
    }

    fn read_pair(&mut self, interp: &Interpreter) -> Result<Value, ReadError> {
        self.eat_whitespace();
        let c = self.getc().ok_or(ReadError::UnexpectedEof)?;
        if c == b')' {
            return Ok(Value::EmptyList);
        }
        self.ungetc(c);

        let car = self.read_impl(interp)?.ok_or(ReadError::UnexpectedEof)?;

        self.eat_whitespace();
        let c = self.getc().ok_or(ReadError::UnexpectedEof)?;
        if c == b'.' {
            self.expect_delimiter(ReadError::MisplacedDot)?;
            let cdr = self.read_impl(interp)?.ok_or(ReadError::UnexpectedEof)?;
            self.eat_whitespace();
            match self.getc() {
                Some(b')') => Ok(Value::cons(car, cdr)),
                _ => Err(ReadError::UnclosedList),
            }
        } else {
            self.ungetc(c);
            let cdr = self.read_pair(interp)?;
            Ok(Value::cons(car, cdr))
        }
    }

    /// Reads one top-level value, or `None` at a clean end-of-input.
    pub fn read(&mut self, interp: &Interpreter) -> Result<Option<Value>, ReadError> {
        self.read_impl(interp)
    }

    fn read_impl(&mut self, interp: &Interpreter) -> Result<Option<Value>, ReadError> {
        self.eat_whitespace();
        let c = match self.getc() {
            Some(c) => c,
            None => return Ok(None),
        };

        if c == b'#' {
            let next = self.getc().ok_or(ReadError::UnexpectedEof)?;
            return match next {
                b't' => Ok(Some(Value::Boolean(true))),
                b'f' => Ok(Some(Value::Boolean(false))),
                b'\\' => self.read_character().map(Some),
                other => Err(ReadError::UnexpectedChar(other as char)),
            };
        }

        if c == b'-' {
            if let Some(d) = self.peek() {
                if d.is_ascii_digit() {
                    self.getc();
                    return self.read_fixnum(d, true).map(Some);
                }
            }
            if self.peek().is_none_or(is_delimiter) {
                return self.read_symbol(interp, c).map(Some);
            }
            return Err(ReadError::UnexpectedChar(c as char));
        }

        if c.is_ascii_digit() {
            return self.read_fixnum(c, false).map(Some);
        }

        if c == b'+' {
            if self.peek().is_none_or(is_delimiter) {
                return self.read_symbol(interp, c).map(Some);
            }
            return Err(ReadError::UnexpectedChar(c as char));
        }

        if is_initial(c) {
            return self.read_symbol(interp, c).map(Some);
        }

        if c == b'"' {
            return self.read_string().map(Some);
        }

        if c == b'(' {
            return self.read_pair(interp).map(Some);
        }

        if c == b'\'' {
            let quoted = self.read_impl(interp)?.ok_or(ReadError::UnexpectedEof)?;
            let quote_sym = interp.well_known.quote.clone();
            return Ok(Some(Value::list(vec![
                Value::Symbol(quote_sym),
                quoted,
            ])));
        }

        Err(ReadError::UnexpectedChar(c as char))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_one(interp: &Interpreter, src: &str) -> Value {
        let mut reader = Reader::new(Cursor::new(src.as_bytes().to_vec()));
        reader.read(interp).unwrap().unwrap()
    }

    #[test]
    fn reads_fixnums() {
        let interp = Interpreter::new();
        assert!(matches!(read_one(&interp, "42"), Value::Fixnum(42)));
        assert!(matches!(read_one(&interp, "-7"), Value::Fixnum(-7)));
    }

    #[test]
    fn bare_minus_is_a_symbol() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "- ");
        assert_eq!(v.as_symbol().unwrap().as_str(), "-");
    }

    #[test]
    fn minus_or_plus_followed_by_a_letter_is_not_a_symbol() {
        let interp = Interpreter::new();
        let mut reader = Reader::new(Cursor::new(b"-foo".to_vec()));
        assert!(reader.read(&interp).is_err());
        let mut reader = Reader::new(Cursor::new(b"+foo".to_vec()));
        assert!(reader.read(&interp).is_err());
    }

    #[test]
    fn bare_plus_is_a_symbol() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "+ ");
        assert_eq!(v.as_symbol().unwrap().as_str(), "+");
    }

    #[test]
    fn reads_booleans() {
        let interp = Interpreter::new();
        assert!(matches!(read_one(&interp, "#t"), Value::Boolean(true)));
        assert!(matches!(read_one(&interp, "#f"), Value::Boolean(false)));
    }

    #[test]
    fn reads_character_literals() {
        let interp = Interpreter::new();
        assert!(matches!(read_one(&interp, "#\\a"), Value::Character(b'a')));
        assert!(matches!(
            read_one(&interp, "#\\space"),
            Value::Character(b' ')
        ));
        assert!(matches!(
            read_one(&interp, "#\\newline"),
            Value::Character(b'\n')
        ));
    }

    #[test]
    fn reads_strings_with_escapes() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "\"a\\nb\\\"c\\\\d\"");
        let s = v.as_str_value().unwrap();
        assert_eq!(&**s, "a\nb\"c\\d");
    }

    #[test]
    fn reads_proper_lists() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "(1 2 3)");
        let items = v.to_vec().unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn reads_improper_lists() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "(1 . 2)");
        assert!(matches!(v.car(), Some(Value::Fixnum(1))));
        assert!(matches!(v.cdr(), Some(Value::Fixnum(2))));
    }

    #[test]
    fn reads_empty_list() {
        let interp = Interpreter::new();
        assert!(matches!(read_one(&interp, "()"), Value::EmptyList));
    }

    #[test]
    fn quote_sugar_expands() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "'x");
        let items = v.to_vec().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_symbol().unwrap().as_str(), "quote");
    }

    #[test]
    fn eof_at_top_level_is_none() {
        let interp = Interpreter::new();
        let mut reader = Reader::new(Cursor::new(Vec::new()));
        assert!(reader.read(&interp).unwrap().is_none());
    }

    #[test]
    fn symbols_compare_by_interned_identity() {
        let interp = Interpreter::new();
        let a = read_one(&interp, "abc ");
        let b = read_one(&interp, "abc ");
        assert!(a.eq(&b));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let interp = Interpreter::new();
        let mut reader = Reader::new(Cursor::new(b"\"abc".to_vec()));
        assert_eq!(
            reader.read(&interp).unwrap_err(),
            ReadError::UnterminatedString
        );
    }

    #[test]
    fn dot_not_followed_by_delimiter_is_an_error() {
        let interp = Interpreter::new();
        let mut reader = Reader::new(Cursor::new(b"(1 .2)".to_vec()));
        assert_eq!(
            reader.read(&interp).unwrap_err(),
            ReadError::MisplacedDot
        );
    }

    #[test]
    fn comments_are_skipped() {
        let interp = Interpreter::new();
        let v = read_one(&interp, "; a comment\n42");
        assert!(matches!(v, Value::Fixnum(42)));
    }
}
