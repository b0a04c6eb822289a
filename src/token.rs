//! Lexing of a URI or pattern expression into a sequence of typed [`Token`]s.
//!
//! Two modes share one scanner: [`LexMode::Uri`] treats `=:?(|)*` as
//! ordinary (invalid) bytes, [`LexMode::Pattern`] treats them as structural
//! punctuators.

/// A single lexed token. Cheap to move; owns its string payload for the
/// duration of the compile or resolve call it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A `/` path separator.
    PathSep,
    /// End of input.
    Eof,
    Integer(i64),
    Real(f64),
    Bool(bool),
    /// A bare (unquoted) identifier: `[A-Za-z_][A-Za-z0-9_-]*`.
    Identifier(String),
    /// A quoted string literal. Matches the same "string" type category as `Identifier`.
    String(String),
    /// A lexical error; the scanner has already advanced past the offending byte.
    Error(String),

    // Pattern-only punctuators.
    Colon,
    LeftParen,
    Pipe,
    RightParen,
    Star,
}

impl Token {
    /// True for tokens accepted by a `string`-typed parameter slot.
    #[must_use]
    pub fn is_string_like(&self) -> bool {
        matches!(self, Token::Identifier(_) | Token::String(_))
    }

    /// The lexeme text of an identifier/string/error token, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Identifier(s) | Token::String(s) | Token::Error(s) => Some(s),
            _ => None,
        }
    }
}

/// Which structural character set the scanner is currently honoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// A request URI: `=:?(|)*` are ordinary bytes and produce `Token::Error`.
    Uri,
    /// A pattern expression: `=:?(|)*` are structural punctuators.
    Pattern,
}

/// A pull-based token scanner over a borrowed `&str`, with one token of lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mode: LexMode,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str, mode: LexMode) -> Self {
        Lexer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            mode,
            peeked: None,
        }
    }

    /// The remainder of the original source text starting at the current
    /// cursor, i.e. everything not yet consumed including the token about
    /// to be returned by `next`. Used by the resolver to capture the
    /// verbatim wildcard remainder (`_url`).
    #[must_use]
    pub fn remainder(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Look at the next token without consuming it. The parser peeks at
    /// most once before consuming; calling it twice simply returns the
    /// same cached token, it does not re-scan.
    pub fn peek(&mut self) -> Token {
        if self.peeked.is_none() {
            let t = self.scan();
            self.peeked = Some(t);
        }
        self.peeked.clone().unwrap()
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Token {
        if let Some(t) = self.peeked.take() {
            return t;
        }
        self.scan()
    }

    fn cur(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn scan(&mut self) -> Token {
        match self.cur() {
            None => Token::Eof,
            Some(b'/') => {
                self.pos += 1;
                Token::PathSep
            }
            Some(b) if self.mode == LexMode::Pattern && matches!(b, b':' | b'(' | b'|' | b')' | b'*') => {
                self.pos += 1;
                match b {
                    b':' => Token::Colon,
                    b'(' => Token::LeftParen,
                    b'|' => Token::Pipe,
                    b')' => Token::RightParen,
                    b'*' => Token::Star,
                    _ => unreachable!(),
                }
            }
            Some(b'.') => self.scan_dot(),
            Some(b'0') if self.at(1) == Some(b'x') || self.at(1) == Some(b'X') => self.scan_hex(),
            Some(b) if b.is_ascii_digit() => self.scan_number(),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.scan_identifier_or_keyword(),
            Some(b) => {
                self.pos += 1;
                Token::Error(format!("syntax error, unexpected '{}' in input", b as char))
            }
        }
    }

    fn scan_dot(&mut self) -> Token {
        if matches!(self.at(1), Some(d) if d.is_ascii_digit()) {
            self.scan_number()
        } else {
            self.pos += 1;
            Token::Error("unexpected '.' in input".to_string())
        }
    }

    fn scan_hex(&mut self) -> Token {
        let start = self.pos;
        self.pos += 2; // "0x"
        while matches!(self.cur(), Some(b) if b.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        match i64::from_str_radix(&self.input[start + 2..self.pos], 16) {
            Ok(v) => Token::Integer(v),
            Err(_) => Token::Error(format!("invalid hex literal '{}'", &self.input[start..self.pos])),
        }
    }

    /// Scans an integer or real literal, including the leading-`.` real case
    /// (`.5`) which callers route here via `scan_dot`.
    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let mut is_real = self.cur() == Some(b'.');
        if is_real {
            self.pos += 1;
        }
        while matches!(self.cur(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if !is_real && self.cur() == Some(b'.') && matches!(self.at(1), Some(d) if d.is_ascii_digit()) {
            is_real = true;
            self.pos += 1;
            while matches!(self.cur(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.input[start..self.pos];
        if is_real {
            match text.parse::<f64>() {
                Ok(v) => Token::Real(v),
                Err(_) => Token::Error(format!("invalid real literal '{text}'")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => Token::Integer(v),
                Err(_) => Token::Error(format!("invalid integer literal '{text}'")),
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.cur(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
            self.pos += 1;
        }
        // An identifier may swallow a following `.` plus more identifier
        // characters (`v1.0` is one identifier), but only while what
        // follows the dot is not itself the start of a new number.
        while self.cur() == Some(b'.')
            && matches!(self.at(1), Some(b) if b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
            while matches!(self.cur(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
                self.pos += 1;
            }
        }
        let text = &self.input[start..self.pos];
        let next_is_alnum = matches!(self.cur(), Some(b) if b.is_ascii_alphanumeric());
        if !next_is_alnum && text.eq_ignore_ascii_case("true") {
            return Token::Bool(true);
        }
        if !next_is_alnum && text.eq_ignore_ascii_case("false") {
            return Token::Bool(false);
        }
        Token::Identifier(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str, mode: LexMode) -> Vec<Token> {
        let mut lexer = Lexer::new(input, mode);
        let mut out = Vec::new();
        loop {
            let t = lexer.next();
            let done = t == Token::Eof;
            out.push(t);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn path_separators_and_identifiers() {
        let toks = lex_all("/api/devices", LexMode::Uri);
        assert_eq!(
            toks,
            vec![
                Token::PathSep,
                Token::Identifier("api".into()),
                Token::PathSep,
                Token::Identifier("devices".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn double_slash_yields_two_path_seps() {
        let toks = lex_all("//x", LexMode::Uri);
        assert_eq!(toks[0], Token::PathSep);
        assert_eq!(toks[1], Token::PathSep);
    }

    #[test]
    fn hex_integer() {
        let mut lexer = Lexer::new("0x1F", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Integer(31));
    }

    #[test]
    fn decimal_integer_and_real() {
        let mut lexer = Lexer::new("42", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Integer(42));
        let mut lexer = Lexer::new("3.5", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Real(3.5));
        let mut lexer = Lexer::new(".5", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Real(0.5));
    }

    #[test]
    fn identifier_absorbs_embedded_dot_version() {
        let mut lexer = Lexer::new("v1.0", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Identifier("v1.0".into()));
        assert_eq!(lexer.next(), Token::Eof);
    }

    #[test]
    fn booleans_case_insensitive_and_not_prefix_matched() {
        let mut lexer = Lexer::new("true", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Bool(true));
        let mut lexer = Lexer::new("TRUE", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Bool(true));
        let mut lexer = Lexer::new("truex", LexMode::Uri);
        assert_eq!(lexer.next(), Token::Identifier("truex".into()));
    }

    #[test]
    fn pattern_mode_punctuators() {
        let toks = lex_all(":id(integer|string)", LexMode::Pattern);
        assert_eq!(
            toks,
            vec![
                Token::Colon,
                Token::Identifier("id".into()),
                Token::LeftParen,
                Token::Identifier("integer".into()),
                Token::Pipe,
                Token::Identifier("string".into()),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn uri_mode_rejects_pattern_punctuation() {
        let mut lexer = Lexer::new(":id", LexMode::Uri);
        match lexer.next() {
            Token::Error(_) => {}
            other => panic!("expected Error token, got {other:?}"),
        }
    }

    #[test]
    fn peek_does_not_advance_twice() {
        let mut lexer = Lexer::new("/a", LexMode::Uri);
        assert_eq!(lexer.peek(), Token::PathSep);
        assert_eq!(lexer.peek(), Token::PathSep);
        assert_eq!(lexer.next(), Token::PathSep);
        assert_eq!(lexer.next(), Token::Identifier("a".into()));
    }

    #[test]
    fn wildcard_star_only_in_pattern_mode() {
        let mut lexer = Lexer::new("*", LexMode::Pattern);
        assert_eq!(lexer.next(), Token::Star);
    }
}
