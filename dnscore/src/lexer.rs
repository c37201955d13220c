//! Master-file tokenization: the contract spec.md §6 draws between this
//! crate and the zone-file *reading* that sits outside it.
//!
//! This crate tokenizes zone-file text into the four token kinds spec.md
//! names (identifier, quoted-string, number, end-of-line) plus end-of-file,
//! and handles the `\DDD`/`\c` escapes used inside both bare identifiers and
//! quoted strings. It deliberately stops there: assembling tokens into
//! resource-record lines, tracking `$ORIGIN`/`$TTL`, and following
//! `$INCLUDE` across files is master-file parsing *beyond* tokenization, and
//! per spec.md §1's non-goals is left to the caller (`dnscore-cli`'s zone
//! loader, grounded on the teacher's `Zone::deserialise`).
//!
//! Grounded on `examples/barrucadu-resolved/lib-dns-types/src/zones/deserialise.rs`'s
//! `tokenise_escape` and its character-stream parse loop, adapted from a
//! hand-written `Peekable<Chars>` walk into a reusable [`Lexer`] that a
//! caller drives token-by-token instead of line-by-line.

use crate::error::RdataError;

/// One lexical token from a master-file byte stream.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    /// A bare (unquoted) word: a name, a mnemonic, a number-looking field,
    /// `@`, or a `$DIRECTIVE`. Escapes are already resolved into raw octets,
    /// so the caller never sees a literal backslash.
    Identifier(Vec<u8>),
    /// A `"..."`-quoted character-string, escapes resolved.
    QuotedString(Vec<u8>),
    /// An unsigned decimal number, recognised eagerly so callers parsing
    /// TTLs/serials don't have to re-parse an `Identifier`.
    Number(u64),
    /// The end of an unparenthesized line: in zone-file grammar, a record
    /// ends here unless an open `(` is still pending.
    EndOfLine,
    EndOfFile,
}

/// Tokenizes master-file text. Parentheses group a record across multiple
/// physical lines (RFC 1035 §5.1): while a `(` is open, an embedded newline
/// is whitespace, not an [`Token::EndOfLine`].
pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    paren_depth: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Lexer<'a> {
        Lexer { bytes: text.as_bytes(), pos: 0, paren_depth: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Skip spaces/tabs, `;`-comments, and (while parenthesized) newlines.
    /// Returns `true` if a bare, un-parenthesized newline was consumed —
    /// the caller uses this to decide whether to emit `EndOfLine`.
    fn skip_intertoken_space(&mut self) -> bool {
        let mut saw_bare_newline = false;
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.pos += 1;
                }
                Some(b'\n') => {
                    self.pos += 1;
                    if self.paren_depth == 0 {
                        saw_bare_newline = true;
                        break;
                    }
                }
                Some(b';') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        saw_bare_newline
    }

    /// Read a `\DDD` or `\c` escape, with the leading backslash already
    /// consumed. Grounded on `tokenise_escape` in the teacher's deserialiser:
    /// three ASCII digits means a decimal octet value, anything else is a
    /// literal escaped character.
    fn read_escape(&mut self) -> Result<u8, RdataError> {
        let first = self.advance().ok_or_else(|| RdataError::Syntax("trailing backslash".into()))?;
        if first.is_ascii_digit() {
            let mut digits = vec![first];
            for _ in 0..2 {
                match self.peek() {
                    Some(b) if b.is_ascii_digit() => {
                        digits.push(b);
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            if digits.len() != 3 {
                return Err(RdataError::Syntax("\\DDD escape needs exactly three digits".into()));
            }
            let text = std::str::from_utf8(&digits).expect("ascii digits are valid utf8");
            let value: u16 = text.parse().map_err(|_| RdataError::Syntax("bad \\DDD escape".into()))?;
            if value > 255 {
                return Err(RdataError::Syntax("\\DDD escape out of range".into()));
            }
            Ok(value as u8)
        } else {
            Ok(first)
        }
    }

    fn read_quoted_string(&mut self) -> Result<Token, RdataError> {
        let mut out = Vec::new();
        loop {
            match self.advance() {
                None => return Err(RdataError::Syntax("unterminated quoted string".into())),
                Some(b'"') => return Ok(Token::QuotedString(out)),
                Some(b'\\') => out.push(self.read_escape()?),
                Some(b) => out.push(b),
            }
        }
    }

    fn read_bare_word(&mut self, first: u8) -> Result<Vec<u8>, RdataError> {
        let mut out = vec![first];
        loop {
            match self.peek() {
                Some(b'\\') => {
                    self.pos += 1;
                    out.push(self.read_escape()?);
                }
                Some(b) if is_word_byte(b) => {
                    out.push(b);
                    self.pos += 1;
                }
                _ => break,
            }
        }
        Ok(out)
    }

    /// Produce the next token, or `EndOfFile` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, RdataError> {
        let saw_eol = self.skip_intertoken_space();
        if saw_eol {
            return Ok(Token::EndOfLine);
        }
        match self.peek() {
            None => Ok(Token::EndOfFile),
            Some(b'(') => {
                self.pos += 1;
                self.paren_depth += 1;
                self.next_token()
            }
            Some(b')') => {
                self.pos += 1;
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.next_token()
            }
            Some(b'"') => {
                self.pos += 1;
                self.read_quoted_string()
            }
            Some(first) => {
                self.pos += 1;
                let word = self.read_bare_word(first)?;
                if let Ok(text) = std::str::from_utf8(&word) {
                    if let Ok(n) = text.parse::<u64>() {
                        return Ok(Token::Number(n));
                    }
                }
                Ok(Token::Identifier(word))
            }
        }
    }

    /// Collect every token up to (and including) the next `EndOfLine` or
    /// `EndOfFile`, as the string slices `RdataOps::from_text` expects.
    /// Non-UTF8 escapes (`\DDD` producing an octet outside ASCII) are
    /// rejected here since every textual rdata field this crate parses is
    /// ASCII; binary payloads use the quoted-string/hex/base64 forms.
    pub fn next_line(&mut self) -> Result<Vec<String>, RdataError> {
        let mut words = Vec::new();
        loop {
            match self.next_token()? {
                Token::EndOfLine | Token::EndOfFile => break,
                Token::Identifier(bytes) | Token::QuotedString(bytes) => {
                    words.push(String::from_utf8(bytes).map_err(|_| RdataError::Syntax("non-ASCII token".into()))?);
                }
                Token::Number(n) => words.push(n.to_string()),
            }
        }
        Ok(words)
    }
}

fn is_word_byte(b: u8) -> bool {
    !matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b';' | b'(' | b')' | b'"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(text);
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token().unwrap();
            let done = t == Token::EndOfFile;
            out.push(t);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn bare_words_and_numbers() {
        let toks = tokens("www IN A 300\n");
        assert_eq!(
            toks,
            vec![
                Token::Identifier(b"www".to_vec()),
                Token::Identifier(b"IN".to_vec()),
                Token::Identifier(b"A".to_vec()),
                Token::Number(300),
                Token::EndOfLine,
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn comment_is_skipped() {
        let toks = tokens("a ; trailing comment\nb\n");
        assert_eq!(
            toks,
            vec![
                Token::Identifier(b"a".to_vec()),
                Token::EndOfLine,
                Token::Identifier(b"b".to_vec()),
                Token::EndOfLine,
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn quoted_string_with_escapes() {
        let toks = tokens("\"hello \\\"world\\\"\"\n");
        assert_eq!(toks[0], Token::QuotedString(b"hello \"world\"".to_vec()));
    }

    #[test]
    fn ddd_escape_in_bare_word() {
        let toks = tokens("a\\046b\n");
        assert_eq!(toks[0], Token::Identifier(b"a.b".to_vec()));
    }

    #[test]
    fn parens_suppress_end_of_line() {
        let toks = tokens("a ( b\n c )\nd\n");
        assert_eq!(
            toks,
            vec![
                Token::Identifier(b"a".to_vec()),
                Token::Identifier(b"b".to_vec()),
                Token::Identifier(b"c".to_vec()),
                Token::EndOfLine,
                Token::Identifier(b"d".to_vec()),
                Token::EndOfLine,
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn next_line_collects_words() {
        let mut lexer = Lexer::new("www 300 IN A 192.0.2.1\nmail 300 IN A 192.0.2.2\n");
        let first = lexer.next_line().unwrap();
        assert_eq!(first, vec!["www", "300", "IN", "A", "192.0.2.1"]);
        let second = lexer.next_line().unwrap();
        assert_eq!(second, vec!["mail", "300", "IN", "A", "192.0.2.2"]);
    }
}
