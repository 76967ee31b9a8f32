//! The raw Java lexer.
//!
//! Scans a byte range of the source into a [`TokenList`]. Trivia
//! (whitespace, comments) is emitted like any other token; filtering is the
//! cursor's job. Broken input never fails: unterminated literals and
//! comments are flagged and reported, unknown characters become
//! single-char `Unknown` tokens.
//!
//! One deliberate deviation from maximal munch: `>` is always emitted as a
//! single token, and an `=` after it as its own token. Multi-`>` operators
//! (`>>`, `>>=`, `>=`, ...) only exist after the parser composes adjacent
//! tokens, because `>` is also how nested generic argument lists close.

use javacst_core::text::TextRange;
use javacst_diagnostics::{messages, DiagnosticCollection};
use javacst_tree::SyntaxKind;
use memchr::memchr2;
use unicode_xid::UnicodeXID;

use crate::token::{Token, TokenFlags, TokenList};

/// Lex `source[range]` into tokens. Offsets in the result are absolute.
pub fn lex(source: &str, range: TextRange) -> (TokenList, DiagnosticCollection) {
    let mut lexer = Lexer {
        source,
        pos: range.start as usize,
        end: range.end as usize,
        tokens: Vec::new(),
        diagnostics: DiagnosticCollection::new(),
    };
    lexer.run();
    (TokenList::new(lexer.tokens), lexer.diagnostics)
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    end: usize,
    tokens: Vec<Token>,
    diagnostics: DiagnosticCollection,
}

fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_xid_start()
}

fn is_ident_part(c: char) -> bool {
    c == '$' || c.is_xid_continue()
}

impl<'s> Lexer<'s> {
    fn run(&mut self) {
        while self.pos < self.end {
            let start = self.pos;
            let c = self.cur_char();
            let token = match c {
                ' ' | '\t' | '\r' | '\n' | '\x0c' => self.scan_whitespace(start),
                '/' => self.scan_slash(start),
                '\'' => self.scan_char_literal(start),
                '"' => self.scan_string_literal(start),
                '0'..='9' => self.scan_number(start),
                '.' => {
                    if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) {
                        self.scan_number(start)
                    } else if self.peek_byte(1) == Some(b'.') && self.peek_byte(2) == Some(b'.') {
                        self.pos += 3;
                        self.token(SyntaxKind::Ellipsis, start)
                    } else {
                        self.pos += 1;
                        self.token(SyntaxKind::Dot, start)
                    }
                }
                _ if is_ident_start(c) => self.scan_identifier(start),
                _ => self.scan_operator(start),
            };
            self.tokens.push(token);
        }
    }

    #[inline]
    fn cur_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos < self.end {
            Some(self.source.as_bytes()[pos])
        } else {
            None
        }
    }

    #[inline]
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.byte_at(self.pos + offset)
    }

    fn token(&self, kind: SyntaxKind, start: usize) -> Token {
        Token::new(kind, TextRange::new(start as u32, self.pos as u32))
    }

    fn unterminated(&mut self, kind: SyntaxKind, start: usize) -> Token {
        let range = TextRange::new(start as u32, self.pos as u32);
        let message = match kind {
            SyntaxKind::CharLiteral => &messages::UNCLOSED_CHAR,
            SyntaxKind::StringLiteral => &messages::UNCLOSED_STRING,
            _ => &messages::UNCLOSED_COMMENT,
        };
        self.diagnostics.report(message, &[], range);
        Token::new(kind, range).with_flags(TokenFlags::UNTERMINATED)
    }

    fn scan_whitespace(&mut self, start: usize) -> Token {
        while let Some(b) = self.byte_at(self.pos) {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => self.pos += 1,
                _ => break,
            }
        }
        self.token(SyntaxKind::Whitespace, start)
    }

    fn scan_slash(&mut self, start: usize) -> Token {
        match self.peek_byte(1) {
            Some(b'/') => {
                // Line comment, up to but not including the line break.
                self.pos += 2;
                match memchr2(b'\n', b'\r', &self.source.as_bytes()[self.pos..self.end]) {
                    Some(i) => self.pos += i,
                    None => self.pos = self.end,
                }
                self.token(SyntaxKind::LineComment, start)
            }
            Some(b'*') => {
                let is_doc = self.peek_byte(2) == Some(b'*') && self.peek_byte(3) != Some(b'/');
                let kind = if is_doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::BlockComment
                };
                self.pos += 2;
                loop {
                    match self.byte_at(self.pos) {
                        None => return self.unterminated(kind, start),
                        Some(b'*') if self.peek_byte(1) == Some(b'/') => {
                            self.pos += 2;
                            return self.token(kind, start);
                        }
                        Some(_) => self.bump_char(),
                    }
                }
            }
            Some(b'=') => {
                self.pos += 2;
                self.token(SyntaxKind::SlashEq, start)
            }
            _ => {
                self.pos += 1;
                self.token(SyntaxKind::Slash, start)
            }
        }
    }

    fn bump_char(&mut self) {
        let c = self.cur_char();
        self.pos += c.len_utf8().max(1);
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        self.bump_char();
        while self.pos < self.end {
            let c = self.cur_char();
            if !is_ident_part(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let text = &self.source[start..self.pos];
        let kind = SyntaxKind::keyword_from_text(text).unwrap_or(SyntaxKind::Identifier);
        self.token(kind, start)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut is_float = false;
        if self.source.as_bytes()[self.pos] == b'0'
            && matches!(self.peek_byte(1), Some(b'x') | Some(b'X') | Some(b'b') | Some(b'B'))
        {
            // Hex or binary.
            self.pos += 2;
            while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_') {
                self.pos += 1;
            }
            let kind = match self.source.as_bytes()[self.pos - 1] {
                b'l' | b'L' => SyntaxKind::LongLiteral,
                _ => SyntaxKind::IntLiteral,
            };
            return self.token(kind, start);
        }

        while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit() || b == b'_') {
            self.pos += 1;
        }
        if self.byte_at(self.pos) == Some(b'.')
            && self.byte_at(self.pos + 1).is_some_and(|b| b.is_ascii_digit())
        {
            is_float = true;
            self.pos += 1;
            while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit() || b == b'_') {
                self.pos += 1;
            }
        }
        if matches!(self.byte_at(self.pos), Some(b'e') | Some(b'E')) {
            let mut ahead = self.pos + 1;
            if matches!(self.byte_at(ahead), Some(b'+') | Some(b'-')) {
                ahead += 1;
            }
            if self.byte_at(ahead).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                self.pos = ahead;
                while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        let kind = match self.byte_at(self.pos) {
            Some(b'f') | Some(b'F') => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some(b'd') | Some(b'D') => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            Some(b'l') | Some(b'L') if !is_float => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            _ if is_float => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntLiteral,
        };
        self.token(kind, start)
    }

    fn scan_char_literal(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.byte_at(self.pos) {
                None | Some(b'\n') | Some(b'\r') => {
                    return self.unterminated(SyntaxKind::CharLiteral, start)
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.pos < self.end {
                        self.bump_char();
                    }
                }
                Some(b'\'') => {
                    self.pos += 1;
                    return self.token(SyntaxKind::CharLiteral, start);
                }
                Some(_) => self.bump_char(),
            }
        }
    }

    fn scan_string_literal(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.byte_at(self.pos) {
                None | Some(b'\n') | Some(b'\r') => {
                    return self.unterminated(SyntaxKind::StringLiteral, start)
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.pos < self.end {
                        self.bump_char();
                    }
                }
                Some(b'"') => {
                    self.pos += 1;
                    return self.token(SyntaxKind::StringLiteral, start);
                }
                Some(_) => self.bump_char(),
            }
        }
    }

    fn scan_operator(&mut self, start: usize) -> Token {
        use SyntaxKind::*;
        let b = self.source.as_bytes()[self.pos];
        let (kind, len) = match b {
            b'(' => (LParen, 1),
            b')' => (RParen, 1),
            b'{' => (LBrace, 1),
            b'}' => (RBrace, 1),
            b'[' => (LBracket, 1),
            b']' => (RBracket, 1),
            b';' => (Semicolon, 1),
            b',' => (Comma, 1),
            b'@' => (At, 1),
            b'~' => (Tilde, 1),
            b'?' => (Question, 1),
            b':' => (Colon, 1),
            // Always a lone `>`; see module docs.
            b'>' => (Gt, 1),
            b'<' => match (self.peek_byte(1), self.peek_byte(2)) {
                (Some(b'<'), Some(b'=')) => (ShlEq, 3),
                (Some(b'<'), _) => (Shl, 2),
                (Some(b'='), _) => (LtEq, 2),
                _ => (Lt, 1),
            },
            b'=' => match self.peek_byte(1) {
                Some(b'=') => (EqEq, 2),
                _ => (Eq, 1),
            },
            b'!' => match self.peek_byte(1) {
                Some(b'=') => (BangEq, 2),
                _ => (Bang, 1),
            },
            b'&' => match self.peek_byte(1) {
                Some(b'&') => (AndAnd, 2),
                Some(b'=') => (AndEq, 2),
                _ => (And, 1),
            },
            b'|' => match self.peek_byte(1) {
                Some(b'|') => (OrOr, 2),
                Some(b'=') => (OrEq, 2),
                _ => (Or, 1),
            },
            b'+' => match self.peek_byte(1) {
                Some(b'+') => (PlusPlus, 2),
                Some(b'=') => (PlusEq, 2),
                _ => (Plus, 1),
            },
            b'-' => match self.peek_byte(1) {
                Some(b'-') => (MinusMinus, 2),
                Some(b'=') => (MinusEq, 2),
                _ => (Minus, 1),
            },
            b'*' => match self.peek_byte(1) {
                Some(b'=') => (StarEq, 2),
                _ => (Star, 1),
            },
            b'%' => match self.peek_byte(1) {
                Some(b'=') => (PercentEq, 2),
                _ => (Percent, 1),
            },
            b'^' => match self.peek_byte(1) {
                Some(b'=') => (CaretEq, 2),
                _ => (Caret, 1),
            },
            _ => {
                self.bump_char();
                return self.token(Unknown, start);
            }
        };
        self.pos += len;
        self.token(kind, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        let (tokens, _) = lex(source, TextRange::new(0, source.len() as u32));
        tokens.tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn gt_is_always_single() {
        use SyntaxKind::*;
        assert_eq!(kinds(">>"), vec![Gt, Gt]);
        assert_eq!(kinds(">>>="), vec![Gt, Gt, Gt, Eq]);
        assert_eq!(kinds(">="), vec![Gt, Eq]);
        // `<` keeps maximal munch.
        assert_eq!(kinds("<<="), vec![ShlEq]);
    }

    #[test]
    fn tokens_cover_every_byte() {
        let source = "class A { int x = 1; /* c */ }\n";
        let (tokens, diags) = lex(source, TextRange::new(0, source.len() as u32));
        assert!(diags.is_empty());
        let mut pos = 0u32;
        for t in tokens.tokens() {
            assert_eq!(t.range.start, pos, "gap before {:?}", t);
            pos = t.range.end;
        }
        assert_eq!(pos, source.len() as u32);
    }

    #[test]
    fn comments_and_doc_comments() {
        use SyntaxKind::*;
        assert_eq!(kinds("// x"), vec![LineComment]);
        assert_eq!(kinds("/* x */"), vec![BlockComment]);
        assert_eq!(kinds("/** x */"), vec![DocComment]);
        assert_eq!(kinds("/**/"), vec![BlockComment]);
    }

    #[test]
    fn unterminated_comment_is_flagged() {
        let source = "/* never closed";
        let (tokens, diags) = lex(source, TextRange::new(0, source.len() as u32));
        assert_eq!(tokens.len(), 1);
        assert!(tokens.get(0).unwrap().flags.contains(TokenFlags::UNTERMINATED));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.diagnostics()[0].key, "unclosed.comment");
    }

    #[test]
    fn unterminated_string_stops_at_line_break() {
        use SyntaxKind::*;
        let source = "\"abc\nx";
        let (tokens, diags) = lex(source, TextRange::new(0, source.len() as u32));
        let ks: Vec<_> = tokens.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(ks, vec![StringLiteral, Whitespace, Identifier]);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn numeric_literals() {
        use SyntaxKind::*;
        assert_eq!(kinds("0"), vec![IntLiteral]);
        assert_eq!(kinds("42L"), vec![LongLiteral]);
        assert_eq!(kinds("0xFF"), vec![IntLiteral]);
        assert_eq!(kinds("0xFFL"), vec![LongLiteral]);
        assert_eq!(kinds("1.5"), vec![DoubleLiteral]);
        assert_eq!(kinds("1.5f"), vec![FloatLiteral]);
        assert_eq!(kinds("1e10"), vec![DoubleLiteral]);
        assert_eq!(kinds(".5"), vec![DoubleLiteral]);
        assert_eq!(kinds("1.foo"), vec![IntLiteral, Dot, Identifier]);
    }

    #[test]
    fn keywords_and_identifiers() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("public class Foo"),
            vec![PublicKeyword, Whitespace, ClassKeyword, Whitespace, Identifier]
        );
        assert_eq!(kinds("classx"), vec![Identifier]);
    }

    #[test]
    fn unknown_bytes_become_tokens() {
        use SyntaxKind::*;
        assert_eq!(kinds("#"), vec![Unknown]);
        // Still lossless.
        let source = "a # b";
        let (tokens, _) = lex(source, TextRange::new(0, source.len() as u32));
        let total: u32 = tokens.tokens().iter().map(|t| t.len()).sum();
        assert_eq!(total, source.len() as u32);
    }

    #[test]
    fn sub_range_lexing() {
        let source = "int x; int y;";
        let (tokens, _) = lex(source, TextRange::new(7, 13));
        assert_eq!(tokens.get(0).unwrap().range.start, 7);
        assert_eq!(tokens.tokens().last().unwrap().range.end, 13);
    }
}
