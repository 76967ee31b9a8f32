//! The doc-comment sub-lexer.
//!
//! An independent mini-lexer that re-tokenizes the text of a `/** ... */`
//! comment into doc tokens (tag names, inline tag brackets, leading
//! asterisks, data runs). Its internal state round-trips through a `u32` so
//! a host can restart it mid-comment.

use javacst_core::text::TextRange;
use javacst_tree::SyntaxKind;
use thiserror::Error;

use crate::token::Token;

/// Doc lexer mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DocLexerState {
    /// Before the `/**` opener.
    Start,
    /// Inside the comment body.
    Contents,
    /// Inside a `{@...}` inline tag; the brace depth is at least 1.
    InlineTag { depth: u16 },
    /// After `*/` (or after running off the end of an unclosed comment).
    Done,
}

/// The resumption state could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid doc lexer resumption state {0}")]
pub struct DocStateError(pub u32);

impl From<DocLexerState> for u32 {
    fn from(state: DocLexerState) -> u32 {
        match state {
            DocLexerState::Start => 0,
            DocLexerState::Contents => 1,
            DocLexerState::Done => 2,
            DocLexerState::InlineTag { depth } => 3 | ((depth as u32) << 2),
        }
    }
}

impl TryFrom<u32> for DocLexerState {
    type Error = DocStateError;

    fn try_from(raw: u32) -> Result<DocLexerState, DocStateError> {
        match raw & 3 {
            0 if raw == 0 => Ok(DocLexerState::Start),
            1 if raw == 1 => Ok(DocLexerState::Contents),
            2 if raw == 2 => Ok(DocLexerState::Done),
            3 => {
                let depth = (raw >> 2) as u16;
                if depth == 0 {
                    Err(DocStateError(raw))
                } else {
                    Ok(DocLexerState::InlineTag { depth })
                }
            }
            _ => Err(DocStateError(raw)),
        }
    }
}

/// Tokenizes one doc comment's text. `base` is the comment's absolute
/// start offset, so emitted token ranges are absolute too.
pub struct DocLexer<'s> {
    text: &'s str,
    pos: usize,
    base: u32,
    state: DocLexerState,
}

impl<'s> DocLexer<'s> {
    pub fn new(text: &'s str, base: u32) -> Self {
        Self {
            text,
            pos: 0,
            base,
            state: DocLexerState::Start,
        }
    }

    /// Restart mid-comment from an encoded state. `text` is the remaining
    /// comment text and `base` its absolute offset.
    pub fn resume(text: &'s str, base: u32, state: u32) -> Result<Self, DocStateError> {
        Ok(Self {
            text,
            pos: 0,
            base,
            state: DocLexerState::try_from(state)?,
        })
    }

    /// The encoded state at the current position.
    pub fn state(&self) -> u32 {
        self.state.into()
    }

    fn token(&self, kind: SyntaxKind, start: usize) -> Token {
        Token::new(
            kind,
            TextRange::new(self.base + start as u32, self.base + self.pos as u32),
        )
    }

    #[inline]
    fn byte(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    fn at_str(&self, s: &str) -> bool {
        self.text[self.pos..].starts_with(s)
    }

    /// Whether only whitespace and asterisks separate `pos` from the start
    /// of its line (or the start of the lexed text).
    fn at_line_start(&self, pos: usize) -> bool {
        let bytes = self.text.as_bytes();
        let mut i = pos;
        while i > 0 {
            match bytes[i - 1] {
                b'\n' => return true,
                b' ' | b'\t' | b'\r' | b'*' => i -= 1,
                _ => return false,
            }
        }
        true
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.text.len() {
            self.state = DocLexerState::Done;
            return None;
        }
        let start = self.pos;
        match self.state {
            DocLexerState::Done => None,
            DocLexerState::Start => {
                if self.at_str("/**") {
                    self.pos += 3;
                    self.state = DocLexerState::Contents;
                    Some(self.token(SyntaxKind::DocCommentStart, start))
                } else {
                    // Not a doc comment opener at all; treat the rest as data.
                    self.pos = self.text.len();
                    self.state = DocLexerState::Done;
                    Some(self.token(SyntaxKind::DocCommentData, start))
                }
            }
            DocLexerState::Contents => {
                if self.at_str("*/") {
                    self.pos += 2;
                    self.state = DocLexerState::Done;
                    return Some(self.token(SyntaxKind::DocCommentEnd, start));
                }
                if self.at_str("{@") {
                    // The opener is the `{` alone; the `@name` after it is
                    // the tag name token.
                    self.pos += 1;
                    self.state = DocLexerState::InlineTag { depth: 1 };
                    return Some(self.token(SyntaxKind::DocInlineTagStart, start));
                }
                match self.byte(self.pos) {
                    Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                        while matches!(
                            self.byte(self.pos),
                            Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
                        ) {
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocSpace, start))
                    }
                    Some(b'*') => {
                        // A run of asterisks that is not the closer: the
                        // line-leading decoration.
                        while self.byte(self.pos) == Some(b'*') && !self.at_str("*/") {
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocAsterisks, start))
                    }
                    Some(b'@') if self.at_line_start(self.pos) => {
                        self.pos += 1;
                        while self
                            .byte(self.pos)
                            .is_some_and(|b| b.is_ascii_alphanumeric())
                        {
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocTagName, start))
                    }
                    Some(_) => {
                        self.scan_data();
                        Some(self.token(SyntaxKind::DocCommentData, start))
                    }
                    None => None,
                }
            }
            DocLexerState::InlineTag { depth } => {
                if self.at_str("*/") {
                    // Unclosed inline tag: the comment closer wins.
                    self.pos += 2;
                    self.state = DocLexerState::Done;
                    return Some(self.token(SyntaxKind::DocCommentEnd, start));
                }
                match self.byte(self.pos) {
                    Some(b'}') => {
                        self.pos += 1;
                        if depth == 1 {
                            self.state = DocLexerState::Contents;
                            Some(self.token(SyntaxKind::DocInlineTagEnd, start))
                        } else {
                            self.state = DocLexerState::InlineTag { depth: depth - 1 };
                            Some(self.token(SyntaxKind::DocCommentData, start))
                        }
                    }
                    Some(b'{') => {
                        self.pos += 1;
                        self.state = DocLexerState::InlineTag { depth: depth + 1 };
                        Some(self.token(SyntaxKind::DocCommentData, start))
                    }
                    Some(b'@') if start_follows_inline_open(self.text, self.pos) => {
                        self.pos += 1;
                        while self
                            .byte(self.pos)
                            .is_some_and(|b| b.is_ascii_alphanumeric())
                        {
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocTagName, start))
                    }
                    Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                        while matches!(
                            self.byte(self.pos),
                            Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
                        ) {
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocSpace, start))
                    }
                    Some(_) => {
                        while let Some(b) = self.byte(self.pos) {
                            if matches!(b, b'{' | b'}' | b' ' | b'\t' | b'\r' | b'\n')
                                || self.at_str("*/")
                            {
                                break;
                            }
                            self.pos += 1;
                        }
                        Some(self.token(SyntaxKind::DocCommentData, start))
                    }
                    None => None,
                }
            }
        }
    }

    fn scan_data(&mut self) {
        while let Some(b) = self.byte(self.pos) {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'*')
                || self.at_str("{@")
                || (b == b'@' && self.at_line_start(self.pos))
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == self.text.len() {
            return;
        }
        // `*` inside prose (not a closer, not line-leading) stays data.
        if self.byte(self.pos) == Some(b'*') && !self.at_str("*/") && !self.at_line_start(self.pos)
        {
            self.pos += 1;
            self.scan_data();
        }
    }
}

/// A `{` immediately before `pos` (or a resumption boundary at `pos` 0)
/// means this `@` names the inline tag.
fn start_follows_inline_open(text: &str, pos: usize) -> bool {
    pos == 0 || text.as_bytes()[pos - 1] == b'{'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_kinds(text: &str) -> Vec<SyntaxKind> {
        let mut lexer = DocLexer::new(text, 0);
        let mut kinds = Vec::new();
        while let Some(t) = lexer.next_token() {
            kinds.push(t.kind);
        }
        kinds
    }

    #[test]
    fn simple_doc() {
        use SyntaxKind::*;
        assert_eq!(
            doc_kinds("/** hello */"),
            vec![DocCommentStart, DocSpace, DocCommentData, DocSpace, DocCommentEnd]
        );
    }

    #[test]
    fn block_tag_at_line_start() {
        use SyntaxKind::*;
        let kinds = doc_kinds("/**\n * @param x the value\n */");
        assert!(kinds.contains(&DocTagName));
        assert!(kinds.contains(&DocAsterisks));
        assert_eq!(*kinds.last().unwrap(), DocCommentEnd);
    }

    #[test]
    fn email_at_is_not_a_tag() {
        use SyntaxKind::*;
        let kinds = doc_kinds("/** mail me@example.com */");
        assert!(!kinds.contains(&DocTagName));
    }

    #[test]
    fn inline_tag() {
        use SyntaxKind::*;
        let kinds = doc_kinds("/** see {@link Foo#bar} now */");
        assert!(kinds.contains(&DocInlineTagStart));
        assert!(kinds.contains(&DocInlineTagEnd));
        assert!(kinds.contains(&DocTagName));
    }

    #[test]
    fn unclosed_inline_tag_tolerates_comment_end() {
        use SyntaxKind::*;
        let kinds = doc_kinds("/** {@link Foo */");
        assert_eq!(*kinds.last().unwrap(), DocCommentEnd);
    }

    #[test]
    fn tokens_cover_comment_exactly() {
        let text = "/**\n * Does things.\n * @return {@code true} on success\n */";
        let mut lexer = DocLexer::new(text, 100);
        let mut pos = 100u32;
        while let Some(t) = lexer.next_token() {
            assert_eq!(t.range.start, pos);
            pos = t.range.end;
        }
        assert_eq!(pos, 100 + text.len() as u32);
    }

    #[test]
    fn state_round_trip() {
        let states = [
            DocLexerState::Start,
            DocLexerState::Contents,
            DocLexerState::Done,
            DocLexerState::InlineTag { depth: 1 },
            DocLexerState::InlineTag { depth: 7 },
        ];
        for s in states {
            let raw: u32 = s.into();
            assert_eq!(DocLexerState::try_from(raw), Ok(s));
        }
        assert!(DocLexerState::try_from(3).is_err());
        assert!(DocLexerState::try_from(17).is_err());
    }

    #[test]
    fn resume_mid_comment() {
        let text = "/** a {@link B} c */";
        let mut lexer = DocLexer::new(text, 0);
        // Lex until just inside the inline tag.
        let mut split = 0;
        while let Some(t) = lexer.next_token() {
            if t.kind == SyntaxKind::DocInlineTagStart {
                split = t.range.end as usize;
                break;
            }
        }
        let state = lexer.state();
        let mut resumed = DocLexer::resume(&text[split..], split as u32, state).unwrap();
        let t = resumed.next_token().unwrap();
        assert_eq!(t.kind, SyntaxKind::DocTagName);
        assert_eq!(t.range.start, split as u32);
    }
}
