//! Filtering token cursor.
//!
//! The grammar layer reads tokens through this cursor, which skips a
//! configurable kind set (whitespace and comments by default). A position
//! snapshot is a plain token index: saving and restoring is O(1) and is
//! the parser's backtracking primitive.

use javacst_core::text::{TextPos, TextRange};
use javacst_tree::SyntaxKind;

use crate::token::{Token, TokenList};

/// A const-friendly set of token kinds. Token kinds all sit below 128, so
/// a single `u128` mask covers them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1u128 << (kinds[i] as u16);
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as u16) < 128 && (self.0 >> (kind as u16)) & 1 != 0
    }

}

/// The default filter: whitespace and all comment kinds.
pub const TRIVIA: TokenSet = TokenSet::new(&[
    SyntaxKind::Whitespace,
    SyntaxKind::LineComment,
    SyntaxKind::BlockComment,
    SyntaxKind::DocComment,
]);

/// An opaque, copyable position snapshot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CursorPos(usize);

/// A filtering read cursor over a [`TokenList`].
#[derive(Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    source: &'t str,
    pos: usize,
    limit: usize,
    filter: TokenSet,
}

impl<'t> TokenCursor<'t> {
    pub fn new(list: &'t TokenList, source: &'t str) -> Self {
        Self::with_filter(list, source, TRIVIA)
    }

    pub fn with_filter(list: &'t TokenList, source: &'t str, filter: TokenSet) -> Self {
        let mut cursor = Self {
            tokens: list.tokens(),
            source,
            pos: 0,
            limit: list.len(),
            filter,
        };
        cursor.skip_filtered();
        cursor
    }

    /// A narrowed copy of this cursor that refuses to read at or past the
    /// given raw token index. Used to fence in recovery re-parses.
    pub fn with_limit(&self, limit: usize) -> TokenCursor<'t> {
        let mut narrowed = self.clone();
        narrowed.limit = limit.min(self.tokens.len());
        if narrowed.pos > narrowed.limit {
            narrowed.pos = narrowed.limit;
        }
        narrowed
    }

    fn skip_filtered(&mut self) {
        while self.pos < self.limit && self.filter.contains(self.tokens[self.pos].kind) {
            self.pos += 1;
        }
    }

    /// The current token kind, `Eof` at the end of the range.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        if self.pos < self.limit {
            self.tokens[self.pos].kind
        } else {
            SyntaxKind::Eof
        }
    }

    #[inline]
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.token() == kind
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.pos >= self.limit
    }

    /// Byte offset where the current token starts (or the end offset of the
    /// range at eof).
    pub fn start(&self) -> TextPos {
        if self.pos < self.limit {
            self.tokens[self.pos].range.start
        } else {
            self.end_offset()
        }
    }

    /// Byte offset just past the current token.
    pub fn end(&self) -> TextPos {
        if self.pos < self.limit {
            self.tokens[self.pos].range.end
        } else {
            self.end_offset()
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start(), self.end())
    }

    fn end_offset(&self) -> TextPos {
        if self.limit > 0 {
            self.tokens[self.limit - 1].range.end
        } else {
            0
        }
    }

    /// The current token's source text.
    pub fn text(&self) -> &'t str {
        &self.source[self.range().to_range()]
    }

    /// An arbitrary slice of the underlying source.
    pub fn slice(&self, range: TextRange) -> &'t str {
        &self.source[range.to_range()]
    }

    /// Advance past the current token to the next unfiltered one.
    pub fn advance(&mut self) {
        if self.pos < self.limit {
            self.pos += 1;
            self.skip_filtered();
        }
    }

    /// Advance exactly one raw token (filtered or not). Only meaningful
    /// while composing zero-gap operators from raw neighbors.
    pub fn advance_raw(&mut self) {
        if self.pos < self.limit {
            self.pos += 1;
        }
    }

    /// After raw advances, resume the filtering contract.
    pub fn realign(&mut self) {
        self.skip_filtered();
    }

    /// Position snapshot; O(1).
    #[inline]
    pub fn save(&self) -> CursorPos {
        CursorPos(self.pos)
    }

    /// Exact restoration of a snapshot; O(1).
    #[inline]
    pub fn restore(&mut self, saved: CursorPos) {
        self.pos = saved.0;
    }

    /// Raw index of the current token in the underlying list.
    #[inline]
    pub fn raw_index(&self) -> usize {
        self.pos
    }

    /// The raw token at an index, limit applied.
    pub fn raw_token(&self, index: usize) -> Option<Token> {
        if index < self.limit {
            Some(self.tokens[index])
        } else {
            None
        }
    }

    /// The kind of the n-th unfiltered token after the current one
    /// (n == 0 is the current token).
    pub fn lookahead(&self, n: usize) -> SyntaxKind {
        let mut pos = self.pos;
        let mut remaining = n;
        while pos < self.limit {
            if !self.filter.contains(self.tokens[pos].kind) {
                if remaining == 0 {
                    return self.tokens[pos].kind;
                }
                remaining -= 1;
            }
            pos += 1;
        }
        SyntaxKind::Eof
    }

    /// Whether the raw token directly after the current one is a semantic
    /// token starting exactly where the current one ends — no whitespace or
    /// comment occupies the bytes in between. The GT-composition
    /// precondition.
    pub fn next_is_gap_free(&self) -> bool {
        if self.pos + 1 >= self.limit {
            return false;
        }
        let next = self.tokens[self.pos + 1];
        !self.filter.contains(next.kind)
            && next.range.start == self.tokens[self.pos].range.end
    }

    /// Kind of the raw successor token, gap or not.
    pub fn next_raw_kind(&self) -> SyntaxKind {
        if self.pos + 1 < self.limit {
            self.tokens[self.pos + 1].kind
        } else {
            SyntaxKind::Eof
        }
    }

    /// The raw index of the first token at or after `from` that follows a
    /// blank line, or the limit if none does. Recovery uses this to narrow
    /// a re-parse so one bad declaration cannot eat the rest of the file.
    pub fn next_blank_line_bound(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.limit {
            let t = self.tokens[i];
            if t.kind == SyntaxKind::Whitespace {
                let text = &self.source[t.range.to_range()];
                if text.bytes().filter(|&b| b == b'\n').count() >= 2 {
                    return i;
                }
            }
            i += 1;
        }
        self.limit
    }
}
