//! Tokens produced by the lexer.

use bitflags::bitflags;
use javacst_core::text::TextRange;
use javacst_tree::SyntaxKind;

bitflags! {
    /// Per-token flags.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct TokenFlags: u8 {
        /// A comment, string or char literal whose terminator was missing.
        const UNTERMINATED = 1 << 0;
    }
}

/// One scanned token: kind plus byte span. Immutable; the text lives in
/// the source buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: SyntaxKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            flags: TokenFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// The full raw token stream over a source range, trivia included.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Token> {
        self.tokens.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
