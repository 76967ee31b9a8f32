//! javacst_lexer: the Java token source.
//!
//! [`lex`] scans a source range up front into a [`TokenList`]; the grammar
//! layer reads it through a [`TokenCursor`], a filtering view that hides
//! whitespace and comments and supports O(1) position snapshot/restore —
//! the backtracking primitive the parser is built on.

pub mod cursor;
pub mod doc_lexer;
pub mod lexer;
pub mod token;

pub use cursor::{CursorPos, TokenCursor, TokenSet, TRIVIA};
pub use doc_lexer::{DocLexer, DocLexerState, DocStateError};
pub use lexer::lex;
pub use token::{Token, TokenFlags, TokenList};
