//! javacst_core: foundation types for the javacst parser.
//!
//! Provides byte-offset text ranges, a line map for diagnostics rendering,
//! and the string interner shared by the lexer and the tree.

pub mod intern;
pub mod text;

pub use intern::{Istr, StringInterner};
pub use text::{LineCol, LineMap, TextRange};
