//! Shared parser state and the small-token helpers every grammar layer
//! uses.
//!
//! All grammar functions live in `impl Parser` blocks spread across the
//! sibling modules (refs, expr, stmt, decl, file). A function that can
//! fail returns `Option<NodeId>`; the caller saves a [`ParserState`]
//! before the attempt and rolls back itself. Rolling back truncates the
//! node arena, so an abandoned speculative branch leaves no trace.

use javacst_core::intern::StringInterner;
use javacst_core::text::TextRange;
use javacst_diagnostics::{Diagnostic, DiagnosticCollection, MessageKey};
use javacst_lexer::{CursorPos, TokenCursor};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind, TreeBuilder, TreeMark};

use crate::ParseOptions;

/// A saved cursor position plus tree high-water mark: everything needed to
/// abandon a tentative parse.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ParserState {
    cursor: CursorPos,
    mark: TreeMark,
    reported: usize,
}

/// Explicit state of the consecutive-junk accumulator used by the block,
/// class-body and file drivers: runs of unrecognized tokens are grouped
/// under a single error node, not one node per token.
#[derive(Debug, Copy, Clone)]
pub(crate) enum ErrorGroup {
    Inactive,
    Accumulating(NodeId),
}

pub(crate) struct Parser<'t> {
    pub(crate) cursor: TokenCursor<'t>,
    pub(crate) builder: TreeBuilder,
    pub(crate) diagnostics: DiagnosticCollection,
    pub(crate) options: ParseOptions,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(
        cursor: TokenCursor<'t>,
        interner: &StringInterner,
        options: ParseOptions,
    ) -> Self {
        Self {
            cursor,
            builder: TreeBuilder::new(interner.clone()),
            diagnostics: DiagnosticCollection::new(),
            options,
        }
    }

    // ========================================================================
    // Token access
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.cursor.token()
    }

    #[inline]
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.cursor.token() == kind
    }

    #[inline]
    pub(crate) fn at_eof(&self) -> bool {
        self.cursor.at_eof()
    }

    #[inline]
    pub(crate) fn lookahead(&self, n: usize) -> SyntaxKind {
        self.cursor.lookahead(n)
    }

    // ========================================================================
    // Backtracking
    // ========================================================================

    pub(crate) fn state(&self) -> ParserState {
        ParserState {
            cursor: self.cursor.save(),
            mark: self.builder.mark(),
            reported: self.diagnostics.len(),
        }
    }

    pub(crate) fn rollback(&mut self, state: ParserState) {
        self.cursor.restore(state.cursor);
        self.builder.truncate(state.mark);
        // Diagnostics raised inside the abandoned branch are phantoms.
        self.diagnostics.truncate(state.reported);
    }

    // ========================================================================
    // Leaf building
    // ========================================================================

    /// Wrap the current token in a leaf and advance.
    pub(crate) fn bump(&mut self) -> NodeId {
        debug_assert!(!self.at_eof());
        let kind = self.cursor.token();
        let range = self.cursor.range();
        let text = self.cursor.text();
        let leaf = self.builder.leaf_str(kind, text, range);
        self.cursor.advance();
        leaf
    }

    /// Wrap the current token in a leaf, append it to `parent`, advance.
    pub(crate) fn bump_into(&mut self, parent: NodeId) -> NodeId {
        let leaf = self.bump();
        self.builder.push_child(parent, leaf);
        leaf
    }

    /// If the current token is `kind`, append it to `parent`.
    pub(crate) fn eat(&mut self, parent: NodeId, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump_into(parent);
            true
        } else {
            false
        }
    }

    /// Require `kind`: append it on a match, otherwise report a diagnostic
    /// and append a childless error node in its place.
    pub(crate) fn expect(&mut self, parent: NodeId, kind: SyntaxKind, message: &MessageKey) -> bool {
        if self.eat(parent, kind) {
            true
        } else {
            self.error_into(parent, message);
            false
        }
    }

    // ========================================================================
    // Error production
    // ========================================================================

    pub(crate) fn report(&mut self, message: &MessageKey, args: &[&str]) {
        let range = if self.at_eof() {
            TextRange::empty(self.cursor.start())
        } else {
            self.cursor.range()
        };
        self.diagnostics.add(Diagnostic::new(message, args, range));
    }

    /// Append a childless error node carrying the message; the offending
    /// token is not consumed.
    pub(crate) fn error_into(&mut self, parent: NodeId, message: &MessageKey) -> NodeId {
        self.report(message, &[]);
        let text = javacst_diagnostics::format_message(message.template, &[]);
        let err = self.builder.error(text);
        self.builder.push_child(parent, err);
        err
    }

    /// Wrap the current token in an error node appended to `parent` and
    /// advance past it.
    pub(crate) fn error_eat_into(&mut self, parent: NodeId, message: &MessageKey) -> NodeId {
        self.report(message, &[]);
        let text = javacst_diagnostics::format_message(message.template, &[]);
        let err = self.builder.error(text);
        if !self.at_eof() {
            self.bump_into(err);
        }
        self.builder.push_child(parent, err);
        err
    }

    /// Feed one unrecognized token into the current error group, opening a
    /// new group if none is active. Returns the updated group state.
    pub(crate) fn junk_token(&mut self, parent: NodeId, group: ErrorGroup) -> ErrorGroup {
        match group {
            ErrorGroup::Accumulating(err) => {
                self.bump_into(err);
                ErrorGroup::Accumulating(err)
            }
            ErrorGroup::Inactive => {
                let err = self.error_eat_into(parent, &javacst_diagnostics::messages::UNEXPECTED_TOKENS);
                ErrorGroup::Accumulating(err)
            }
        }
    }

    /// Consume everything left in the range as grouped junk under `node`.
    pub(crate) fn drain_into(&mut self, node: NodeId) {
        let mut group = ErrorGroup::Inactive;
        while !self.at_eof() {
            group = self.junk_token(node, group);
        }
    }

    /// Flag a composite as unclosed and report the missing terminator.
    pub(crate) fn unclosed(&mut self, node: NodeId, message: &MessageKey) {
        self.report(message, &[]);
        self.builder.add_flags(node, NodeFlags::UNCLOSED);
    }
}
