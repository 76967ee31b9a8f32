//! Reference and type parsing: qualified names, generic argument lists,
//! wildcards, array suffixes, diamond syntax.

use javacst_diagnostics::messages;
use javacst_tree::{NodeFlags, NodeId, SyntaxKind};

use crate::parser::Parser;

impl<'t> Parser<'t> {
    /// Parse a possibly-qualified reference `a.b.c`, each segment carrying
    /// an optional generic argument list, into a left-nested chain of
    /// `JavaCodeReference` nodes.
    ///
    /// Returns `None` (no node, no cursor movement) when the current token
    /// is not an identifier. On a `.` with no identifier after it, either
    /// stops before the dot (`allow_incomplete == false`) or emits an
    /// error child and returns the incomplete reference.
    pub(crate) fn parse_code_reference(
        &mut self,
        allow_incomplete: bool,
        with_type_args: bool,
    ) -> Option<NodeId> {
        if !self.at(SyntaxKind::Identifier) {
            return None;
        }
        let mut node = self.builder.composite(SyntaxKind::JavaCodeReference);
        self.bump_into(node);
        if with_type_args {
            self.try_type_argument_list(node);
        }

        while self.at(SyntaxKind::Dot) {
            let state = self.state();
            let outer = self.builder.composite(SyntaxKind::JavaCodeReference);
            self.builder.push_child(outer, node);
            self.bump_into(outer); // the dot
            if self.at(SyntaxKind::Identifier) {
                self.bump_into(outer);
                if with_type_args {
                    self.try_type_argument_list(outer);
                }
                node = outer;
            } else if allow_incomplete {
                self.error_into(outer, &messages::EXPECTED_IDENTIFIER);
                self.builder.add_flags(outer, NodeFlags::INCOMPLETE);
                return Some(outer);
            } else {
                // The reference ends before the dot; the caller decides
                // what the dot belongs to.
                self.rollback(state);
                break;
            }
        }
        Some(node)
    }

    /// Tentatively parse a `<...>` argument list onto `parent`. A `<` that
    /// does not lead to a well-formed argument list is left untouched (it
    /// may be a comparison operator).
    pub(crate) fn try_type_argument_list(&mut self, parent: NodeId) -> bool {
        if !self.at(SyntaxKind::Lt) {
            return false;
        }
        let state = self.state();
        match self.parse_type_argument_list() {
            Some(list) => {
                self.builder.push_child(parent, list);
                true
            }
            None => {
                self.rollback(state);
                false
            }
        }
    }

    /// Parse `<...>`, including the empty diamond `<>`. Returns `None`
    /// without restoring on malformed input; callers hold the snapshot.
    pub(crate) fn parse_type_argument_list(&mut self) -> Option<NodeId> {
        debug_assert!(self.at(SyntaxKind::Lt));
        let list = self.builder.composite(SyntaxKind::TypeArgumentList);
        self.bump_into(list);
        // Diamond.
        if self.at(SyntaxKind::Gt) {
            self.bump_into(list);
            return Some(list);
        }
        loop {
            let arg = self.parse_type_argument()?;
            self.builder.push_child(list, arg);
            if self.at(SyntaxKind::Comma) {
                self.bump_into(list);
                continue;
            }
            break;
        }
        // Generic argument lists close on a single `>`: the lexer never
        // merges `>` tokens, so nested closes fall out naturally.
        if self.at(SyntaxKind::Gt) {
            self.bump_into(list);
            Some(list)
        } else {
            None
        }
    }

    /// A type argument: a wildcard or a full type.
    fn parse_type_argument(&mut self) -> Option<NodeId> {
        if self.at(SyntaxKind::Question) {
            let wild = self.builder.composite(SyntaxKind::WildcardType);
            self.bump_into(wild);
            if self.at(SyntaxKind::ExtendsKeyword) || self.at(SyntaxKind::SuperKeyword) {
                self.bump_into(wild);
                match self.parse_type() {
                    Some(bound) => self.builder.push_child(wild, bound),
                    None => {
                        self.error_into(wild, &messages::EXPECTED_TYPE);
                    }
                }
            }
            return Some(wild);
        }
        self.parse_type()
    }

    /// Parse a type: a primitive keyword or a code reference, with any
    /// number of trailing `[]` pairs. Each pair is parsed tentatively so
    /// `foo[x]` is not misread as an array type.
    pub(crate) fn parse_type(&mut self) -> Option<NodeId> {
        let state = self.state();
        let ty = self.builder.composite(SyntaxKind::Type);
        if self.token().is_primitive_type() {
            self.bump_into(ty);
        } else {
            match self.parse_code_reference(false, true) {
                Some(reference) => self.builder.push_child(ty, reference),
                None => {
                    self.rollback(state);
                    return None;
                }
            }
        }
        self.parse_array_suffixes(ty);
        Some(ty)
    }

    /// Consume `[` `]` pairs onto `parent`; a `[` not followed by `]`
    /// rolls back.
    pub(crate) fn parse_array_suffixes(&mut self, parent: NodeId) {
        while self.at(SyntaxKind::LBracket) {
            let state = self.state();
            let bracket = self.bump();
            if self.at(SyntaxKind::RBracket) {
                self.builder.push_child(parent, bracket);
                self.bump_into(parent);
            } else {
                self.rollback(state);
                break;
            }
        }
    }

    /// Whether the first semantic child of a `Type` node is a primitive
    /// keyword.
    pub(crate) fn type_is_primitive(&self, ty: NodeId) -> bool {
        self.builder
            .children(ty)
            .first()
            .is_some_and(|&c| self.builder.kind(c).is_primitive_type())
    }

    /// Whether a `Type` node carries `[]` suffixes.
    pub(crate) fn type_is_array(&self, ty: NodeId) -> bool {
        self.builder
            .children(ty)
            .iter()
            .any(|&c| self.builder.kind(c) == SyntaxKind::LBracket)
    }
}
