//! Whitespace/comment reinsertion and comment binding.
//!
//! The grammar runs over the filtered stream and produces a tree with
//! gaps; this pass walks the raw token stream in offset lockstep with the
//! tree and splices trivia leaves back into their exact positions, then
//! rebinds comments to the declarations they document.

use javacst_tree::{NodeId, SyntaxKind};

use crate::parser::Parser;

impl<'t> Parser<'t> {
    /// Splice every raw whitespace/comment token back into the tree. With
    /// `to_end`, trailing trivia past the last parsed leaf is appended to
    /// the root (full-input contexts); without it, reinsertion stops at
    /// the root's last leaf (fragment contexts that may not consume the
    /// whole range).
    pub(crate) fn reinsert_trivia(&mut self, root: NodeId, to_end: bool) {
        let mut next_raw = 0usize;
        self.splice(root, &mut next_raw);
        if to_end {
            while let Some(token) = self.cursor.raw_token(next_raw) {
                if token.kind.is_trivia() {
                    let leaf = self.trivia_node(next_raw);
                    self.builder.push_child(root, leaf);
                }
                next_raw += 1;
            }
        }
    }

    fn splice(&mut self, node: NodeId, next_raw: &mut usize) {
        let mut idx = 0;
        while idx < self.builder.child_count(node) {
            let child = self.builder.children(node)[idx];
            let child_start = match self.builder.range(child) {
                Some(range) => range.start,
                None => {
                    // Leafless composite (empty import list, childless
                    // error node); nothing to anchor trivia on.
                    idx += 1;
                    continue;
                }
            };
            // Raw tokens before this child's first leaf are trivia that
            // belongs right here, at the highest composite whose child
            // boundary contains the gap.
            while let Some(token) = self.cursor.raw_token(*next_raw) {
                if token.range.start >= child_start {
                    break;
                }
                debug_assert!(token.kind.is_trivia());
                let leaf = self.trivia_node(*next_raw);
                self.builder.insert_child(node, idx, leaf);
                idx += 1;
                *next_raw += 1;
            }
            if self.builder.is_leaf(child) {
                // The leaf covers one or more raw tokens: composed `>`
                // operators span several, an unparsed block span covers
                // everything inside it, trivia included.
                let end = self
                    .builder
                    .range(child)
                    .map(|r| r.end)
                    .unwrap_or_default();
                while let Some(token) = self.cursor.raw_token(*next_raw) {
                    if token.range.start >= end {
                        break;
                    }
                    *next_raw += 1;
                }
            } else {
                self.splice(child, next_raw);
            }
            idx += 1;
        }
    }

    /// Build the tree node for one raw trivia token: a plain leaf, except
    /// doc comments, which expand into their parsed composite.
    fn trivia_node(&mut self, raw_index: usize) -> NodeId {
        let token = match self.cursor.raw_token(raw_index) {
            Some(token) => token,
            None => return self.builder.composite(SyntaxKind::Error),
        };
        let text = self.cursor.slice(token.range);
        if token.kind == SyntaxKind::DocComment {
            self.parse_doc_comment(text, token.range.start)
        } else {
            self.builder.leaf_str(token.kind, text, token.range)
        }
    }

    // ========================================================================
    // Comment binding
    // ========================================================================

    /// Rebind comments after reinsertion: same-line trailing comments move
    /// into the construct to their left; doc comments and own-line
    /// comments move into the declaration they precede. Pure tree
    /// rewrites; source order of leaves is preserved.
    pub(crate) fn bind_comments(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.builder.children(node).to_vec();
        for child in children {
            if !self.builder.is_leaf(child) && self.builder.kind(child) != SyntaxKind::DocComment {
                self.bind_comments(child);
            }
        }
        self.bind_trailing(node);
        self.bind_leading(node);
    }

    /// `int x; // c` — the comment (plus the non-breaking whitespace before
    /// it) becomes the last child of the field/statement.
    fn bind_trailing(&mut self, node: NodeId) {
        let mut i = 0;
        while i < self.builder.child_count(node) {
            let child = self.builder.children(node)[i];
            let target = match self.trailing_target(child) {
                Some(target) => target,
                None => {
                    i += 1;
                    continue;
                }
            };
            let mut last_comment = None;
            let mut k = i + 1;
            while k < self.builder.child_count(node) {
                let sibling = self.builder.children(node)[k];
                if self.is_linear_whitespace(sibling) {
                    k += 1;
                    continue;
                }
                if self.is_comment(sibling) {
                    last_comment = Some(k);
                    k += 1;
                    continue;
                }
                break;
            }
            if let Some(last) = last_comment {
                for _ in (i + 1)..=last {
                    let moved = self.builder.remove_child(node, i + 1);
                    self.builder.push_child(target, moved);
                }
            }
            i += 1;
        }
    }

    /// The construct a trailing comment after `child` belongs to. An import
    /// list is transparent: the comment lands on its last import.
    fn trailing_target(&self, child: NodeId) -> Option<NodeId> {
        let kind = self.builder.kind(child);
        if binds_trailing(kind) {
            return Some(child);
        }
        if kind == SyntaxKind::ImportList {
            return self
                .builder
                .children(child)
                .iter()
                .rev()
                .copied()
                .find(|&c| self.builder.kind(c) == SyntaxKind::ImportStatement);
        }
        None
    }

    /// Doc comments move into the following member declaration even across
    /// blank lines; ordinary own-line comments only when no blank line
    /// separates them from the declaration.
    fn bind_leading(&mut self, node: NodeId) {
        let mut i = 0;
        while i < self.builder.child_count(node) {
            let child = self.builder.children(node)[i];
            if !self.is_comment(child) {
                i += 1;
                continue;
            }
            let is_doc = self.builder.kind(child) == SyntaxKind::DocComment;
            let mut j = i + 1;
            let mut blank_after = false;
            while j < self.builder.child_count(node) {
                let sibling = self.builder.children(node)[j];
                if self.builder.kind(sibling) != SyntaxKind::Whitespace {
                    break;
                }
                if self
                    .builder
                    .leaf_text(sibling)
                    .is_some_and(|t| t.bytes().filter(|&b| b == b'\n').count() >= 2)
                {
                    blank_after = true;
                }
                j += 1;
            }
            let target = if j < self.builder.child_count(node) {
                self.builder.children(node)[j]
            } else {
                i += 1;
                continue;
            };
            let target_kind = self.builder.kind(target);
            let bindable = if is_doc {
                target_kind.is_member_declaration()
            } else {
                binds_leading(target_kind) && !blank_after && self.on_own_line(node, i)
            };
            if !bindable {
                i += 1;
                continue;
            }
            // Move the comment and the whitespace after it to the front of
            // the declaration, preserving their order.
            let count = j - i;
            for offset in 0..count {
                let moved = self.builder.remove_child(node, i);
                self.builder.insert_child(target, offset, moved);
            }
            // `target` has shifted to index `i`; re-examine from here.
        }
    }

    fn is_comment(&self, node: NodeId) -> bool {
        let kind = self.builder.kind(node);
        kind.is_comment() || kind == SyntaxKind::DocComment
    }

    fn is_linear_whitespace(&self, node: NodeId) -> bool {
        self.builder.kind(node) == SyntaxKind::Whitespace
            && self
                .builder
                .leaf_text(node)
                .is_some_and(|t| !t.contains('\n'))
    }

    /// Whether the child at `i` starts its own line: first in the parent
    /// or preceded by whitespace containing a line break. Leafless
    /// composites (an empty import list) are transparent.
    fn on_own_line(&self, node: NodeId, i: usize) -> bool {
        let mut j = i;
        while j > 0 {
            let prev = self.builder.children(node)[j - 1];
            if self.builder.range(prev).is_none() {
                j -= 1;
                continue;
            }
            return self.builder.kind(prev) == SyntaxKind::Whitespace
                && self
                    .builder
                    .leaf_text(prev)
                    .is_some_and(|t| t.contains('\n'));
        }
        true
    }
}

fn binds_trailing(kind: SyntaxKind) -> bool {
    kind.is_statement() || kind.is_member_declaration() || kind == SyntaxKind::ImportStatement
}

fn binds_leading(kind: SyntaxKind) -> bool {
    kind.is_member_declaration()
        || matches!(
            kind,
            SyntaxKind::DeclarationStatement | SyntaxKind::LocalVariable
        )
}
