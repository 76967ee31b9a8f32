//! The arena tree: builder and sealed tree.
//!
//! Construction is bottom-up: children exist before their parent, raw
//! append/insert operations wire them up, and a composite's kind can be
//! rewritten after the fact (promoting a parsed reference into a `this`
//! expression, say). No parent links exist at any point; consumers walk
//! downward from the root.

use bitflags::bitflags;
use javacst_core::intern::{Istr, StringInterner};
use javacst_core::text::TextRange;
use rustc_hash::FxHashMap;

use crate::syntax_kind::SyntaxKind;

/// Handle to a node in the arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Structural flags on composites.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct NodeFlags: u8 {
        /// The construct's terminator (`}`, `)`, `"`) was never found;
        /// the span is approximate.
        const UNCLOSED = 1 << 0;
        /// A lazily parsed block: the single child is an `UnparsedText`
        /// leaf covering the raw span.
        const LAZY = 1 << 1;
        /// The construct is syntactically incomplete (e.g. a reference
        /// ending in a dangling dot).
        const INCOMPLETE = 1 << 2;
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Leaf {
        kind: SyntaxKind,
        text: Istr,
        range: TextRange,
    },
    Composite {
        kind: SyntaxKind,
        children: Vec<NodeId>,
        flags: NodeFlags,
    },
}

/// A restorable capture of the arena's high-water mark. Truncating back to
/// a mark discards every node created after it, which is how a rolled-back
/// speculative parse leaves no trace in the final tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TreeMark(u32);

/// Mutable tree under construction.
///
/// Contract for backtracking purity: nodes created after a [`TreeMark`]
/// must only ever be attached to other nodes created after that mark, so
/// that `truncate` cannot leave a dangling child handle behind.
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    messages: FxHashMap<NodeId, Box<str>>,
    interner: StringInterner,
}

impl TreeBuilder {
    pub fn new(interner: StringInterner) -> Self {
        Self {
            nodes: Vec::new(),
            messages: FxHashMap::default(),
            interner,
        }
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Create a leaf wrapping one token's interned text.
    pub fn leaf(&mut self, kind: SyntaxKind, text: Istr, range: TextRange) -> NodeId {
        self.push(NodeData::Leaf { kind, text, range })
    }

    /// Create a leaf, interning the text.
    pub fn leaf_str(&mut self, kind: SyntaxKind, text: &str, range: TextRange) -> NodeId {
        let text = self.interner.intern(text);
        self.leaf(kind, text, range)
    }

    /// Create an empty composite. Children are appended afterwards.
    pub fn composite(&mut self, kind: SyntaxKind) -> NodeId {
        self.push(NodeData::Composite {
            kind,
            children: Vec::new(),
            flags: NodeFlags::empty(),
        })
    }

    /// Create an error composite carrying a diagnostic message.
    pub fn error(&mut self, message: String) -> NodeId {
        let id = self.composite(SyntaxKind::Error);
        self.messages.insert(id, message.into_boxed_str());
        id
    }

    /// Append a child to a composite.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.index()] {
            NodeData::Composite { children, .. } => children.push(child),
            NodeData::Leaf { .. } => panic!("push_child on a leaf"),
        }
    }

    /// Insert a child at an index.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        match &mut self.nodes[parent.index()] {
            NodeData::Composite { children, .. } => children.insert(index, child),
            NodeData::Leaf { .. } => panic!("insert_child on a leaf"),
        }
    }

    /// Remove and return the child at an index.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        match &mut self.nodes[parent.index()] {
            NodeData::Composite { children, .. } => children.remove(index),
            NodeData::Leaf { .. } => panic!("remove_child on a leaf"),
        }
    }

    /// Rewrite a composite's kind after its children are attached.
    pub fn set_kind(&mut self, node: NodeId, new_kind: SyntaxKind) {
        match &mut self.nodes[node.index()] {
            NodeData::Composite { kind, .. } => *kind = new_kind,
            NodeData::Leaf { kind, .. } => *kind = new_kind,
        }
    }

    pub fn add_flags(&mut self, node: NodeId, add: NodeFlags) {
        if let NodeData::Composite { flags, .. } = &mut self.nodes[node.index()] {
            *flags |= add;
        }
    }

    pub fn kind(&self, node: NodeId) -> SyntaxKind {
        match &self.nodes[node.index()] {
            NodeData::Leaf { kind, .. } => *kind,
            NodeData::Composite { kind, .. } => *kind,
        }
    }

    /// The leaf's own text; `None` for composites.
    pub fn leaf_text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.index()] {
            NodeData::Leaf { text, .. } => Some(self.interner.resolve(*text)),
            NodeData::Composite { .. } => None,
        }
    }

    pub fn flags(&self, node: NodeId) -> NodeFlags {
        match &self.nodes[node.index()] {
            NodeData::Composite { flags, .. } => *flags,
            NodeData::Leaf { .. } => NodeFlags::empty(),
        }
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.index()], NodeData::Leaf { .. })
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match &self.nodes[node.index()] {
            NodeData::Composite { children, .. } => children,
            NodeData::Leaf { .. } => &[],
        }
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// The source range covered by the node's leaves, or `None` for a
    /// composite with no leaves under it.
    pub fn range(&self, node: NodeId) -> Option<TextRange> {
        match &self.nodes[node.index()] {
            NodeData::Leaf { range, .. } => Some(*range),
            NodeData::Composite { children, .. } => {
                let mut acc: Option<TextRange> = None;
                for &child in children {
                    if let Some(r) = self.range(child) {
                        acc = Some(match acc {
                            Some(a) => a.union(r),
                            None => r,
                        });
                    }
                }
                acc
            }
        }
    }

    /// Arena high-water mark for speculative parsing.
    #[inline]
    pub fn mark(&self) -> TreeMark {
        TreeMark(self.nodes.len() as u32)
    }

    /// Discard every node created after the mark.
    pub fn truncate(&mut self, mark: TreeMark) {
        let len = mark.0 as usize;
        if self.nodes.len() > len {
            self.messages.retain(|id, _| id.index() < len);
            self.nodes.truncate(len);
        }
    }

    /// Seal the tree. The builder's bookkeeping is consumed; the result is
    /// immutable.
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            messages: self.messages,
            interner: self.interner,
            root,
        }
    }
}

/// The finished, immutable tree handed to the caller.
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    messages: FxHashMap<NodeId, Box<str>>,
    interner: StringInterner,
    root: NodeId,
}

impl SyntaxTree {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn kind(&self, node: NodeId) -> SyntaxKind {
        match &self.nodes[node.index()] {
            NodeData::Leaf { kind, .. } => *kind,
            NodeData::Composite { kind, .. } => *kind,
        }
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.index()], NodeData::Leaf { .. })
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match &self.nodes[node.index()] {
            NodeData::Composite { children, .. } => children,
            NodeData::Leaf { .. } => &[],
        }
    }

    pub fn flags(&self, node: NodeId) -> NodeFlags {
        match &self.nodes[node.index()] {
            NodeData::Composite { flags, .. } => *flags,
            NodeData::Leaf { .. } => NodeFlags::empty(),
        }
    }

    /// The diagnostic message of an error node.
    pub fn error_message(&self, node: NodeId) -> Option<&str> {
        self.messages.get(&node).map(|m| &**m)
    }

    /// The leaf's own text.
    pub fn leaf_text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.index()] {
            NodeData::Leaf { text, .. } => Some(self.interner.resolve(*text)),
            NodeData::Composite { .. } => None,
        }
    }

    /// The source range covered by the node's leaves.
    pub fn range(&self, node: NodeId) -> Option<TextRange> {
        match &self.nodes[node.index()] {
            NodeData::Leaf { range, .. } => Some(*range),
            NodeData::Composite { children, .. } => {
                let mut acc: Option<TextRange> = None;
                for &child in children {
                    if let Some(r) = self.range(child) {
                        acc = Some(match acc {
                            Some(a) => a.union(r),
                            None => r,
                        });
                    }
                }
                acc
            }
        }
    }

    /// Append the node's exact source text (in-order leaf concatenation).
    pub fn write_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.index()] {
            NodeData::Leaf { text, .. } => out.push_str(self.interner.resolve(*text)),
            NodeData::Composite { children, .. } => {
                for &child in children {
                    self.write_text(child, out);
                }
            }
        }
    }

    /// The node's exact source text.
    pub fn text_of(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    /// The whole tree's text; for a well-formed parse this reproduces the
    /// parsed input byte for byte.
    pub fn text(&self) -> String {
        self.text_of(self.root)
    }

    /// Preorder traversal from a node.
    pub fn preorder(&self, from: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![from],
        }
    }

    /// First leaf under a node, in source order.
    pub fn first_leaf(&self, node: NodeId) -> Option<NodeId> {
        if self.is_leaf(node) {
            return Some(node);
        }
        self.children(node)
            .iter()
            .find_map(|&c| self.first_leaf(c))
    }

    /// Last leaf under a node, in source order.
    pub fn last_leaf(&self, node: NodeId) -> Option<NodeId> {
        if self.is_leaf(node) {
            return Some(node);
        }
        self.children(node)
            .iter()
            .rev()
            .find_map(|&c| self.last_leaf(c))
    }

    /// Indented structural dump of composite kinds (leaves elided), useful
    /// for comparing tree shapes in tests.
    pub fn dump(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(node, 0, &mut out);
        out
    }

    fn dump_into(&self, node: NodeId, depth: usize, out: &mut String) {
        match &self.nodes[node.index()] {
            NodeData::Leaf { kind, .. } => {
                if !kind.is_trivia() {
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(&format!("{:?} {:?}\n", kind, self.leaf_text(node).unwrap()));
                }
            }
            NodeData::Composite { kind, children, flags } => {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&format!("{:?}", kind));
                if !flags.is_empty() {
                    out.push_str(&format!(" {:?}", flags));
                }
                out.push('\n');
                for &child in children {
                    self.dump_into(child, depth + 1, out);
                }
            }
        }
    }
}

/// Preorder node iterator.
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        for &child in self.tree.children(node).iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TreeBuilder {
        TreeBuilder::new(StringInterner::new())
    }

    #[test]
    fn leaf_text_round_trip() {
        let mut b = builder();
        let root = b.composite(SyntaxKind::ExpressionStatement);
        let a = b.leaf_str(SyntaxKind::Identifier, "a", TextRange::new(0, 1));
        let plus = b.leaf_str(SyntaxKind::Plus, "+", TextRange::new(1, 2));
        let c = b.leaf_str(SyntaxKind::Identifier, "b", TextRange::new(2, 3));
        b.push_child(root, a);
        b.push_child(root, plus);
        b.push_child(root, c);
        let tree = b.finish(root);
        assert_eq!(tree.text(), "a+b");
        assert_eq!(tree.range(root), Some(TextRange::new(0, 3)));
    }

    #[test]
    fn kind_rewrite_after_children() {
        let mut b = builder();
        let node = b.composite(SyntaxKind::JavaCodeReference);
        let this = b.leaf_str(SyntaxKind::ThisKeyword, "this", TextRange::new(0, 4));
        b.push_child(node, this);
        b.set_kind(node, SyntaxKind::ThisExpr);
        assert_eq!(b.kind(node), SyntaxKind::ThisExpr);
    }

    #[test]
    fn truncate_discards_speculative_nodes() {
        let mut b = builder();
        let root = b.composite(SyntaxKind::CodeBlock);
        let mark = b.mark();
        let cast = b.composite(SyntaxKind::CastExpr);
        let err = b.error("speculative".to_string());
        b.push_child(cast, err);
        b.truncate(mark);
        // Only the root survives.
        let leaf = b.leaf_str(SyntaxKind::Semicolon, ";", TextRange::new(0, 1));
        b.push_child(root, leaf);
        let tree = b.finish(root);
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.preorder(tree.root()).count(), 2);
    }

    #[test]
    fn error_node_carries_message() {
        let mut b = builder();
        let err = b.error("';' expected".to_string());
        let tree = b.finish(err);
        assert_eq!(tree.kind(tree.root()), SyntaxKind::Error);
        assert_eq!(tree.error_message(tree.root()), Some("';' expected"));
    }

    #[test]
    fn insert_and_remove_child() {
        let mut b = builder();
        let root = b.composite(SyntaxKind::CodeBlock);
        let x = b.leaf_str(SyntaxKind::Identifier, "x", TextRange::new(0, 1));
        let y = b.leaf_str(SyntaxKind::Identifier, "y", TextRange::new(1, 2));
        b.push_child(root, y);
        b.insert_child(root, 0, x);
        assert_eq!(b.children(root), &[x, y]);
        let removed = b.remove_child(root, 1);
        assert_eq!(removed, y);
    }
}
