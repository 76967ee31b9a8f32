//! javacst_tree: the untyped concrete-syntax-tree substrate.
//!
//! Nodes live in an arena addressed by [`NodeId`] handles. Builders append
//! children through raw operations that never touch parent links; the
//! finished [`SyntaxTree`] is immutable and reconstructs the original source
//! text exactly by concatenating its leaves in order.

pub mod node;
pub mod syntax_kind;

pub use node::{NodeFlags, NodeId, SyntaxTree, TreeBuilder, TreeMark};
pub use syntax_kind::SyntaxKind;
