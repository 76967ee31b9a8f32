//! Lazy method bodies: placeholder shape, on-demand expansion equivalence,
//! and the early-exit heuristic for unclosed blocks.

use javacst_core::{StringInterner, TextRange};
use javacst_parser::{expand_lazy_block, parse_file, parse_with_options, ParseContext, ParseOptions};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind, SyntaxTree};

fn find_lazy_block(tree: &SyntaxTree) -> Option<NodeId> {
    tree.preorder(tree.root())
        .find(|&n| tree.flags(n).contains(NodeFlags::LAZY))
}

fn parse_eager(source: &str) -> SyntaxTree {
    parse_with_options(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::File,
        &StringInterner::new(),
        ParseOptions { lazy_blocks: false },
    )
    .tree
    .expect("tree")
}

const SOURCE: &str = "class A { void m() { int x = 1; if (x > 0) { x--; } } }";

#[test]
fn test_lazy_body_is_a_single_unparsed_leaf() {
    let tree = parse_file(SOURCE, &StringInterner::new()).tree.expect("tree");
    let block = find_lazy_block(&tree).expect("lazy body");
    assert_eq!(tree.kind(block), SyntaxKind::CodeBlock);
    let children = tree.children(block);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.kind(children[0]), SyntaxKind::UnparsedText);
    assert_eq!(tree.text_of(block), "{ int x = 1; if (x > 0) { x--; } }");
}

#[test]
fn test_eager_mode_has_no_lazy_blocks() {
    let tree = parse_eager(SOURCE);
    assert!(find_lazy_block(&tree).is_none());
}

#[test]
fn test_expansion_matches_eager_parse() {
    let interner = StringInterner::new();
    let lazy_tree = parse_file(SOURCE, &interner).tree.expect("tree");
    let block = find_lazy_block(&lazy_tree).expect("lazy body");

    let expanded = expand_lazy_block(&lazy_tree, block, SOURCE, &interner)
        .expect("lazy node expands")
        .tree
        .expect("tree");

    let eager_tree = parse_eager(SOURCE);
    let eager_block = eager_tree
        .preorder(eager_tree.root())
        .find(|&n| eager_tree.kind(n) == SyntaxKind::CodeBlock)
        .expect("body");

    assert_eq!(
        expanded.dump(expanded.root()),
        eager_tree.dump(eager_block),
        "expanded block diverged from the eager parse"
    );
    assert_eq!(expanded.text(), eager_tree.text_of(eager_block));
}

#[test]
fn test_expanding_non_lazy_node_returns_none() {
    let interner = StringInterner::new();
    let tree = parse_eager(SOURCE);
    let block = tree
        .preorder(tree.root())
        .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
        .expect("body");
    assert!(expand_lazy_block(&tree, block, SOURCE, &interner).is_none());
}

#[test]
fn test_unclosed_body_stops_before_next_member() {
    let source = "class A {\n    void broken() { int a = 1;\n    int other() { return 1; }\n}\n";
    let result = parse_file(source, &StringInterner::new());
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert!(!result.diagnostics.is_empty());

    let methods: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&n| tree.kind(n) == SyntaxKind::Method)
        .collect();
    assert_eq!(methods.len(), 2, "the scanner must not swallow `other`");

    let broken_body = tree
        .preorder(methods[0])
        .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
        .expect("body");
    assert!(tree.flags(broken_body).contains(NodeFlags::UNCLOSED));
    let other_body = tree
        .preorder(methods[1])
        .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
        .expect("body");
    assert!(!tree.flags(other_body).contains(NodeFlags::UNCLOSED));
}
