//! Error recovery tests: damage stays local, junk runs are grouped, and
//! unfinished constructs are flagged rather than dropped.

use javacst_core::{StringInterner, TextRange};
use javacst_parser::{parse, parse_file, ParseContext, ParseResult};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind, SyntaxTree};

fn parse_source(source: &str) -> ParseResult {
    parse_file(source, &StringInterner::new())
}

fn count(tree: &SyntaxTree, kind: SyntaxKind) -> usize {
    tree.preorder(tree.root())
        .filter(|&n| !tree.is_leaf(n) && tree.kind(n) == kind)
        .count()
}

fn find(tree: &SyntaxTree, kind: SyntaxKind) -> Option<NodeId> {
    tree.preorder(tree.root())
        .find(|&n| !tree.is_leaf(n) && tree.kind(n) == kind)
}

// ============================================================================
// Locality
// ============================================================================

#[test]
fn test_bad_field_does_not_damage_next_member() {
    let source = "class A {\n    int x+;\n\n    void good() { }\n}\n";
    let result = parse_source(source);
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert_eq!(result.diagnostics.len(), 1);

    let field = find(&tree, SyntaxKind::Field).expect("field");
    assert!(tree.flags(field).contains(NodeFlags::INCOMPLETE));

    // The following method parses clean: no error node inside it.
    let method = find(&tree, SyntaxKind::Method).expect("method");
    assert!(tree
        .preorder(method)
        .all(|n| tree.kind(n) != SyntaxKind::Error));
}

#[test]
fn test_junk_run_groups_under_one_error_node() {
    let source = "class A { } ??? )(";
    let result = parse_source(source);
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert_eq!(count(&tree, SyntaxKind::Error), 1);
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_recovery_resumes_at_next_declaration() {
    // The junk scan after `int x +` must hand control back at the start
    // of the field on the next line instead of swallowing it.
    let source = "class A {\n    int x +\n    int y;\n}\n";
    let result = parse_source(source);
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert_eq!(result.diagnostics.len(), 1);

    let fields: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&n| !tree.is_leaf(n) && tree.kind(n) == SyntaxKind::Field)
        .collect();
    assert_eq!(fields.len(), 2);
    assert!(tree.flags(fields[0]).contains(NodeFlags::INCOMPLETE));
    assert!(tree
        .preorder(fields[1])
        .all(|n| tree.kind(n) != SyntaxKind::Error));
}

#[test]
fn test_recovery_error_node_stops_at_blank_line() {
    let source = "class A {\n    int x @@\n\n    int y;\n}\n";
    let result = parse_source(source);
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);

    let fields: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&n| !tree.is_leaf(n) && tree.kind(n) == SyntaxKind::Field)
        .collect();
    assert_eq!(fields.len(), 2);
    // The fenced scan keeps the damage on the bad line.
    assert_eq!(tree.text_of(fields[0]), "int x @@");
    assert!(tree
        .preorder(fields[1])
        .all(|n| tree.kind(n) != SyntaxKind::Error));
}

#[test]
fn test_dangling_dot_reports_once() {
    let source = "a.;";
    let result = parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::Statement,
        &StringInterner::new(),
    );
    let tree = result.tree.expect("statement");
    assert_eq!(tree.text(), source);
    // The speculative attempts that were rolled back must not leave
    // duplicate reports behind.
    assert_eq!(result.diagnostics.len(), 1);
    let reference = find(&tree, SyntaxKind::ReferenceExpr).expect("reference");
    assert!(tree.flags(reference).contains(NodeFlags::INCOMPLETE));
}

// ============================================================================
// Unclosed constructs
// ============================================================================

#[test]
fn test_unclosed_class_is_flagged() {
    let result = parse_source("class A { int x;");
    let tree = result.tree.expect("tree");
    let class = find(&tree, SyntaxKind::Class).expect("class");
    assert!(tree.flags(class).contains(NodeFlags::UNCLOSED));
    assert!(!result.diagnostics.is_empty());
}

#[test]
fn test_unclosed_argument_list_stops_at_semicolon() {
    let source = "{ call(a, b; }";
    let result = parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::CodeBlock,
        &StringInterner::new(),
    );
    let tree = result.tree.expect("block");
    assert_eq!(tree.text(), source);
    let args = find(&tree, SyntaxKind::ArgumentList).expect("arguments");
    assert!(tree.flags(args).contains(NodeFlags::UNCLOSED));
    // The block itself still found its `}`.
    assert!(!tree.flags(tree.root()).contains(NodeFlags::UNCLOSED));
}

#[test]
fn test_method_without_body_is_incomplete() {
    let result = parse_source("class A { void m() }");
    let tree = result.tree.expect("tree");
    let method = find(&tree, SyntaxKind::Method).expect("method");
    assert!(tree.flags(method).contains(NodeFlags::INCOMPLETE));
    // The class still closes.
    let class = find(&tree, SyntaxKind::Class).expect("class");
    assert!(!tree.flags(class).contains(NodeFlags::UNCLOSED));
}

#[test]
fn test_missing_condition_paren() {
    let source = "{ if (x { a(); } }";
    let result = parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::CodeBlock,
        &StringInterner::new(),
    );
    let tree = result.tree.expect("block");
    assert_eq!(tree.text(), source);
    assert_eq!(count(&tree, SyntaxKind::IfStatement), 1);
    assert!(!result.diagnostics.is_empty());
}

// ============================================================================
// Error nodes carry their message
// ============================================================================

#[test]
fn test_error_node_message_text() {
    let result = parse_source("class A { int x+; }");
    let tree = result.tree.expect("tree");
    let err = find(&tree, SyntaxKind::Error).expect("error node");
    assert_eq!(tree.error_message(err), Some("';' expected"));
}
