//! Expression grammar tests: `>` composition, cast disambiguation, the
//! precedence ladder, and primary extensions.

use javacst_core::{StringInterner, TextRange};
use javacst_parser::{parse, ParseContext};
use javacst_tree::{NodeId, SyntaxKind, SyntaxTree};

fn parse_statement(source: &str) -> SyntaxTree {
    let result = parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::Statement,
        &StringInterner::new(),
    );
    let tree = result.tree.expect("statement did not parse");
    assert_eq!(tree.text(), source, "leaf concatenation diverged");
    tree
}

fn parse_block(source: &str) -> SyntaxTree {
    let result = parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::CodeBlock,
        &StringInterner::new(),
    );
    result.tree.expect("block did not parse")
}

fn count_nodes(tree: &SyntaxTree, kind: SyntaxKind) -> usize {
    tree.preorder(tree.root())
        .filter(|&n| !tree.is_leaf(n) && tree.kind(n) == kind)
        .count()
}

fn count_leaves(tree: &SyntaxTree, kind: SyntaxKind) -> usize {
    tree.preorder(tree.root())
        .filter(|&n| tree.is_leaf(n) && tree.kind(n) == kind)
        .count()
}

fn find_leaf(tree: &SyntaxTree, kind: SyntaxKind) -> Option<NodeId> {
    tree.preorder(tree.root())
        .find(|&n| tree.is_leaf(n) && tree.kind(n) == kind)
}

// ============================================================================
// GT composition
// ============================================================================

#[test]
fn test_nested_generics_close_with_two_gt() {
    let tree = parse_statement("List<List<Integer>> xs;");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::DeclarationStatement);
    assert_eq!(count_leaves(&tree, SyntaxKind::Gt), 2);
    assert_eq!(count_leaves(&tree, SyntaxKind::Shr), 0);
}

#[test]
fn test_shift_composes_one_leaf() {
    let tree = parse_statement("int z = x >> y;");
    let shr = find_leaf(&tree, SyntaxKind::Shr).expect("composed >>");
    assert_eq!(tree.leaf_text(shr), Some(">>"));
    assert_eq!(count_leaves(&tree, SyntaxKind::Gt), 0);
}

#[test]
fn test_unsigned_shift() {
    let tree = parse_statement("long z = x >>> y;");
    let ushr = find_leaf(&tree, SyntaxKind::Ushr).expect("composed >>>");
    assert_eq!(tree.leaf_text(ushr), Some(">>>"));
}

#[test]
fn test_shift_assignment_composed() {
    let tree = parse_statement("x >>= 2;");
    assert_eq!(count_nodes(&tree, SyntaxKind::AssignmentExpr), 1);
    let op = find_leaf(&tree, SyntaxKind::ShrEq).expect("composed >>=");
    assert_eq!(tree.leaf_text(op), Some(">>="));

    let tree = parse_statement("x >>>= 4;");
    assert!(find_leaf(&tree, SyntaxKind::UshrEq).is_some());
}

#[test]
fn test_greater_equal_composed() {
    let tree = parse_statement("boolean b = a >= c;");
    let op = find_leaf(&tree, SyntaxKind::GtEq).expect("composed >=");
    assert_eq!(tree.leaf_text(op), Some(">="));
    assert_eq!(count_nodes(&tree, SyntaxKind::BinaryExpr), 1);
}

#[test]
fn test_gap_keeps_gt_tokens_separate() {
    // A space between the two `>` must not compose a shift.
    let tree = parse_statement("Map<String, List<Integer> > m;");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::DeclarationStatement);
    assert_eq!(count_leaves(&tree, SyntaxKind::Gt), 2);
    assert_eq!(count_leaves(&tree, SyntaxKind::Shr), 0);
}

// ============================================================================
// Cast disambiguation
// ============================================================================

#[test]
fn test_reference_cast() {
    let tree = parse_statement("Object o = (Foo) bar;");
    assert_eq!(count_nodes(&tree, SyntaxKind::CastExpr), 1);
}

#[test]
fn test_paren_value_minus_is_not_a_cast() {
    let tree = parse_statement("int a = (foo) - bar;");
    assert_eq!(count_nodes(&tree, SyntaxKind::CastExpr), 0);
    assert_eq!(count_nodes(&tree, SyntaxKind::ParenExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::BinaryExpr), 1);
}

#[test]
fn test_primitive_cast_allows_sign() {
    let tree = parse_statement("int b = (int) -1;");
    assert_eq!(count_nodes(&tree, SyntaxKind::CastExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::PrefixExpr), 1);
}

#[test]
fn test_abandoned_cast_leaves_no_residue() {
    // The speculative cast over `(x)` is rolled back; the only Type node
    // left is the declaration's own.
    let tree = parse_statement("int a = (x) + y;");
    assert_eq!(count_nodes(&tree, SyntaxKind::CastExpr), 0);
    assert_eq!(count_nodes(&tree, SyntaxKind::Type), 1);
}

// ============================================================================
// Precedence ladder
// ============================================================================

#[test]
fn test_conditional_expression() {
    let tree = parse_statement("int m = a ? b : c;");
    assert_eq!(count_nodes(&tree, SyntaxKind::ConditionalExpr), 1);
}

#[test]
fn test_instanceof_takes_a_type() {
    let tree = parse_statement("boolean t = o instanceof String;");
    let inst = tree
        .preorder(tree.root())
        .find(|&n| tree.kind(n) == SyntaxKind::InstanceofExpr)
        .expect("instanceof");
    assert!(tree
        .children(inst)
        .iter()
        .any(|&c| tree.kind(c) == SyntaxKind::Type));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let tree = parse_statement("int r = a + b * c;");
    // The outer binary is the `+`; the `*` nests inside its right operand.
    let outer = tree
        .preorder(tree.root())
        .find(|&n| tree.kind(n) == SyntaxKind::BinaryExpr)
        .expect("binary");
    let op = tree.children(outer)[1];
    assert_eq!(tree.kind(op), SyntaxKind::Plus);
}

#[test]
fn test_assignment_is_right_associative() {
    let tree = parse_statement("a = b = c;");
    let outer = tree
        .preorder(tree.root())
        .find(|&n| tree.kind(n) == SyntaxKind::AssignmentExpr)
        .expect("assignment");
    let rhs = *tree.children(outer).last().unwrap();
    assert_eq!(tree.kind(rhs), SyntaxKind::AssignmentExpr);
}

// ============================================================================
// Primaries and extensions
// ============================================================================

#[test]
fn test_call_chain() {
    let tree = parse_statement("a.b().c(1, 2);");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::ExpressionStatement);
    assert_eq!(count_nodes(&tree, SyntaxKind::MethodCallExpr), 2);
    assert_eq!(count_nodes(&tree, SyntaxKind::ArgumentList), 2);
}

#[test]
fn test_constructor_invocations() {
    let tree = parse_block("{ this(1); super(); }");
    assert_eq!(count_nodes(&tree, SyntaxKind::MethodCallExpr), 2);
    assert_eq!(count_nodes(&tree, SyntaxKind::ThisExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::SuperExpr), 1);
}

#[test]
fn test_diamond_new() {
    let tree = parse_statement("List<String> xs = new ArrayList<>();");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::DeclarationStatement);
    assert_eq!(count_nodes(&tree, SyntaxKind::NewExpr), 1);
    // Declaration type args plus the diamond.
    assert_eq!(count_nodes(&tree, SyntaxKind::TypeArgumentList), 2);
}

#[test]
fn test_new_array_with_dimension() {
    let tree = parse_statement("int[] a = new int[10];");
    assert_eq!(count_nodes(&tree, SyntaxKind::NewExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::Error), 0);
}

#[test]
fn test_nested_array_initializer() {
    let tree = parse_statement("int[][] a = { {1, 2}, {3} };");
    assert_eq!(count_nodes(&tree, SyntaxKind::ArrayInitializer), 3);
}

#[test]
fn test_anonymous_class() {
    let tree = parse_statement("Runnable r = new Runnable() { public void run() { } };");
    assert_eq!(count_nodes(&tree, SyntaxKind::AnonymousClass), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::Method), 1);
}

#[test]
fn test_qualified_new() {
    let tree = parse_statement("Inner i = outer.new Inner();");
    let new_expr = tree
        .preorder(tree.root())
        .find(|&n| tree.kind(n) == SyntaxKind::NewExpr)
        .expect("new");
    assert_eq!(tree.kind(tree.children(new_expr)[0]), SyntaxKind::ReferenceExpr);
}

#[test]
fn test_class_literals() {
    let tree = parse_statement("Class<?> c = String.class;");
    assert_eq!(count_nodes(&tree, SyntaxKind::ClassLiteralExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::WildcardType), 1);

    let tree = parse_statement("Class<?> c = int.class;");
    assert_eq!(count_nodes(&tree, SyntaxKind::ClassLiteralExpr), 1);
}

#[test]
fn test_explicit_generic_method_call() {
    let tree = parse_statement("x.<String>method(arg);");
    assert_eq!(count_nodes(&tree, SyntaxKind::MethodCallExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::TypeArgumentList), 1);
}

#[test]
fn test_array_access() {
    let tree = parse_statement("int v = grid[i][j];");
    assert_eq!(count_nodes(&tree, SyntaxKind::ArrayAccessExpr), 2);
}

#[test]
fn test_postfix_increment() {
    let tree = parse_block("{ i++; }");
    assert_eq!(count_nodes(&tree, SyntaxKind::PostfixExpr), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::ExpressionStatement), 1);
}

#[test]
fn test_expression_list_statement() {
    let tree = parse_block("{ i = 1, j = 2; }");
    assert_eq!(count_nodes(&tree, SyntaxKind::ExpressionListStatement), 1);
    assert_eq!(count_nodes(&tree, SyntaxKind::AssignmentExpr), 2);
}
