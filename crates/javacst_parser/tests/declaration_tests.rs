//! File- and class-level structure tests: packages, imports, class headers,
//! members, enums, annotations, and the fragment entry points.

use javacst_core::{StringInterner, TextRange};
use javacst_parser::{parse, parse_file, ParseContext};
use javacst_tree::{NodeId, SyntaxKind, SyntaxTree};

fn parse_source(source: &str) -> SyntaxTree {
    let result = parse_file(source, &StringInterner::new());
    let tree = result.tree.expect("file parses always produce a tree");
    assert_eq!(tree.text(), source, "leaf concatenation diverged");
    tree
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

fn child_kinds(tree: &SyntaxTree, node: NodeId) -> Vec<SyntaxKind> {
    tree.children(node).iter().map(|&c| tree.kind(c)).collect()
}

// ============================================================================
// File scope
// ============================================================================

#[test]
fn test_package_and_imports() {
    let tree = parse_source(
        "package com.example;\n\nimport java.util.List;\nimport static java.util.Arrays.*;\n\nclass A { }\n",
    );
    assert_eq!(tree.kind(tree.root()), SyntaxKind::JavaFile);
    assert_eq!(count(&tree, SyntaxKind::PackageStatement), 1);
    assert_eq!(count(&tree, SyntaxKind::ImportStatement), 2);

    let imports = find(&tree, SyntaxKind::ImportList).expect("import list");
    let on_demand = *tree
        .children(imports)
        .iter()
        .filter(|&&c| tree.kind(c) == SyntaxKind::ImportStatement)
        .nth(1)
        .expect("second import");
    let kinds = child_kinds(&tree, on_demand);
    assert!(kinds.contains(&SyntaxKind::StaticKeyword));
    assert!(kinds.contains(&SyntaxKind::Star));
}

#[test]
fn test_annotated_package() {
    let tree = parse_source("@Deprecated package p;\n");
    let pkg = find(&tree, SyntaxKind::PackageStatement).expect("package");
    let modifiers = tree.children(pkg)[0];
    assert_eq!(tree.kind(modifiers), SyntaxKind::ModifierList);
    assert_eq!(count(&tree, SyntaxKind::Annotation), 1);
}

#[test]
fn test_import_after_declaration_still_parses() {
    let tree = parse_source("class A { }\nimport java.util.List;\n");
    assert_eq!(count(&tree, SyntaxKind::ImportStatement), 1);
}

// ============================================================================
// Class headers and members
// ============================================================================

#[test]
fn test_full_class_header() {
    let tree = parse_source(
        "public final class A<T extends Number> extends Base implements I1, I2 { }",
    );
    let class = find(&tree, SyntaxKind::Class).expect("class");
    let kinds = child_kinds(&tree, class);
    assert!(kinds.contains(&SyntaxKind::TypeParameterList));
    assert!(kinds.contains(&SyntaxKind::ExtendsList));
    assert!(kinds.contains(&SyntaxKind::ImplementsList));
    assert_eq!(count(&tree, SyntaxKind::TypeParameter), 1);
}

#[test]
fn test_constructor_has_no_type_slot() {
    let tree = parse_source("class A { A(int x) { } void m() { } }");
    let methods: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&n| tree.kind(n) == SyntaxKind::Method)
        .collect();
    assert_eq!(methods.len(), 2);
    assert!(!child_kinds(&tree, methods[0]).contains(&SyntaxKind::Type));
    assert!(child_kinds(&tree, methods[1]).contains(&SyntaxKind::Type));
}

#[test]
fn test_generic_method() {
    let tree = parse_source("class A { <T> T id(T x) { return x; } }");
    let method = find(&tree, SyntaxKind::Method).expect("method");
    let kinds = child_kinds(&tree, method);
    assert!(kinds.contains(&SyntaxKind::TypeParameterList));
    assert!(kinds.contains(&SyntaxKind::Type));
    assert!(kinds.contains(&SyntaxKind::ParameterList));
}

#[test]
fn test_multi_declarator_field_is_one_node() {
    let tree = parse_source("class A { int a = 1, b, c[] = {}; }");
    assert_eq!(count(&tree, SyntaxKind::Field), 1);
    assert_eq!(count(&tree, SyntaxKind::ArrayInitializer), 1);
}

#[test]
fn test_interface_member_without_body() {
    let result = parse_file("interface I { void m(); }", &StringInterner::new());
    assert!(result.diagnostics.is_empty());
    let tree = result.tree.expect("tree");
    assert_eq!(count(&tree, SyntaxKind::Method), 1);
}

#[test]
fn test_varargs_parameter() {
    let tree = parse_source("class A { void log(String fmt, Object... args) { } }");
    let params = find(&tree, SyntaxKind::ParameterList).expect("params");
    assert_eq!(count(&tree, SyntaxKind::Parameter), 2);
    assert!(tree
        .preorder(params)
        .any(|n| tree.is_leaf(n) && tree.kind(n) == SyntaxKind::Ellipsis));
}

#[test]
fn test_throws_clause_and_initializer_block() {
    let tree = parse_source("class A { static { setup(); } void m() throws IOException { } }");
    assert_eq!(count(&tree, SyntaxKind::ClassInitializer), 1);
    assert_eq!(count(&tree, SyntaxKind::ThrowsList), 1);
}

#[test]
fn test_stray_semicolons_are_tolerated() {
    let result = parse_file("class A { ; int x; ; }", &StringInterner::new());
    assert!(result.diagnostics.is_empty());
}

// ============================================================================
// Enums and annotation interfaces
// ============================================================================

#[test]
fn test_enum_body() {
    let tree = parse_source("enum E { A, B(1), C { void m() { } }; int f; }");
    assert_eq!(count(&tree, SyntaxKind::EnumConstant), 3);
    assert_eq!(count(&tree, SyntaxKind::ArgumentList), 1);
    assert_eq!(count(&tree, SyntaxKind::AnonymousClass), 1);
    assert_eq!(count(&tree, SyntaxKind::Field), 1);
}

#[test]
fn test_annotation_interface() {
    let tree = parse_source("@interface Marker { String value() default \"\"; }");
    let class = find(&tree, SyntaxKind::Class).expect("annotation type");
    assert!(child_kinds(&tree, class).contains(&SyntaxKind::At));
    let method = find(&tree, SyntaxKind::Method).expect("member");
    assert!(child_kinds(&tree, method).contains(&SyntaxKind::DefaultKeyword));
}

#[test]
fn test_annotation_with_parameters() {
    let tree = parse_source("class A { @Name(value = 1, flag = true) void m() { } }");
    assert_eq!(count(&tree, SyntaxKind::Annotation), 1);
    assert_eq!(count(&tree, SyntaxKind::NameValuePair), 2);
}

// ============================================================================
// Fragment entry points
// ============================================================================

fn parse_as(source: &str, context: ParseContext) -> Option<SyntaxTree> {
    parse(
        source,
        TextRange::new(0, source.len() as u32),
        context,
        &StringInterner::new(),
    )
    .tree
}

#[test]
fn test_class_body_fragment() {
    let tree = parse_as("int x; void m() { }", ParseContext::ClassBody).expect("fragment");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::Fragment);
    assert_eq!(count(&tree, SyntaxKind::Field), 1);
    assert_eq!(count(&tree, SyntaxKind::Method), 1);
    assert_eq!(tree.text(), "int x; void m() { }");
}

#[test]
fn test_single_declaration_fragment() {
    let tree = parse_as("private int count;", ParseContext::Declaration).expect("declaration");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::Field);
}

#[test]
fn test_parameter_fragment() {
    let tree = parse_as("final String... args", ParseContext::Parameter).expect("parameter");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::Parameter);
}

#[test]
fn test_type_parameter_fragment() {
    let tree = parse_as("T extends Number", ParseContext::TypeParameter).expect("type parameter");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::TypeParameter);
}

#[test]
fn test_annotation_member_value_fragment() {
    let tree = parse_as("{1, 2}", ParseContext::AnnotationMemberValue).expect("value");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::ArrayInitializer);
}

#[test]
fn test_catch_clause_fragment() {
    let tree = parse_as("catch (Exception e) { }", ParseContext::CatchClause).expect("clause");
    assert_eq!(tree.kind(tree.root()), SyntaxKind::CatchClause);
}

#[test]
fn test_no_match_yields_no_tree() {
    assert!(parse_as(")", ParseContext::Statement).is_none());
    assert!(parse_as("class", ParseContext::Parameter).is_none());
    assert!(parse_as("finally { }", ParseContext::CatchClause).is_none());
}
