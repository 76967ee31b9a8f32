//! Full-fidelity and totality tests.
//!
//! Every parse, of well-formed or arbitrarily broken input, must produce a
//! tree whose in-order leaf concatenation reproduces the input byte for
//! byte, and must terminate.

use javacst_core::StringInterner;
use javacst_parser::parse_file;
use javacst_tree::SyntaxTree;

fn parse(source: &str) -> SyntaxTree {
    let result = parse_file(source, &StringInterner::new());
    result.tree.expect("file parses always produce a tree")
}

fn assert_round_trip(source: &str) {
    let tree = parse(source);
    assert_eq!(tree.text(), source, "leaf concatenation diverged");
}

// ============================================================================
// Well-formed input
// ============================================================================

#[test]
fn test_round_trip_small_class() {
    assert_round_trip("class A { int x; }");
}

#[test]
fn test_round_trip_full_file() {
    assert_round_trip(
        r#"package com.example.app;

import java.util.List;
import java.util.Map;
import static java.util.Collections.emptyList;

/**
 * A sample entry point.
 * @param none
 */
public final class App<T extends Comparable<T>> extends Base implements Runnable {
    private static final String GREETING = "hello, world";
    private Map<String, List<Integer>> index; // per-key positions

    public App(int seed) {
        this.seed = seed;
    }

    @Override
    public void run() {
        int total = 0;
        for (int i = 0; i < 10; i++) {
            total += i << 2;
        }
        long masked = total >>> 3;
        Object boxed = (Object) index;
        label:
        while (total > 0) {
            total--;
            if (total == 5) break label;
        }
    }
}
"#,
    );
}

#[test]
fn test_round_trip_preserves_comments_and_tabs() {
    assert_round_trip("class A {\n\t/* block */ int x;\t// tail\n}\n");
}

#[test]
fn test_round_trip_enum_and_annotations() {
    assert_round_trip(
        "@interface Marker { String value() default \"\"; }\nenum E { A, B(1), C { void m() { } }; int f; }\n",
    );
}

// ============================================================================
// Broken input: still total, still lossless
// ============================================================================

#[test]
fn test_round_trip_with_syntax_errors() {
    let source = "class A { int x+; void m() { } }";
    let result = parse_file(source, &StringInterner::new());
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert!(!result.diagnostics.is_empty());
}

#[test]
fn test_empty_input() {
    let tree = parse("");
    assert_eq!(tree.text(), "");
}

#[test]
fn test_comment_only_input() {
    assert_round_trip("// nothing here\n");
    assert_round_trip("/* just a comment */");
}

#[test]
fn test_truncated_input_terminates() {
    assert_round_trip("class A { void m( ");
    assert_round_trip("class A { int x = ");
    assert_round_trip("import java.");
}

#[test]
fn test_token_soup_terminates() {
    let source = "]]) >>>= ;; ??? 42 )(";
    let result = parse_file(source, &StringInterner::new());
    let tree = result.tree.expect("tree");
    assert_eq!(tree.text(), source);
    assert!(!result.diagnostics.is_empty());
}

#[test]
fn test_unterminated_string_literal() {
    assert_round_trip("class A { String s = \"open");
}

#[test]
fn test_lazy_bodies_keep_interior_trivia() {
    // The unparsed-text leaf of a lazy body covers its comments too.
    assert_round_trip("class A { void m() { /* inside */ x(); // done\n } }");
}
