//! javacst_parser: the hand-written recursive-descent Java CST parser.
//!
//! [`parse`] takes a source buffer, a sub-range, and a [`ParseContext`]
//! selecting the entry production, and returns a lossless concrete syntax
//! tree: every byte of the range maps to exactly one leaf, comments and
//! whitespace included, and arbitrary broken input still yields a complete
//! tree with error nodes in place of the damage. Nothing is ever thrown.
//!
//! Method bodies are recorded lazily by default (a single unparsed-text
//! leaf); [`expand_lazy_block`] re-parses one on demand.

mod decl;
mod doc;
mod expr;
mod file;
mod parser;
mod refs;
mod stmt;
mod trivia;

use javacst_core::intern::StringInterner;
use javacst_core::text::TextRange;
use javacst_diagnostics::DiagnosticCollection;
use javacst_lexer::{lex, TokenCursor};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind, SyntaxTree};

use crate::decl::DeclContext;
use crate::parser::Parser;

pub use javacst_diagnostics::Diagnostic;

/// The entry production a parse call starts from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParseContext {
    /// A whole compilation unit.
    File,
    /// The member sequence of a class body, without the braces.
    ClassBody,
    /// The member sequence of an annotation interface body.
    AnnotationBody,
    /// A code block: `{ ... }`, or a brace-less statement sequence.
    CodeBlock,
    /// A single annotation member value (expression, annotation, or array
    /// initializer).
    AnnotationMemberValue,
    /// A single member declaration.
    Declaration,
    /// A single method parameter.
    Parameter,
    /// A single type parameter (`T extends Bound`).
    TypeParameter,
    /// A single statement.
    Statement,
    /// A single `catch (...) { ... }` clause.
    CatchClause,
}

#[derive(Debug, Copy, Clone)]
pub struct ParseOptions {
    /// Record method bodies as lazy unparsed spans instead of parsing
    /// their statements eagerly.
    pub lazy_blocks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { lazy_blocks: true }
    }
}

/// The outcome of one parse call. `tree` is `None` only when the input
/// does not begin with a construct of the requested kind at all ("no
/// match", not an error); any syntax problems inside a matched construct
/// are embedded in the tree and listed in `diagnostics`.
pub struct ParseResult {
    pub tree: Option<SyntaxTree>,
    pub diagnostics: DiagnosticCollection,
}

pub fn parse(
    source: &str,
    range: TextRange,
    context: ParseContext,
    interner: &StringInterner,
) -> ParseResult {
    parse_with_options(source, range, context, interner, ParseOptions::default())
}

/// Parse a whole source buffer as a compilation unit.
pub fn parse_file(source: &str, interner: &StringInterner) -> ParseResult {
    parse(
        source,
        TextRange::new(0, source.len() as u32),
        ParseContext::File,
        interner,
    )
}

pub fn parse_with_options(
    source: &str,
    range: TextRange,
    context: ParseContext,
    interner: &StringInterner,
    options: ParseOptions,
) -> ParseResult {
    let (tokens, mut diagnostics) = lex(source, range);
    let cursor = TokenCursor::new(&tokens, source);
    let mut parser = Parser::new(cursor, interner, options);

    let root = parse_root(&mut parser, context);
    match root {
        Some(root) => {
            // Full-input contexts own every byte of the range; single-
            // construct contexts stop at their construct's last token.
            let to_end = matches!(
                context,
                ParseContext::File
                    | ParseContext::ClassBody
                    | ParseContext::AnnotationBody
                    | ParseContext::CodeBlock
            );
            parser.reinsert_trivia(root, to_end);
            parser.bind_comments(root);
            diagnostics.extend(parser.diagnostics);
            ParseResult {
                tree: Some(parser.builder.finish(root)),
                diagnostics,
            }
        }
        None => {
            diagnostics.extend(parser.diagnostics);
            ParseResult {
                tree: None,
                diagnostics,
            }
        }
    }
}

fn parse_root(parser: &mut Parser<'_>, context: ParseContext) -> Option<NodeId> {
    match context {
        ParseContext::File => Some(parser.parse_file()),
        ParseContext::ClassBody | ParseContext::AnnotationBody => {
            let root = parser.builder.composite(SyntaxKind::Fragment);
            let ctx = if context == ParseContext::ClassBody {
                DeclContext::ClassBody
            } else {
                DeclContext::AnnotationBody
            };
            parser.parse_member_list(root, ctx);
            parser.drain_into(root);
            Some(root)
        }
        ParseContext::CodeBlock => {
            if parser.at(SyntaxKind::LBrace) {
                let block = parser.parse_code_block(true)?;
                parser.drain_into(block);
                Some(block)
            } else {
                let block = parser.builder.composite(SyntaxKind::CodeBlock);
                parser.parse_block_statements(block);
                parser.drain_into(block);
                Some(block)
            }
        }
        ParseContext::AnnotationMemberValue => parser.parse_annotation_member_value(),
        ParseContext::Declaration => parser.parse_declaration(DeclContext::ClassBody),
        ParseContext::Parameter => parser.parse_parameter(true),
        ParseContext::TypeParameter => parser.parse_type_parameter(),
        ParseContext::Statement => parser.parse_statement(),
        ParseContext::CatchClause => {
            if parser.at(SyntaxKind::CatchKeyword) {
                Some(parser.parse_catch_clause())
            } else {
                None
            }
        }
    }
}

/// Re-parse a lazily recorded code block. `block` must be a node of
/// `tree` carrying the lazy flag; the result's root is the fully parsed
/// `CodeBlock` covering the same span. Returns `None` for non-lazy nodes.
pub fn expand_lazy_block(
    tree: &SyntaxTree,
    block: NodeId,
    source: &str,
    interner: &StringInterner,
) -> Option<ParseResult> {
    if !tree.flags(block).contains(NodeFlags::LAZY) {
        return None;
    }
    let range = tree.range(block)?;
    Some(parse_with_options(
        source,
        range,
        ParseContext::CodeBlock,
        interner,
        ParseOptions { lazy_blocks: false },
    ))
}
