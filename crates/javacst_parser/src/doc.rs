//! Doc-comment parsing: re-tokenizes a `/** ... */` comment with the doc
//! sub-lexer and groups the tokens into tag and inline-tag composites.

use javacst_lexer::{DocLexer, Token};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind};

use crate::parser::Parser;

impl<'t> Parser<'t> {
    /// Parse one doc comment's text (including the `/**` and `*/`) into a
    /// `DocComment` composite. `base` is the comment's absolute offset.
    pub(crate) fn parse_doc_comment(&mut self, text: &str, base: u32) -> NodeId {
        let mut lexer = DocLexer::new(text, base);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }

        let comment = self.builder.composite(SyntaxKind::DocComment);
        // The open block tag, if any; description tokens before the first
        // block tag land directly under the comment.
        let mut tag: Option<NodeId> = None;
        // Set right after `@param`: the next data token is the parameter
        // name and gets its own reference node.
        let mut pending_param = false;

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            match token.kind {
                SyntaxKind::DocTagName => {
                    let node = self.builder.composite(SyntaxKind::DocTag);
                    let name = self.doc_leaf(token, text, base);
                    self.builder.push_child(node, name);
                    self.builder.push_child(comment, node);
                    pending_param = self.doc_token_text(token, text, base) == "@param";
                    tag = Some(node);
                }
                SyntaxKind::DocInlineTagStart => {
                    let parent = tag.unwrap_or(comment);
                    i = self.parse_inline_tag(&tokens, i, text, base, parent);
                    continue;
                }
                SyntaxKind::DocCommentEnd => {
                    let leaf = self.doc_leaf(token, text, base);
                    self.builder.push_child(comment, leaf);
                    tag = None;
                }
                SyntaxKind::DocCommentData if pending_param => {
                    let parent = tag.unwrap_or(comment);
                    let reference = self.builder.composite(SyntaxKind::DocParameterRef);
                    let leaf = self.doc_leaf(token, text, base);
                    self.builder.push_child(reference, leaf);
                    self.builder.push_child(parent, reference);
                    pending_param = false;
                }
                _ => {
                    let parent = tag.unwrap_or(comment);
                    let leaf = self.doc_leaf(token, text, base);
                    self.builder.push_child(parent, leaf);
                }
            }
            i += 1;
        }
        comment
    }

    /// Group tokens from a `DocInlineTagStart` up to its matching end into
    /// a `DocInlineTag` under `parent`. Returns the index just past the
    /// consumed tokens.
    fn parse_inline_tag(
        &mut self,
        tokens: &[Token],
        start: usize,
        text: &str,
        base: u32,
        parent: NodeId,
    ) -> usize {
        let node = self.builder.composite(SyntaxKind::DocInlineTag);
        self.builder.push_child(parent, node);
        let mut i = start;
        while i < tokens.len() {
            let token = tokens[i];
            match token.kind {
                SyntaxKind::DocInlineTagEnd => {
                    let leaf = self.doc_leaf(token, text, base);
                    self.builder.push_child(node, leaf);
                    return i + 1;
                }
                SyntaxKind::DocCommentEnd => {
                    // Unclosed inline tag; the comment closer stays outside.
                    self.builder.add_flags(node, NodeFlags::UNCLOSED);
                    return i;
                }
                _ => {
                    let leaf = self.doc_leaf(token, text, base);
                    self.builder.push_child(node, leaf);
                    i += 1;
                }
            }
        }
        self.builder.add_flags(node, NodeFlags::UNCLOSED);
        i
    }

    fn doc_token_text<'a>(&self, token: Token, text: &'a str, base: u32) -> &'a str {
        let start = (token.range.start - base) as usize;
        let end = (token.range.end - base) as usize;
        &text[start..end]
    }

    fn doc_leaf(&mut self, token: Token, text: &str, base: u32) -> NodeId {
        let slice = {
            let start = (token.range.start - base) as usize;
            let end = (token.range.end - base) as usize;
            &text[start..end]
        };
        self.builder.leaf_str(token.kind, slice, token.range)
    }
}
