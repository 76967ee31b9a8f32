//! Declaration parsing: modifier/annotation lists, classes, interfaces,
//! enums, annotation interfaces, methods, constructors, fields, locals,
//! type parameters.

use javacst_diagnostics::{format_message, messages};
use javacst_tree::{NodeFlags, NodeId, SyntaxKind};

use crate::parser::{ErrorGroup, Parser};

/// The surrounding construct a declaration is parsed in. Drives the
/// constructor check, class initializers, local vs. field classification,
/// and annotation-member defaults.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum DeclContext {
    File,
    ClassBody,
    AnnotationBody,
    CodeBlock,
}

impl<'t> Parser<'t> {
    /// Tentatively parse one declaration. `None` restores the cursor and
    /// leaves no tree residue; it signals a context mismatch (e.g. a bare
    /// identifier at file scope), not an error.
    pub(crate) fn parse_declaration(&mut self, ctx: DeclContext) -> Option<NodeId> {
        let state = self.state();
        let modifiers = self.parse_modifier_list();
        let has_modifiers = self.builder.child_count(modifiers) > 0;

        if self.at_class_keyword() {
            return Some(self.parse_class_declaration(modifiers));
        }

        if self.at(SyntaxKind::LBrace) {
            if matches!(ctx, DeclContext::ClassBody | DeclContext::AnnotationBody) {
                let init = self.builder.composite(SyntaxKind::ClassInitializer);
                self.builder.push_child(init, modifiers);
                if let Some(block) = self.parse_code_block(false) {
                    self.builder.push_child(init, block);
                }
                return Some(init);
            }
            self.rollback(state);
            return None;
        }

        let type_params = if self.at(SyntaxKind::Lt) {
            Some(self.parse_type_parameter_list())
        } else {
            None
        };

        // Constructor: a bare name directly followed by `(`, class bodies
        // only. The name doubles as the "type" slot the grammar would
        // otherwise fill.
        if ctx == DeclContext::ClassBody
            && self.at(SyntaxKind::Identifier)
            && self.lookahead(1) == SyntaxKind::LParen
        {
            let method = self.builder.composite(SyntaxKind::Method);
            self.builder.push_child(method, modifiers);
            if let Some(tp) = type_params {
                self.builder.push_child(method, tp);
            }
            self.bump_into(method); // constructor name
            return Some(self.parse_method_rest(method, ctx));
        }

        let ty = match self.parse_type() {
            Some(ty) => ty,
            None => {
                if !has_modifiers && type_params.is_none() {
                    self.rollback(state);
                    return None;
                }
                let key = match ctx {
                    DeclContext::File => &messages::EXPECTED_CLASS_OR_INTERFACE,
                    _ => &messages::EXPECTED_TYPE,
                };
                self.report(key, &[]);
                let err = self.builder.error(format_message(key.template, &[]));
                self.builder.push_child(err, modifiers);
                if let Some(tp) = type_params {
                    self.builder.push_child(err, tp);
                }
                return Some(err);
            }
        };

        if !self.at(SyntaxKind::Identifier) {
            if !has_modifiers && type_params.is_none() {
                self.rollback(state);
                return None;
            }
            let kind = if ctx == DeclContext::CodeBlock {
                SyntaxKind::LocalVariable
            } else {
                SyntaxKind::Field
            };
            let node = self.builder.composite(kind);
            self.builder.push_child(node, modifiers);
            if let Some(tp) = type_params {
                self.builder.push_child(node, tp);
            }
            self.builder.push_child(node, ty);
            self.error_into(node, &messages::EXPECTED_IDENTIFIER);
            self.builder.add_flags(node, NodeFlags::INCOMPLETE);
            return Some(node);
        }

        if self.lookahead(1) == SyntaxKind::LParen {
            let method = self.builder.composite(SyntaxKind::Method);
            self.builder.push_child(method, modifiers);
            if let Some(tp) = type_params {
                self.builder.push_child(method, tp);
            }
            self.builder.push_child(method, ty);
            self.bump_into(method); // method name
            return Some(self.parse_method_rest(method, ctx));
        }

        let kind = if ctx == DeclContext::CodeBlock {
            SyntaxKind::LocalVariable
        } else {
            SyntaxKind::Field
        };
        let node = self.builder.composite(kind);
        self.builder.push_child(node, modifiers);
        if let Some(tp) = type_params {
            self.builder.push_child(node, tp);
        }
        self.builder.push_child(node, ty);
        self.bump_into(node); // first declarator name
        Some(self.parse_variable_rest(node))
    }

    fn at_class_keyword(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword
        ) || (self.at(SyntaxKind::At) && self.lookahead(1) == SyntaxKind::InterfaceKeyword)
    }

    // ========================================================================
    // Modifiers and annotations
    // ========================================================================

    /// Modifier keywords interleaved with annotations, in source order.
    /// Always returns a `ModifierList` node, possibly empty.
    pub(crate) fn parse_modifier_list(&mut self) -> NodeId {
        let list = self.builder.composite(SyntaxKind::ModifierList);
        loop {
            if self.token().is_modifier() {
                self.bump_into(list);
                continue;
            }
            // `@interface` is a declaration keyword, not an annotation.
            if self.at(SyntaxKind::At) && self.lookahead(1) != SyntaxKind::InterfaceKeyword {
                let ann = self.parse_annotation();
                self.builder.push_child(list, ann);
                continue;
            }
            break;
        }
        list
    }

    pub(crate) fn parse_annotation(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::At));
        let ann = self.builder.composite(SyntaxKind::Annotation);
        self.bump_into(ann); // `@`
        match self.parse_code_reference(true, false) {
            Some(name) => self.builder.push_child(ann, name),
            None => {
                self.error_into(ann, &messages::EXPECTED_IDENTIFIER);
                self.builder.add_flags(ann, NodeFlags::INCOMPLETE);
                return ann;
            }
        }
        if self.at(SyntaxKind::LParen) {
            let params = self.parse_annotation_parameter_list();
            self.builder.push_child(ann, params);
        }
        ann
    }

    fn parse_annotation_parameter_list(&mut self) -> NodeId {
        let list = self.builder.composite(SyntaxKind::AnnotationParameterList);
        self.bump_into(list); // `(`
        if self.eat(list, SyntaxKind::RParen) {
            return list;
        }
        loop {
            if self.at_eof() || self.at(SyntaxKind::RBrace) {
                self.unclosed(list, &messages::EXPECTED_RPAREN);
                break;
            }
            let pair = self.parse_name_value_pair();
            self.builder.push_child(list, pair);
            if self.eat(list, SyntaxKind::Comma) {
                continue;
            }
            if self.eat(list, SyntaxKind::RParen) {
                break;
            }
            self.error_eat_into(list, &messages::EXPECTED_COMMA_OR_RPAREN);
        }
        list
    }

    fn parse_name_value_pair(&mut self) -> NodeId {
        let pair = self.builder.composite(SyntaxKind::NameValuePair);
        if self.at(SyntaxKind::Identifier) && self.lookahead(1) == SyntaxKind::Eq {
            self.bump_into(pair);
            self.bump_into(pair);
        }
        match self.parse_annotation_member_value() {
            Some(value) => self.builder.push_child(pair, value),
            None => {
                self.error_into(pair, &messages::EXPECTED_VALUE);
            }
        }
        pair
    }

    /// An annotation member value: a nested annotation, an array
    /// initializer, or a (conditional) expression.
    pub(crate) fn parse_annotation_member_value(&mut self) -> Option<NodeId> {
        if self.at(SyntaxKind::At) {
            return Some(self.parse_annotation());
        }
        if self.at(SyntaxKind::LBrace) {
            return Some(self.parse_array_initializer());
        }
        self.parse_expression()
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    pub(crate) fn parse_type_parameter_list(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::Lt));
        let list = self.builder.composite(SyntaxKind::TypeParameterList);
        self.bump_into(list); // `<`
        loop {
            match self.parse_type_parameter() {
                Some(param) => self.builder.push_child(list, param),
                None => {
                    self.error_into(list, &messages::EXPECTED_TYPE_PARAMETER);
                }
            }
            if self.eat(list, SyntaxKind::Comma) {
                continue;
            }
            break;
        }
        if !self.eat(list, SyntaxKind::Gt) {
            self.unclosed(list, &messages::EXPECTED_GT);
        }
        list
    }

    /// `T` or `T extends Bound & Bound`.
    pub(crate) fn parse_type_parameter(&mut self) -> Option<NodeId> {
        if !self.at(SyntaxKind::Identifier) {
            return None;
        }
        let param = self.builder.composite(SyntaxKind::TypeParameter);
        self.bump_into(param);
        if self.at(SyntaxKind::ExtendsKeyword) {
            self.bump_into(param);
            loop {
                match self.parse_type() {
                    Some(bound) => self.builder.push_child(param, bound),
                    None => {
                        self.error_into(param, &messages::EXPECTED_TYPE);
                        break;
                    }
                }
                if self.at(SyntaxKind::And) {
                    self.bump_into(param);
                    continue;
                }
                break;
            }
        }
        Some(param)
    }

    // ========================================================================
    // Classes, interfaces, enums, annotation interfaces
    // ========================================================================

    /// Parse from the class-ish keyword onward; `modifiers` were already
    /// consumed by the caller.
    pub(crate) fn parse_class_declaration(&mut self, modifiers: NodeId) -> NodeId {
        let node = self.builder.composite(SyntaxKind::Class);
        self.builder.push_child(node, modifiers);
        let is_annotation = self.at(SyntaxKind::At);
        if is_annotation {
            self.bump_into(node); // `@`
        }
        let keyword = self.token();
        self.bump_into(node); // class / interface / enum
        self.expect(node, SyntaxKind::Identifier, &messages::EXPECTED_IDENTIFIER);
        if self.at(SyntaxKind::Lt) {
            let params = self.parse_type_parameter_list();
            self.builder.push_child(node, params);
        }
        if self.at(SyntaxKind::ExtendsKeyword) {
            let list = self.parse_reference_list(SyntaxKind::ExtendsList);
            self.builder.push_child(node, list);
        }
        if self.at(SyntaxKind::ImplementsKeyword) {
            let list = self.parse_reference_list(SyntaxKind::ImplementsList);
            self.builder.push_child(node, list);
        }
        if !self.at(SyntaxKind::LBrace) {
            self.error_into(node, &messages::EXPECTED_LBRACE);
            self.builder.add_flags(node, NodeFlags::INCOMPLETE);
            return node;
        }
        if keyword == SyntaxKind::EnumKeyword {
            self.parse_enum_body(node);
        } else {
            let ctx = if is_annotation {
                DeclContext::AnnotationBody
            } else {
                DeclContext::ClassBody
            };
            self.parse_body_braces(node, ctx);
        }
        node
    }

    fn parse_reference_list(&mut self, kind: SyntaxKind) -> NodeId {
        let list = self.builder.composite(kind);
        self.bump_into(list); // `extends` / `implements`
        loop {
            match self.parse_code_reference(true, true) {
                Some(reference) => self.builder.push_child(list, reference),
                None => {
                    self.error_into(list, &messages::EXPECTED_IDENTIFIER);
                    break;
                }
            }
            if self.eat(list, SyntaxKind::Comma) {
                continue;
            }
            break;
        }
        list
    }

    /// `{ members }` appended directly to `parent`; class-body context.
    /// Also used for anonymous classes from the expression grammar.
    pub(crate) fn parse_class_body(&mut self, parent: NodeId) {
        self.parse_body_braces(parent, DeclContext::ClassBody);
    }

    fn parse_body_braces(&mut self, parent: NodeId, ctx: DeclContext) {
        if !self.expect(parent, SyntaxKind::LBrace, &messages::EXPECTED_LBRACE) {
            return;
        }
        self.parse_member_list(parent, ctx);
        if !self.eat(parent, SyntaxKind::RBrace) {
            self.unclosed(parent, &messages::EXPECTED_RBRACE);
        }
    }

    /// The class-body driver: members until `}` or eof, stray semicolons
    /// tolerated, junk runs grouped under one error node.
    pub(crate) fn parse_member_list(&mut self, parent: NodeId, ctx: DeclContext) {
        let mut group = ErrorGroup::Inactive;
        while !self.at_eof() && !self.at(SyntaxKind::RBrace) {
            if self.at(SyntaxKind::Semicolon) {
                self.bump_into(parent);
                group = ErrorGroup::Inactive;
                continue;
            }
            match self.parse_declaration(ctx) {
                Some(member) => {
                    self.builder.push_child(parent, member);
                    group = ErrorGroup::Inactive;
                }
                None => group = self.junk_token(parent, group),
            }
        }
    }

    fn parse_enum_body(&mut self, parent: NodeId) {
        self.bump_into(parent); // `{`
        let mut group = ErrorGroup::Inactive;
        loop {
            if self.at_eof() || self.at(SyntaxKind::RBrace) {
                break;
            }
            if self.at(SyntaxKind::Semicolon) {
                // End of the constant section; regular members follow.
                self.bump_into(parent);
                self.parse_member_list(parent, DeclContext::ClassBody);
                break;
            }
            if self.at(SyntaxKind::Identifier) || self.at(SyntaxKind::At) {
                let constant = self.parse_enum_constant();
                self.builder.push_child(parent, constant);
                group = ErrorGroup::Inactive;
                self.eat(parent, SyntaxKind::Comma);
                continue;
            }
            group = self.junk_token(parent, group);
        }
        if !self.eat(parent, SyntaxKind::RBrace) {
            self.unclosed(parent, &messages::EXPECTED_RBRACE);
        }
    }

    /// `@Ann CONST(args) { body }` — annotations, name, optional argument
    /// list, optional anonymous-class body.
    fn parse_enum_constant(&mut self) -> NodeId {
        let constant = self.builder.composite(SyntaxKind::EnumConstant);
        let modifiers = self.parse_modifier_list();
        self.builder.push_child(constant, modifiers);
        if !self.eat(constant, SyntaxKind::Identifier) {
            self.error_into(constant, &messages::EXPECTED_ENUM_CONSTANT);
            self.builder.add_flags(constant, NodeFlags::INCOMPLETE);
            return constant;
        }
        if self.at(SyntaxKind::LParen) {
            let args = self.parse_argument_list();
            self.builder.push_child(constant, args);
        }
        if self.at(SyntaxKind::LBrace) {
            let anon = self.builder.composite(SyntaxKind::AnonymousClass);
            self.parse_class_body(anon);
            self.builder.push_child(constant, anon);
        }
        constant
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Continue a method or constructor after its name: parameters,
    /// old-style array suffixes, throws, annotation-member default, body.
    fn parse_method_rest(&mut self, method: NodeId, ctx: DeclContext) -> NodeId {
        if self.at(SyntaxKind::LParen) {
            let params = self.parse_parameter_list();
            self.builder.push_child(method, params);
        } else {
            self.error_into(method, &messages::EXPECTED_LPAREN);
        }
        self.parse_array_suffixes(method);
        if self.at(SyntaxKind::ThrowsKeyword) {
            let throws = self.parse_reference_list(SyntaxKind::ThrowsList);
            self.builder.push_child(method, throws);
        }
        if ctx == DeclContext::AnnotationBody && self.at(SyntaxKind::DefaultKeyword) {
            self.bump_into(method);
            match self.parse_annotation_member_value() {
                Some(value) => self.builder.push_child(method, value),
                None => {
                    self.error_into(method, &messages::EXPECTED_VALUE);
                }
            }
        }
        if self.at(SyntaxKind::LBrace) {
            if let Some(block) = self.parse_code_block(false) {
                self.builder.push_child(method, block);
            }
        } else if !self.eat(method, SyntaxKind::Semicolon) {
            self.error_into(method, &messages::MISSING_METHOD_BODY);
            self.builder.add_flags(method, NodeFlags::INCOMPLETE);
        }
        method
    }

    fn parse_parameter_list(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::LParen));
        let list = self.builder.composite(SyntaxKind::ParameterList);
        self.bump_into(list);
        if self.eat(list, SyntaxKind::RParen) {
            return list;
        }
        loop {
            if self.at_eof() || self.at(SyntaxKind::LBrace) || self.at(SyntaxKind::Semicolon) {
                self.unclosed(list, &messages::EXPECTED_RPAREN);
                break;
            }
            match self.parse_parameter(true) {
                Some(param) => self.builder.push_child(list, param),
                None => {
                    if matches!(self.token(), SyntaxKind::Comma | SyntaxKind::RParen) {
                        self.error_into(list, &messages::EXPECTED_PARAMETER);
                    } else {
                        self.error_eat_into(list, &messages::EXPECTED_PARAMETER);
                    }
                }
            }
            if self.eat(list, SyntaxKind::Comma) {
                continue;
            }
            if self.eat(list, SyntaxKind::RParen) {
                break;
            }
            self.report(&messages::EXPECTED_COMMA_OR_RPAREN, &[]);
        }
        list
    }

    /// `final @Ann Type... name[]`. Fully tentative: `None` restores the
    /// cursor, which is what lets the foreach check and cast-heavy inputs
    /// probe for a parameter cheaply.
    pub(crate) fn parse_parameter(&mut self, ellipsis_allowed: bool) -> Option<NodeId> {
        let state = self.state();
        let param = self.builder.composite(SyntaxKind::Parameter);
        let modifiers = self.parse_modifier_list();
        self.builder.push_child(param, modifiers);
        match self.parse_type() {
            Some(ty) => self.builder.push_child(param, ty),
            None => {
                self.rollback(state);
                return None;
            }
        }
        if ellipsis_allowed && self.at(SyntaxKind::Ellipsis) {
            self.bump_into(param);
        }
        if !self.at(SyntaxKind::Identifier) {
            self.rollback(state);
            return None;
        }
        self.bump_into(param);
        self.parse_array_suffixes(param);
        Some(param)
    }

    // ========================================================================
    // Fields and locals
    // ========================================================================

    /// Continue a field/local after its first declarator name: `[]`
    /// suffixes, initializers, further comma-separated declarators, `;`.
    fn parse_variable_rest(&mut self, node: NodeId) -> NodeId {
        loop {
            self.parse_array_suffixes(node);
            if self.at(SyntaxKind::Eq) {
                self.bump_into(node);
                if self.at(SyntaxKind::LBrace) {
                    let init = self.parse_array_initializer();
                    self.builder.push_child(node, init);
                } else {
                    self.expect_expression(node);
                }
            }
            if self.at(SyntaxKind::Comma) {
                self.bump_into(node);
                if self.eat(node, SyntaxKind::Identifier) {
                    continue;
                }
                self.error_into(node, &messages::EXPECTED_IDENTIFIER);
            }
            break;
        }
        if !self.eat(node, SyntaxKind::Semicolon) {
            self.recover_declaration(node);
        }
        node
    }

    /// Consume the junk after a malformed declaration into one error node.
    /// The scan runs on a sub-cursor fenced at the next blank line and
    /// hands control back as soon as a plausible declaration start
    /// appears, so a single bad line cannot corrupt the declarations that
    /// follow it.
    fn recover_declaration(&mut self, node: NodeId) {
        let bound = self.cursor.next_blank_line_bound(self.cursor.raw_index());
        let err = self.error_into(node, &messages::EXPECTED_SEMICOLON);
        self.builder.add_flags(node, NodeFlags::INCOMPLETE);
        let wide = self.cursor.clone();
        self.cursor = wide.with_limit(bound);
        while !self.at_eof() {
            match self.token() {
                SyntaxKind::Semicolon => {
                    self.bump_into(node);
                    break;
                }
                SyntaxKind::LBrace | SyntaxKind::RBrace => break,
                _ if self.at_declaration_start() => break,
                _ => {
                    self.bump_into(err);
                }
            }
        }
        let resumed = self.cursor.save();
        self.cursor = wide;
        self.cursor.restore(resumed);
        // The fence may leave the position on a trivia token.
        self.cursor.realign();
    }

    /// `modifier* type identifier` followed by something a method or a
    /// declarator could continue with. The handback condition for the junk
    /// scan above; the fenced cursor keeps the lookahead from crossing the
    /// blank line.
    fn at_declaration_start(&self) -> bool {
        let mut i = 0;
        while self.lookahead(i).is_modifier() {
            i += 1;
        }
        let ty = self.lookahead(i);
        if !(ty.is_primitive_type() || ty == SyntaxKind::Identifier) {
            return false;
        }
        self.lookahead(i + 1) == SyntaxKind::Identifier
            && matches!(
                self.lookahead(i + 2),
                SyntaxKind::LParen
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Eq
                    | SyntaxKind::Comma
                    | SyntaxKind::LBracket
            )
    }
}
