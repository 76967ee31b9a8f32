//! Statement parsing: keyword dispatch, the expression/declaration
//! ambiguity, and the two code-block modes (deep and lazy).

use javacst_core::text::TextRange;
use javacst_diagnostics::messages;
use javacst_tree::{NodeFlags, NodeId, SyntaxKind};

use crate::decl::DeclContext;
use crate::parser::{ErrorGroup, Parser};

impl<'t> Parser<'t> {
    /// Parse one statement, or `None` when the current token cannot start
    /// one (the block driver then treats it as junk).
    pub(crate) fn parse_statement(&mut self) -> Option<NodeId> {
        match self.token() {
            SyntaxKind::IfKeyword => Some(self.parse_if()),
            SyntaxKind::WhileKeyword => Some(self.parse_while()),
            SyntaxKind::DoKeyword => Some(self.parse_do_while()),
            SyntaxKind::ForKeyword => Some(self.parse_for()),
            SyntaxKind::SwitchKeyword => Some(self.parse_switch()),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                Some(self.parse_break_or_continue())
            }
            SyntaxKind::ReturnKeyword => Some(self.parse_return()),
            SyntaxKind::ThrowKeyword => Some(self.parse_throw()),
            SyntaxKind::SynchronizedKeyword
                if self.lookahead(1) == SyntaxKind::LParen =>
            {
                Some(self.parse_synchronized())
            }
            SyntaxKind::TryKeyword => Some(self.parse_try()),
            SyntaxKind::AssertKeyword => Some(self.parse_assert()),
            SyntaxKind::LBrace => self.parse_code_block(true),
            SyntaxKind::Semicolon => {
                let node = self.builder.composite(SyntaxKind::EmptyStatement);
                self.bump_into(node);
                Some(node)
            }
            SyntaxKind::Identifier if self.lookahead(1) == SyntaxKind::Colon => {
                Some(self.parse_labeled())
            }
            kind if kind.is_modifier()
                || kind.is_primitive_type()
                || matches!(
                    kind,
                    SyntaxKind::At
                        | SyntaxKind::ClassKeyword
                        | SyntaxKind::InterfaceKeyword
                        | SyntaxKind::EnumKeyword
                ) =>
            {
                // Local variables, local classes, and modifier-led
                // declarations. `int.class` style expressions still get
                // their chance on the fallback path.
                let state = self.state();
                if let Some(decl) = self.parse_declaration(DeclContext::CodeBlock) {
                    let node = self.builder.composite(SyntaxKind::DeclarationStatement);
                    self.builder.push_child(node, decl);
                    Some(node)
                } else {
                    self.rollback(state);
                    self.parse_expression_or_declaration()
                }
            }
            _ => self.parse_expression_or_declaration(),
        }
    }

    // ========================================================================
    // Code blocks
    // ========================================================================

    /// Parse `{ ... }`. With `deep == false` and lazy parsing enabled, the
    /// interior is recorded as a single unparsed-text leaf and only
    /// brace-scanned; callers expand it on demand.
    pub(crate) fn parse_code_block(&mut self, deep: bool) -> Option<NodeId> {
        if !self.at(SyntaxKind::LBrace) {
            return None;
        }
        if deep || !self.options.lazy_blocks {
            Some(self.parse_deep_block())
        } else {
            Some(self.scan_lazy_block())
        }
    }

    fn parse_deep_block(&mut self) -> NodeId {
        let block = self.builder.composite(SyntaxKind::CodeBlock);
        self.bump_into(block); // `{`
        self.parse_block_statements(block);
        if !self.eat(block, SyntaxKind::RBrace) {
            self.unclosed(block, &messages::EXPECTED_RBRACE);
        }
        block
    }

    /// The block driver: statements until `}` or eof, consecutive
    /// unrecognized tokens grouped under one error node.
    pub(crate) fn parse_block_statements(&mut self, block: NodeId) {
        let mut group = ErrorGroup::Inactive;
        while !self.at_eof() && !self.at(SyntaxKind::RBrace) {
            match self.parse_statement() {
                Some(stmt) => {
                    self.builder.push_child(block, stmt);
                    group = ErrorGroup::Inactive;
                }
                None => group = self.junk_token(block, group),
            }
        }
    }

    /// Brace-depth scan of a block, producing a lazy placeholder. An
    /// unclosed block would otherwise swallow the rest of the input, so on
    /// `;` or `}` at depth one the scanner looks ahead for a plausible
    /// declaration signature (`modifier* type identifier (`) and closes
    /// the block early when it sees one.
    fn scan_lazy_block(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::LBrace));
        let block = self.builder.composite(SyntaxKind::CodeBlock);
        self.builder.add_flags(block, NodeFlags::LAZY);
        let start = self.cursor.range().start;
        let mut end = self.cursor.range().end;
        let mut depth = 0usize;
        loop {
            if self.at_eof() {
                self.unclosed(block, &messages::EXPECTED_RBRACE);
                break;
            }
            let kind = self.token();
            end = self.cursor.range().end;
            self.cursor.advance();
            match kind {
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    if depth == 1 && self.looks_like_declaration_ahead() {
                        self.unclosed(block, &messages::EXPECTED_RBRACE);
                        break;
                    }
                }
                SyntaxKind::Semicolon if depth == 1 => {
                    if self.looks_like_declaration_ahead() {
                        self.unclosed(block, &messages::EXPECTED_RBRACE);
                        break;
                    }
                }
                _ => {}
            }
        }
        let span = TextRange::new(start, end);
        let text = self.cursor.slice(span);
        let leaf = self.builder.leaf_str(SyntaxKind::UnparsedText, text, span);
        self.builder.push_child(block, leaf);
        block
    }

    /// `modifier* type identifier (` — the signature a following method
    /// declaration would present.
    pub(crate) fn looks_like_declaration_ahead(&self) -> bool {
        let mut i = 0;
        while self.lookahead(i).is_modifier() {
            i += 1;
        }
        let ty = self.lookahead(i);
        (ty.is_primitive_type() || ty == SyntaxKind::Identifier)
            && self.lookahead(i + 1) == SyntaxKind::Identifier
            && self.lookahead(i + 2) == SyntaxKind::LParen
    }

    // ========================================================================
    // Keyword statements
    // ========================================================================

    /// `( expression )` shared by if/while/do/switch/synchronized.
    fn parse_paren_condition(&mut self, node: NodeId) -> bool {
        if !self.expect(node, SyntaxKind::LParen, &messages::EXPECTED_LPAREN) {
            return false;
        }
        self.expect_expression(node);
        self.expect(node, SyntaxKind::RParen, &messages::EXPECTED_RPAREN)
    }

    fn expect_statement(&mut self, parent: NodeId) {
        match self.parse_statement() {
            Some(stmt) => self.builder.push_child(parent, stmt),
            None => {
                self.error_into(parent, &messages::EXPECTED_STATEMENT);
            }
        }
    }

    fn parse_if(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::IfStatement);
        self.bump_into(node);
        self.parse_paren_condition(node);
        self.expect_statement(node);
        if self.at(SyntaxKind::ElseKeyword) {
            self.bump_into(node);
            self.expect_statement(node);
        }
        node
    }

    fn parse_while(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::WhileStatement);
        self.bump_into(node);
        self.parse_paren_condition(node);
        self.expect_statement(node);
        node
    }

    fn parse_do_while(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::DoWhileStatement);
        self.bump_into(node);
        self.expect_statement(node);
        if self.expect(node, SyntaxKind::WhileKeyword, &messages::EXPECTED_WHILE) {
            self.parse_paren_condition(node);
            self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        }
        node
    }

    fn parse_for(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::ForStatement);
        self.bump_into(node);
        if !self.expect(node, SyntaxKind::LParen, &messages::EXPECTED_LPAREN) {
            return node;
        }
        // Foreach form: `for (Type x : iterable)`, detected by tentatively
        // parsing a parameter and checking for the `:`.
        let state = self.state();
        if let Some(param) = self.parse_parameter(false) {
            if self.at(SyntaxKind::Colon) {
                self.builder.set_kind(node, SyntaxKind::ForeachStatement);
                self.builder.push_child(node, param);
                self.bump_into(node); // `:`
                self.expect_expression(node);
                self.expect(node, SyntaxKind::RParen, &messages::EXPECTED_RPAREN);
                self.expect_statement(node);
                return node;
            }
        }
        self.rollback(state);

        // Classic three-clause form. The initializer is a full statement
        // (declaration or expression list) and brings its own `;`.
        if self.at(SyntaxKind::Semicolon) {
            self.bump_into(node);
        } else {
            match self.parse_statement() {
                Some(init) => self.builder.push_child(node, init),
                None => {
                    self.error_into(node, &messages::EXPECTED_STATEMENT);
                    self.eat(node, SyntaxKind::Semicolon);
                }
            }
        }
        if !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RParen) {
            self.expect_expression(node);
        }
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        if !self.at(SyntaxKind::RParen) {
            let update = self.parse_expression_list();
            self.builder.push_child(node, update);
        }
        self.expect(node, SyntaxKind::RParen, &messages::EXPECTED_RPAREN);
        self.expect_statement(node);
        node
    }

    fn parse_switch(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::SwitchStatement);
        self.bump_into(node);
        self.parse_paren_condition(node);
        if !self.at(SyntaxKind::LBrace) {
            self.error_into(node, &messages::EXPECTED_LBRACE);
            return node;
        }
        let body = self.builder.composite(SyntaxKind::CodeBlock);
        self.bump_into(body); // `{`
        let mut group = ErrorGroup::Inactive;
        while !self.at_eof() && !self.at(SyntaxKind::RBrace) {
            if matches!(
                self.token(),
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
            ) {
                let label = self.parse_switch_label();
                self.builder.push_child(body, label);
                group = ErrorGroup::Inactive;
                continue;
            }
            match self.parse_statement() {
                Some(stmt) => {
                    self.builder.push_child(body, stmt);
                    group = ErrorGroup::Inactive;
                }
                None => group = self.junk_token(body, group),
            }
        }
        if !self.eat(body, SyntaxKind::RBrace) {
            self.unclosed(body, &messages::EXPECTED_CASE_OR_RBRACE);
        }
        self.builder.push_child(node, body);
        node
    }

    fn parse_switch_label(&mut self) -> NodeId {
        let label = self.builder.composite(SyntaxKind::SwitchLabel);
        let is_case = self.at(SyntaxKind::CaseKeyword);
        self.bump_into(label);
        if is_case {
            self.expect_expression(label);
        }
        self.expect(label, SyntaxKind::Colon, &messages::EXPECTED_COLON);
        label
    }

    fn parse_break_or_continue(&mut self) -> NodeId {
        let kind = if self.at(SyntaxKind::BreakKeyword) {
            SyntaxKind::BreakStatement
        } else {
            SyntaxKind::ContinueStatement
        };
        let node = self.builder.composite(kind);
        self.bump_into(node);
        self.eat(node, SyntaxKind::Identifier);
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        node
    }

    fn parse_return(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::ReturnStatement);
        self.bump_into(node);
        if !self.at(SyntaxKind::Semicolon) && self.at_expression_start() {
            self.expect_expression(node);
        }
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        node
    }

    fn parse_throw(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::ThrowStatement);
        self.bump_into(node);
        self.expect_expression(node);
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        node
    }

    fn parse_synchronized(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::SynchronizedStatement);
        self.bump_into(node);
        self.parse_paren_condition(node);
        match self.parse_code_block(true) {
            Some(block) => self.builder.push_child(node, block),
            None => {
                self.error_into(node, &messages::EXPECTED_LBRACE);
            }
        }
        node
    }

    fn parse_try(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::TryStatement);
        self.bump_into(node);
        match self.parse_code_block(true) {
            Some(block) => self.builder.push_child(node, block),
            None => {
                self.error_into(node, &messages::EXPECTED_LBRACE);
                return node;
            }
        }
        let mut any_tail = false;
        while self.at(SyntaxKind::CatchKeyword) {
            let clause = self.parse_catch_clause();
            self.builder.push_child(node, clause);
            any_tail = true;
        }
        if self.at(SyntaxKind::FinallyKeyword) {
            self.bump_into(node);
            match self.parse_code_block(true) {
                Some(block) => self.builder.push_child(node, block),
                None => {
                    self.error_into(node, &messages::EXPECTED_LBRACE);
                }
            }
            any_tail = true;
        }
        if !any_tail {
            self.error_into(node, &messages::EXPECTED_CATCH_OR_FINALLY);
            self.builder.add_flags(node, NodeFlags::INCOMPLETE);
        }
        node
    }

    pub(crate) fn parse_catch_clause(&mut self) -> NodeId {
        let clause = self.builder.composite(SyntaxKind::CatchClause);
        self.bump_into(clause); // `catch`
        if self.expect(clause, SyntaxKind::LParen, &messages::EXPECTED_LPAREN) {
            match self.parse_parameter(false) {
                Some(param) => self.builder.push_child(clause, param),
                None => {
                    self.error_into(clause, &messages::EXPECTED_PARAMETER);
                }
            }
            self.expect(clause, SyntaxKind::RParen, &messages::EXPECTED_RPAREN);
        }
        match self.parse_code_block(true) {
            Some(block) => self.builder.push_child(clause, block),
            None => {
                self.error_into(clause, &messages::EXPECTED_LBRACE);
            }
        }
        clause
    }

    fn parse_assert(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::AssertStatement);
        self.bump_into(node);
        self.expect_expression(node);
        if self.at(SyntaxKind::Colon) {
            self.bump_into(node);
            self.expect_expression(node);
        }
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        node
    }

    fn parse_labeled(&mut self) -> NodeId {
        let node = self.builder.composite(SyntaxKind::LabeledStatement);
        self.bump_into(node); // identifier
        self.bump_into(node); // `:`
        self.expect_statement(node);
        node
    }

    // ========================================================================
    // Expression vs. declaration
    // ========================================================================

    /// Resolve the expression/declaration ambiguity. A cheap type probe
    /// runs first: if a type followed by an identifier sits here
    /// (`List<String> x`), the statement is a declaration — the expression
    /// grammar would otherwise read the `<` as a comparison. Failing that,
    /// parse an expression; a comma makes it an expression-list statement,
    /// anything but a bare reference a plain expression statement, and a
    /// bare reference is re-attempted as a declaration before falling
    /// back.
    fn parse_expression_or_declaration(&mut self) -> Option<NodeId> {
        let state = self.state();
        if self.at(SyntaxKind::Identifier) || self.token().is_primitive_type() {
            let looks_like_declaration =
                self.parse_type().is_some() && self.at(SyntaxKind::Identifier);
            self.rollback(state);
            if looks_like_declaration {
                if let Some(decl) = self.parse_declaration(DeclContext::CodeBlock) {
                    let node = self.builder.composite(SyntaxKind::DeclarationStatement);
                    self.builder.push_child(node, decl);
                    return Some(node);
                }
                self.rollback(state);
            }
        }
        let expr = self.parse_expression()?;

        if self.at(SyntaxKind::Comma) {
            let list = self.builder.composite(SyntaxKind::ExpressionList);
            self.builder.push_child(list, expr);
            while self.at(SyntaxKind::Comma) {
                self.bump_into(list);
                if !self.expect_expression(list) {
                    break;
                }
            }
            let node = self.builder.composite(SyntaxKind::ExpressionListStatement);
            self.builder.push_child(node, list);
            self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
            return Some(node);
        }

        if self.builder.kind(expr) != SyntaxKind::ReferenceExpr {
            let node = self.builder.composite(SyntaxKind::ExpressionStatement);
            self.builder.push_child(node, expr);
            self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
            return Some(node);
        }

        // A bare reference is more likely a declaration's type
        // (`Foo bar = ...`); retry as one.
        self.rollback(state);
        if let Some(decl) = self.parse_declaration(DeclContext::CodeBlock) {
            let node = self.builder.composite(SyntaxKind::DeclarationStatement);
            self.builder.push_child(node, decl);
            return Some(node);
        }
        self.rollback(state);
        let expr = self.parse_expression()?;
        let node = self.builder.composite(SyntaxKind::ExpressionStatement);
        self.builder.push_child(node, expr);
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        Some(node)
    }

    /// Comma-separated expressions (the `for` update clause).
    fn parse_expression_list(&mut self) -> NodeId {
        let list = self.builder.composite(SyntaxKind::ExpressionList);
        if !self.expect_expression(list) {
            return list;
        }
        while self.at(SyntaxKind::Comma) {
            self.bump_into(list);
            if !self.expect_expression(list) {
                break;
            }
        }
        list
    }
}
