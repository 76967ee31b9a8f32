//! Expression parsing: the precedence ladder, `>`-token composition, cast
//! disambiguation, and the postfix/primary extension loop.

use javacst_core::text::TextRange;
use javacst_diagnostics::messages;
use javacst_tree::{NodeFlags, NodeId, SyntaxKind};

use crate::parser::Parser;

/// A `>`-family operator composed out of adjacent raw tokens. `raw_len` is
/// the number of raw tokens the composed operator spans.
#[derive(Debug, Copy, Clone)]
pub(crate) struct GtOp {
    pub(crate) kind: SyntaxKind,
    pub(crate) raw_len: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn parse_expression(&mut self) -> Option<NodeId> {
        self.parse_assignment()
    }

    /// Parse an expression, appending an error node to `parent` if none is
    /// present. Returns whether an expression was found.
    pub(crate) fn expect_expression(&mut self, parent: NodeId) -> bool {
        match self.parse_expression() {
            Some(expr) => {
                self.builder.push_child(parent, expr);
                true
            }
            None => {
                self.error_into(parent, &messages::EXPECTED_EXPRESSION);
                false
            }
        }
    }

    // ========================================================================
    // GT composition
    // ========================================================================

    /// Inspect the current token plus its zero-gap raw successors and
    /// classify the `>`-family operator they would compose into. Pure
    /// lookahead: the cursor does not move.
    ///
    /// A whitespace or comment gap between two `>` keeps them separate, so
    /// `List<List<Integer> >` still closes two generic lists.
    pub(crate) fn peek_gt_op(&self) -> Option<GtOp> {
        if !self.at(SyntaxKind::Gt) {
            return None;
        }
        let base = self.cursor.raw_index();
        let mut gt_count = 1;
        let mut end = self.cursor.raw_token(base)?.range.end;
        while gt_count < 3 {
            match self.cursor.raw_token(base + gt_count) {
                Some(t) if t.kind == SyntaxKind::Gt && t.range.start == end => {
                    end = t.range.end;
                    gt_count += 1;
                }
                _ => break,
            }
        }
        let has_eq = matches!(
            self.cursor.raw_token(base + gt_count),
            Some(t) if t.kind == SyntaxKind::Eq && t.range.start == end
        );
        let (kind, raw_len) = match (gt_count, has_eq) {
            (1, false) => (SyntaxKind::Gt, 1),
            (1, true) => (SyntaxKind::GtEq, 2),
            (2, false) => (SyntaxKind::Shr, 2),
            (2, true) => (SyntaxKind::ShrEq, 3),
            (3, false) => (SyntaxKind::Ushr, 3),
            (3, true) => (SyntaxKind::UshrEq, 4),
            _ => unreachable!(),
        };
        Some(GtOp { kind, raw_len })
    }

    /// Commit a composed operator: merge its raw tokens into one leaf and
    /// advance past them.
    pub(crate) fn bump_gt_composed(&mut self, op: GtOp, parent: NodeId) -> NodeId {
        let start = self.cursor.range().start;
        let base = self.cursor.raw_index();
        let end = match self.cursor.raw_token(base + op.raw_len - 1) {
            Some(t) => t.range.end,
            None => self.cursor.range().end,
        };
        let text = match op.kind {
            SyntaxKind::GtEq => ">=",
            SyntaxKind::Shr => ">>",
            SyntaxKind::ShrEq => ">>=",
            SyntaxKind::Ushr => ">>>",
            SyntaxKind::UshrEq => ">>>=",
            _ => ">",
        };
        let leaf = self
            .builder
            .leaf_str(op.kind, text, TextRange::new(start, end));
        for _ in 0..op.raw_len {
            self.cursor.advance_raw();
        }
        self.cursor.realign();
        self.builder.push_child(parent, leaf);
        leaf
    }

    // ========================================================================
    // Precedence ladder
    // ========================================================================

    fn parse_assignment(&mut self) -> Option<NodeId> {
        let lhs = self.parse_conditional()?;
        let op = if self.token().is_assignment_op() {
            Some(None)
        } else {
            // `>>=` and `>>>=` only exist as compositions.
            match self.peek_gt_op() {
                Some(gt) if gt.kind.is_assignment_op() => Some(Some(gt)),
                _ => None,
            }
        };
        let Some(composed) = op else { return Some(lhs) };
        let node = self.builder.composite(SyntaxKind::AssignmentExpr);
        self.builder.push_child(node, lhs);
        match composed {
            Some(gt) => {
                self.bump_gt_composed(gt, node);
            }
            None => {
                self.bump_into(node);
            }
        }
        // Right-associative.
        match self.parse_assignment() {
            Some(rhs) => self.builder.push_child(node, rhs),
            None => {
                self.error_into(node, &messages::EXPECTED_EXPRESSION);
            }
        }
        Some(node)
    }

    fn parse_conditional(&mut self) -> Option<NodeId> {
        let cond = self.parse_binary(0)?;
        if !self.at(SyntaxKind::Question) {
            return Some(cond);
        }
        let node = self.builder.composite(SyntaxKind::ConditionalExpr);
        self.builder.push_child(node, cond);
        self.bump_into(node); // `?`
        self.expect_expression(node);
        if self.expect(node, SyntaxKind::Colon, &messages::EXPECTED_COLON) {
            match self.parse_conditional() {
                Some(other) => self.builder.push_child(node, other),
                None => {
                    self.error_into(node, &messages::EXPECTED_EXPRESSION);
                }
            }
        }
        Some(node)
    }

    /// Left-associated binary levels, highest `level` binding tightest:
    /// 0 `||`, 1 `&&`, 2 `|`, 3 `^`, 4 `&`, 5 equality, 6 relational /
    /// `instanceof`, 7 shift, 8 additive, 9 multiplicative.
    fn parse_binary(&mut self, level: u8) -> Option<NodeId> {
        const TOP: u8 = 9;
        let mut lhs = if level == TOP {
            self.parse_unary()?
        } else {
            self.parse_binary(level + 1)?
        };
        loop {
            // `instanceof` sits at the relational level but takes a type,
            // not an expression, on its right.
            if level == 6 && self.at(SyntaxKind::InstanceofKeyword) {
                let node = self.builder.composite(SyntaxKind::InstanceofExpr);
                self.builder.push_child(node, lhs);
                self.bump_into(node);
                match self.parse_type() {
                    Some(ty) => self.builder.push_child(node, ty),
                    None => {
                        self.error_into(node, &messages::EXPECTED_TYPE);
                    }
                }
                lhs = node;
                continue;
            }
            let composed = match self.binary_op_at(level) {
                Some(op) => op,
                None => return Some(lhs),
            };
            let node = self.builder.composite(SyntaxKind::BinaryExpr);
            self.builder.push_child(node, lhs);
            match composed {
                Some(gt) => {
                    self.bump_gt_composed(gt, node);
                }
                None => {
                    self.bump_into(node);
                }
            }
            let rhs = if level == TOP {
                self.parse_unary()
            } else {
                self.parse_binary(level + 1)
            };
            match rhs {
                Some(rhs) => self.builder.push_child(node, rhs),
                None => {
                    self.error_into(node, &messages::EXPECTED_EXPRESSION);
                }
            }
            lhs = node;
        }
    }

    /// The operator starting at the cursor if it belongs to `level`:
    /// `Some(None)` for a plain token, `Some(Some(gt))` for a composed
    /// `>`-family operator.
    fn binary_op_at(&self, level: u8) -> Option<Option<GtOp>> {
        use SyntaxKind::*;
        let plain = |k: SyntaxKind, set: &[SyntaxKind]| set.contains(&k).then_some(None);
        match level {
            0 => plain(self.token(), &[OrOr]),
            1 => plain(self.token(), &[AndAnd]),
            2 => plain(self.token(), &[Or]),
            3 => plain(self.token(), &[Caret]),
            4 => plain(self.token(), &[And]),
            5 => plain(self.token(), &[EqEq, BangEq]),
            6 => match self.token() {
                Lt | LtEq => Some(None),
                Gt => match self.peek_gt_op() {
                    Some(gt) if matches!(gt.kind, Gt | GtEq) => Some(Some(gt)),
                    _ => None,
                },
                _ => None,
            },
            7 => match self.token() {
                Shl => Some(None),
                Gt => match self.peek_gt_op() {
                    Some(gt) if matches!(gt.kind, Shr | Ushr) => Some(Some(gt)),
                    _ => None,
                },
                _ => None,
            },
            8 => plain(self.token(), &[Plus, Minus]),
            9 => plain(self.token(), &[Star, Slash, Percent]),
            _ => None,
        }
    }

    // ========================================================================
    // Unary, cast, postfix
    // ========================================================================

    pub(crate) fn parse_unary(&mut self) -> Option<NodeId> {
        match self.token() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde => {
                let node = self.builder.composite(SyntaxKind::PrefixExpr);
                self.bump_into(node);
                match self.parse_unary() {
                    Some(operand) => self.builder.push_child(node, operand),
                    None => {
                        self.error_into(node, &messages::EXPECTED_EXPRESSION);
                    }
                }
                Some(node)
            }
            SyntaxKind::LParen => {
                if let Some(cast) = self.try_parse_cast() {
                    return Some(cast);
                }
                self.parse_postfix()
            }
            _ => self.parse_postfix(),
        }
    }

    /// Speculative cast parse. The tentative branch is abandoned (exact
    /// restore, no tree residue) when the parenthesized text is not a type,
    /// when no `)` follows, when nothing that can start a cast operand
    /// follows the `)`, or when a reference-typed cast is followed by
    /// `+`/`-`/`++`/`--` (which reads as arithmetic on a parenthesized
    /// value instead).
    fn try_parse_cast(&mut self) -> Option<NodeId> {
        let state = self.state();
        let node = self.builder.composite(SyntaxKind::CastExpr);
        self.bump_into(node); // `(`
        let ty = match self.parse_type() {
            Some(ty) => ty,
            None => {
                self.rollback(state);
                return None;
            }
        };
        self.builder.push_child(node, ty);
        if !self.at(SyntaxKind::RParen) {
            self.rollback(state);
            return None;
        }
        self.bump_into(node); // `)`

        let next = self.token();
        let ambiguous_sign = matches!(
            next,
            SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::PlusPlus | SyntaxKind::MinusMinus
        );
        let plain_reference =
            !self.type_is_primitive(ty) && !self.type_is_array(ty);
        if (plain_reference && ambiguous_sign)
            || (!ambiguous_sign && !self.at_expression_start())
        {
            self.rollback(state);
            return None;
        }
        match self.parse_unary() {
            Some(operand) => self.builder.push_child(node, operand),
            None => {
                self.error_into(node, &messages::EXPECTED_EXPRESSION);
            }
        }
        Some(node)
    }

    /// Whether the current token can begin an expression.
    pub(crate) fn at_expression_start(&self) -> bool {
        let kind = self.token();
        kind == SyntaxKind::Identifier
            || kind.is_literal()
            || kind.is_primitive_type()
            || matches!(
                kind,
                SyntaxKind::LParen
                    | SyntaxKind::Bang
                    | SyntaxKind::Tilde
                    | SyntaxKind::Plus
                    | SyntaxKind::Minus
                    | SyntaxKind::PlusPlus
                    | SyntaxKind::MinusMinus
                    | SyntaxKind::NewKeyword
                    | SyntaxKind::ThisKeyword
                    | SyntaxKind::SuperKeyword
                    | SyntaxKind::SwitchKeyword
            )
    }

    fn parse_postfix(&mut self) -> Option<NodeId> {
        let mut node = self.parse_primary()?;
        while matches!(self.token(), SyntaxKind::PlusPlus | SyntaxKind::MinusMinus) {
            let post = self.builder.composite(SyntaxKind::PostfixExpr);
            self.builder.push_child(post, node);
            self.bump_into(post);
            node = post;
        }
        Some(node)
    }

    // ========================================================================
    // Primary and its extension loop
    // ========================================================================

    fn parse_primary(&mut self) -> Option<NodeId> {
        let mut node = self.parse_primary_base()?;
        loop {
            match self.token() {
                SyntaxKind::Dot => {
                    match self.extend_with_dot(node) {
                        Some(extended) => node = extended,
                        None => break,
                    }
                }
                SyntaxKind::LParen => {
                    // Callable receivers only; `this(...)` and `super(...)`
                    // are explicit constructor invocations.
                    if !matches!(
                        self.builder.kind(node),
                        SyntaxKind::ReferenceExpr | SyntaxKind::ThisExpr | SyntaxKind::SuperExpr
                    ) {
                        break;
                    }
                    let call = self.builder.composite(SyntaxKind::MethodCallExpr);
                    self.builder.push_child(call, node);
                    let args = self.parse_argument_list();
                    self.builder.push_child(call, args);
                    node = call;
                }
                SyntaxKind::LBracket => {
                    // `a[` with no closing expression could still be an
                    // array-type mention (`a[].class`); leave that to the
                    // class-literal path below.
                    if self.lookahead(1) == SyntaxKind::RBracket {
                        match self.try_extend_class_literal(node) {
                            Some(lit) => {
                                node = lit;
                                continue;
                            }
                            None => break,
                        }
                    }
                    let access = self.builder.composite(SyntaxKind::ArrayAccessExpr);
                    self.builder.push_child(access, node);
                    self.bump_into(access); // `[`
                    self.expect_expression(access);
                    if !self.eat(access, SyntaxKind::RBracket) {
                        self.error_into(access, &messages::EXPECTED_RBRACKET);
                        self.builder.add_flags(access, NodeFlags::UNCLOSED);
                    }
                    node = access;
                }
                _ => break,
            }
        }
        Some(node)
    }

    fn parse_primary_base(&mut self) -> Option<NodeId> {
        match self.token() {
            kind if kind.is_literal() => {
                let node = self.builder.composite(SyntaxKind::LiteralExpr);
                self.bump_into(node);
                Some(node)
            }
            SyntaxKind::LParen => {
                let node = self.builder.composite(SyntaxKind::ParenExpr);
                self.bump_into(node);
                self.expect_expression(node);
                if !self.eat(node, SyntaxKind::RParen) {
                    self.error_into(node, &messages::EXPECTED_RPAREN);
                    self.builder.add_flags(node, NodeFlags::UNCLOSED);
                }
                Some(node)
            }
            SyntaxKind::ThisKeyword => {
                let node = self.builder.composite(SyntaxKind::ThisExpr);
                self.bump_into(node);
                Some(node)
            }
            SyntaxKind::SuperKeyword => {
                let node = self.builder.composite(SyntaxKind::SuperExpr);
                self.bump_into(node);
                Some(node)
            }
            SyntaxKind::NewKeyword => Some(self.parse_new(None)),
            SyntaxKind::Identifier => {
                let node = self.builder.composite(SyntaxKind::ReferenceExpr);
                self.bump_into(node);
                Some(node)
            }
            kind if kind.is_primitive_type() => {
                // Only meaningful as `int.class` / `int[].class`.
                let state = self.state();
                let node = self.builder.composite(SyntaxKind::ClassLiteralExpr);
                let ty = self.builder.composite(SyntaxKind::Type);
                self.bump_into(ty);
                self.parse_array_suffixes(ty);
                self.builder.push_child(node, ty);
                if self.at(SyntaxKind::Dot) && self.lookahead(1) == SyntaxKind::ClassKeyword {
                    self.bump_into(node);
                    self.bump_into(node);
                    Some(node)
                } else {
                    self.rollback(state);
                    None
                }
            }
            _ => None,
        }
    }

    /// Grow `node` across one `.`: plain or generic member reference,
    /// qualified `this`/`super`, `.class`, or qualified `new`. `None` means
    /// the dot does not extend this node (cursor unmoved).
    fn extend_with_dot(&mut self, node: NodeId) -> Option<NodeId> {
        debug_assert!(self.at(SyntaxKind::Dot));
        match self.lookahead(1) {
            SyntaxKind::Identifier => {
                let outer = self.builder.composite(SyntaxKind::ReferenceExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer); // `.`
                self.bump_into(outer); // identifier
                Some(outer)
            }
            SyntaxKind::ThisKeyword => {
                let outer = self.builder.composite(SyntaxKind::ThisExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer);
                self.bump_into(outer);
                Some(outer)
            }
            SyntaxKind::SuperKeyword => {
                let outer = self.builder.composite(SyntaxKind::SuperExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer);
                self.bump_into(outer);
                Some(outer)
            }
            SyntaxKind::ClassKeyword => {
                let outer = self.builder.composite(SyntaxKind::ClassLiteralExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer);
                self.bump_into(outer);
                Some(outer)
            }
            SyntaxKind::NewKeyword => {
                let dot = self.bump();
                Some(self.parse_new(Some((node, dot))))
            }
            SyntaxKind::Lt => {
                // Explicit type arguments on a method call:
                // `receiver.<T>method(...)`.
                let state = self.state();
                let outer = self.builder.composite(SyntaxKind::ReferenceExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer); // `.`
                match self.parse_type_argument_list() {
                    Some(args) if self.at(SyntaxKind::Identifier) => {
                        self.builder.push_child(outer, args);
                        self.bump_into(outer);
                        Some(outer)
                    }
                    _ => {
                        self.rollback(state);
                        None
                    }
                }
            }
            _ => {
                // Dangling dot: keep it on an incomplete reference so the
                // caret position survives in the tree.
                let outer = self.builder.composite(SyntaxKind::ReferenceExpr);
                self.builder.push_child(outer, node);
                self.bump_into(outer); // `.`
                self.error_into(outer, &messages::EXPECTED_IDENTIFIER);
                self.builder.add_flags(outer, NodeFlags::INCOMPLETE);
                Some(outer)
            }
        }
    }

    /// `node` followed by `[` `]` ... `.class`. Rolls back when the bracket
    /// run does not end in a class literal.
    fn try_extend_class_literal(&mut self, node: NodeId) -> Option<NodeId> {
        let state = self.state();
        let lit = self.builder.composite(SyntaxKind::ClassLiteralExpr);
        self.builder.push_child(lit, node);
        self.parse_array_suffixes(lit);
        if self.at(SyntaxKind::Dot) && self.lookahead(1) == SyntaxKind::ClassKeyword {
            self.bump_into(lit);
            self.bump_into(lit);
            Some(lit)
        } else {
            self.rollback(state);
            None
        }
    }

    // ========================================================================
    // new, argument lists, array initializers
    // ========================================================================

    /// `new` expression, optionally qualified (`outer.new Inner()`), in
    /// which case `qualifier` carries the receiver and the already-consumed
    /// dot leaf.
    pub(crate) fn parse_new(&mut self, qualifier: Option<(NodeId, NodeId)>) -> NodeId {
        let node = self.builder.composite(SyntaxKind::NewExpr);
        if let Some((receiver, dot)) = qualifier {
            self.builder.push_child(node, receiver);
            self.builder.push_child(node, dot);
        }
        self.bump_into(node); // `new`
        if self.at(SyntaxKind::Lt) {
            self.try_type_argument_list(node);
        }

        let primitive = self.token().is_primitive_type();
        if primitive {
            self.bump_into(node);
        } else {
            match self.parse_code_reference(true, true) {
                Some(reference) => self.builder.push_child(node, reference),
                None => {
                    self.error_into(node, &messages::EXPECTED_TYPE);
                    return node;
                }
            }
        }

        if self.at(SyntaxKind::LParen) && !primitive {
            let args = self.parse_argument_list();
            self.builder.push_child(node, args);
            if self.at(SyntaxKind::LBrace) {
                let anon = self.builder.composite(SyntaxKind::AnonymousClass);
                self.parse_class_body(anon);
                self.builder.push_child(node, anon);
            }
        } else if self.at(SyntaxKind::LBracket) {
            let mut any_dimension = false;
            while self.at(SyntaxKind::LBracket) {
                self.bump_into(node);
                if !self.at(SyntaxKind::RBracket) {
                    if self.expect_expression(node) {
                        any_dimension = true;
                    }
                }
                if !self.eat(node, SyntaxKind::RBracket) {
                    self.error_into(node, &messages::EXPECTED_RBRACKET);
                    self.builder.add_flags(node, NodeFlags::UNCLOSED);
                    break;
                }
            }
            if self.at(SyntaxKind::LBrace) {
                let init = self.parse_array_initializer();
                self.builder.push_child(node, init);
            } else if !any_dimension {
                self.error_into(node, &messages::EXPECTED_ARRAY_INITIALIZER);
            }
        } else {
            self.error_into(node, &messages::EXPECTED_LPAREN_OR_LBRACKET);
            self.builder.add_flags(node, NodeFlags::INCOMPLETE);
        }
        node
    }

    /// `( expr, expr, ... )`, tolerant of missing arguments and a missing
    /// close paren.
    pub(crate) fn parse_argument_list(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::LParen));
        let list = self.builder.composite(SyntaxKind::ArgumentList);
        self.bump_into(list);
        if self.eat(list, SyntaxKind::RParen) {
            return list;
        }
        loop {
            if self.at_eof() {
                self.unclosed(list, &messages::EXPECTED_RPAREN);
                break;
            }
            if !self.expect_expression(list)
                && !matches!(self.token(), SyntaxKind::Comma | SyntaxKind::RParen)
            {
                // Skip one junk token so the loop always advances.
                let junk = self.bump();
                let last = self.builder.child_count(list) - 1;
                let err = self.builder.children(list)[last];
                self.builder.push_child(err, junk);
            }
            if self.eat(list, SyntaxKind::Comma) {
                continue;
            }
            if self.eat(list, SyntaxKind::RParen) {
                break;
            }
            self.report(&messages::EXPECTED_COMMA_OR_RPAREN, &[]);
            self.builder.add_flags(list, NodeFlags::UNCLOSED);
            break;
        }
        list
    }

    /// `{ value, value, ... }` with nested initializers.
    pub(crate) fn parse_array_initializer(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::LBrace));
        let init = self.builder.composite(SyntaxKind::ArrayInitializer);
        self.bump_into(init);
        loop {
            if self.eat(init, SyntaxKind::RBrace) {
                break;
            }
            if self.at_eof() {
                self.unclosed(init, &messages::EXPECTED_RBRACE);
                break;
            }
            let element = if self.at(SyntaxKind::LBrace) {
                Some(self.parse_array_initializer())
            } else {
                self.parse_expression()
            };
            match element {
                Some(element) => self.builder.push_child(init, element),
                None => {
                    self.error_eat_into(init, &messages::EXPECTED_VALUE);
                    continue;
                }
            }
            if self.eat(init, SyntaxKind::Comma) {
                continue;
            }
            if self.eat(init, SyntaxKind::RBrace) {
                break;
            }
            self.error_into(init, &messages::EXPECTED_COMMA_OR_RBRACE);
        }
        init
    }
}
