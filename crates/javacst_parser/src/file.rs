//! File-scope parsing: the package statement, the import list, and the
//! top-level declaration driver.

use javacst_diagnostics::messages;
use javacst_tree::{NodeId, SyntaxKind};

use crate::decl::DeclContext;
use crate::parser::{ErrorGroup, Parser};

impl<'t> Parser<'t> {
    /// Parse a whole compilation unit. Total: consumes every token and
    /// always returns a `JavaFile` node.
    pub(crate) fn parse_file(&mut self) -> NodeId {
        let file = self.builder.composite(SyntaxKind::JavaFile);

        // Package statement, possibly annotated (`package-info.java`).
        // Annotations that turn out to belong to a declaration instead are
        // released by the rollback.
        let state = self.state();
        let modifiers = self.parse_modifier_list();
        if self.at(SyntaxKind::PackageKeyword) {
            let pkg = self.builder.composite(SyntaxKind::PackageStatement);
            self.builder.push_child(pkg, modifiers);
            self.bump_into(pkg); // `package`
            match self.parse_code_reference(true, false) {
                Some(name) => self.builder.push_child(pkg, name),
                None => {
                    self.error_into(pkg, &messages::EXPECTED_IDENTIFIER);
                }
            }
            self.expect(pkg, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
            self.builder.push_child(file, pkg);
        } else {
            self.rollback(state);
        }

        let imports = self.builder.composite(SyntaxKind::ImportList);
        while self.at(SyntaxKind::ImportKeyword) {
            let import = self.parse_import_statement();
            self.builder.push_child(imports, import);
        }
        self.builder.push_child(file, imports);

        let mut group = ErrorGroup::Inactive;
        while !self.at_eof() {
            if self.at(SyntaxKind::Semicolon) {
                self.bump_into(file);
                group = ErrorGroup::Inactive;
                continue;
            }
            // Imports after the first declaration are misplaced but still
            // worth parsing as imports.
            if self.at(SyntaxKind::ImportKeyword) {
                let import = self.parse_import_statement();
                self.builder.push_child(file, import);
                group = ErrorGroup::Inactive;
                continue;
            }
            match self.parse_declaration(DeclContext::File) {
                Some(decl) => {
                    self.builder.push_child(file, decl);
                    group = ErrorGroup::Inactive;
                }
                None => group = self.junk_token(file, group),
            }
        }
        file
    }

    /// `import [static] a.b.C;` or the on-demand form `import a.b.*;`.
    pub(crate) fn parse_import_statement(&mut self) -> NodeId {
        debug_assert!(self.at(SyntaxKind::ImportKeyword));
        let node = self.builder.composite(SyntaxKind::ImportStatement);
        self.bump_into(node);
        self.eat(node, SyntaxKind::StaticKeyword);
        match self.parse_code_reference(false, false) {
            Some(reference) => {
                self.builder.push_child(node, reference);
                // The reference parser stops before `.` + non-identifier,
                // which is exactly where `.*` sits.
                if self.at(SyntaxKind::Dot) && self.lookahead(1) == SyntaxKind::Star {
                    self.bump_into(node);
                    self.bump_into(node);
                }
            }
            None => {
                self.error_into(node, &messages::EXPECTED_IMPORT_REFERENCE);
            }
        }
        self.expect(node, SyntaxKind::Semicolon, &messages::EXPECTED_SEMICOLON);
        node
    }
}
