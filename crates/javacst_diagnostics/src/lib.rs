//! javacst_diagnostics: diagnostic message keys and error reporting.
//!
//! The parser never formats error prose inline; it names a symbolic
//! [`MessageKey`] and the key's template is expanded here. Error tree nodes
//! carry the expanded text, and a [`DiagnosticCollection`] accumulates every
//! diagnostic raised during a parse.

use javacst_core::text::TextRange;
use javacst_core::LineMap;
use std::fmt;

pub mod messages;

/// A diagnostic message template identified by a symbolic key.
///
/// Templates may contain `{0}`, `{1}`, ... placeholders.
#[derive(Debug, Clone, Copy)]
pub struct MessageKey {
    /// Symbolic key, e.g. `"expected.semicolon"`.
    pub key: &'static str,
    /// Human-readable template.
    pub template: &'static str,
}

/// Replace `{0}`, `{1}`, ... in a template with the given arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A realized diagnostic: expanded message text plus the source range it
/// applies to.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub key: &'static str,
    pub text: String,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn new(message: &MessageKey, args: &[&str], range: TextRange) -> Self {
        Self {
            key: message.key,
            text: format_message(message.template, args),
            range,
        }
    }

    /// Render as `line:col: text` using a line map for the source.
    pub fn render(&self, lines: &LineMap) -> String {
        let lc = lines.line_col_of(self.range.start);
        format!("{}:{}: {}", lc.line + 1, lc.col + 1, self.text)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.range, self.text)
    }
}

/// Diagnostics accumulated during a lex or parse call.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn report(&mut self, message: &MessageKey, args: &[&str], range: TextRange) {
        self.add(Diagnostic::new(message, args, range));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Drop diagnostics past `len`. Used to discard reports raised inside
    /// a speculative parse that was rolled back.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_placeholders() {
        assert_eq!(
            format_message("'{0}' expected, got '{1}'", &[";", "}"]),
            "';' expected, got '}'"
        );
    }

    #[test]
    fn render_with_line_map() {
        let lines = LineMap::new("class A {\n  int x\n}\n");
        let d = Diagnostic::new(&messages::EXPECTED_SEMICOLON, &[], TextRange::new(17, 18));
        assert_eq!(d.render(&lines), "2:8: ';' expected");
    }
}
