//! The parser's diagnostic message set.
//!
//! Keys are stable identifiers; templates are the human text shown by
//! downstream renderers.

use crate::MessageKey;

macro_rules! message {
    ($name:ident, $key:literal, $template:literal) => {
        pub const $name: MessageKey = MessageKey {
            key: $key,
            template: $template,
        };
    };
}

message!(EXPECTED_IDENTIFIER, "expected.identifier", "Identifier expected");
message!(EXPECTED_SEMICOLON, "expected.semicolon", "';' expected");
message!(EXPECTED_RPAREN, "expected.rparen", "')' expected");
message!(EXPECTED_LPAREN, "expected.lparen", "'(' expected");
message!(EXPECTED_RBRACE, "expected.rbrace", "'}' expected");
message!(EXPECTED_LBRACE, "expected.lbrace", "'{' expected");
message!(EXPECTED_RBRACKET, "expected.rbracket", "']' expected");
message!(EXPECTED_GT, "expected.gt", "'>' expected");
message!(EXPECTED_COLON, "expected.colon", "':' expected");
message!(EXPECTED_WHILE, "expected.while", "'while' expected");
message!(EXPECTED_CATCH_OR_FINALLY, "expected.catch.or.finally", "'catch' or 'finally' expected");
message!(EXPECTED_EXPRESSION, "expected.expression", "Expression expected");
message!(EXPECTED_TYPE, "expected.type", "Type expected");
message!(EXPECTED_CLASS_OR_INTERFACE, "expected.class.or.interface", "Class or interface declaration expected");
message!(EXPECTED_PARAMETER, "expected.parameter", "Parameter expected");
message!(EXPECTED_TYPE_PARAMETER, "expected.type.parameter", "Type parameter expected");
message!(EXPECTED_STATEMENT, "expected.statement", "Statement expected");
message!(EXPECTED_IMPORT_REFERENCE, "expected.import.reference", "Identifier or '*' expected");
message!(EXPECTED_ENUM_CONSTANT, "expected.enum.constant", "Enum constant expected");
message!(EXPECTED_VALUE, "expected.value", "Value expected");
message!(EXPECTED_ARRAY_INITIALIZER, "expected.array.initializer", "Array initializer expected");
message!(EXPECTED_COMMA_OR_RPAREN, "expected.comma.or.rparen", "',' or ')' expected");
message!(EXPECTED_COMMA_OR_RBRACE, "expected.comma.or.rbrace", "',' or '}' expected");
message!(EXPECTED_LPAREN_OR_LBRACKET, "expected.lparen.or.lbracket", "'(' or '[' expected");
message!(EXPECTED_CASE_OR_RBRACE, "expected.case.or.rbrace", "'case', 'default' or '}' expected");
message!(UNEXPECTED_TOKENS, "unexpected.tokens", "Unexpected tokens");
message!(UNCLOSED_COMMENT, "unclosed.comment", "Unclosed comment");
message!(UNCLOSED_STRING, "unclosed.string", "Unclosed string literal");
message!(UNCLOSED_CHAR, "unclosed.char", "Unclosed character literal");
message!(MISSING_METHOD_BODY, "missing.method.body", "Method body expected");
