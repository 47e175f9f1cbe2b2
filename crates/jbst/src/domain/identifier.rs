//! JavaScript identifier validation for template names and data item keys.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::BindingError;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// ECMAScript reserved words, literals and future reserved words. Sorted for binary search.
const RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Returns whether `ident` is usable as a script variable reference.
///
/// When `nested` is set, dotted paths such as `App.Views.Item` are accepted as long as every
/// segment is itself a valid identifier.
pub fn is_valid_identifier(ident: &str, nested: bool) -> bool {
    if ident.is_empty() {
        return false;
    }

    if nested {
        ident.split('.').all(is_valid_segment)
    } else {
        is_valid_segment(ident)
    }
}

/// Trim and validate an identifier, returning the normalized form.
///
/// An empty (or all-whitespace) input yields an empty string rather than an error; callers that
/// require a value check for emptiness at render time.
pub fn ensure_valid_identifier(ident: &str, nested: bool) -> Result<String, BindingError> {
    let trimmed = ident.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    if !is_valid_identifier(trimmed, nested) {
        return Err(BindingError::InvalidIdentifier(trimmed.to_owned()));
    }

    Ok(trimmed.to_owned())
}

fn is_valid_segment(segment: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(segment) && RESERVED_WORDS.binary_search(&segment).is_err()
}
