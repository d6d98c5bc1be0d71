//! Identifier normalization for generated declarations.
//!
//! Catalog names carry characters and casings that are not valid in generated
//! code. The functions here map them onto the target conventions: UpperCamel
//! for types, snake_case for fields and methods, UPPER_SNAKE for constants.
//! Exact-name overrides from [`Options::rename`] win over every rule and are
//! emitted verbatim.

use std::collections::HashSet;
use std::sync::LazyLock;

use convert_case::{Case, Casing};

use crate::options::{CaseStyle, Options};

/// Identifiers that need a trailing underscore to be usable in generated
/// code.
static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
        "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
        "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
        "priv", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
        "try", "type", "typeof", "union", "unsafe", "unsized", "use", "virtual", "where",
        "while", "yield",
    ]
    .into_iter()
    .collect()
});

/// Replaces every character that cannot appear in an identifier with `_`.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Prefixes names that start with a digit so they parse as identifiers.
fn prefix_digit(name: String) -> String {
    if name.chars().next().is_some_and(char::is_numeric) {
        format!("_{name}")
    } else {
        name
    }
}

/// Appends an underscore to reserved words.
#[must_use]
pub fn escape_reserved(name: String) -> String {
    if RESERVED_WORDS.contains(name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

fn snake_ident(raw: &str) -> String {
    escape_reserved(prefix_digit(sanitize(raw).to_case(Case::Snake)))
}

/// Normalizes a catalog name into a type name.
///
/// A non-empty [`Options::rename`] entry for the exact input short-circuits
/// every rule.
#[must_use]
pub fn type_name(raw: &str, options: &Options) -> String {
    if let Some(rename) = options.rename.get(raw) {
        if !rename.is_empty() {
            return rename.clone();
        }
    }
    prefix_digit(sanitize(raw).to_case(Case::UpperCamel))
}

/// Normalizes a column name into a record field name.
///
/// A non-empty [`Options::rename`] entry for the exact input short-circuits
/// every rule, including reserved-word escaping.
#[must_use]
pub fn field_name(raw: &str, options: &Options) -> String {
    if let Some(rename) = options.rename.get(raw) {
        if !rename.is_empty() {
            return rename.clone();
        }
    }
    snake_ident(raw)
}

/// Normalizes a parameter name into an argument name.
#[must_use]
pub fn arg_name(raw: &str) -> String {
    snake_ident(raw)
}

/// Normalizes a query name into a method name.
#[must_use]
pub fn method_name(raw: &str) -> String {
    snake_ident(raw)
}

/// Normalizes a query name into a constant name for its SQL text.
#[must_use]
pub fn constant_name(raw: &str) -> String {
    prefix_digit(sanitize(raw).to_case(Case::Constant))
}

/// Reduces an enum value to the characters usable in a constant name.
///
/// Separator-like characters become underscores, everything else outside
/// `[A-Za-z0-9_]` is dropped. The result may be empty; the caller falls back
/// to an index-derived name.
#[must_use]
pub fn enum_value_ident(value: &str) -> String {
    value
        .replace(['-', ':', '/'], "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Applies one of the supported case styles to a name.
#[must_use]
pub fn case_style(name: &str, style: CaseStyle) -> String {
    match style {
        CaseStyle::None => name.to_string(),
        CaseStyle::Camel => name.to_case(Case::Camel),
        CaseStyle::Pascal => name.to_case(Case::UpperCamel),
        CaseStyle::Snake => name.to_case(Case::Snake),
        CaseStyle::Kebab => name.to_case(Case::Kebab),
    }
}

/// Renders a storage name as a serialization tag per the configured style.
#[must_use]
pub fn serde_tag_name(name: &str, options: &Options) -> String {
    case_style(name, options.serde_tags_case_style)
}
