//! Generator options.
//!
//! Options arrive as a JSON blob alongside the generation request. Every
//! knob is explicit; unknown keys are ignored and missing keys fall back to
//! the defaults below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Case style applied to serialization tag names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    /// Leave the name as written in the schema.
    #[default]
    None,
    /// `camelCase`.
    Camel,
    /// `PascalCase`.
    Pascal,
    /// `snake_case`.
    Snake,
    /// `kebab-case`.
    Kebab,
}

/// Options controlling naming, tagging, and binding shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Use table names verbatim instead of singularizing them.
    pub emit_exact_table_names: bool,
    /// Table names the singularizer must leave untouched.
    pub inflection_exclude_table_names: Vec<String>,
    /// Attach a `db` tag carrying the storage name to every record field.
    pub emit_db_tags: bool,
    /// Attach a `serde` tag to every record field.
    pub emit_serde_tags: bool,
    /// Case style for `serde` tag values.
    pub serde_tags_case_style: CaseStyle,
    /// Parameter count at or below which a grouped params record is
    /// expanded positionally instead of being declared. `0` disables scalar
    /// binding for single parameters; a negative limit keeps grouped
    /// records always emitted.
    pub query_parameter_limit: i32,
    /// Pass grouped params records by reference.
    pub emit_params_struct_refs: bool,
    /// Return result records by reference.
    pub emit_result_struct_refs: bool,
    /// Make generated query bindings visible outside their module.
    pub emit_exported_queries: bool,
    /// Repeat the SQL text in the binding's documentation.
    pub emit_sql_as_comment: bool,
    /// Exact-name overrides applied before any normalization.
    pub rename: BTreeMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            emit_exact_table_names: false,
            inflection_exclude_table_names: Vec::new(),
            emit_db_tags: false,
            emit_serde_tags: false,
            serde_tags_case_style: CaseStyle::None,
            query_parameter_limit: 1,
            emit_params_struct_refs: false,
            emit_result_struct_refs: false,
            emit_exported_queries: false,
            emit_sql_as_comment: false,
            rename: BTreeMap::new(),
        }
    }
}

impl Options {
    /// Decodes options from the raw JSON blob of a generation request.
    ///
    /// An empty blob yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidOptions`] when the blob is not valid
    /// JSON for this shape.
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_yields_defaults() {
        let options = Options::from_json(b"").unwrap();

        assert_eq!(options, Options::default());
        assert_eq!(options.query_parameter_limit, 1);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let options =
            Options::from_json(br#"{"emit_db_tags": true, "query_parameter_limit": 3}"#).unwrap();

        assert!(options.emit_db_tags);
        assert_eq!(options.query_parameter_limit, 3);
        assert!(!options.emit_serde_tags);
        assert!(options.rename.is_empty());
    }

    #[test]
    fn case_style_decodes_lowercase_names() {
        let options = Options::from_json(br#"{"serde_tags_case_style": "camel"}"#).unwrap();

        assert_eq!(options.serde_tags_case_style, CaseStyle::Camel);
    }

    #[test]
    fn rename_map_decodes() {
        let options =
            Options::from_json(br#"{"rename": {"authors": "Writer", "uuid": ""}}"#).unwrap();

        assert_eq!(options.rename.get("authors").map(String::as_str), Some("Writer"));
        assert_eq!(options.rename.get("uuid").map(String::as_str), Some(""));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(Options::from_json(b"{not json").is_err());
    }
}
