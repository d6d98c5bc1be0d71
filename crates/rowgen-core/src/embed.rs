//! Embedded-record resolution.
//!
//! A result column can embed a whole table instead of a single value. The
//! embed is resolved against the already-extracted table records by
//! source-table identity, and the matching record's fields are copied into
//! the embedding field so later passes can mutate them freely.

use crate::catalog::Identifier;
use crate::model::{Field, RecordDecl};

/// A resolved embed: the record it points at and a copy of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRecord {
    /// Name of the embedded record declaration.
    pub record_name: String,
    /// Copies of the embedded record's fields.
    pub fields: Vec<Field>,
}

/// Resolves an embed annotation against the extracted table records.
///
/// An empty schema on the annotation is resolved against `default_schema`.
/// Returns `None` when the annotation is absent or no record matches; an
/// unresolved embed leaves the column to be treated as a plain value.
#[must_use]
pub fn resolve_embed(
    embed: Option<&Identifier>,
    records: &[RecordDecl],
    default_schema: &str,
) -> Option<EmbeddedRecord> {
    let embed = embed?;

    records
        .iter()
        .find(|record| {
            record
                .table
                .as_ref()
                .is_some_and(|table| embed.same_table(table, default_schema))
        })
        .map(|record| EmbeddedRecord {
            record_name: record.name.clone(),
            fields: record.fields.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, schema: &str, table: &str) -> RecordDecl {
        RecordDecl {
            name: name.to_string(),
            table: Some(Identifier::with_schema(schema, table)),
            comment: String::new(),
            fields: vec![Field {
                name: "id".to_string(),
                db_name: "id".to_string(),
                type_name: "i64".to_string(),
                ..Field::default()
            }],
        }
    }

    #[test]
    fn embed_matches_by_table_identity() {
        let records = vec![
            record("Author", "main", "authors"),
            record("Book", "main", "books"),
        ];

        let embed = Identifier::new("books");
        let resolved = resolve_embed(Some(&embed), &records, "main").unwrap();

        assert_eq!(resolved.record_name, "Book");
        assert_eq!(resolved.fields.len(), 1);
    }

    #[test]
    fn embed_respects_explicit_schema() {
        let records = vec![
            record("Author", "main", "authors"),
            record("ArchiveAuthor", "archive", "authors"),
        ];

        let embed = Identifier::with_schema("archive", "authors");
        let resolved = resolve_embed(Some(&embed), &records, "main").unwrap();

        assert_eq!(resolved.record_name, "ArchiveAuthor");
    }

    #[test]
    fn unmatched_embed_resolves_to_none() {
        let records = vec![record("Author", "main", "authors")];

        let embed = Identifier::new("missing");
        assert!(resolve_embed(Some(&embed), &records, "main").is_none());
        assert!(resolve_embed(None, &records, "main").is_none());
    }

    #[test]
    fn fields_are_copies_not_references() {
        let records = vec![record("Author", "main", "authors")];

        let embed = Identifier::new("authors");
        let mut resolved = resolve_embed(Some(&embed), &records, "main").unwrap();
        resolved.fields[0].name = "renamed".to_string();

        assert_eq!(records[0].fields[0].name, "id");
    }
}
