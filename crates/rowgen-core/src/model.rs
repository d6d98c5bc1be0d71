//! Generated-declaration model.
//!
//! The output side of a generation run: enum declarations, record
//! declarations, and per-query bindings. Everything here is plain data so a
//! rendering layer can turn it into source text without consulting the
//! catalog again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Column, Command, Identifier};

/// A single variant of a generated enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Variant name.
    pub name: String,
    /// The literal value as declared in the schema.
    pub value: String,
}

/// A generated enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Type name.
    pub name: String,
    /// Comment from the schema, empty when there was none.
    pub comment: String,
    /// Variants in declaration order.
    pub constants: Vec<EnumConstant>,
}

/// A field of a generated record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Storage name the field was derived from.
    pub db_name: String,
    /// Resolved target type.
    pub type_name: String,
    /// Comment from the schema, empty when there was none.
    pub comment: String,
    /// Serialization tags keyed by tag kind (`db`, `serde`).
    pub tags: BTreeMap<String, String>,
    /// The source column, kept for downstream layers that need its metadata.
    pub column: Option<Column>,
    /// Fields of the embedded record when this field embeds one.
    pub embed_fields: Option<Vec<Field>>,
}

/// A generated record declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDecl {
    /// Type name.
    pub name: String,
    /// Source table for table-derived records, `None` for synthesized ones.
    pub table: Option<Identifier>,
    /// Comment from the schema, empty when there was none.
    pub comment: String,
    /// Fields in column order.
    pub fields: Vec<Field>,
}

/// One side of a query binding: its argument or its result.
///
/// A value is either a single scalar or a record. For records, `emit` says
/// whether the declaration must be rendered alongside the query or already
/// exists elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryValue {
    /// Binding name in the generated signature.
    pub name: String,
    /// Storage name the value maps to, empty for records.
    pub db_name: String,
    /// Resolved target type for scalars, the record name otherwise.
    pub type_name: String,
    /// The record shape, `None` for scalars.
    pub record: Option<RecordDecl>,
    /// Whether the record declaration is rendered with this query.
    pub emit: bool,
    /// Whether the value is passed or returned by reference.
    pub by_ref: bool,
    /// Source column for scalar arguments.
    pub column: Option<Column>,
}

impl QueryValue {
    /// Creates a scalar value.
    #[must_use]
    pub fn scalar(
        name: impl Into<String>,
        db_name: impl Into<String>,
        type_name: impl Into<String>,
        column: Option<Column>,
    ) -> Self {
        Self {
            name: name.into(),
            db_name: db_name.into(),
            type_name: type_name.into(),
            record: None,
            emit: false,
            by_ref: false,
            column,
        }
    }

    /// Creates a record value.
    #[must_use]
    pub fn record(name: impl Into<String>, record: RecordDecl, emit: bool, by_ref: bool) -> Self {
        Self {
            name: name.into(),
            db_name: String::new(),
            type_name: record.name.clone(),
            record: Some(record),
            emit,
            by_ref,
            column: None,
        }
    }

    /// Whether this value is a record rather than a scalar.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        self.record.is_some()
    }
}

/// A result-record field participating in a cursor, with its sort direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorField {
    /// The record field the cursor orders by.
    pub field: Field,
    /// `false` when the directive prefixed the field with `-`.
    pub ascending: bool,
}

/// A generated query binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDecl {
    /// Binding command from the source annotation.
    pub cmd: Command,
    /// Constant name holding the SQL text.
    pub constant_name: String,
    /// Name of the prepared-statement handle.
    pub stmt_field_name: String,
    /// Method name.
    pub method_name: String,
    /// Whether the binding is visible outside its module.
    pub exported: bool,
    /// Source file the query came from.
    pub source_file: String,
    /// The SQL text as written.
    pub sql: String,
    /// Documentation lines, already stripped of directive comments.
    pub comments: Vec<String>,
    /// Target table for INSERT statements, when known.
    pub insert_into_table: Option<Identifier>,
    /// Argument shape, `None` for parameterless queries.
    pub arg: Option<QueryValue>,
    /// Result shape, `None` for queries that return nothing.
    pub ret: Option<QueryValue>,
    /// Whether the query is paginated at all.
    pub paginated: bool,
    /// Whether pagination is cursor-based rather than offset-based.
    pub cursor_paginated: bool,
    /// The rewritten SQL for paginated queries.
    pub sql_paginated: Option<String>,
    /// Cursor fields in directive order, empty unless cursor-paginated.
    pub cursor_fields: Vec<CursorField>,
}

/// Everything one generation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    /// Enum declarations, sorted by name.
    pub enums: Vec<EnumDecl>,
    /// Record declarations, sorted by name.
    pub records: Vec<RecordDecl>,
    /// Query bindings, sorted by method name.
    pub queries: Vec<QueryDecl>,
}
