//! Analyzed-schema input model.
//!
//! These types describe what a SQL analyzer reports about a schema and its
//! queries: schemas, tables, enums, and per-query parameter and column
//! metadata. A [`Request`] is the complete input to one generation run.

use serde::{Deserialize, Serialize};

/// How a query binds and returns rows.
///
/// The variant decides the shape of the generated binding: whether a result
/// value exists at all, and whether it holds one row or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Returns exactly one row.
    #[serde(rename = ":one")]
    One,
    /// Returns any number of rows.
    #[serde(rename = ":many")]
    Many,
    /// Returns nothing.
    #[serde(rename = ":exec")]
    Exec,
    /// Returns a driver result handle.
    #[serde(rename = ":execresult")]
    ExecResult,
    /// Returns the number of affected rows.
    #[serde(rename = ":execrows")]
    ExecRows,
    /// Returns the last inserted row id.
    #[serde(rename = ":execlastid")]
    ExecLastId,
    /// Bulk-insert command fed from a slice of rows.
    #[serde(rename = ":copyfrom")]
    CopyFrom,
    /// Batched variant of [`Command::Exec`].
    #[serde(rename = ":batchexec")]
    BatchExec,
    /// Batched variant of [`Command::Many`].
    #[serde(rename = ":batchmany")]
    BatchMany,
    /// Batched variant of [`Command::One`].
    #[serde(rename = ":batchone")]
    BatchOne,
}

impl Command {
    /// Whether the command produces result rows that need a result shape.
    #[must_use]
    pub const fn returns_rows(self) -> bool {
        matches!(
            self,
            Self::One | Self::Many | Self::BatchMany | Self::BatchOne
        )
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::One => ":one",
            Self::Many => ":many",
            Self::Exec => ":exec",
            Self::ExecResult => ":execresult",
            Self::ExecRows => ":execrows",
            Self::ExecLastId => ":execlastid",
            Self::CopyFrom => ":copyfrom",
            Self::BatchExec => ":batchexec",
            Self::BatchMany => ":batchmany",
            Self::BatchOne => ":batchone",
        };
        f.write_str(name)
    }
}

/// A possibly schema-qualified name of a catalog object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    /// Catalog (database) name, usually empty.
    pub catalog: String,
    /// Schema name, empty when the object lives in the default schema.
    pub schema: String,
    /// Object name.
    pub name: String,
}

impl Identifier {
    /// Creates an identifier with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: String::new(),
            schema: String::new(),
            name: name.into(),
        }
    }

    /// Creates a schema-qualified identifier.
    #[must_use]
    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog: String::new(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// The `schema.name` form, or the bare name when no schema is set.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    /// Whether this reference points at `table`.
    ///
    /// An empty schema on `self` is resolved against `default_schema` before
    /// comparing; `table` is expected to carry its schema explicitly.
    #[must_use]
    pub fn same_table(&self, table: &Self, default_schema: &str) -> bool {
        let schema = if self.schema.is_empty() {
            default_schema
        } else {
            &self.schema
        };

        self.catalog == table.catalog && schema == table.schema && self.name == table.name
    }
}

/// A column as reported by the analyzer.
///
/// Columns appear in three places: table definitions, query results, and
/// query parameters (where the "column" describes the bound value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Column name; empty for unnamed expressions.
    pub name: String,
    /// Whether the column is declared NOT NULL.
    pub not_null: bool,
    /// Whether the column holds an array value.
    pub is_array: bool,
    /// Whether this is a named query parameter rather than a table column.
    pub is_named_param: bool,
    /// Declared type, possibly schema-qualified.
    pub type_ref: Identifier,
    /// Declared length for sized types, when the analyzer knows it.
    pub length: Option<i32>,
    /// Table the column belongs to, when it is traceable to one.
    pub table: Option<Identifier>,
    /// Table this result column embeds, set by an embedding annotation.
    pub embed_table: Option<Identifier>,
    /// Comment attached to the column definition.
    pub comment: String,
}

impl Column {
    /// Creates a column with a name and a type.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: Identifier::new(type_name),
            ..Self::default()
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column as an array.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Marks the column as a named query parameter.
    #[must_use]
    pub fn named_param(mut self) -> Self {
        self.is_named_param = true;
        self
    }

    /// Records the table the column comes from.
    #[must_use]
    pub fn from_table(mut self, table: Identifier) -> Self {
        self.table = Some(table);
        self
    }

    /// Marks the column as embedding all columns of `table`.
    #[must_use]
    pub fn embed(mut self, table: Identifier) -> Self {
        self.embed_table = Some(table);
        self
    }
}

/// A positional query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    /// 1-based placeholder position.
    pub number: i32,
    /// Description of the bound value.
    pub column: Column,
}

impl Parameter {
    /// Creates a parameter at `number` binding `column`.
    #[must_use]
    pub fn new(number: i32, column: Column) -> Self {
        Self { number, column }
    }
}

/// An enum type declared in the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumDef {
    /// Type name within its schema.
    pub name: String,
    /// Declared values, in declaration order.
    pub vals: Vec<String>,
    /// Comment attached to the type.
    pub comment: String,
}

impl EnumDef {
    /// Creates an enum type with no values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vals: Vec::new(),
            comment: String::new(),
        }
    }

    /// Appends a declared value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.vals.push(value.into());
        self
    }
}

/// A table declared in the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDef {
    /// Table identity; the schema part is filled in by the analyzer.
    pub rel: Identifier,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Comment attached to the table.
    pub comment: String,
}

impl TableDef {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(rel: Identifier) -> Self {
        Self {
            rel,
            columns: Vec::new(),
            comment: String::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// One schema (namespace) of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    /// Schema name.
    pub name: String,
    /// Tables declared in the schema.
    pub tables: Vec<TableDef>,
    /// Enum types declared in the schema.
    pub enums: Vec<EnumDef>,
    /// Comment attached to the schema.
    pub comment: String,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            enums: Vec::new(),
            comment: String::new(),
        }
    }

    /// Appends a table.
    #[must_use]
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    /// Appends an enum type.
    #[must_use]
    pub fn enum_def(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    /// Whether this is an engine-internal schema that declaration extraction
    /// skips.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self.name.as_str(), "pg_catalog" | "information_schema")
    }
}

/// The analyzed database catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Catalog (database) name.
    pub name: String,
    /// Schema objects that resolve without qualification.
    pub default_schema: String,
    /// All schemas, including system ones.
    pub schemas: Vec<Schema>,
}

impl Catalog {
    /// Creates an empty catalog with a default schema name.
    #[must_use]
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            default_schema: default_schema.into(),
            schemas: Vec::new(),
        }
    }

    /// Appends a schema.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }
}

/// One analyzed query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Query name from the source annotation.
    pub name: String,
    /// Binding command; `None` when the annotation was missing.
    pub cmd: Option<Command>,
    /// The SQL text with placeholders.
    pub text: String,
    /// Comment lines attached to the query, without comment markers.
    pub comments: Vec<String>,
    /// Source file the query was read from.
    pub filename: String,
    /// Result columns, in SELECT order.
    pub columns: Vec<Column>,
    /// Bound parameters, in placeholder order.
    pub params: Vec<Parameter>,
    /// Target table for INSERT statements, when the analyzer detects one.
    pub insert_into_table: Option<Identifier>,
}

impl Query {
    /// Creates a query with a name, a command, and its SQL text.
    #[must_use]
    pub fn new(name: impl Into<String>, cmd: Command, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: Some(cmd),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Appends a result column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a bound parameter at placeholder position `number`.
    #[must_use]
    pub fn param(mut self, number: i32, column: Column) -> Self {
        self.params.push(Parameter::new(number, column));
        self
    }

    /// Appends a comment line.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Records the source file.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

/// A complete generation request: the catalog plus the queries to bind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    /// The analyzed catalog.
    pub catalog: Catalog,
    /// Queries to generate bindings for.
    pub queries: Vec<Query>,
}

impl Request {
    /// Creates a request with no queries.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            queries: Vec::new(),
        }
    }

    /// Appends a query.
    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_table_applies_default_schema() {
        let table = Identifier::with_schema("main", "authors");

        assert!(Identifier::new("authors").same_table(&table, "main"));
        assert!(Identifier::with_schema("main", "authors").same_table(&table, "other"));
        assert!(!Identifier::new("authors").same_table(&table, "other"));
        assert!(!Identifier::new("books").same_table(&table, "main"));
    }

    #[test]
    fn same_table_compares_catalogs() {
        let mut reference = Identifier::with_schema("main", "authors");
        reference.catalog = "db1".to_string();

        assert!(!reference.same_table(&Identifier::with_schema("main", "authors"), "main"));
    }

    #[test]
    fn qualified_name_skips_empty_schema() {
        assert_eq!(Identifier::new("serial").qualified_name(), "serial");
        assert_eq!(
            Identifier::with_schema("pg_catalog", "int4").qualified_name(),
            "pg_catalog.int4"
        );
    }

    #[test]
    fn returns_rows_matches_row_commands() {
        assert!(Command::One.returns_rows());
        assert!(Command::Many.returns_rows());
        assert!(Command::BatchOne.returns_rows());
        assert!(Command::BatchMany.returns_rows());
        assert!(!Command::Exec.returns_rows());
        assert!(!Command::CopyFrom.returns_rows());
        assert!(!Command::ExecRows.returns_rows());
    }

    #[test]
    fn command_round_trips_through_serde() {
        let encoded = serde_json::to_string(&Command::Many).unwrap();
        assert_eq!(encoded, "\":many\"");

        let decoded: Command = serde_json::from_str("\":copyfrom\"").unwrap();
        assert_eq!(decoded, Command::CopyFrom);
    }

    #[test]
    fn query_decodes_with_missing_fields() {
        let query: Query = serde_json::from_str(r#"{"name": "GetAuthor"}"#).unwrap();

        assert_eq!(query.name, "GetAuthor");
        assert!(query.cmd.is_none());
        assert!(query.columns.is_empty());
    }

    #[test]
    fn system_schemas_are_flagged() {
        assert!(Schema::new("pg_catalog").is_system());
        assert!(Schema::new("information_schema").is_system());
        assert!(!Schema::new("public").is_system());
    }
}
