#![allow(dead_code)]

use rowgen_core::{
    Catalog, Column, Error, Generated, Identifier, Options, RecordDecl, Request, Schema, TableDef,
    TypeResolver, UNKNOWN_TYPE,
};

/// Resolver used across the integration tests: a handful of storage types
/// mapped to Rust names, `Option<...>` for nullable columns, and the
/// dynamic fallback for `any`.
pub struct TestResolver;

impl TypeResolver for TestResolver {
    fn resolve(&self, column: &Column) -> String {
        let base = match column.type_ref.name.as_str() {
            "int" | "integer" | "bigint" => "i64",
            "text" | "string" => "String",
            "bool" | "boolean" => "bool",
            "real" => "f64",
            "datetime" | "timestamp" => "chrono::NaiveDateTime",
            "any" => return UNKNOWN_TYPE.to_string(),
            other => return other.to_string(),
        };
        if column.not_null || column.is_array {
            base.to_string()
        } else {
            format!("Option<{base}>")
        }
    }
}

/// The `authors` table used by most fixtures: `id`, `name`, and a nullable
/// `bio`.
pub fn authors_table() -> TableDef {
    TableDef::new(Identifier::new("authors"))
        .column(Column::new("id", "integer").not_null())
        .column(Column::new("name", "text").not_null())
        .column(Column::new("bio", "text"))
}

/// A catalog holding just the `authors` table in the default schema.
pub fn authors_catalog() -> Catalog {
    Catalog::new("main").schema(Schema::new("main").table(authors_table()))
}

/// A non-null result column attributed to the `authors` table, the way the
/// analyzer reports columns selected straight from it.
pub fn authors_column(name: &str, type_name: &str) -> Column {
    Column::new(name, type_name)
        .not_null()
        .from_table(Identifier::new("authors"))
}

/// Same as [`authors_column`] but nullable.
pub fn nullable_authors_column(name: &str, type_name: &str) -> Column {
    Column::new(name, type_name).from_table(Identifier::new("authors"))
}

pub fn generate(request: &Request) -> Generated {
    generate_with(request, &Options::default())
}

pub fn generate_with(request: &Request, options: &Options) -> Generated {
    rowgen_core::generate(request, options, &TestResolver)
        .unwrap_or_else(|e| panic!("generation failed: {e}"))
}

pub fn generate_err(request: &Request) -> Error {
    rowgen_core::generate(request, &Options::default(), &TestResolver)
        .expect_err("expected generation to fail")
}

pub fn record<'a>(generated: &'a Generated, name: &str) -> &'a RecordDecl {
    generated
        .records
        .iter()
        .find(|record| record.name == name)
        .unwrap_or_else(|| {
            let names: Vec<_> = generated.records.iter().map(|r| r.name.as_str()).collect();
            panic!("no record named {name}, have {names:?}")
        })
}

pub fn field_names(record: &RecordDecl) -> Vec<&str> {
    record.fields.iter().map(|f| f.name.as_str()).collect()
}
