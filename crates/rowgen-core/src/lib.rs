//! # rowgen-core
//!
//! The catalog-to-declaration assembly engine behind rowgen's source
//! generators.
//!
//! This crate provides:
//! - Enum and record extraction from a schema catalog
//! - Query assembly: argument and result shapes, record reuse, embedded rows
//! - Offset and cursor (keyset) pagination SQL synthesis
//!
//! Language-specific concerns stay out: a [`TypeResolver`] supplied by the
//! caller maps catalog column types to target type names, and the output is
//! a plain [`Generated`] tree of declarations for a renderer to print.
//!
//! ## Assembling declarations
//!
//! ```rust
//! use rowgen_core::{
//!     Catalog, Column, Command, Identifier, Options, Query, Request, Schema,
//!     TableDef, TypeResolver,
//! };
//!
//! struct IntResolver;
//!
//! impl TypeResolver for IntResolver {
//!     fn resolve(&self, column: &Column) -> String {
//!         match column.type_ref.name.as_str() {
//!             "text" => "String".to_string(),
//!             _ => "i64".to_string(),
//!         }
//!     }
//! }
//!
//! let authors = TableDef::new(Identifier::new("authors"))
//!     .column(Column::new("id", "integer").not_null())
//!     .column(Column::new("name", "text").not_null());
//! let catalog = Catalog::new("main").schema(Schema::new("main").table(authors));
//!
//! let request = Request::new(catalog).query(
//!     Query::new("GetAuthor", Command::One, "SELECT id, name FROM authors WHERE id = $1")
//!         .column(Column::new("id", "integer").not_null().from_table(Identifier::new("authors")))
//!         .column(Column::new("name", "text").not_null().from_table(Identifier::new("authors")))
//!         .param(1, Column::new("id", "integer").not_null()),
//! );
//!
//! let generated = rowgen_core::generate(&request, &Options::default(), &IntResolver).unwrap();
//!
//! // The query's result shape matches the `authors` model, so it is reused
//! // instead of getting a dedicated row record.
//! assert_eq!(generated.records[0].name, "Author");
//! assert_eq!(generated.queries[0].method_name, "get_author");
//! ```

pub mod catalog;
pub mod embed;
pub mod enums;
pub mod error;
pub mod inflection;
pub mod model;
pub mod naming;
pub mod options;
pub mod pagination;
pub mod queries;
pub mod records;
pub mod resolve;

pub use catalog::{
    Catalog, Column, Command, EnumDef, Identifier, Parameter, Query, Request, Schema, TableDef,
};
pub use error::{Error, Result};
pub use model::{
    CursorField, EnumConstant, EnumDecl, Field, Generated, QueryDecl, QueryValue, RecordDecl,
};
pub use options::{CaseStyle, Options};
pub use resolve::{TypeResolver, UNKNOWN_TYPE};

/// Runs the full assembly pipeline over a request.
///
/// Enums and records come straight from the catalog; queries are assembled
/// against those records, and pagination then adds the page and connection
/// records that paginated queries return.
///
/// # Errors
///
/// Fails when a pagination directive is invalid for its query or when
/// same-named result columns cannot agree on a type; see [`Error`] for the
/// full list.
pub fn generate(
    request: &Request,
    options: &Options,
    resolver: &dyn TypeResolver,
) -> Result<Generated> {
    let enums = enums::build_enums(&request.catalog, options);
    let mut records = records::build_records(&request.catalog, options, resolver);
    let queries = queries::build_queries(request, options, resolver, &records)?;
    pagination::add_page_records(&mut records, &queries);

    Ok(Generated {
        enums,
        records,
        queries,
    })
}
