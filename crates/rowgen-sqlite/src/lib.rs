//! # rowgen-sqlite
//!
//! SQLite type resolution for `rowgen-core`.
//!
//! SQLite columns declare a [type affinity] rather than a strict type, so
//! the mapping goes by the declared name: the integer family collapses to
//! `i64`, the character family to `String`, and declarations the resolver
//! does not recognize fall back to the dynamic placeholder type. Nullable
//! columns wrap in `Option<...>`; `BLOB` maps to `Vec<u8>` and wraps like
//! any other type, while `ANY` stays unwrapped since the placeholder can
//! hold nulls itself.
//!
//! [type affinity]: https://www.sqlite.org/datatype3.html
//!
//! ## Example
//!
//! ```rust
//! use rowgen_core::{Column, TypeResolver};
//! use rowgen_sqlite::SqliteResolver;
//!
//! let resolver = SqliteResolver::new();
//!
//! assert_eq!(resolver.resolve(&Column::new("id", "INTEGER").not_null()), "i64");
//! assert_eq!(resolver.resolve(&Column::new("bio", "TEXT")), "Option<String>");
//! ```

use rowgen_core::{Column, TypeResolver, UNKNOWN_TYPE};
use tracing::debug;

const CHARACTER_PREFIXES: [&str; 6] = [
    "character",
    "varchar",
    "varyingcharacter",
    "nchar",
    "nativecharacter",
    "nvarchar",
];

/// Maps declared SQLite column types to Rust type names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteResolver;

impl SqliteResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TypeResolver for SqliteResolver {
    fn resolve(&self, column: &Column) -> String {
        let declared = column.type_ref.qualified_name().to_lowercase();

        if declared == "any" {
            return UNKNOWN_TYPE.to_string();
        }

        let base = match declared.as_str() {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint"
            | "unsignedbigint" | "int2" | "int8" => "i64",
            "blob" => "Vec<u8>",
            "real" | "double" | "doubleprecision" | "float" | "numeric" => "f64",
            "boolean" | "bool" => "bool",
            "date" | "datetime" | "timestamp" => "chrono::NaiveDateTime",
            // `string` is the synthetic cursor parameter type from pagination.
            "text" | "clob" | "string" => "String",
            // Sized declarations carry their length, so the rest goes by prefix.
            other if CHARACTER_PREFIXES.iter().any(|p| other.starts_with(p)) => "String",
            other if other.starts_with("decimal") => "f64",
            other => {
                debug!("unknown SQLite type: {other}");
                UNKNOWN_TYPE
            }
        };

        if column.not_null || column.is_array {
            base.to_string()
        } else {
            format!("Option<{base}>")
        }
    }
}
