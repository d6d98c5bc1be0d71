//! Error types for the generation pipeline.

/// Errors that can occur while assembling declarations from a generation
/// request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two same-named fields in one record resolved to different target types.
    #[error("field '{field}' has incompatible types: {first}, {second}")]
    IncompatibleFieldTypes {
        /// The shared field name.
        field: String,
        /// Type of the field that triggered the conflict.
        first: String,
        /// Type recorded for an earlier field with the same name.
        second: String,
    },

    /// A pagination directive was placed on a query that does not return
    /// multiple rows.
    #[error("query '{0}' is paginated but does not return multiple rows")]
    PaginatedNotMany(String),

    /// A paginated query already contains a LIMIT clause.
    #[error("query '{0}' is paginated: using LIMIT in the query is forbidden")]
    PaginatedHasLimit(String),

    /// A paginated query already contains an OFFSET clause.
    #[error("query '{0}' is paginated: using OFFSET in the query is forbidden")]
    PaginatedHasOffset(String),

    /// Cursor pagination needs at least two result columns to build a stable
    /// ordering.
    #[error("query '{0}' uses cursor pagination but returns fewer than two columns")]
    CursorTooFewColumns(String),

    /// Cursor pagination synthesizes its own ORDER BY clause and rejects
    /// queries that already carry one.
    #[error("query '{0}' uses cursor pagination and must not contain an ORDER BY clause")]
    CursorHasOrderBy(String),

    /// The cursor comment does not carry a usable `cursor:` marker.
    #[error("query '{query}' has an invalid cursor comment '{comment}': expected a single 'cursor:' marker, e.g. 'paginated: cursor:-created_at,id'")]
    InvalidCursorComment {
        /// Name of the offending query.
        query: String,
        /// The directive comment as written.
        comment: String,
    },

    /// A cursor-paginated query does not produce a record result to take
    /// cursor fields from.
    #[error("query '{0}' uses cursor pagination but does not return a record")]
    CursorWithoutRecord(String),

    /// A field named in the cursor directive does not exist in the result
    /// record.
    #[error("query '{0}' names cursor fields that are missing from its result record")]
    CursorFieldNotFound(String),

    /// Generator options could not be decoded.
    #[error("invalid generator options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;
