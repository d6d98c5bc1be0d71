//! Pagination directive parsing and paginated SQL synthesis.
//!
//! A query opts into pagination with a comment starting with `paginated`;
//! adding `cursor` switches from offset mode to keyset mode. Offset mode
//! appends a `LIMIT`/`OFFSET` tail, keyset mode wraps the query in a
//! subquery with a lexicographic row comparison. Both modes feed their
//! bind positions from synthetic `limit`/`offset`/`cursor` parameters
//! appended to the query's parameter list.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Column, Command, Parameter, Query};
use crate::error::{Error, Result};
use crate::model::{CursorField, Field, QueryDecl, RecordDecl};

static LIMIT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+limit\s+").expect("valid LIMIT pattern"));
static OFFSET_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+offset\s+").expect("valid OFFSET pattern"));
static ORDER_BY_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+order\s+by\s").expect("valid ORDER BY pattern"));

/// What the pagination directive of a query said, if one was present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationFlags {
    /// A `paginated` directive was found.
    pub paginated: bool,
    /// The directive also selects cursor (keyset) mode.
    pub cursor: bool,
    /// The full directive comment, kept for cursor-field parsing.
    pub comment: String,
}

/// Whether a comment line is a pagination directive rather than
/// documentation.
pub(crate) fn is_directive(comment: &str) -> bool {
    comment.trim().starts_with("paginated")
}

/// Scans a query's comments for a pagination directive and validates the
/// query against it.
///
/// # Errors
///
/// For paginated queries: the command must be [`Command::Many`], and the SQL
/// text must not already contain `LIMIT` or `OFFSET`. Cursor mode
/// additionally requires at least two result columns and no pre-existing
/// `ORDER BY` (the rewrite supplies its own).
pub fn flags(query: &Query) -> Result<PaginationFlags> {
    let mut flags = PaginationFlags::default();
    for comment in &query.comments {
        let trimmed = comment.trim();
        if trimmed.starts_with("paginated") {
            flags.paginated = true;
            flags.cursor = trimmed.contains("cursor");
            flags.comment = trimmed.to_string();
            break;
        }
    }
    if !flags.paginated {
        return Ok(flags);
    }

    if query.cmd != Some(Command::Many) {
        return Err(Error::PaginatedNotMany(query.name.clone()));
    }
    if LIMIT_CLAUSE.is_match(&query.text) {
        return Err(Error::PaginatedHasLimit(query.name.clone()));
    }
    if OFFSET_CLAUSE.is_match(&query.text) {
        return Err(Error::PaginatedHasOffset(query.name.clone()));
    }
    if flags.cursor {
        if query.columns.len() < 2 {
            return Err(Error::CursorTooFewColumns(query.name.clone()));
        }
        if ORDER_BY_CLAUSE.is_match(&query.text) {
            return Err(Error::CursorHasOrderBy(query.name.clone()));
        }
    }
    Ok(flags)
}

/// The two parameters a paginated query binds beyond its own: `limit` plus
/// either `offset` or `cursor`.
///
/// Numbering continues after the query's `existing` parameters. Both are
/// flagged as named parameters so field assembly does not suffix them
/// against same-named query parameters.
#[must_use]
pub fn synthetic_params(cursor: bool, existing: usize) -> Vec<Parameter> {
    let first = i32::try_from(existing + 1).unwrap_or(i32::MAX);
    let second = first.saturating_add(1);

    let limit = Parameter::new(first, Column::new("limit", "int").not_null().named_param());
    let tail = if cursor {
        Parameter::new(
            second,
            Column::new("cursor", "string").not_null().named_param(),
        )
    } else {
        Parameter::new(second, Column::new("offset", "int").not_null().named_param())
    };
    vec![limit, tail]
}

/// Extracts the ordered cursor fields from a retained directive comment.
///
/// The comment must contain `cursor:` exactly once; what follows is a
/// comma-separated list of result-field storage names, each optionally
/// prefixed with `-` for descending order.
///
/// # Errors
///
/// Fails when the marker is missing or repeated, when the query has no
/// record result to take fields from, or when a listed name (or a stray
/// separator) does not resolve to a result field.
pub fn parse_cursor_fields(comment: &str, query: &QueryDecl) -> Result<Vec<CursorField>> {
    let parts: Vec<&str> = comment.split("cursor:").collect();
    if parts.len() != 2 {
        return Err(Error::InvalidCursorComment {
            query: query.method_name.clone(),
            comment: comment.to_string(),
        });
    }

    let record = query
        .ret
        .as_ref()
        .and_then(|ret| ret.record.as_ref())
        .ok_or_else(|| Error::CursorWithoutRecord(query.method_name.clone()))?;

    let entries: Vec<&str> = parts[1].split(',').collect();
    let mut fields = Vec::with_capacity(entries.len());
    for entry in &entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (name, ascending) = entry
            .strip_prefix('-')
            .map_or((entry, true), |rest| (rest, false));
        if let Some(field) = record.fields.iter().find(|field| field.db_name == name) {
            fields.push(CursorField {
                field: field.clone(),
                ascending,
            });
        }
    }
    // Unknown names and stray separators both leave the list short.
    if fields.len() != entries.len() {
        return Err(Error::CursorFieldNotFound(query.method_name.clone()));
    }
    Ok(fields)
}

fn argument_fields(query: &QueryDecl) -> &[Field] {
    query
        .arg
        .as_ref()
        .and_then(|arg| arg.record.as_ref())
        .map_or(&[], |record| record.fields.as_slice())
}

/// 1-based position of the last argument field with the given storage name.
///
/// Last wins: the synthetic pagination parameters are appended after any
/// same-named query parameters.
fn position_of(fields: &[Field], db_name: &str) -> usize {
    fields
        .iter()
        .rposition(|field| field.db_name == db_name)
        .map_or(0, |index| index + 1)
}

/// Appends the offset-mode tail to a paginated query's SQL.
///
/// The numbers are the 1-based positions of the synthetic `limit` and
/// `offset` fields within the argument record, for the caller to turn into
/// bind placeholders.
#[must_use]
pub fn offset_sql(query: &QueryDecl) -> String {
    let fields = argument_fields(query);
    let limit = position_of(fields, "limit");
    let offset = position_of(fields, "offset");
    format!("{} LIMIT {limit} OFFSET {offset}", query.sql)
}

/// Rewrites a paginated query's SQL for keyset iteration.
///
/// The original query becomes a subquery named `cursor_pagination_source`.
/// Cursor values bind after the argument record's fields, one per cursor
/// field in directive order; `$<cursor>=''` short-circuits the comparison so
/// an empty cursor returns the first page.
#[must_use]
pub fn cursor_sql(query: &QueryDecl, cursor_fields: &[CursorField]) -> String {
    let fields = argument_fields(query);
    let limit = position_of(fields, "limit");
    let cursor = position_of(fields, "cursor");

    let mut order = String::new();
    for (index, cursor_field) in cursor_fields.iter().enumerate() {
        if index > 0 {
            order.push_str(", ");
        }
        order.push_str(column_of(cursor_field));
        if !cursor_field.ascending {
            order.push_str(" DESC");
        }
    }

    // Lexicographic keyset comparison, built inside-out so each field nests
    // inside the equality branch of the one before it.
    let mut predicate = String::new();
    for (index, cursor_field) in cursor_fields.iter().enumerate().rev() {
        let column = column_of(cursor_field);
        let sign = if cursor_field.ascending { '>' } else { '<' };
        let value = cursor + index + 1;
        predicate = if predicate.is_empty() {
            format!("({column} {sign} ${value})")
        } else {
            format!("({column} {sign} ${value} OR ({column} = ${value} AND {predicate}))")
        };
    }

    format!(
        "SELECT cursor_pagination_source.* FROM ({}) AS cursor_pagination_source WHERE ${cursor}='' OR {predicate} ORDER BY {order} LIMIT ${limit}",
        query.sql
    )
}

fn column_of(cursor_field: &CursorField) -> &str {
    cursor_field
        .field
        .column
        .as_ref()
        .map_or(cursor_field.field.db_name.as_str(), |column| {
            column.name.as_str()
        })
}

/// Appends the page/connection records paginated queries return.
///
/// Offset-paginated queries get a `<Row>Page`; cursor-paginated queries get
/// a `<Row>Connection`, a `<Row>Edge`, a `<Row>Cursor` state record, and a
/// shared `PageInfo`. Each is added once, keyed by name, and the record list
/// is re-sorted afterwards.
pub fn add_page_records(records: &mut Vec<RecordDecl>, queries: &[QueryDecl]) {
    for query in queries {
        if !query.paginated {
            continue;
        }
        let Some(row) = query.ret.as_ref().and_then(|ret| ret.record.as_ref()) else {
            continue;
        };
        if query.cursor_paginated {
            add_connection_records(row, records, &query.cursor_fields);
        } else {
            add_page_record(row, records);
        }
    }
    records.sort_by(|a, b| a.name.cmp(&b.name));
}

fn synthetic_record(name: String, fields: Vec<Field>) -> RecordDecl {
    RecordDecl {
        name,
        table: None,
        comment: String::new(),
        fields,
    }
}

fn synthetic_field(name: &str, type_name: String) -> Field {
    Field {
        name: name.to_string(),
        type_name,
        ..Field::default()
    }
}

fn add_page_record(row: &RecordDecl, records: &mut Vec<RecordDecl>) {
    let page_name = format!("{}Page", row.name);
    if records.iter().any(|record| record.name == page_name) {
        return;
    }

    records.push(synthetic_record(
        page_name,
        vec![
            synthetic_field("items", format!("Vec<{}>", row.name)),
            synthetic_field("total", "i64".to_string()),
            synthetic_field("has_next", "bool".to_string()),
        ],
    ));
}

fn add_connection_records(
    row: &RecordDecl,
    records: &mut Vec<RecordDecl>,
    cursor_fields: &[CursorField],
) {
    let connection_name = format!("{}Connection", row.name);
    let edge_name = format!("{}Edge", row.name);

    if records.iter().any(|record| record.name == connection_name) {
        return;
    }

    // PageInfo is shared by every connection, declared once.
    if !records.iter().any(|record| record.name == "PageInfo") {
        records.push(synthetic_record(
            "PageInfo".to_string(),
            vec![
                synthetic_field("start_cursor", "String".to_string()),
                synthetic_field("end_cursor", "String".to_string()),
                synthetic_field("has_next_page", "bool".to_string()),
                synthetic_field("has_previous_page", "bool".to_string()),
            ],
        ));
    }

    records.push(synthetic_record(
        connection_name,
        vec![
            synthetic_field("edges", format!("Vec<{edge_name}>")),
            synthetic_field("page_info", "PageInfo".to_string()),
        ],
    ));
    records.push(synthetic_record(
        edge_name,
        vec![
            synthetic_field("node", row.name.clone()),
            synthetic_field("cursor", "String".to_string()),
        ],
    ));
    records.push(synthetic_record(
        format!("{}Cursor", row.name),
        cursor_fields
            .iter()
            .map(|cursor_field| cursor_field.field.clone())
            .collect(),
    ));
}
