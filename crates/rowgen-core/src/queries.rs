//! Query binding assembly.
//!
//! Turns analyzed queries into [`QueryDecl`]s: names for the generated
//! artifacts, the argument and result shapes, and the rewritten SQL for
//! paginated queries. Parameter and result records share one field-assembly
//! algorithm in [`assemble_record`].

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::catalog::{Column, Command, Parameter, Query, Request};
use crate::embed::{resolve_embed, EmbeddedRecord};
use crate::error::{Error, Result};
use crate::model::{Field, QueryDecl, QueryValue, RecordDecl};
use crate::naming;
use crate::options::{CaseStyle, Options};
use crate::pagination;
use crate::resolve::{TypeResolver, UNKNOWN_TYPE};

/// A column queued for field assembly, with the positional id used for
/// suffix deduplication.
struct AssemblyColumn {
    id: i64,
    column: Column,
    embed: Option<EmbeddedRecord>,
}

/// Assembles one binding per usable query.
///
/// Queries without a name or a command are skipped. Paginated queries get
/// their synthetic parameters appended before the argument shape is decided,
/// and their rewritten SQL attached afterwards. The result is sorted by
/// method name.
///
/// # Errors
///
/// Propagates pagination validation errors, cursor directive errors, and
/// incompatible-field-type errors from record synthesis.
pub fn build_queries(
    request: &Request,
    options: &Options,
    resolver: &dyn TypeResolver,
    records: &[RecordDecl],
) -> Result<Vec<QueryDecl>> {
    let mut queries = Vec::with_capacity(request.queries.len());

    for query in &request.queries {
        if let Some(decl) = build_query(query, request, options, resolver, records)? {
            queries.push(decl);
        }
    }

    queries.sort_by(|a, b| a.method_name.cmp(&b.method_name));
    Ok(queries)
}

fn build_query(
    query: &Query,
    request: &Request,
    options: &Options,
    resolver: &dyn TypeResolver,
    records: &[RecordDecl],
) -> Result<Option<QueryDecl>> {
    if query.name.is_empty() {
        debug!("skipping unnamed query in {}", query.filename);
        return Ok(None);
    }
    let Some(cmd) = query.cmd else {
        debug!("skipping query {}: no command", query.name);
        return Ok(None);
    };

    let flags = pagination::flags(query)?;

    let method_name = naming::method_name(&query.name);
    let pascal_name = naming::type_name(&query.name, options);

    let mut decl = QueryDecl {
        cmd,
        constant_name: naming::constant_name(&query.name),
        stmt_field_name: format!("{method_name}_stmt"),
        method_name,
        exported: options.emit_exported_queries,
        source_file: query.filename.clone(),
        sql: query.text.clone(),
        comments: documentation(query, options),
        insert_into_table: query.insert_into_table.clone(),
        arg: None,
        ret: None,
        paginated: flags.paginated,
        cursor_paginated: flags.cursor,
        sql_paginated: None,
        cursor_fields: Vec::new(),
    };

    let mut params = query.params.clone();
    if flags.paginated {
        params.extend(pagination::synthetic_params(flags.cursor, params.len()));
    }

    decl.arg = argument_value(&pascal_name, cmd, &params, options, resolver)?;
    decl.ret = result_value(
        query,
        &pascal_name,
        cmd,
        options,
        resolver,
        records,
        &request.catalog.default_schema,
    )?;

    if decl.paginated {
        if decl.cursor_paginated {
            let cursor_fields = pagination::parse_cursor_fields(&flags.comment, &decl)?;
            let sql = pagination::cursor_sql(&decl, &cursor_fields);
            decl.sql_paginated = Some(sql);
            decl.cursor_fields = cursor_fields;
        } else {
            let sql = pagination::offset_sql(&decl);
            decl.sql_paginated = Some(sql);
        }
    }

    Ok(Some(decl))
}

/// The argument side of a binding: a scalar for a single parameter (while
/// the threshold allows it), a params record otherwise.
fn argument_value(
    pascal_name: &str,
    cmd: Command,
    params: &[Parameter],
    options: &Options,
    resolver: &dyn TypeResolver,
) -> Result<Option<QueryValue>> {
    if params.len() == 1 && options.query_parameter_limit != 0 {
        let param = &params[0];
        let name = if param.column.name.is_empty() {
            format!("dollar_{}", param.number)
        } else {
            naming::arg_name(&param.column.name)
        };
        return Ok(Some(QueryValue::scalar(
            name,
            param.column.name.clone(),
            resolver.resolve(&param.column),
            Some(param.column.clone()),
        )));
    }
    if params.is_empty() {
        return Ok(None);
    }

    let columns: Vec<AssemblyColumn> = params
        .iter()
        .map(|param| AssemblyColumn {
            id: i64::from(param.number),
            column: param.column.clone(),
            embed: None,
        })
        .collect();
    let record = assemble_record(format!("{pascal_name}Params"), &columns, options, resolver)?;

    // Small parameter lists are expanded positionally instead of declaring
    // the record, except for bulk-copy commands which always need the
    // declared type.
    let threshold = usize::try_from(options.query_parameter_limit).unwrap_or(0);
    let emit = params.len() > threshold || cmd == Command::CopyFrom;
    Ok(Some(QueryValue::record(
        "arg",
        record,
        emit,
        options.emit_params_struct_refs,
    )))
}

/// The result side of a binding: a scalar for single plain columns, a
/// reused or synthesized record for row-returning commands, nothing
/// otherwise.
fn result_value(
    query: &Query,
    pascal_name: &str,
    cmd: Command,
    options: &Options,
    resolver: &dyn TypeResolver,
    records: &[RecordDecl],
    default_schema: &str,
) -> Result<Option<QueryValue>> {
    if query.columns.len() == 1 && query.columns[0].embed_table.is_none() {
        let column = &query.columns[0];
        let name = column_name(column, 0).replace('$', "_");
        return Ok(Some(QueryValue::scalar(
            naming::escape_reserved(name.clone()),
            name,
            resolver.resolve(column),
            None,
        )));
    }
    if !cmd.returns_rows() {
        return Ok(None);
    }

    let reused = find_reusable_record(query, records, options, resolver, default_schema);
    let (record, emit) = if let Some(record) = reused {
        (record, false)
    } else {
        let columns: Vec<AssemblyColumn> = query
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| AssemblyColumn {
                id: i64::try_from(index).unwrap_or(i64::MAX),
                column: column.clone(),
                embed: resolve_embed(column.embed_table.as_ref(), records, default_schema),
            })
            .collect();
        let record = assemble_record(format!("{pascal_name}Row"), &columns, options, resolver)?;
        (record, true)
    };
    Ok(Some(QueryValue::record(
        "row",
        record,
        emit,
        options.emit_result_struct_refs,
    )))
}

/// User-visible documentation for a query: its comments minus directive
/// lines, optionally followed by the SQL text.
fn documentation(query: &Query, options: &Options) -> Vec<String> {
    let mut comments: Vec<String> = query
        .comments
        .iter()
        .filter(|comment| !pagination::is_directive(comment))
        .cloned()
        .collect();

    if options.emit_sql_as_comment {
        if comments.is_empty() {
            comments.push(query.name.clone());
        }
        comments.push(" ".to_string());
        for line in query.text.lines() {
            comments.push(format!("  {line}"));
        }
    }
    comments
}

/// The working name of a column: its own name, or `column_<position>`
/// (1-based) when the analyzer left it unnamed.
fn column_name(column: &Column, position: usize) -> String {
    if column.name.is_empty() {
        format!("column_{}", position + 1)
    } else {
        column.name.clone()
    }
}

/// Finds a table record whose fields match the query's columns one-for-one
/// on name, type, and source table.
///
/// On a match, returns a copy with the query's columns attached to the
/// fields, so downstream passes see the same metadata as for a synthesized
/// record.
fn find_reusable_record(
    query: &Query,
    records: &[RecordDecl],
    options: &Options,
    resolver: &dyn TypeResolver,
    default_schema: &str,
) -> Option<RecordDecl> {
    for record in records {
        let Some(table) = record.table.as_ref() else {
            continue;
        };
        if record.fields.len() != query.columns.len() {
            continue;
        }

        let matches = record
            .fields
            .iter()
            .zip(&query.columns)
            .enumerate()
            .all(|(index, (field, column))| {
                field.name == naming::field_name(&column_name(column, index), options)
                    && field.type_name == resolver.resolve(column)
                    && column
                        .table
                        .as_ref()
                        .is_some_and(|t| t.same_table(table, default_schema))
            });
        if !matches {
            continue;
        }

        let mut bound = record.clone();
        for (field, column) in bound.fields.iter_mut().zip(&query.columns) {
            field.column = Some(column.clone());
            field.db_name.clone_from(&column.name);
        }
        return Some(bound);
    }
    None
}

// Suffixing can still produce duplicate storage tags:
//
//   columns: count, count,   count_2
//    fields: count, count_2, count_2
//
// The final names only collide when the schema itself already uses the
// suffixed spelling, so this stays as is.
fn assemble_record(
    name: String,
    columns: &[AssemblyColumn],
    options: &Options,
    resolver: &dyn TypeResolver,
) -> Result<RecordDecl> {
    let mut fields = Vec::with_capacity(columns.len());
    // Occurrence counts per base (pre-suffix) field name.
    let mut seen: HashMap<String, usize> = HashMap::new();
    // Assigned suffixes per positional id, so columns referring to the same
    // numbered parameter land on the same field name.
    let mut suffixes: HashMap<i64, usize> = HashMap::new();

    for (index, assembly) in columns.iter().enumerate() {
        let mut col_name = column_name(&assembly.column, index);
        let mut tag_name = col_name.clone();
        if let Some(embed) = &assembly.embed {
            col_name = embed.record_name.clone();
            tag_name = naming::case_style(&col_name, CaseStyle::Snake);
        }

        let mut field_name = naming::field_name(&col_name, options);
        let base_name = field_name.clone();

        let suffix = match suffixes.get(&assembly.id) {
            Some(&known) => known,
            None if assembly.column.is_named_param => 0,
            None => seen.get(&base_name).map_or(0, |&count| count + 1),
        };
        suffixes.insert(assembly.id, suffix);
        if suffix > 0 {
            tag_name = format!("{tag_name}_{suffix}");
            field_name = format!("{field_name}_{suffix}");
        }

        let mut tags = BTreeMap::new();
        if options.emit_db_tags {
            tags.insert("db".to_string(), tag_name.clone());
        }
        if options.emit_serde_tags {
            tags.insert(
                "serde".to_string(),
                naming::serde_tag_name(&tag_name, options),
            );
        }

        let (type_name, embed_fields) = match &assembly.embed {
            Some(embed) => (embed.record_name.clone(), Some(embed.fields.clone())),
            None => (resolver.resolve(&assembly.column), None),
        };

        fields.push(Field {
            name: field_name,
            db_name: col_name,
            type_name,
            comment: String::new(),
            tags,
            column: Some(assembly.column.clone()),
            embed_fields,
        });
        *seen.entry(base_name).or_insert(0) += 1;
    }

    unify_types(&mut fields);
    check_incompatible_types(&fields)?;

    Ok(RecordDecl {
        name,
        table: None,
        comment: String::new(),
        fields,
    })
}

/// Gives fields that resolved to the unknown placeholder the concrete type
/// of a same-named sibling, when one exists.
fn unify_types(fields: &mut [Field]) {
    let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, field) in fields.iter().enumerate() {
        by_name.entry(field.name.clone()).or_default().push(index);
    }

    for indexes in by_name.values() {
        if indexes.len() < 2 {
            continue;
        }
        let Some(concrete) = indexes
            .iter()
            .map(|&index| fields[index].type_name.clone())
            .find(|type_name| type_name != UNKNOWN_TYPE)
        else {
            continue;
        };
        for &index in indexes {
            if fields[index].type_name == UNKNOWN_TYPE {
                fields[index].type_name.clone_from(&concrete);
            }
        }
    }
}

fn check_incompatible_types(fields: &[Field]) -> Result<()> {
    let mut types: HashMap<&str, &str> = HashMap::new();
    for field in fields {
        match types.entry(field.name.as_str()) {
            Entry::Vacant(entry) => {
                entry.insert(&field.type_name);
            }
            Entry::Occupied(entry) if *entry.get() != field.type_name => {
                return Err(Error::IncompatibleFieldTypes {
                    field: field.name.clone(),
                    first: field.type_name.clone(),
                    second: (*entry.get()).to_string(),
                });
            }
            Entry::Occupied(_) => {}
        }
    }
    Ok(())
}
