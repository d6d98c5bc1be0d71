//! End-to-end pagination tests: directive handling, SQL rewrites, and the
//! page/connection records added for paginated queries.

mod common;
use common::*;

use rowgen_core::{Catalog, Column, Command, Error, Query, Request};

fn paginated_authors_query() -> Query {
    Query::new(
        "ListAuthors",
        Command::Many,
        "SELECT id, name, bio FROM authors WHERE name LIKE ?1",
    )
    .comment("paginated")
    .column(authors_column("id", "integer"))
    .column(authors_column("name", "text"))
    .column(nullable_authors_column("bio", "text"))
    .param(1, Column::new("name", "text").not_null())
}

fn cursor_posts_query() -> Query {
    Query::new(
        "ListPosts",
        Command::Many,
        "SELECT id, created_at, title FROM posts WHERE author_id = $1 AND hidden = $2",
    )
    .comment("lists posts for an author feed")
    .comment("paginated: cursor:-created_at,id")
    .column(Column::new("id", "integer").not_null())
    .column(Column::new("created_at", "datetime").not_null())
    .column(Column::new("title", "text").not_null())
    .param(1, Column::new("author_id", "integer").not_null())
    .param(2, Column::new("hidden", "bool").not_null())
}

// ---- offset mode -------------------------------------------------------

#[test]
fn offset_pagination_rewrites_the_sql() {
    let generated = generate(&Request::new(authors_catalog()).query(paginated_authors_query()));

    let decl = &generated.queries[0];
    assert!(decl.paginated);
    assert!(!decl.cursor_paginated);
    // The original text stays untouched next to the rewrite.
    assert_eq!(decl.sql, "SELECT id, name, bio FROM authors WHERE name LIKE ?1");
    assert_eq!(
        decl.sql_paginated.as_deref(),
        Some("SELECT id, name, bio FROM authors WHERE name LIKE ?1 LIMIT 2 OFFSET 3")
    );
}

#[test]
fn offset_pagination_appends_synthetic_params() {
    let generated = generate(&Request::new(authors_catalog()).query(paginated_authors_query()));

    let params = generated.queries[0]
        .arg
        .as_ref()
        .and_then(|arg| arg.record.as_ref())
        .unwrap();
    assert_eq!(params.name, "ListAuthorsParams");
    assert_eq!(field_names(params), ["name", "limit", "offset"]);
    assert_eq!(params.fields[1].type_name, "i64");
    assert_eq!(params.fields[2].type_name, "i64");
    assert!(params.fields[1]
        .column
        .as_ref()
        .is_some_and(|c| c.is_named_param));
}

#[test]
fn parameterless_offset_pagination_numbers_from_one() {
    let query = Query::new("ListAuthors", Command::Many, "SELECT id, name, bio FROM authors")
        .comment("paginated")
        .column(authors_column("id", "integer"))
        .column(authors_column("name", "text"))
        .column(nullable_authors_column("bio", "text"));

    let generated = generate(&Request::new(authors_catalog()).query(query));

    assert_eq!(
        generated.queries[0].sql_paginated.as_deref(),
        Some("SELECT id, name, bio FROM authors LIMIT 1 OFFSET 2")
    );
}

#[test]
fn offset_pagination_adds_a_page_record() {
    let generated = generate(&Request::new(authors_catalog()).query(paginated_authors_query()));

    // The result shape matches the model, so the page wraps `Author`.
    let page = record(&generated, "AuthorPage");
    assert_eq!(field_names(page), ["items", "total", "has_next"]);
    assert_eq!(page.fields[0].type_name, "Vec<Author>");
    assert_eq!(page.fields[1].type_name, "i64");
    assert_eq!(page.fields[2].type_name, "bool");
}

// ---- cursor mode -------------------------------------------------------

#[test]
fn cursor_pagination_rewrites_the_sql() {
    let generated = generate(&Request::new(Catalog::new("main")).query(cursor_posts_query()));

    let decl = &generated.queries[0];
    assert!(decl.paginated);
    assert!(decl.cursor_paginated);
    assert_eq!(
        decl.sql_paginated.as_deref(),
        Some(
            "SELECT cursor_pagination_source.* FROM (SELECT id, created_at, title FROM posts \
             WHERE author_id = $1 AND hidden = $2) AS cursor_pagination_source \
             WHERE $4='' OR (created_at < $5 OR (created_at = $5 AND (id > $6))) \
             ORDER BY created_at DESC, id LIMIT $3"
        )
    );

    assert_eq!(decl.cursor_fields.len(), 2);
    assert_eq!(decl.cursor_fields[0].field.db_name, "created_at");
    assert!(!decl.cursor_fields[0].ascending);
    assert_eq!(decl.cursor_fields[1].field.db_name, "id");
    assert!(decl.cursor_fields[1].ascending);

    // Directive lines never reach the documentation.
    assert_eq!(decl.comments, ["lists posts for an author feed"]);
}

#[test]
fn cursor_pagination_appends_limit_and_cursor_params() {
    let generated = generate(&Request::new(Catalog::new("main")).query(cursor_posts_query()));

    let params = generated.queries[0]
        .arg
        .as_ref()
        .and_then(|arg| arg.record.as_ref())
        .unwrap();
    assert_eq!(
        field_names(params),
        ["author_id", "hidden", "limit", "cursor"]
    );
    assert_eq!(params.fields[3].type_name, "String");
}

#[test]
fn cursor_pagination_adds_connection_records() {
    let generated = generate(&Request::new(Catalog::new("main")).query(cursor_posts_query()));

    let names: Vec<_> = generated.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "ListPostsRowConnection",
            "ListPostsRowCursor",
            "ListPostsRowEdge",
            "PageInfo"
        ]
    );

    let connection = record(&generated, "ListPostsRowConnection");
    assert_eq!(field_names(connection), ["edges", "page_info"]);
    assert_eq!(connection.fields[0].type_name, "Vec<ListPostsRowEdge>");
    assert_eq!(connection.fields[1].type_name, "PageInfo");

    let edge = record(&generated, "ListPostsRowEdge");
    assert_eq!(field_names(edge), ["node", "cursor"]);
    assert_eq!(edge.fields[0].type_name, "ListPostsRow");
    assert_eq!(edge.fields[1].type_name, "String");

    let info = record(&generated, "PageInfo");
    assert_eq!(
        field_names(info),
        [
            "start_cursor",
            "end_cursor",
            "has_next_page",
            "has_previous_page"
        ]
    );

    // The cursor state record lists the ordering fields in directive order.
    let cursor = record(&generated, "ListPostsRowCursor");
    assert_eq!(field_names(cursor), ["created_at", "id"]);
}

#[test]
fn page_info_is_shared_between_connections() {
    let books = Query::new("ListBooks", Command::Many, "SELECT id, title FROM books")
        .comment("paginated: cursor:id")
        .column(Column::new("id", "integer").not_null())
        .column(Column::new("title", "text").not_null());

    let generated = generate(
        &Request::new(Catalog::new("main"))
            .query(cursor_posts_query())
            .query(books),
    );

    let page_infos = generated
        .records
        .iter()
        .filter(|r| r.name == "PageInfo")
        .count();
    assert_eq!(page_infos, 1);

    let connections = generated
        .records
        .iter()
        .filter(|r| r.name.ends_with("Connection"))
        .count();
    assert_eq!(connections, 2);
}

// ---- validation --------------------------------------------------------

#[test]
fn pagination_requires_a_many_query() {
    let query = Query::new("GetAuthor", Command::One, "SELECT id FROM authors")
        .comment("paginated")
        .column(Column::new("id", "integer").not_null());

    let error = generate_err(&Request::new(authors_catalog()).query(query));

    assert!(matches!(error, Error::PaginatedNotMany(name) if name == "GetAuthor"));
}

#[test]
fn pagination_rejects_queries_with_their_own_limit_or_offset() {
    let limited = Query::new(
        "ListAuthors",
        Command::Many,
        "SELECT id FROM authors LIMIT 10",
    )
    .comment("paginated")
    .column(Column::new("id", "integer").not_null());
    assert!(matches!(
        generate_err(&Request::new(authors_catalog()).query(limited)),
        Error::PaginatedHasLimit(_)
    ));

    let offset = Query::new(
        "ListAuthors",
        Command::Many,
        "SELECT id FROM authors LIMIT 10 OFFSET 5",
    )
    .comment("paginated")
    .column(Column::new("id", "integer").not_null());
    // LIMIT is checked first even when both clauses are present.
    assert!(matches!(
        generate_err(&Request::new(authors_catalog()).query(offset)),
        Error::PaginatedHasLimit(_)
    ));

    let offset_only = Query::new(
        "ListAuthors",
        Command::Many,
        "SELECT id FROM authors OFFSET 5",
    )
    .comment("paginated")
    .column(Column::new("id", "integer").not_null());
    assert!(matches!(
        generate_err(&Request::new(authors_catalog()).query(offset_only)),
        Error::PaginatedHasOffset(_)
    ));
}

#[test]
fn cursor_pagination_needs_at_least_two_columns() {
    let query = Query::new("ListAuthors", Command::Many, "SELECT id FROM authors")
        .comment("paginated: cursor:id")
        .column(Column::new("id", "integer").not_null());

    let error = generate_err(&Request::new(authors_catalog()).query(query));

    assert!(matches!(error, Error::CursorTooFewColumns(_)));
}

#[test]
fn cursor_pagination_rejects_queries_with_their_own_order_by() {
    let query = Query::new(
        "ListAuthors",
        Command::Many,
        "SELECT id, name FROM authors ORDER BY id",
    )
    .comment("paginated: cursor:id,name")
    .column(Column::new("id", "integer").not_null())
    .column(Column::new("name", "text").not_null());

    let error = generate_err(&Request::new(authors_catalog()).query(query));

    assert!(matches!(error, Error::CursorHasOrderBy(_)));
}

#[test]
fn cursor_directive_requires_a_field_list() {
    let query = Query::new("ListPosts", Command::Many, "SELECT id, title FROM posts")
        .comment("paginated: cursor")
        .column(Column::new("id", "integer").not_null())
        .column(Column::new("title", "text").not_null());

    let error = generate_err(&Request::new(Catalog::new("main")).query(query));

    assert!(matches!(error, Error::InvalidCursorComment { .. }));
}

#[test]
fn unknown_cursor_fields_fail() {
    let query = Query::new("ListPosts", Command::Many, "SELECT id, title FROM posts")
        .comment("paginated: cursor:missing,id")
        .column(Column::new("id", "integer").not_null())
        .column(Column::new("title", "text").not_null());

    let error = generate_err(&Request::new(Catalog::new("main")).query(query));

    assert!(matches!(error, Error::CursorFieldNotFound(name) if name == "list_posts"));
}
