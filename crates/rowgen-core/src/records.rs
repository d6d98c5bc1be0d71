//! Record declaration extraction.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, Identifier};
use crate::inflection;
use crate::model::{Field, RecordDecl};
use crate::naming;
use crate::options::Options;
use crate::resolve::TypeResolver;

/// Extracts one record declaration per table in every non-system schema.
///
/// Tables outside the default schema are prefixed with their schema name.
/// Unless [`Options::emit_exact_table_names`] is set, the table name is
/// singularized first. Each record keeps its source-table identity so query
/// results can be matched back to it. The result is sorted by record name.
#[must_use]
pub fn build_records(
    catalog: &Catalog,
    options: &Options,
    resolver: &dyn TypeResolver,
) -> Vec<RecordDecl> {
    let mut records = Vec::new();

    for schema in &catalog.schemas {
        if schema.is_system() {
            continue;
        }
        for table in &schema.tables {
            let table_name = if schema.name == catalog.default_schema {
                table.rel.name.clone()
            } else {
                format!("{}_{}", schema.name, table.rel.name)
            };
            let base_name = if options.emit_exact_table_names {
                table_name
            } else {
                inflection::singular(&table_name, &options.inflection_exclude_table_names)
            };

            let fields = table
                .columns
                .iter()
                .map(|column| {
                    let mut tags = BTreeMap::new();
                    if options.emit_db_tags {
                        tags.insert("db".to_string(), column.name.clone());
                    }
                    if options.emit_serde_tags {
                        tags.insert(
                            "serde".to_string(),
                            naming::serde_tag_name(&column.name, options),
                        );
                    }
                    Field {
                        name: naming::field_name(&column.name, options),
                        db_name: column.name.clone(),
                        type_name: resolver.resolve(column),
                        comment: column.comment.clone(),
                        tags,
                        column: Some(column.clone()),
                        embed_fields: None,
                    }
                })
                .collect();

            records.push(RecordDecl {
                name: naming::type_name(&base_name, options),
                table: Some(Identifier {
                    catalog: String::new(),
                    schema: schema.name.clone(),
                    name: table.rel.name.clone(),
                }),
                comment: table.comment.clone(),
                fields,
            });
        }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}
