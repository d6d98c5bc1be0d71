//! Enum declaration extraction.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::model::{EnumConstant, EnumDecl};
use crate::naming;
use crate::options::Options;

/// Extracts enum declarations from every non-system schema of `catalog`.
///
/// Enums outside the default schema are prefixed with their schema name.
/// Constant names join the enum name with the cleaned value text; a value
/// that reduces to nothing usable, or collides with an earlier value of the
/// same enum, falls back to its 0-based declaration index as `value_<index>`
/// before the join. The result is sorted by type name.
#[must_use]
pub fn build_enums(catalog: &Catalog, options: &Options) -> Vec<EnumDecl> {
    let mut enums = Vec::new();

    for schema in &catalog.schemas {
        if schema.is_system() {
            continue;
        }
        for def in &schema.enums {
            let enum_name = if schema.name == catalog.default_schema {
                def.name.clone()
            } else {
                format!("{}_{}", schema.name, def.name)
            };

            let mut seen = HashSet::new();
            let mut constants = Vec::with_capacity(def.vals.len());
            for (index, value) in def.vals.iter().enumerate() {
                let mut ident = naming::enum_value_ident(value);
                if ident.is_empty() || seen.contains(&ident) {
                    ident = format!("value_{index}");
                }
                constants.push(EnumConstant {
                    name: naming::type_name(&format!("{enum_name}_{ident}"), options),
                    value: value.clone(),
                });
                seen.insert(ident);
            }

            enums.push(EnumDecl {
                name: naming::type_name(&enum_name, options),
                comment: def.comment.clone(),
                constants,
            });
        }
    }

    enums.sort_by(|a, b| a.name.cmp(&b.name));
    enums
}
