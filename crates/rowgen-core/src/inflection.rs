//! Table-name singularization.
//!
//! Record names derive from table names, and tables are conventionally named
//! in the plural. The rules here cover the plural forms that show up in real
//! schemas; anything they would get wrong belongs in
//! [`Options::inflection_exclude_table_names`].
//!
//! [`Options::inflection_exclude_table_names`]: crate::Options::inflection_exclude_table_names

/// Words that end in `s` while already being singular.
const SINGULAR_S: &[&str] = &[
    "alias", "analysis", "bonus", "campus", "news", "series", "species", "status", "virus",
];

/// Nouns with no distinct singular form.
const UNCOUNTABLE: &[&str] = &[
    "data", "equipment", "fish", "information", "media", "metadata", "money", "sheep",
];

/// Plurals the suffix rules would mangle.
const IRREGULAR: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("bonuses", "bonus"),
    ("buses", "bus"),
    ("campuses", "campus"),
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("people", "person"),
    ("statuses", "status"),
    ("teeth", "tooth"),
    ("viruses", "virus"),
    ("women", "woman"),
];

/// Singularizes a table name.
///
/// Names listed in `exclusions` are returned untouched, compared
/// case-insensitively. Lookups run on the lowercased name while suffix
/// rewrites preserve the original spelling.
#[must_use]
pub fn singular(name: &str, exclusions: &[String]) -> String {
    if exclusions.iter().any(|e| e.eq_ignore_ascii_case(name)) {
        return name.to_string();
    }

    let lower = name.to_lowercase();
    if SINGULAR_S.contains(&lower.as_str()) || UNCOUNTABLE.contains(&lower.as_str()) {
        return name.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }

    if lower.ends_with("ies") && name.len() > 3 {
        return format!("{}y", &name[..name.len() - 3]);
    }
    if lower.ends_with("oes") && name.len() > 3 {
        return name[..name.len() - 2].to_string();
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("is") || !lower.ends_with('s') {
        return name.to_string();
    }
    name[..name.len() - 1].to_string()
}
