//! Resource type naming shared by schemas and fieldsets.

use heck::ToKebabCase;

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

const UNCOUNTABLE: &[&str] = &["news", "media", "data", "series", "species", "metadata"];

/// Derive the JSON:API `type` for an entity name (`BlogPost` -> `blog-posts`).
pub fn resource_type_for(entity_name: &str) -> String {
    let kebab = entity_name.to_kebab_case();
    match kebab.rsplit_once('-') {
        Some((head, last)) => format!("{head}-{}", pluralize(last)),
        None => pluralize(&kebab),
    }
}

fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(single, _)| *single == word) {
        return (*plural).to_string();
    }
    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if word.ends_with(['s', 'x', 'z']) || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}
