//! Top-level `links` and `jsonapi` assembly.

use crate::application::directives::{Directives, Pagination, VersionDirective};
use crate::domain::document::{JsonApiObject, Link, Links};

/// Pagination slots in output order. Missing URLs stay `None` here and are
/// dropped by [`top_level_links`].
pub fn pagination_slots(pagination: &Pagination) -> [(&'static str, Option<Link>); 5] {
    let link = |url: &Option<String>| url.as_deref().map(Link::from);
    [
        ("self", link(&pagination.self_link)),
        ("first", link(&pagination.first)),
        ("last", link(&pagination.last)),
        ("prev", link(&pagination.prev)),
        ("next", link(&pagination.next)),
    ]
}

/// Pagination links followed by the literal `links` directive entries.
pub fn top_level_links(directives: &Directives) -> Links {
    let mut links = Links::new();
    if let Some(pagination) = directives.pagination.as_ref() {
        for (name, link) in pagination_slots(pagination) {
            if let Some(link) = link {
                links.insert(name.to_string(), link);
            }
        }
    }
    for (name, link) in &directives.links {
        links.insert(name.clone(), link.clone());
    }
    links
}

pub fn json_api_object(version: &VersionDirective) -> Option<JsonApiObject> {
    match version {
        VersionDirective::Flag(false) => None,
        VersionDirective::Flag(true) => Some(JsonApiObject::default()),
        VersionDirective::Custom(meta) => Some(JsonApiObject {
            meta: Some(meta.clone()),
            ..JsonApiObject::default()
        }),
    }
}
