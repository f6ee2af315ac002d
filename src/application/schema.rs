//! Per-resource-type description of how entities become resource objects.

use serde_json::{Map, Value};

use crate::domain::{
    document::{Link, Links},
    entity::{Entity, Related},
};

/// Render-scoped context handed to schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaContext<'a> {
    pub url_prefix: Option<&'a str>,
}

impl<'a> SchemaContext<'a> {
    pub fn new(url_prefix: Option<&'a str>) -> Self {
        Self { url_prefix }
    }

    /// Join a path onto the url prefix, or return it unchanged without one.
    pub fn url(&self, path: &str) -> String {
        match self.url_prefix {
            Some(prefix) => format!("{}{path}", prefix.trim_end_matches('/')),
            None => path.to_string(),
        }
    }
}

/// A relationship as described by a schema: its target plus optional
/// relationship-level links and meta.
#[derive(Debug, Clone)]
pub struct Relationship<'a> {
    pub target: Related<'a>,
    pub links: Links,
    pub meta: Option<Map<String, Value>>,
}

impl<'a> Relationship<'a> {
    pub fn new(target: Related<'a>) -> Self {
        Self {
            target,
            links: Links::new(),
            meta: None,
        }
    }

    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<Link>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<'a> From<Related<'a>> for Relationship<'a> {
    fn from(target: Related<'a>) -> Self {
        Self::new(target)
    }
}

/// Describes instances of one resource type.
///
/// Implementations must be cheap to construct and hold no state across
/// render calls.
pub trait Schema {
    fn resource_type(&self) -> &str;

    fn resource_id(&self, entity: &dyn Entity) -> String {
        entity.id()
    }

    fn attributes(&self, entity: &dyn Entity) -> Map<String, Value>;

    fn relationships<'a>(&self, entity: &'a dyn Entity) -> Vec<(String, Relationship<'a>)>;

    /// Resource-level links. Emits `self` only when a url prefix is set.
    fn links(&self, entity: &dyn Entity, context: &SchemaContext<'_>) -> Links {
        let mut links = Links::new();
        if context.url_prefix.is_some() {
            let path = format!("/{}/{}", self.resource_type(), self.resource_id(entity));
            links.insert("self".to_string(), Link::Href(context.url(&path)));
        }
        links
    }

    fn meta(&self, _entity: &dyn Entity) -> Option<Map<String, Value>> {
        None
    }

    /// Inclusion paths used when the caller supplies none.
    fn include_paths(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Fallback schema that introspects the entity's own fields and
/// associations.
#[derive(Debug, Clone)]
pub struct DynamicSchema {
    resource_type: String,
    include_paths: Vec<String>,
}

impl DynamicSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            include_paths: Vec::new(),
        }
    }

    pub fn with_include_paths(mut self, paths: Vec<String>) -> Self {
        self.include_paths = paths;
        self
    }
}

impl Schema for DynamicSchema {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn attributes(&self, entity: &dyn Entity) -> Map<String, Value> {
        entity.fields()
    }

    fn relationships<'a>(&self, entity: &'a dyn Entity) -> Vec<(String, Relationship<'a>)> {
        entity
            .associations()
            .into_iter()
            .map(|(name, related)| (name.to_string(), Relationship::from(related)))
            .collect()
    }

    fn include_paths(&self) -> Vec<String> {
        self.include_paths.clone()
    }
}

/// Recover the concrete entity type inside a typed schema.
pub fn downcast<E: 'static>(entity: &dyn Entity) -> Option<&E> {
    entity.as_any().downcast_ref::<E>()
}
