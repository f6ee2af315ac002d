//! Relationship graph walk that fills `data` and `included`.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::application::resolver::SchemaTable;
use crate::application::schema::{Relationship, SchemaContext};
use crate::domain::{
    document::{Linkage, RelationshipObject, ResourceIdentifier, ResourceObject},
    entity::{Entity, Related},
    error::EncodeError,
};

/// Dot-delimited relationship chains to embed in `included`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludePaths(Vec<String>);

impl IncludePaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for path in paths {
            let path = path.into();
            let path = path.trim().trim_matches('.').to_string();
            if !path.is_empty() && !unique.contains(&path) {
                unique.push(path);
            }
        }
        Self(unique)
    }

    /// Whether some path equals `path` or continues past it.
    pub fn covers(&self, path: &str) -> bool {
        self.0.iter().any(|candidate| {
            candidate == path
                || candidate
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Per-type allow-lists of field names.
#[derive(Debug, Clone, Copy)]
pub struct FieldSets<'d> {
    sets: &'d HashMap<String, Vec<String>>,
}

impl<'d> FieldSets<'d> {
    pub fn new(sets: &'d HashMap<String, Vec<String>>) -> Self {
        Self { sets }
    }

    /// Unrestricted when the type has no entry.
    pub fn allows(&self, resource_type: &str, field: &str) -> bool {
        self.sets
            .get(resource_type)
            .is_none_or(|fields| fields.iter().any(|allowed| allowed == field))
    }

    pub fn filter(&self, resource_type: &str, attributes: Map<String, Value>) -> Map<String, Value> {
        if !self.sets.contains_key(resource_type) {
            return attributes;
        }
        attributes
            .into_iter()
            .filter(|(name, _)| self.allows(resource_type, name))
            .collect()
    }
}

/// Include paths plus fieldsets for one render.
#[derive(Debug, Clone)]
pub struct EncodingParameters<'d> {
    pub include: IncludePaths,
    pub field_sets: FieldSets<'d>,
}

struct Pending<'a> {
    entity: &'a dyn Entity,
    key: ResourceIdentifier,
    path: String,
}

/// Result of walking the primary data and its included graph.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub primary: Vec<ResourceObject>,
    pub included: Vec<ResourceObject>,
}

/// Breadth-first walk over a work-list of (entity, path) items.
///
/// Each (type, id) is emitted once across primary data and `included`.
/// Each (type, id, path) is expanded once, so cyclic graphs terminate and
/// depth is bounded by the longest include path.
pub struct GraphWalk<'a, 's, 'r> {
    schemas: &'s mut SchemaTable<'r>,
    context: SchemaContext<'s>,
    params: &'s EncodingParameters<'s>,
    emitted: HashSet<ResourceIdentifier>,
    expanded: HashSet<(ResourceIdentifier, String)>,
    queue: VecDeque<Pending<'a>>,
}

impl<'a, 's, 'r> GraphWalk<'a, 's, 'r> {
    pub fn new(
        schemas: &'s mut SchemaTable<'r>,
        context: SchemaContext<'s>,
        params: &'s EncodingParameters<'s>,
    ) -> Self {
        Self {
            schemas,
            context,
            params,
            emitted: HashSet::new(),
            expanded: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn run(mut self, primary: &[&'a dyn Entity]) -> Result<WalkOutput, EncodeError> {
        // Repeated (type, id) pairs in the primary data keep their first occurrence.
        let mut unique = Vec::with_capacity(primary.len());
        for entity in primary {
            let key = self.identify(*entity)?;
            if self.emitted.insert(key.clone()) {
                unique.push((*entity, key));
            }
        }

        let mut output = WalkOutput::default();
        for (entity, key) in unique {
            self.expanded.insert((key, String::new()));
            output.primary.push(self.visit(entity, "")?);
        }

        while let Some(pending) = self.queue.pop_front() {
            trace!(
                resource_type = %pending.key.resource_type,
                id = %pending.key.id,
                path = %pending.path,
                "expanding included resource"
            );
            let resource = self.visit(pending.entity, &pending.path)?;
            if self.emitted.insert(pending.key) {
                output.included.push(resource);
            }
        }

        Ok(output)
    }

    fn identify(&mut self, entity: &dyn Entity) -> Result<ResourceIdentifier, EncodeError> {
        let schema = self.schemas.resolve(entity.entity_name())?;
        Ok(ResourceIdentifier {
            resource_type: schema.resource_type().to_string(),
            id: schema.resource_id(entity),
        })
    }

    /// Build the resource object for `entity` reached via `path`, queueing
    /// relationship targets that an include path covers.
    fn visit(&mut self, entity: &'a dyn Entity, path: &str) -> Result<ResourceObject, EncodeError> {
        let (key, attributes, relationships, links, meta) = {
            let schema = self.schemas.resolve(entity.entity_name())?;
            let resource_type = schema.resource_type().to_string();
            let attributes = self
                .params
                .field_sets
                .filter(&resource_type, schema.attributes(entity));
            let key = ResourceIdentifier {
                resource_type,
                id: schema.resource_id(entity),
            };
            (
                key,
                attributes,
                schema.relationships(entity),
                schema.links(entity, &self.context),
                schema.meta(entity),
            )
        };

        let mut rendered = IndexMap::new();
        for (name, relationship) in relationships {
            let relationship_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            let object = self.relationship(relationship, &relationship_path)?;
            if self.params.field_sets.allows(&key.resource_type, &name) {
                rendered.insert(name, object);
            }
        }

        Ok(ResourceObject {
            resource_type: key.resource_type,
            id: key.id,
            attributes,
            relationships: rendered,
            links,
            meta,
        })
    }

    fn relationship(
        &mut self,
        relationship: Relationship<'a>,
        path: &str,
    ) -> Result<RelationshipObject, EncodeError> {
        let include = self.params.include.covers(path);
        let mut identifiers = Vec::new();
        for target in relationship.target.entities() {
            let key = self.identify(target)?;
            if include && self.expanded.insert((key.clone(), path.to_string())) {
                self.queue.push_back(Pending {
                    entity: target,
                    key: key.clone(),
                    path: path.to_string(),
                });
            }
            identifiers.push(key);
        }

        let data = match relationship.target {
            Related::One(_) => Linkage::One(identifiers.into_iter().next()),
            Related::Many(_) => Linkage::Many(identifiers),
        };

        Ok(RelationshipObject {
            data,
            links: relationship.links,
            meta: relationship.meta,
        })
    }
}
