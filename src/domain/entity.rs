//! Host-side view of the objects being rendered.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A fully materialized model object. The encoder only reads it.
pub trait Entity: fmt::Debug {
    /// Logical entity name used for schema lookup, e.g. `Article`.
    fn entity_name(&self) -> &str;

    fn id(&self) -> String;

    /// Visible properties, excluding the id and any associations.
    fn fields(&self) -> Map<String, Value>;

    /// Named associations in declaration order.
    fn associations(&self) -> Vec<(&str, Related<'_>)> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;
}

/// Target of an association: at most one entity, or an ordered sequence.
#[derive(Debug, Clone)]
pub enum Related<'a> {
    One(Option<&'a dyn Entity>),
    Many(Vec<&'a dyn Entity>),
}

impl<'a> Related<'a> {
    pub fn one<E: Entity>(entity: Option<&'a E>) -> Self {
        Self::One(entity.map(|entity| entity as &dyn Entity))
    }

    pub fn many<E: Entity>(entities: &'a [E]) -> Self {
        Self::Many(
            entities
                .iter()
                .map(|entity| entity as &dyn Entity)
                .collect(),
        )
    }

    pub fn entities(&self) -> Vec<&'a dyn Entity> {
        match self {
            Self::One(entity) => entity.iter().copied().collect(),
            Self::Many(entities) => entities.clone(),
        }
    }
}

/// Schemaless entity, typically loaded from a JSON fixture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub entity: String,
    #[serde(deserialize_with = "scalar_id")]
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: IndexMap<String, RecordRelation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordRelation {
    Many(Vec<Record>),
    One(Option<Box<Record>>),
}

impl Record {
    pub fn new(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_one(mut self, name: impl Into<String>, related: Option<Record>) -> Self {
        self.relationships
            .insert(name.into(), RecordRelation::One(related.map(Box::new)));
        self
    }

    pub fn with_many(mut self, name: impl Into<String>, related: Vec<Record>) -> Self {
        self.relationships
            .insert(name.into(), RecordRelation::Many(related));
        self
    }
}

impl Entity for Record {
    fn entity_name(&self) -> &str {
        &self.entity
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn fields(&self) -> Map<String, Value> {
        self.attributes.clone()
    }

    fn associations(&self) -> Vec<(&str, Related<'_>)> {
        self.relationships
            .iter()
            .map(|(name, relation)| {
                let related = match relation {
                    RecordRelation::One(record) => {
                        Related::One(record.as_deref().map(|record| record as &dyn Entity))
                    }
                    RecordRelation::Many(records) => Related::many(records),
                };
                (name.as_str(), related)
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn scalar_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got `{other}`"
        ))),
    }
}
