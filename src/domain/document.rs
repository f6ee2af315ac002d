//! JSON:API document tree produced by the encoder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSON_API_VERSION: &str = "1.0";

pub type Links = IndexMap<String, Link>;

/// A link is either a bare URL or an object carrying `href` and `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    Href(String),
    Object {
        href: String,
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        meta: Map<String, Value>,
    },
}

impl Link {
    pub fn href(&self) -> &str {
        match self {
            Link::Href(href) | Link::Object { href, .. } => href,
        }
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Link::Href(href)
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Link::Href(href.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonApiObject {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl Default for JsonApiObject {
    fn default() -> Self {
        Self {
            version: JSON_API_VERSION.to_string(),
            meta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

/// Resource linkage of a relationship: to-one (possibly null) or to-many.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Linkage {
    One(Option<ResourceIdentifier>),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipObject {
    pub data: Linkage,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, RelationshipObject>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Primary `data` member: a single resource (or null) or a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Option<ResourceObject>),
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    pub fn resources(&self) -> Vec<&ResourceObject> {
        match self {
            PrimaryData::One(resource) => resource.iter().collect(),
            PrimaryData::Many(resources) => resources.iter().collect(),
        }
    }
}

/// Top-level document. Absent members are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

impl Document {
    pub fn meta_only(meta: Map<String, Value>) -> Self {
        Self {
            meta: Some(meta),
            ..Self::default()
        }
    }

    /// Every resource object in `data` followed by `included`.
    pub fn resources(&self) -> Vec<&ResourceObject> {
        let mut resources = self
            .data
            .as_ref()
            .map(PrimaryData::resources)
            .unwrap_or_default();
        resources.extend(self.included.iter());
        resources
    }
}
