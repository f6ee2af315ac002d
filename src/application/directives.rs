//! Per-render directives, deserializable from the camelCase option object.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::json_options::JsonOptions;
use crate::domain::document::Link;

/// What to place in `data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SerializeDirective {
    /// `true` infers the single eligible view variable, `false` serializes nothing.
    Flag(bool),
    Name(String),
    /// Only the first name is used.
    Names(Vec<String>),
    /// Rejected at render time: objects must be assigned to a view variable.
    Object(Map<String, Value>),
}

impl SerializeDirective {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl Default for SerializeDirective {
    fn default() -> Self {
        Self::Flag(true)
    }
}

/// Top-level meta, or `false` to force an empty body outside resource mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetaDirective {
    Flag(bool),
    Object(Map<String, Value>),
}

impl MetaDirective {
    /// The meta object when one is set and non-empty.
    pub fn object(&self) -> Option<&Map<String, Value>> {
        match self {
            MetaDirective::Object(meta) if !meta.is_empty() => Some(meta),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VersionDirective {
    Flag(bool),
    /// Custom version metadata, emitted as `jsonapi.meta`.
    Custom(Map<String, Value>),
}

impl Default for VersionDirective {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Externally computed page URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Directives {
    pub url_prefix: Option<String>,
    pub with_json_api_version: VersionDirective,
    /// Entity names to enable; presence selects resource mode.
    pub entities: Option<Vec<String>>,
    /// `None` defers to the primary schema's default inclusion paths.
    pub include: Option<Vec<String>>,
    pub field_sets: HashMap<String, Vec<String>>,
    pub links: IndexMap<String, Link>,
    pub meta: Option<MetaDirective>,
    pub serialize: SerializeDirective,
    pub json_options: JsonOptions,
    pub debug_pretty_print: bool,
    pub debug_query_log: bool,
    pub pagination: Option<Pagination>,
}

impl Directives {
    pub fn resources<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entities: Some(entities.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Enabled entity names, or `None` when resource mode is off.
    pub fn enabled_entities(&self) -> Option<&[String]> {
        self.entities
            .as_deref()
            .filter(|entities| !entities.is_empty())
    }

    pub fn meta_object(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref().and_then(MetaDirective::object)
    }

    pub fn serialize(mut self, directive: SerializeDirective) -> Self {
        self.serialize = directive;
        self
    }

    pub fn include<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn field_set<I, S>(mut self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_sets.insert(
            resource_type.into(),
            fields.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn meta(mut self, meta: MetaDirective) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    pub fn json_api_version(mut self, version: VersionDirective) -> Self {
        self.with_json_api_version = version;
        self
    }

    pub fn json_options(mut self, options: JsonOptions) -> Self {
        self.json_options = options;
        self
    }
}
