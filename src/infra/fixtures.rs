//! JSON fixture files: directives, view variables and the entity catalog for
//! one render.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::application::{
    directives::Directives,
    resolver::{EntityType, SchemaRegistry},
    schema::{DynamicSchema, Schema},
    view_vars::{ViewValue, ViewVars},
};
use crate::domain::entity::{Record, RecordRelation};

use super::error::InfraError;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fixture {
    pub directives: Directives,
    pub vars: IndexMap<String, FixtureValue>,
    /// Entity catalog keyed by entity name.
    pub schemas: IndexMap<String, FixtureSchema>,
    pub query_log: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureValue {
    Many(Vec<Record>),
    One(Option<Record>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixtureSchema {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub include_paths: Vec<String>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let contents = fs::read_to_string(path)?;
        let fixture = Self::parse(&contents).map_err(|err| InfraError::fixture(path, err))?;
        debug!(
            path = %path.display(),
            vars = fixture.vars.len(),
            schemas = fixture.schemas.len(),
            "loaded fixture"
        );
        Ok(fixture)
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn view_vars(&self) -> ViewVars {
        let mut vars = ViewVars::new();
        for (name, value) in &self.vars {
            let value = match value {
                FixtureValue::Many(records) => ViewValue::collection(records.iter().cloned()),
                FixtureValue::One(Some(record)) => ViewValue::resource(record.clone()),
                FixtureValue::One(None) => ViewValue::Null,
            };
            vars.set(name.clone(), value);
        }
        vars
    }

    /// Registry holding the catalog entries plus every entity name that
    /// occurs in the fixture's records.
    pub fn registry(&self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();

        for (name, schema) in &self.schemas {
            if let Some(resource_type) = schema.resource_type.as_deref() {
                registry.declare_as(name.clone(), resource_type);
            }
            let include_paths = schema.include_paths.clone();
            registry.register(name.clone(), move |entity: &EntityType| {
                Box::new(
                    DynamicSchema::new(entity.resource_type.clone())
                        .with_include_paths(include_paths.clone()),
                ) as Box<dyn Schema>
            });
        }

        let mut names = Vec::new();
        for value in self.vars.values() {
            match value {
                FixtureValue::Many(records) => records
                    .iter()
                    .for_each(|record| collect_entity_names(record, &mut names)),
                FixtureValue::One(Some(record)) => collect_entity_names(record, &mut names),
                FixtureValue::One(None) => {}
            }
        }
        for name in names {
            registry.declare(name);
        }

        registry
    }
}

fn collect_entity_names<'r>(record: &'r Record, names: &mut Vec<&'r str>) {
    if !names.contains(&record.entity.as_str()) {
        names.push(&record.entity);
    }
    for relation in record.relationships.values() {
        match relation {
            RecordRelation::Many(records) => records
                .iter()
                .for_each(|record| collect_entity_names(record, names)),
            RecordRelation::One(Some(record)) => collect_entity_names(record, names),
            RecordRelation::One(None) => {}
        }
    }
}
