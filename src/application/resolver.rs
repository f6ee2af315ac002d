//! Entity-name to schema resolution.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::debug;

use crate::application::schema::{DynamicSchema, Schema};
use crate::domain::{error::EncodeError, types::resource_type_for};

/// An entity type the host application defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    pub name: String,
    pub resource_type: String,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let resource_type = resource_type_for(&name);
        Self {
            name,
            resource_type,
        }
    }

    pub fn with_resource_type(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
        }
    }
}

pub type SchemaFactory = Box<dyn Fn(&EntityType) -> Box<dyn Schema> + Send + Sync>;

/// Startup-populated registry of entity types and their schemas.
///
/// Resolution prefers a factory registered for the exact entity name and
/// falls back to [`DynamicSchema`] for declared entities without one.
#[derive(Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntityType>,
    factories: HashMap<String, SchemaFactory>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity whose resource type is derived from its name.
    pub fn declare(&mut self, name: impl Into<String>) -> &mut Self {
        let entity = EntityType::new(name);
        self.entities.entry(entity.name.clone()).or_insert(entity);
        self
    }

    /// Declare an entity with an explicit resource type.
    pub fn declare_as(
        &mut self,
        name: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> &mut Self {
        let entity = EntityType::with_resource_type(name, resource_type);
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Register a schema factory; the entity is declared if it was not yet.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&EntityType) -> Box<dyn Schema> + Send + Sync + 'static,
    {
        let name = name.into();
        self.declare(name.clone());
        self.factories.insert(name, Box::new(factory));
        self
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entities.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<Box<dyn Schema>, EncodeError> {
        let entity = self
            .entities
            .get(name)
            .ok_or_else(|| EncodeError::unresolvable(name))?;

        match self.factories.get(name) {
            Some(factory) => Ok(factory(entity)),
            None => Ok(Box::new(DynamicSchema::new(entity.resource_type.clone()))),
        }
    }

    /// Resolve every name in order into a fresh per-render table.
    pub fn resolve_all<'n, I>(&self, names: I) -> Result<SchemaTable<'_>, EncodeError>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut table = SchemaTable::new(self);
        for name in names {
            table.resolve(name)?;
        }
        Ok(table)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<_> = self.factories.keys().collect();
        custom.sort();
        f.debug_struct("SchemaRegistry")
            .field("entities", &self.entities.len())
            .field("custom_schemas", &custom)
            .finish()
    }
}

/// Schemas bound to one render call, keyed by entity name.
pub struct SchemaTable<'r> {
    registry: &'r SchemaRegistry,
    schemas: HashMap<String, Box<dyn Schema>>,
}

impl<'r> SchemaTable<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            schemas: HashMap::new(),
        }
    }

    /// Schema for `name`, resolving it through the registry on first use.
    pub fn resolve(&mut self, name: &str) -> Result<&dyn Schema, EncodeError> {
        let schema = match self.schemas.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(entity = name, "resolving schema");
                entry.insert(self.registry.resolve(name)?)
            }
        };
        Ok(&**schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
