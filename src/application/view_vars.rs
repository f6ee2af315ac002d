//! Named values available to a render call.

use indexmap::IndexMap;

use crate::application::directives::SerializeDirective;
use crate::domain::{entity::Entity, error::EncodeError};

/// Names that carry rendering directives rather than data. They are skipped
/// when `serialize = true` infers the value to render.
pub const RESERVED_VIEW_VARS: &[&str] = &[
    "_url",
    "_entities",
    "_include",
    "_fieldSets",
    "_jsonOptions",
    "_debugPrettyPrint",
    "_debugQueryLog",
    "_meta",
    "_links",
    "_serialize",
    "_jsonp",
    "_withJsonApiVersion",
    "_pagination",
    "_urlPrefix",
    "_specialVars",
    "queryLog",
];

#[derive(Debug)]
pub enum ViewValue {
    Resource(Box<dyn Entity>),
    Collection(Vec<Box<dyn Entity>>),
    Null,
}

impl ViewValue {
    pub fn resource<E: Entity + 'static>(entity: E) -> Self {
        Self::Resource(Box::new(entity))
    }

    pub fn collection<E, I>(entities: I) -> Self
    where
        E: Entity + 'static,
        I: IntoIterator<Item = E>,
    {
        Self::Collection(
            entities
                .into_iter()
                .map(|entity| Box::new(entity) as Box<dyn Entity>)
                .collect(),
        )
    }

    /// `Null` and empty collections count as nothing to serialize.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewValue::Resource(_) => false,
            ViewValue::Collection(entities) => entities.is_empty(),
            ViewValue::Null => true,
        }
    }
}

/// Insertion-ordered named values, as set by the controller.
#[derive(Debug, Default)]
pub struct ViewVars {
    values: IndexMap<String, ViewValue>,
}

impl ViewVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ViewValue) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: ViewValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ViewValue> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pick the value a serialize directive refers to.
    ///
    /// `Ok(None)` means nothing to serialize. Inference (`true`) takes the
    /// first non-reserved variable, so it is ambiguous with several data
    /// variables; prefer naming the variable.
    pub fn select(
        &self,
        directive: &SerializeDirective,
    ) -> Result<Option<(&str, &ViewValue)>, EncodeError> {
        let name = match directive {
            SerializeDirective::Object(_) => return Err(EncodeError::InvalidSerializeDirective),
            SerializeDirective::Flag(false) => return Ok(None),
            SerializeDirective::Flag(true) => {
                return Ok(self
                    .values
                    .iter()
                    .find(|(name, _)| !RESERVED_VIEW_VARS.contains(&name.as_str()))
                    .map(|(name, value)| (name.as_str(), value)));
            }
            SerializeDirective::Name(name) => name.as_str(),
            SerializeDirective::Names(names) => match names.first() {
                Some(name) => name.as_str(),
                None => return Ok(None),
            },
        };

        Ok(self
            .values
            .get_key_value(name)
            .map(|(name, value)| (name.as_str(), value)))
    }
}
