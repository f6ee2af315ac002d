//! Document encoder: response mode selection and resource-mode assembly.

use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::application::{
    debug::splice_query_log,
    directives::{Directives, SerializeDirective},
    inclusion::{EncodingParameters, FieldSets, GraphWalk, IncludePaths},
    json_options::JsonOptions,
    links::{json_api_object, top_level_links},
    resolver::{SchemaRegistry, SchemaTable},
    schema::SchemaContext,
    view_vars::{ViewValue, ViewVars},
};
use crate::config::RenderSettings;
use crate::domain::{
    document::{Document, PrimaryData},
    entity::Entity,
    error::EncodeError,
};

pub const METRIC_DOCUMENTS_RENDERED: &str = "jsonapi_documents_rendered_total";
pub const METRIC_INCLUDED_RESOURCES: &str = "jsonapi_included_resources";

/// Shape of the produced response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Resource,
    MetaOnly,
    Empty,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Resource => "resource",
            RenderMode::MetaOnly => "meta",
            RenderMode::Empty => "empty",
        }
    }
}

/// Renders view variables into JSON:API documents.
///
/// The encoder borrows an immutable registry; every call builds its own
/// schema table and document, so one registry can serve concurrent
/// encoders.
#[derive(Debug)]
pub struct DocumentEncoder<'r> {
    registry: &'r SchemaRegistry,
    settings: RenderSettings,
}

impl<'r> DocumentEncoder<'r> {
    pub fn new(registry: &'r SchemaRegistry, settings: RenderSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render to text. An empty string is the empty-body response.
    pub fn render(&self, directives: &Directives, vars: &ViewVars) -> Result<String, EncodeError> {
        self.render_document(directives, vars, None)
    }

    /// Render and, in debug mode with `debugQueryLog` set, add the entries
    /// as a top-level `query` member.
    pub fn render_with_query_log(
        &self,
        directives: &Directives,
        vars: &ViewVars,
        query_log: &[Value],
    ) -> Result<String, EncodeError> {
        self.render_document(directives, vars, Some(query_log))
    }

    fn render_document(
        &self,
        directives: &Directives,
        vars: &ViewVars,
        query_log: Option<&[Value]>,
    ) -> Result<String, EncodeError> {
        let options = self.json_options(directives);
        let Some(document) = self.encode(directives, vars)? else {
            return Ok(String::new());
        };

        let rendered = options.encode(&document)?;
        match query_log {
            Some(entries) if self.settings.debug && directives.debug_query_log => {
                splice_query_log(&rendered, entries, options)
            }
            _ => Ok(rendered),
        }
    }

    pub fn json_options(&self, directives: &Directives) -> JsonOptions {
        JsonOptions::for_render(
            directives.json_options,
            self.settings.debug,
            directives.debug_pretty_print,
        )
    }

    /// Build the document tree. `None` is the empty-body response.
    #[instrument(skip_all)]
    pub fn encode(
        &self,
        directives: &Directives,
        vars: &ViewVars,
    ) -> Result<Option<Document>, EncodeError> {
        let (document, mode) = match directives.enabled_entities() {
            Some(entities) => self.encode_resources(entities, directives, vars)?,
            None => match directives.meta_object() {
                Some(meta) => (Some(Document::meta_only(meta.clone())), RenderMode::MetaOnly),
                None => (None, RenderMode::Empty),
            },
        };

        debug!(mode = mode.as_str(), "encoded document");
        counter!(METRIC_DOCUMENTS_RENDERED, "mode" => mode.as_str()).increment(1);
        Ok(document)
    }

    fn encode_resources(
        &self,
        entities: &[String],
        directives: &Directives,
        vars: &ViewVars,
    ) -> Result<(Option<Document>, RenderMode), EncodeError> {
        let selected = vars.select(&directives.serialize)?;
        let mut schemas = self
            .registry
            .resolve_all(entities.iter().map(String::as_str))?;

        match (selected, &directives.serialize) {
            (Some((name, _)), _) => debug!(view_var = name, "serializing view variable"),
            (None, SerializeDirective::Name(name)) => {
                warn!(view_var = %name, "view variable named by `serialize` is not set");
            }
            (None, SerializeDirective::Names(names)) if !names.is_empty() => {
                warn!(view_var = %names[0], "view variable named by `serialize` is not set");
            }
            (None, _) => debug!("no view variable selected for serialization"),
        }
        let value = selected.map(|(_, value)| value);

        let mut document = Document {
            jsonapi: json_api_object(&directives.with_json_api_version),
            links: top_level_links(directives),
            ..Document::default()
        };

        if let Some(meta) = directives.meta_object() {
            document.meta = Some(meta.clone());
            if value.is_none_or(ViewValue::is_empty) {
                return Ok((Some(document), RenderMode::MetaOnly));
            }
        }

        let (primary, many): (Vec<&dyn Entity>, bool) = match value {
            None | Some(ViewValue::Null) => {
                document.data = Some(PrimaryData::One(None));
                return Ok((Some(document), RenderMode::Resource));
            }
            Some(ViewValue::Resource(entity)) => (vec![&**entity], false),
            Some(ViewValue::Collection(entities)) => {
                (entities.iter().map(|entity| &**entity).collect(), true)
            }
        };

        let include = match directives.include.as_ref() {
            Some(paths) => IncludePaths::new(paths),
            None => default_include_paths(&mut schemas, &primary)?,
        };
        let params = EncodingParameters {
            include,
            field_sets: FieldSets::new(&directives.field_sets),
        };
        let url_prefix = directives
            .url_prefix
            .as_deref()
            .or(self.settings.url_prefix.as_deref());

        let output =
            GraphWalk::new(&mut schemas, SchemaContext::new(url_prefix), &params).run(&primary)?;

        histogram!(METRIC_INCLUDED_RESOURCES).record(output.included.len() as f64);
        document.data = Some(if many {
            PrimaryData::Many(output.primary)
        } else {
            PrimaryData::One(output.primary.into_iter().next())
        });
        document.included = output.included;

        Ok((Some(document), RenderMode::Resource))
    }
}

/// Union of the default inclusion paths declared by the primary schemas.
fn default_include_paths(
    schemas: &mut SchemaTable<'_>,
    primary: &[&dyn Entity],
) -> Result<IncludePaths, EncodeError> {
    let mut paths = Vec::new();
    for entity in primary {
        paths.extend(schemas.resolve(entity.entity_name())?.include_paths());
    }
    Ok(IncludePaths::new(paths))
}
