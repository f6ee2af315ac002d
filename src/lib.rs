//! Render in-memory entities as JSON:API documents.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::{
    directives::Directives,
    encoder::{DocumentEncoder, RenderMode},
    resolver::SchemaRegistry,
    schema::{Relationship, Schema, SchemaContext},
    view_vars::{ViewValue, ViewVars},
};
pub use domain::{
    document::Document,
    entity::{Entity, Record, Related},
    error::EncodeError,
};
