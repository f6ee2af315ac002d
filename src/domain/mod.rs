//! Domain layer: entities, the document tree and encoding errors.

pub mod document;
pub mod entity;
pub mod error;
pub mod types;
