//! Application layer: schema resolution and document encoding.

pub mod debug;
pub mod directives;
pub mod encoder;
pub mod error;
pub mod inclusion;
pub mod json_options;
pub mod links;
pub mod resolver;
pub mod schema;
pub mod view_vars;
