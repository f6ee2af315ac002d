use thiserror::Error;

/// Failures that abort a render call.
///
/// Missing data (no value to serialize, no fieldset entry, absent pagination
/// keys) is never an error; it only shapes the document.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("entity `{name}` is not declared in the schema registry")]
    UnresolvableResourceType { name: String },
    #[error(
        "`serialize` must reference a view variable by name; assign the object to its own variable instead"
    )]
    InvalidSerializeDirective,
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EncodeError {
    pub fn unresolvable(name: impl Into<String>) -> Self {
        Self::UnresolvableResourceType { name: name.into() }
    }
}
