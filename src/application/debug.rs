//! Debug-only post-processing of rendered documents.

use serde_json::Value;

use crate::application::json_options::JsonOptions;
use crate::domain::error::EncodeError;

pub const QUERY_LOG_KEY: &str = "query";

/// Re-open a rendered document and add a top-level `query` member holding
/// the supplied query-log entries.
pub fn splice_query_log(
    rendered: &str,
    entries: &[Value],
    options: JsonOptions,
) -> Result<String, EncodeError> {
    let mut document: Value = serde_json::from_str(rendered)?;
    if let Value::Object(members) = &mut document {
        members.insert(QUERY_LOG_KEY.to_string(), Value::Array(entries.to_vec()));
    }
    Ok(options.encode(&document)?)
}
