//! Response contracts for the two AI operations.
//!
//! Each contract is a `serde` type; its JSON schema is derived with `schemars`
//! and sent along with the prompt so the model answers in that shape. The
//! reply is then parsed back into the same type, so anything off-schema fails.

use crate::{errors::Result, models::RecordAnnotation};
use schemars::{JsonSchema, r#gen::SchemaSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply to a summarize request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
    /// One prose paragraph describing the customer's records
    pub summary: String,
}

/// Reply to a highlight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResponse {
    /// One entry per submitted record
    pub highlighted_records: Vec<RecordAnnotation>,
}

/// Schema keywords the generation API understands; everything else is dropped.
const ALLOWED_KEYWORDS: &[&str] = &[
    "type",
    "format",
    "description",
    "nullable",
    "enum",
    "properties",
    "required",
    "items",
];

/// Builds an inlined OpenAPI-style schema for `T` (no `$ref`, no `$schema`).
pub fn response_schema<T: JsonSchema>() -> Result<Value> {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(root.schema)?;
    retain_supported(&mut value);
    Ok(value)
}

fn retain_supported(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };
    map.retain(|key, _| ALLOWED_KEYWORDS.contains(&key.as_str()));

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        properties.values_mut().for_each(retain_supported);
    }
    if let Some(items) = map.get_mut("items") {
        retain_supported(items);
    }
}
