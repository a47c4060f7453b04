//! Structured (JSS-like) stylesheet output.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::compiler::{Metadata, Variables};

/// Render variables as a nested stylesheet object.
///
/// Keys mirror the CSS output: `@property <name>` entries, then `:root`,
/// then one `@media <condition>` entry per partition holding `{":root": ...}`.
pub fn get_jss(vars: &Variables, metadata: Option<&Metadata>) -> Value {
    let mut sheet = Map::new();

    if let Some(metadata) = metadata {
        for (name, meta) in metadata {
            sheet.insert(
                format!("@property {}", name),
                json!({
                    "syntax": format!("\"{}\"", meta.syntax),
                    "inherits": meta.inherits,
                    "initialValue": meta.initial_value,
                }),
            );
        }
    }

    sheet.insert(":root".to_string(), declarations(vars.root()));

    for (query, partition) in vars.media() {
        sheet.insert(query.clone(), json!({ ":root": declarations(partition) }));
    }

    Value::Object(sheet)
}

fn declarations(declarations: &IndexMap<String, String>) -> Value {
    Value::Object(
        declarations
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect(),
    )
}
