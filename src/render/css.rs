//! CSS text output.

use indexmap::IndexMap;

use crate::compiler::{Metadata, Variables};

/// Render variables as CSS text.
///
/// Output is `@property` rules (one per metadata entry), a single `:root`
/// block, then one `@media <condition>{:root{...}}` block per partition.
/// Declarations are written as `name:value;` with no extra whitespace.
pub fn get_css(vars: &Variables, metadata: Option<&Metadata>) -> String {
    let mut css = String::new();

    if let Some(metadata) = metadata {
        for (name, meta) in metadata {
            css.push_str(&format!(
                "@property {}{{syntax:\"{}\";inherits:{};initial-value:{};}}",
                name, meta.syntax, meta.inherits, meta.initial_value
            ));
        }
    }

    css.push_str(":root{");
    push_declarations(&mut css, vars.root());
    css.push('}');

    for (query, partition) in vars.media() {
        css.push_str(query);
        css.push_str("{:root{");
        push_declarations(&mut css, partition);
        css.push_str("}}");
    }

    css
}

fn push_declarations(css: &mut String, declarations: &IndexMap<String, String>) {
    for (name, value) in declarations {
        css.push_str(name);
        css.push(':');
        css.push_str(value);
        css.push(';');
    }
}
