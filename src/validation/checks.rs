//! Validation checks for token trees and compiled themes.
//!
//! Each check returns a `ValidationResult`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::compiler::{classify, CompileOptions, Compiled, Node, PALETTE_KEY};
use crate::types::{expand_units, Token, Tokens, SHADE_NAMES};

use super::warning::{Diagnostic, ValidationResult};

/// Maximum length of a CSS identifier accepted as prefix or scope.
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// `^[\w-]+$`, at most 255 characters.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_IDENTIFIER_LEN
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check that the prefix and scope are usable CSS identifiers.
pub fn check_identifiers(options: &CompileOptions) -> ValidationResult {
    let mut result = ValidationResult::new();

    let fields = [("prefix", &options.prefix), ("scope", &options.scope)];
    for (field, value) in fields {
        let Some(value) = value else {
            continue;
        };
        if !is_valid_identifier(value) {
            result.push(
                Diagnostic::error(
                    "dstokens::validate::invalid-identifier",
                    format!("Invalid {} '{}'", field, value),
                )
                .with_help("Use letters, digits, '_' or '-' (at most 255 characters)"),
            );
        }
    }

    result
}

/// Check media names used by responsive tuples against the registry.
///
/// Undeclared names are errors; declared names that nothing uses are
/// warnings.
pub fn check_media_refs(tokens: &Tokens, options: &CompileOptions) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut used: Vec<(String, String)> = Vec::new();
    collect_media_refs(tokens, "", &mut used);

    for (path, name) in &used {
        if !options.medias.contains_key(name) {
            result.push(
                Diagnostic::error(
                    "dstokens::validate::unknown-media",
                    format!("Unknown media '{}'", name),
                )
                .with_subject(path.clone())
                .with_help("Declare it under `medias` or fix the name"),
            );
        }
    }

    let used_names: HashSet<&str> = used.iter().map(|(_, name)| name.as_str()).collect();
    for name in options.medias.keys() {
        if !used_names.contains(name.as_str()) {
            result.push(Diagnostic::warning(
                "dstokens::validate::unused-media",
                format!("Media '{}' is declared but never used", name),
            ));
        }
    }

    result
}

fn collect_media_refs(tokens: &Tokens, path: &str, used: &mut Vec<(String, String)>) {
    for (key, token) in tokens.iter() {
        let here = if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        };

        match classify(key, false, token) {
            Node::Responsive { media, .. } => {
                used.extend(media.keys().map(|name| (here.clone(), name.to_string())));
            }
            Node::Tree(tree) => collect_media_refs(tree, &here, used),
            Node::List(items) => {
                let indexed: Tokens = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), Token::clone(item)))
                    .collect();
                collect_media_refs(&indexed, &here, used);
            }
            Node::Palette(_) | Node::Units(_) | Node::Atom(_) | Node::Empty => {}
        }
    }
}

/// Warn when distinct token paths compile to the same property.
///
/// `a-b: 1px` and `a: {b: 2px}` both become `--a-b`; the compiler keeps
/// one variable and the later value replaces the earlier one.
pub fn check_path_collisions(tokens: &Tokens) -> ValidationResult {
    let mut leaves = Vec::new();
    collect_leaf_paths(tokens, &mut Vec::new(), false, &mut leaves);

    let mut result = ValidationResult::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for segments in leaves {
        let dotted = segments.join(".");
        match seen.entry(segments.join("-")) {
            Entry::Occupied(first) => result.push(
                Diagnostic::warning(
                    "dstokens::validate::path-collision",
                    format!(
                        "'{}' and '{}' both compile to --{}",
                        first.get(),
                        dotted,
                        first.key()
                    ),
                )
                .with_subject(dotted)
                .with_help("Rename one of the keys; only the later value is kept"),
            ),
            Entry::Vacant(slot) => {
                slot.insert(dotted);
            }
        }
    }

    result
}

/// Path segments of every property a compilation would declare, generated
/// shades and unit steps included.
fn collect_leaf_paths(
    tokens: &Tokens,
    path: &mut Vec<String>,
    in_palette: bool,
    leaves: &mut Vec<Vec<String>>,
) {
    for (key, token) in tokens.iter() {
        path.push(key.to_string());

        match classify(key, in_palette, token) {
            Node::Atom(_) | Node::Responsive { .. } => leaves.push(path.clone()),
            Node::Palette(_) => {
                for shade in SHADE_NAMES {
                    leaves.push(child(path, [shade]));
                }
            }
            Node::Units(config) => {
                // Bad ranges are reported by the trial compilation.
                if let Ok(scales) = expand_units(config) {
                    for (unit, scale) in &scales {
                        for step in scale.keys() {
                            leaves.push(child(path, [unit.as_str(), step.as_str()]));
                        }
                    }
                }
            }
            Node::Tree(tree) => collect_leaf_paths(tree, path, key == PALETTE_KEY, leaves),
            Node::List(items) => {
                let indexed: Tokens = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), Token::clone(item)))
                    .collect();
                collect_leaf_paths(&indexed, path, key == PALETTE_KEY, leaves);
            }
            Node::Empty => {}
        }

        path.pop();
    }
}

fn child<const N: usize>(path: &[String], segments: [&str; N]) -> Vec<String> {
    path.iter()
        .cloned()
        .chain(segments.iter().map(|s| s.to_string()))
        .collect()
}

/// Warn when two themes use the same minified name for different
/// properties. Their CSS cannot be concatenated safely.
pub fn check_name_collisions(themes: &[(&str, &Compiled)]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, (first_name, first)) in themes.iter().enumerate() {
        let Some(first_map) = &first.variable_map else {
            continue;
        };

        for (second_name, second) in &themes[i + 1..] {
            let Some(second_map) = &second.variable_map else {
                continue;
            };

            let clashes: Vec<&str> = first_map
                .iter()
                .filter(|(minified, original)| {
                    second_map
                        .original(minified)
                        .is_some_and(|other| other != *original)
                })
                .map(|(minified, _)| minified)
                .collect();

            if !clashes.is_empty() {
                result.push(
                    Diagnostic::warning(
                        "dstokens::validate::name-collision",
                        format!(
                            "Themes '{}' and '{}' share {} minified name(s) for different properties (first: {})",
                            first_name,
                            second_name,
                            clashes.len(),
                            clashes[0]
                        ),
                    )
                    .with_help("Give each theme a distinct `scope` before concatenating their CSS"),
                );
            }
        }
    }

    result
}
