//! Minified custom-property names.
//!
//! Names follow a bijective base-52 letter sequence followed by a single
//! digit: `a0..a9, b0..z9, A0..Z9, aa0, ...`. Each compilation owns its own
//! [`NameAllocator`], so two compilations never share a naming sequence.

use indexmap::IndexMap;
use serde::Serialize;

const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Bijective base-52 letters: `0 -> a`, `25 -> z`, `26 -> A`, `51 -> Z`, `52 -> aa`.
pub fn index_to_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(ALPHABET[n % 52]);
        n /= 52;
    }
    letters.reverse();
    // ALPHABET is ASCII.
    letters.into_iter().map(char::from).collect()
}

/// Minified name (without the leading `--`) for the `counter`-th property.
///
/// With a prefix, the first ten names are `prefix0..prefix9` and the letter
/// sequence starts one level later (`prefixa0`, `prefixa1`, ...).
pub fn minify_variable_name(counter: usize, prefix: Option<&str>) -> String {
    let index = counter / 10;
    let digit = counter % 10;

    match prefix {
        None => format!("{}{}", index_to_letters(index), digit),
        Some(prefix) if index == 0 => format!("{}{}", prefix, digit),
        Some(prefix) => format!("{}{}{}", prefix, index_to_letters(index - 1), digit),
    }
}

/// Per-compilation name table: original path <-> minified name.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    prefix: Option<String>,
    forward: IndexMap<String, String>,
    reverse: IndexMap<String, String>,
}

impl NameAllocator {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    /// Return the minified property name for `original`, allocating one on
    /// first sight. Repeated lookups of the same path return the same name.
    pub fn get_or_allocate(&mut self, original: &str) -> String {
        if let Some(existing) = self.forward.get(original) {
            return existing.clone();
        }

        let minified = format!(
            "--{}",
            minify_variable_name(self.forward.len(), self.prefix.as_deref())
        );
        tracing::trace!(original, minified = minified.as_str(), "allocated property name");

        self.forward.insert(original.to_string(), minified.clone());
        self.reverse.insert(minified.clone(), original.to_string());
        minified
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn into_map(self) -> NameMap {
        NameMap {
            forward: self.forward,
            reverse: self.reverse,
        }
    }
}

/// Finished name table of a compilation.
///
/// Serializes as `minified -> original`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NameMap {
    #[serde(skip)]
    forward: IndexMap<String, String>,
    #[serde(flatten)]
    reverse: IndexMap<String, String>,
}

impl NameMap {
    /// Original path for a minified name.
    pub fn original(&self, minified: &str) -> Option<&str> {
        self.reverse.get(minified).map(String::as_str)
    }

    /// Minified name for an original path.
    pub fn minified(&self, original: &str) -> Option<&str> {
        self.forward.get(original).map(String::as_str)
    }

    /// `(minified, original)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reverse.iter().map(|(m, o)| (m.as_str(), o.as_str()))
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}
