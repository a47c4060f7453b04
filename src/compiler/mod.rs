//! Token compiler.
//!
//! [`atomize`] walks a token tree depth-first and turns every leaf into a
//! minified CSS custom property:
//!
//! ```ignore
//! use dstokens::{atomize, CompileOptions, Tokens};
//!
//! let tokens = Tokens::from_yaml("spacing:\n  md: [{desktop: 24px}, 16px]\n")?;
//! let options = CompileOptions::new().with_media("desktop", "(min-width: 1024px)");
//! let compiled = atomize(&tokens, &options)?;
//!
//! assert_eq!(compiled.refs.var("spacing.md"), Some("var(--a0, 16px)"));
//! println!("{}", compiled.css());
//! ```
//!
//! All state of one compilation lives in a private `Compiler` value created
//! per call, so separate compilations never affect each other's names.

pub mod classify;
pub mod names;
pub mod reference;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, TokenError};
use crate::render::{get_css, get_jss};
use crate::types::{
    create_property_metadata, expand_color, expand_units, Atom, PropertyMetadata, Token, Tokens,
};

pub use classify::{classify, Node, PALETTE_KEY, UNITS_KEY};
pub use names::{index_to_letters, minify_variable_name, NameAllocator, NameMap};
pub use reference::{resolve_reference, RefTree, Reference, VarExpr};

/// `@property` metadata keyed by minified property name.
pub type Metadata = IndexMap<String, PropertyMetadata>;

/// Options for one compilation.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Prepended to every original property path (`--<prefix>-<path>`).
    pub prefix: Option<String>,
    /// Prefix for minified names, to keep separately compiled themes apart.
    pub scope: Option<String>,
    /// Media registry: media name -> condition without `@media`.
    pub medias: IndexMap<String, String>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_media(mut self, name: impl Into<String>, query: impl Into<String>) -> Self {
        self.medias.insert(name.into(), query.into());
        self
    }
}

/// Variable declarations split into the `:root` partition and one
/// partition per media query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    root: IndexMap<String, String>,
    media: IndexMap<String, IndexMap<String, String>>,
}

impl Variables {
    /// Declarations injected at `:root`.
    pub fn root(&self) -> &IndexMap<String, String> {
        &self.root
    }

    /// Media partitions keyed by `@media <condition>`, in encounter order.
    pub fn media(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.media
    }

    /// Declarations of one media partition, by its `@media ...` key.
    pub fn media_partition(&self, key: &str) -> Option<&IndexMap<String, String>> {
        self.media.get(key)
    }

    pub(crate) fn set_root(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.root.insert(name.into(), value.into());
    }

    pub(crate) fn set_media(&mut self, query: &str, name: impl Into<String>, value: impl Into<String>) {
        let key = format!("@media {}", query);
        if !self.media.contains_key(&key) {
            tracing::debug!(partition = key.as_str(), "new media partition");
        }
        self.media
            .entry(key)
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.media.is_empty()
    }
}

/// Serializes as one flat record: root declarations followed by
/// `@media ...` keys holding their partitions.
impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.len() + self.media.len()))?;
        for (name, value) in &self.root {
            map.serialize_entry(name, value)?;
        }
        for (query, partition) in &self.media {
            map.serialize_entry(query, partition)?;
        }
        map.end()
    }
}

/// Result of compiling one token tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub vars: Variables,
    pub refs: RefTree,
    pub metadata: Metadata,
    /// Present when at least one property was allocated.
    pub variable_map: Option<NameMap>,
}

impl Compiled {
    /// CSS text with `@property` rules.
    pub fn css(&self) -> String {
        get_css(&self.vars, Some(&self.metadata))
    }

    /// Structured stylesheet object with `@property` rules.
    pub fn jss(&self) -> serde_json::Value {
        get_jss(&self.vars, Some(&self.metadata))
    }
}

/// Compile a token tree into variables, references and metadata.
pub fn atomize(tokens: &Tokens, options: &CompileOptions) -> Result<Compiled> {
    let mut compiler = Compiler::new(options);
    let refs = compiler.walk(tokens, &mut Vec::new(), true)?;

    tracing::debug!(
        properties = compiler.names.len(),
        partitions = compiler.vars.media.len(),
        "compiled token tree"
    );

    let variable_map = if compiler.names.is_empty() {
        None
    } else {
        Some(compiler.names.into_map())
    };

    Ok(Compiled {
        vars: compiler.vars,
        refs,
        metadata: compiler.metadata,
        variable_map,
    })
}

/// Accumulated state of a single compilation.
struct Compiler<'o> {
    options: &'o CompileOptions,
    names: NameAllocator,
    vars: Variables,
    metadata: Metadata,
}

impl<'o> Compiler<'o> {
    fn new(options: &'o CompileOptions) -> Self {
        Self {
            options,
            names: NameAllocator::new(options.scope.clone()),
            vars: Variables::default(),
            metadata: Metadata::new(),
        }
    }

    /// Compile every entry of `tokens` found at `path`.
    ///
    /// `expand` is false inside generated subtrees (shade scales, unit
    /// scales), which are never expanded again.
    fn walk(&mut self, tokens: &Tokens, path: &mut Vec<String>, expand: bool) -> Result<RefTree> {
        let in_palette = expand && path.last().is_some_and(|last| last == PALETTE_KEY);
        let mut refs = RefTree::new();

        for (key, token) in tokens.iter() {
            if let Some(reference) = self.visit(key, token, path, in_palette, expand)? {
                refs.insert(key, reference);
            }
        }

        Ok(refs)
    }

    fn visit(
        &mut self,
        key: &str,
        token: &Token,
        path: &mut Vec<String>,
        in_palette: bool,
        expand: bool,
    ) -> Result<Option<Reference>> {
        let reference = match classify(key, in_palette, token) {
            Node::Palette(colour) => {
                tracing::trace!(key, colour, "expanding palette colour");
                let shades: Tokens = expand_color(colour)?
                    .to_map()
                    .into_iter()
                    .map(|(name, value)| (name, Token::from(value)))
                    .collect();
                Reference::Tree(self.nested(key, &shades, path, false)?)
            }
            Node::Units(config) => {
                tracing::trace!(key, units = config.len(), "expanding units shorthand");
                let scales: Tokens = expand_units(config)?
                    .into_iter()
                    .map(|(unit, scale)| {
                        let scale: Tokens = scale
                            .into_iter()
                            .map(|(step, value)| (step, Token::from(value)))
                            .collect();
                        (unit, Token::Tree(scale))
                    })
                    .collect();
                Reference::Tree(self.nested(key, &scales, path, false)?)
            }
            Node::Atom(atom) => Reference::Var(self.leaf(key, atom, path)),
            Node::Responsive { media, default } => {
                Reference::Var(self.responsive(key, media, default, path)?)
            }
            Node::Tree(tree) => Reference::Tree(self.nested(key, tree, path, expand)?),
            Node::List(items) => {
                let indexed: Tokens = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item.clone()))
                    .collect();
                Reference::Tree(self.nested(key, &indexed, path, expand)?)
            }
            Node::Empty => {
                let property = self.original_name(path, key);
                tracing::warn!(property = property.as_str(), "skipping empty token");
                return Ok(None);
            }
        };

        Ok(Some(reference))
    }

    fn nested(
        &mut self,
        key: &str,
        tokens: &Tokens,
        path: &mut Vec<String>,
        expand: bool,
    ) -> Result<RefTree> {
        path.push(key.to_string());
        let refs = self.walk(tokens, path, expand);
        path.pop();
        refs
    }

    fn leaf(&mut self, key: &str, atom: &Atom, path: &[String]) -> String {
        let original = self.original_name(path, key);
        let name = self.names.get_or_allocate(&original);
        let value = atom.to_string();

        if let Some(metadata) = create_property_metadata(&value) {
            self.metadata.insert(name.clone(), metadata);
        }
        self.declare(&original, &name, &value);

        VarExpr::new(name, Some(value)).render()
    }

    fn responsive(
        &mut self,
        key: &str,
        media: &Tokens,
        default: Option<&Atom>,
        path: &[String],
    ) -> Result<String> {
        let original = self.original_name(path, key);
        let name = self.names.get_or_allocate(&original);

        for (media_name, value) in media.iter() {
            let query = self
                .options
                .medias
                .get(media_name)
                .ok_or_else(|| TokenError::UnknownMedia {
                    name: media_name.to_string(),
                    path: original.clone(),
                })?;
            match value.as_atom() {
                Some(atom) if !atom.is_empty() => {
                    self.vars.set_media(query, name.clone(), atom.to_string());
                }
                _ => tracing::warn!(
                    property = original.as_str(),
                    media = media_name,
                    "skipping empty media value"
                ),
            }
        }

        let fallback = default.map(Atom::to_string);
        if let Some(value) = &fallback {
            self.declare(&original, &name, value);
        }

        Ok(VarExpr::new(name, fallback).render())
    }

    /// Set a `:root` declaration. Distinct paths can share a name (`a-b` and
    /// `a.b`); the later value wins.
    fn declare(&mut self, original: &str, name: &str, value: &str) {
        if let Some(previous) = self.vars.root().get(name).filter(|p| p.as_str() != value) {
            tracing::warn!(
                property = original,
                previous = previous.as_str(),
                value,
                "property declared twice, keeping the later value"
            );
        }
        self.vars.set_root(name, value);
    }

    /// `--<prefix>-<path...>-<key>`
    fn original_name(&self, path: &[String], key: &str) -> String {
        let prefix = self
            .options
            .prefix
            .as_deref()
            .map(|p| p.trim_matches('-'))
            .filter(|p| !p.is_empty());

        let segments: Vec<&str> = prefix
            .into_iter()
            .chain(path.iter().map(String::as_str))
            .chain(std::iter::once(key))
            .collect();

        format!("--{}", segments.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(yaml: &str, options: &CompileOptions) -> Compiled {
        atomize(&Tokens::from_yaml(yaml).unwrap(), options).unwrap()
    }

    #[test]
    fn test_leaves_get_sequential_names() {
        let compiled = compile(
            "colors:\n  amber:\n    light: rgb(251,191,36)\n    dark: rgb(217,119,6)\n",
            &CompileOptions::new().with_prefix("ds-tokens"),
        );

        let root: Vec<(&str, &str)> = compiled
            .vars
            .root()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            root,
            vec![("--a0", "rgb(251,191,36)"), ("--a1", "rgb(217,119,6)")]
        );
        assert_eq!(
            compiled.refs.var("colors.amber.light"),
            Some("var(--a0, rgb(251, 191, 36))")
        );

        let map = compiled.variable_map.unwrap();
        assert_eq!(map.original("--a0"), Some("--ds-tokens-colors-amber-light"));
        assert_eq!(map.original("--a1"), Some("--ds-tokens-colors-amber-dark"));
    }

    #[test]
    fn test_numbers_are_atoms() {
        let compiled = compile("font:\n  weight: 600\n  leading: 1.5\n", &CompileOptions::new());
        assert_eq!(compiled.vars.root()["--a0"], "600");
        assert_eq!(compiled.vars.root()["--a1"], "1.5");
        assert_eq!(compiled.metadata["--a0"].syntax.as_str(), "<integer>");
        assert_eq!(compiled.metadata["--a1"].syntax.as_str(), "<number>");
    }

    #[test]
    fn test_responsive_shares_one_name() {
        let options = CompileOptions::new().with_media("desktop", "(min-width: 1024px)");
        let compiled = compile("spacing:\n  md: [{desktop: 24px}, 16px]\n", &options);

        assert_eq!(compiled.vars.root()["--a0"], "16px");
        let desktop = compiled
            .vars
            .media_partition("@media (min-width: 1024px)")
            .unwrap();
        assert_eq!(desktop["--a0"], "24px");
        assert_eq!(compiled.refs.var("spacing.md"), Some("var(--a0, 16px)"));
        assert!(compiled.metadata.is_empty());
    }

    #[test]
    fn test_responsive_without_default() {
        let options = CompileOptions::new().with_media("print", "print");
        let compiled = compile("hidden: [{print: none}]\n", &options);

        assert!(compiled.vars.root().is_empty());
        assert_eq!(compiled.vars.media_partition("@media print").unwrap()["--a0"], "none");
        assert_eq!(compiled.refs.var("hidden"), Some("var(--a0)"));
    }

    #[test]
    fn test_unknown_media_is_an_error() {
        let tokens = Tokens::from_yaml("md: [{tablet: 20px}, 16px]\n").unwrap();
        let err = atomize(&tokens, &CompileOptions::new()).unwrap_err();
        assert!(
            matches!(&err, TokenError::UnknownMedia { name, path } if name == "tablet" && path == "--md")
        );
    }

    #[test]
    fn test_media_partitions_keep_encounter_order() {
        let options = CompileOptions::new()
            .with_media("wide", "(min-width: 1280px)")
            .with_media("narrow", "(max-width: 640px)");
        let compiled = compile(
            "a: [{narrow: 1px}, 2px]\nb: [{wide: 3px, narrow: 4px}, 5px]\n",
            &options,
        );

        let keys: Vec<&str> = compiled.vars.media().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["@media (max-width: 640px)", "@media (min-width: 1280px)"]
        );
        let narrow = compiled.vars.media_partition("@media (max-width: 640px)").unwrap();
        assert_eq!(narrow.len(), 2);
    }

    #[test]
    fn test_palette_expands_to_shades() {
        let compiled = compile(
            "palette:\n  primary: oklch(60% 0.15 250)\n",
            &CompileOptions::new(),
        );

        assert_eq!(compiled.vars.root().len(), 7);
        assert_eq!(
            compiled.refs.var("palette.primary.base"),
            Some("var(--a3, oklch(60% 0.15 250))")
        );
        let map = compiled.variable_map.unwrap();
        assert_eq!(map.original("--a0"), Some("--palette-primary-lightest"));
        assert_eq!(map.original("--a6"), Some("--palette-primary-darkest"));
    }

    #[test]
    fn test_palette_requires_oklch() {
        let compiled = compile("palette:\n  primary: '#3366ff'\n", &CompileOptions::new());
        assert_eq!(compiled.vars.root().len(), 1);
        assert_eq!(compiled.refs.var("palette.primary"), Some("var(--a0, #3366ff)"));
    }

    #[test]
    fn test_units_expand() {
        let compiled = compile("units:\n  px: [0, 4, 8]\n", &CompileOptions::new());

        assert_eq!(compiled.refs.var("units.px.4"), Some("var(--a1, 4px)"));
        assert_eq!(compiled.vars.root()["--a2"], "8px");
        assert_eq!(compiled.metadata["--a2"].syntax.as_str(), "<length>");
    }

    #[test]
    fn test_units_errors_propagate() {
        let tokens = Tokens::from_yaml("units:\n  px: [4, 1, 0]\n").unwrap();
        assert!(matches!(
            atomize(&tokens, &CompileOptions::new()),
            Err(TokenError::Range { .. })
        ));

        let tokens = Tokens::from_yaml("units:\n  pt: [0, 1, 2]\n").unwrap();
        assert!(matches!(
            atomize(&tokens, &CompileOptions::new()),
            Err(TokenError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_forwarded_values_have_no_metadata() {
        let compiled = compile(
            "base: 16px\nalias: var(--other)\n",
            &CompileOptions::new(),
        );
        assert!(compiled.metadata.contains_key("--a0"));
        assert!(!compiled.metadata.contains_key("--a1"));
        assert_eq!(compiled.vars.root()["--a1"], "var(--other)");
    }

    #[test]
    fn test_plain_lists_are_indexed() {
        let compiled = compile("shadows: [0 1px 2px black, 0 2px 4px black]\n", &CompileOptions::new());
        assert_eq!(compiled.refs.var("shadows.1"), Some("var(--a1, 0 2px 4px black)"));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let compiled = compile("a: ''\nb: 1px\n", &CompileOptions::new());
        assert_eq!(compiled.vars.root().len(), 1);
        assert!(compiled.refs.get("a").is_none());
        assert_eq!(compiled.refs.var("b"), Some("var(--a0, 1px)"));
    }

    #[test]
    fn test_empty_media_values_are_skipped() {
        let options = CompileOptions::new()
            .with_media("desktop", "(min-width: 1024px)")
            .with_media("print", "print");
        let compiled = compile("md: [{desktop: '', print: 0}, 16px]\n", &options);

        assert!(compiled
            .vars
            .media_partition("@media (min-width: 1024px)")
            .is_none());
        assert_eq!(compiled.vars.media_partition("@media print").unwrap()["--a0"], "0");
        assert!(!compiled.css().contains("--a0:;"));
        assert_eq!(compiled.refs.var("md"), Some("var(--a0, 16px)"));
    }

    #[test]
    fn test_colliding_paths_share_one_property() {
        let compiled = compile("a-b: 1px\na:\n  b: 2px\n", &CompileOptions::new());

        assert_eq!(compiled.vars.root().len(), 1);
        assert_eq!(compiled.vars.root()["--a0"], "2px");
        assert_eq!(compiled.refs.var("a-b"), Some("var(--a0, 1px)"));
        assert_eq!(compiled.refs.var("a.b"), Some("var(--a0, 2px)"));
        assert_eq!(compiled.variable_map.unwrap().len(), 1);
    }

    #[test]
    fn test_palette_rejects_extreme_lightness() {
        let tokens = Tokens::from_yaml("palette:\n  white: oklch(100% 0 0)\n").unwrap();
        let err = atomize(&tokens, &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, TokenError::ShadeBase { .. }), "{:?}", err);
    }

    #[test]
    fn test_empty_tree_has_no_variable_map() {
        let compiled = compile("{}", &CompileOptions::new());
        assert!(compiled.vars.is_empty());
        assert!(compiled.variable_map.is_none());
    }

    #[test]
    fn test_scope_prefixes_minified_names() {
        let compiled = compile("a: 1px\n", &CompileOptions::new().with_scope("dk"));
        assert_eq!(compiled.refs.var("a"), Some("var(--dk0, 1px)"));
    }

    #[test]
    fn test_variables_serialize_flat() {
        let options = CompileOptions::new().with_media("desktop", "(min-width: 1024px)");
        let compiled = compile("md: [{desktop: 24px}, 16px]\n", &options);
        let json = serde_json::to_value(&compiled.vars).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "--a0": "16px",
                "@media (min-width: 1024px)": {"--a0": "24px"}
            })
        );
    }
}
