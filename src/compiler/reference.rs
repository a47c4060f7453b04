//! Reference expressions handed back to application code.
//!
//! Every compiled leaf becomes a `var(--name, fallback)` string. The tree of
//! those strings mirrors the token tree so callers can look values up by the
//! same path they authored.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, TokenError};

use super::Variables;

/// A reference-tree node: either a `var()` expression or a subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reference {
    Var(String),
    Tree(RefTree),
}

impl Reference {
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Reference::Var(expr) => Some(expr),
            Reference::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&RefTree> {
        match self {
            Reference::Tree(tree) => Some(tree),
            Reference::Var(_) => None,
        }
    }
}

/// Reference tree mirroring the token tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RefTree(IndexMap<String, Reference>);

impl RefTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, reference: Reference) {
        self.0.insert(key.into(), reference);
    }

    /// Look up a node by dotted path, e.g. `colors.amber.light`.
    pub fn get(&self, path: &str) -> Option<&Reference> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.0.get(first)?;
        for segment in segments {
            node = node.as_tree()?.0.get(segment)?;
        }
        Some(node)
    }

    /// Look up a `var()` expression by dotted path.
    pub fn var(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Reference::as_var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reference)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed `var(--name[, fallback])` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarExpr {
    pub name: String,
    pub fallback: Option<String>,
}

impl VarExpr {
    pub fn new(name: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            name: name.into(),
            fallback,
        }
    }

    /// Parse a `var()` expression. Returns `None` for anything else.
    pub fn parse(expr: &str) -> Option<Self> {
        let body = expr.trim().strip_prefix("var(")?.strip_suffix(')')?;
        let (name, fallback) = match body.split_once(',') {
            Some((name, fallback)) => (name.trim(), Some(fallback.trim().to_string())),
            None => (body.trim(), None),
        };
        if !name.starts_with("--") {
            return None;
        }
        Some(Self::new(name, fallback))
    }

    /// Render as `var(--name)` or `var(--name, fallback)`.
    ///
    /// Commas in the fallback are normalized to `, `.
    pub fn render(&self) -> String {
        match &self.fallback {
            Some(fallback) => format!("var({}, {})", self.name, normalize_commas(fallback)),
            None => format!("var({})", self.name),
        }
    }
}

/// Write every comma as `, `, except inside quoted strings and `url(...)`.
fn normalize_commas(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut quote: Option<char> = None;
    let mut in_url = false;
    let mut chars = value.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                '(' if !in_url && ends_with_url(&out) => {
                    in_url = true;
                    out.push(c);
                }
                ')' if in_url => {
                    in_url = false;
                    out.push(c);
                }
                ',' if !in_url => {
                    out.truncate(out.trim_end().len());
                    out.push_str(", ");
                    while chars.peek().is_some_and(|c| c.is_whitespace()) {
                        chars.next();
                    }
                }
                _ => out.push(c),
            },
        }
    }

    out
}

fn ends_with_url(text: &str) -> bool {
    text.len()
        .checked_sub(3)
        .and_then(|start| text.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case("url"))
}

/// Resolve a reference expression to a concrete value.
///
/// Looks the property up in the default partition first, then falls back to
/// the expression's own fallback.
pub fn resolve_reference(expr: &str, vars: &Variables) -> Result<String> {
    let parsed = VarExpr::parse(expr).ok_or_else(|| TokenError::Parse {
        message: format!("Not a var() reference: {}", expr),
        help: Some("Expected var(--name) or var(--name, fallback)".to_string()),
    })?;

    if let Some(value) = vars.root().get(&parsed.name) {
        return Ok(value.clone());
    }

    parsed
        .fallback
        .ok_or(TokenError::MissingDefault { name: parsed.name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(VarExpr::new("--a0", None).render(), "var(--a0)");
        assert_eq!(
            VarExpr::new("--a0", Some("rgb(251,191,36)".to_string())).render(),
            "var(--a0, rgb(251, 191, 36))"
        );
        assert_eq!(
            VarExpr::new("--a1", Some("Inter,  sans-serif".to_string())).render(),
            "var(--a1, Inter, sans-serif)"
        );
    }

    #[test]
    fn test_render_leaves_quoted_and_url_commas() {
        let render = |fallback: &str| VarExpr::new("--a0", Some(fallback.to_string())).render();

        assert_eq!(
            render("url(data:image/png;base64,AAA)"),
            "var(--a0, url(data:image/png;base64,AAA))"
        );
        assert_eq!(
            render("url(a.png),url(b.png)"),
            "var(--a0, url(a.png), url(b.png))"
        );
        assert_eq!(render("\"a,b\",serif"), "var(--a0, \"a,b\", serif)");
        assert_eq!(render("'x\\',y',z"), "var(--a0, 'x\\',y', z)");
        assert_eq!(
            render("URL(x,y), rgb(1,2,3)"),
            "var(--a0, URL(x,y), rgb(1, 2, 3))"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(VarExpr::parse("var(--a0)"), Some(VarExpr::new("--a0", None)));
        assert_eq!(
            VarExpr::parse("var(--b3, rgb(1, 2, 3))"),
            Some(VarExpr::new("--b3", Some("rgb(1, 2, 3)".to_string())))
        );
        assert_eq!(VarExpr::parse("16px"), None);
        assert_eq!(VarExpr::parse("var(a0)"), None);
    }

    #[test]
    fn test_resolve() {
        let mut vars = Variables::default();
        vars.set_root("--a0", "16px");

        assert_eq!(resolve_reference("var(--a0)", &vars).unwrap(), "16px");
        assert_eq!(resolve_reference("var(--a1, 4px)", &vars).unwrap(), "4px");

        let err = resolve_reference("var(--a1)", &vars).unwrap_err();
        assert!(matches!(err, TokenError::MissingDefault { ref name } if name == "--a1"));

        assert!(matches!(
            resolve_reference("16px", &vars),
            Err(TokenError::Parse { .. })
        ));
    }

    #[test]
    fn test_tree_lookup() {
        let mut inner = RefTree::new();
        inner.insert("light", Reference::Var("var(--a0)".to_string()));
        let mut tree = RefTree::new();
        tree.insert("amber", Reference::Tree(inner));

        assert_eq!(tree.var("amber.light"), Some("var(--a0)"));
        assert!(tree.get("amber").unwrap().as_tree().is_some());
        assert_eq!(tree.var("amber"), None);
        assert_eq!(tree.get("amber.light.deeper"), None);
        assert_eq!(tree.get("missing"), None);
    }
}
