//! Token tree type and deserialization.
//!
//! A token tree is an ordered mapping from keys to atoms, nested trees or
//! lists. The shape of a value decides how the compiler treats it; see
//! `compiler::classify` for the single place that makes that decision.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;

use crate::error::{Result, TokenError};

/// An atomic token value: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Atom {
    Str(String),
    Num(f64),
}

impl Atom {
    /// Empty strings are not atoms and produce no property.
    pub fn is_empty(&self) -> bool {
        matches!(self, Atom::Str(s) if s.is_empty())
    }

    /// Get the numeric value, if this is a finite number.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Atom::Num(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Atom::Str(s) => Some(s),
            Atom::Num(_) => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Str(s) => f.write_str(s),
            Atom::Num(n) => write!(f, "{}", n),
        }
    }
}

/// A node in the token tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Token {
    Atom(Atom),
    Tree(Tokens),
    List(Vec<Token>),
}

impl Token {
    /// Build a responsive tuple `[media, default?]`.
    pub fn responsive<K, V>(media: impl IntoIterator<Item = (K, V)>, default: Option<Atom>) -> Self
    where
        K: Into<String>,
        V: Into<Atom>,
    {
        let media: Tokens = media
            .into_iter()
            .map(|(k, v)| (k.into(), Token::Atom(v.into())))
            .collect();
        let mut items = vec![Token::Tree(media)];
        if let Some(default) = default {
            items.push(Token::Atom(default));
        }
        Token::List(items)
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Token::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tokens> {
        match self {
            Token::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::Str(s.to_string())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::Str(s)
    }
}

impl From<f64> for Atom {
    fn from(n: f64) -> Self {
        Atom::Num(n)
    }
}

impl From<i32> for Atom {
    fn from(n: i32) -> Self {
        Atom::Num(n as f64)
    }
}

impl From<Atom> for Token {
    fn from(atom: Atom) -> Self {
        Token::Atom(atom)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Atom(s.into())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Atom(s.into())
    }
}

impl From<f64> for Token {
    fn from(n: f64) -> Self {
        Token::Atom(n.into())
    }
}

impl From<i32> for Token {
    fn from(n: i32) -> Self {
        Token::Atom(n.into())
    }
}

impl From<Tokens> for Token {
    fn from(tree: Tokens) -> Self {
        Token::Tree(tree)
    }
}

/// An ordered token tree.
///
/// Key order is significant: it drives both declaration order in the CSS
/// output and the order in which minified names are allocated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tokens(IndexMap<String, Token>);

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a token tree from YAML source.
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| TokenError::Parse {
            message: format!("Invalid token tree: {}", e),
            help: Some("The top level must be a mapping of token names".to_string()),
        })
    }

    /// Parse a token tree from JSON source.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| TokenError::Parse {
            message: format!("Invalid token tree: {}", e),
            help: Some("The top level must be an object of token names".to_string()),
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Token>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Token>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Token> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Token)> for Tokens {
    fn from_iter<I: IntoIterator<Item = (String, Token)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Tokens {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Token::deserialize(deserializer)? {
            Token::Tree(tree) => Ok(tree),
            _ => Err(de::Error::custom("expected a mapping of tokens")),
        }
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = Token;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, list or mapping of tokens")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Str(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Str(v)))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Str(v.to_string())))
    }

    // `key:` with no value; compiles to nothing.
    fn visit_unit<E: de::Error>(self) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Str(String::new())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Num(v as f64)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Num(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Token, E> {
        Ok(Token::Atom(Atom::Num(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Token, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Token>()? {
            items.push(item);
        }
        Ok(Token::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Token, A::Error> {
        let mut tree = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<TokenKey, Token>()? {
            tree.insert(key.0, value);
        }
        Ok(Token::Tree(Tokens(tree)))
    }
}

/// Map key that accepts both strings and numbers (`100: 4px` in YAML).
struct TokenKey(String);

impl<'de> Deserialize<'de> for TokenKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = TokenKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or numeric token key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<TokenKey, E> {
                Ok(TokenKey(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<TokenKey, E> {
                Ok(TokenKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<TokenKey, E> {
                Ok(TokenKey(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<TokenKey, E> {
                Ok(TokenKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_preserves_order() {
        let tokens = Tokens::from_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = tokens.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_yaml_numeric_keys() {
        let tokens = Tokens::from_yaml("space:\n  100: 4px\n  0.5: 2px\n").unwrap();
        let space = tokens.get("space").unwrap().as_tree().unwrap();
        assert_eq!(space.get("100"), Some(&Token::from("4px")));
        assert_eq!(space.get("0.5"), Some(&Token::from("2px")));
    }

    #[test]
    fn test_json_shapes() {
        let tokens =
            Tokens::from_json(r#"{"a": "x", "b": 2, "c": [{"desktop": "1px"}, "2px"], "d": {}}"#)
                .unwrap();
        assert_eq!(tokens.get("a"), Some(&Token::from("x")));
        assert_eq!(tokens.get("b"), Some(&Token::from(2)));
        assert!(matches!(tokens.get("c"), Some(Token::List(items)) if items.len() == 2));
        assert_eq!(tokens.get("d"), Some(&Token::Tree(Tokens::new())));
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert!(Tokens::from_yaml("- a\n- b\n").is_err());
        assert!(Tokens::from_json("\"x\"").is_err());
    }

    #[test]
    fn test_null_and_bool_values() {
        let tokens = Tokens::from_yaml("hidden:\nvisible: true\n").unwrap();
        assert!(tokens.get("hidden").unwrap().as_atom().unwrap().is_empty());
        assert_eq!(tokens.get("visible"), Some(&Token::from("true")));
    }

    #[test]
    fn test_responsive_builder() {
        let token = Token::responsive([("desktop", "24px")], Some(Atom::from("16px")));
        let expected = Tokens::from_json(r#"{"t": [{"desktop": "24px"}, "16px"]}"#).unwrap();
        assert_eq!(Some(&token), expected.get("t"));
    }

    #[test]
    fn test_atom_display() {
        assert_eq!(Atom::from(16).to_string(), "16");
        assert_eq!(Atom::from(1.5).to_string(), "1.5");
        assert_eq!(Atom::from("red").to_string(), "red");
        assert!(Atom::from("").is_empty());
    }
}
