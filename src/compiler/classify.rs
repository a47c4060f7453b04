//! Structural classification of token-tree nodes.
//!
//! Token trees carry no type tags, so the kind of a node is decided from its
//! shape and position. Every branch of the compiler goes through [`classify`].

use crate::types::{parse_oklch, Atom, Token, Tokens, UnitRange};

/// Reserved key whose children are expanded into shade scales.
pub const PALETTE_KEY: &str = "palette";

/// Reserved key whose value may be a units shorthand.
pub const UNITS_KEY: &str = "units";

/// The kind of a token-tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// An OKLCH colour directly under a `palette` tree.
    Palette(&'a str),
    /// A `units` shorthand: unit key -> `[from, step, to]`.
    Units(Vec<(&'a str, UnitRange)>),
    /// A string or number leaf.
    Atom(&'a Atom),
    /// A `[media, default?]` tuple.
    Responsive {
        media: &'a Tokens,
        default: Option<&'a Atom>,
    },
    /// A nested tree.
    Tree(&'a Tokens),
    /// A list that is not a responsive tuple; compiled as an index-keyed tree.
    List(&'a [Token]),
    /// An empty string; produces nothing.
    Empty,
}

/// Classify `token` found under `key`.
///
/// `in_palette` is true when the enclosing tree is a `palette` tree whose
/// colours may still be expanded.
pub fn classify<'a>(key: &str, in_palette: bool, token: &'a Token) -> Node<'a> {
    match token {
        Token::Atom(Atom::Str(s)) if in_palette && parse_oklch(s).is_ok() => Node::Palette(s),
        Token::Atom(atom) if atom.is_empty() => Node::Empty,
        Token::Atom(atom) => Node::Atom(atom),
        Token::Tree(tree) => match units_shorthand(key, tree) {
            Some(units) => Node::Units(units),
            None => Node::Tree(tree),
        },
        Token::List(items) => match responsive_tuple(items) {
            Some((media, default)) => Node::Responsive { media, default },
            None => Node::List(items),
        },
    }
}

/// A units shorthand is a non-empty tree under `units` whose every value is
/// a three-number list. Keys are checked during expansion, so an unknown
/// unit is reported rather than silently compiled as a nested tree.
fn units_shorthand<'a>(key: &str, tree: &'a Tokens) -> Option<Vec<(&'a str, UnitRange)>> {
    if key != UNITS_KEY || tree.is_empty() {
        return None;
    }

    tree.iter()
        .map(|(unit, value)| {
            let Token::List(items) = value else {
                return None;
            };
            let [from, step, to] = items.as_slice() else {
                return None;
            };
            let number = |t: &Token| t.as_atom().and_then(Atom::as_finite);
            Some((unit, UnitRange::new(number(from)?, number(step)?, number(to)?)))
        })
        .collect()
}

/// `[media, default?]` where `media` maps names to atoms.
fn responsive_tuple(items: &[Token]) -> Option<(&Tokens, Option<&Atom>)> {
    let (media, default) = match items {
        [Token::Tree(media)] => (media, None),
        [Token::Tree(media), Token::Atom(default)] => (media, Some(default)),
        _ => return None,
    };

    if !media.iter().all(|(_, value)| matches!(value, Token::Atom(_))) {
        return None;
    }

    Some((media, default.filter(|atom| !atom.is_empty())))
}
