//! Operator selection syntax.
//!
//! A selection is a comma-separated list of tokens. Each token is resolved
//! against the [`GroupCatalog`] on its own:
//!
//! - `start-end`: inclusive 1-based range of catalog positions
//! - `n`: a single 1-based position
//! - anything else: case-insensitive substring of exactly one group name,
//!   or else an exact (case-sensitive) group name
//!
//! Unresolvable tokens are reported back instead of failing the parse, so
//! the caller can show all of them at once.

use std::collections::BTreeSet;

use crate::catalog::GroupCatalog;

/// Result of resolving a selection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Resolved group names, sorted and unique.
    pub matched: BTreeSet<String>,
    /// Tokens that resolved to nothing, in input order.
    pub invalid: Vec<String>,
}

impl Selection {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// How a single token is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Range(&'a str, &'a str),
    Index(&'a str),
    Name(&'a str),
}

impl<'a> Token<'a> {
    fn classify(raw: &'a str) -> Self {
        if let Some((start, end)) = raw.split_once('-').filter(|_| !raw.starts_with('-')) {
            Token::Range(start, end)
        } else if raw.chars().all(|c| c.is_ascii_digit()) {
            Token::Index(raw)
        } else {
            Token::Name(raw)
        }
    }
}

/// Resolve `text` against the catalog.
///
/// Blank input yields an empty selection with no invalid tokens.
pub fn parse_selection(text: &str, catalog: &GroupCatalog) -> Selection {
    let mut selection = Selection::default();

    for raw in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let resolved = match Token::classify(raw) {
            Token::Range(start, end) => resolve_range(start, end, catalog),
            Token::Index(index) => resolve_index(index, catalog),
            Token::Name(name) => resolve_name(name, catalog),
        };

        match resolved {
            Some(names) => selection.matched.extend(names),
            None => selection.invalid.push(raw.to_string()),
        }
    }

    selection
}

fn resolve_range(start: &str, end: &str, catalog: &GroupCatalog) -> Option<Vec<String>> {
    let start = parse_position(start)?;
    let end = parse_position(end)?;
    catalog.range(start, end).map(<[String]>::to_vec)
}

fn resolve_index(index: &str, catalog: &GroupCatalog) -> Option<Vec<String>> {
    let index = parse_position(index)?;
    catalog.get(index).map(|name| vec![name.to_string()])
}

fn resolve_name(token: &str, catalog: &GroupCatalog) -> Option<Vec<String>> {
    let needle = token.to_lowercase();
    let mut hits = catalog
        .names()
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle));

    if let (Some(only), None) = (hits.next(), hits.next()) {
        return Some(vec![only.clone()]);
    }

    // Ambiguous or no substring hit: only an exact name is accepted.
    catalog
        .contains(token)
        .then(|| vec![token.to_string()])
}

fn parse_position(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}
