use std::collections::BTreeSet;

use xml_tree_core::XmlNode;

use crate::schema::Schema;

/// Sorted, deduplicated group names offered for selection.
///
/// Positions are 1-based: index `1` is the first name in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCatalog {
    schema: Schema,
    names: Vec<String>,
}

impl GroupCatalog {
    /// Collect every named group of `schema` anywhere in the document.
    pub fn enumerate(root: &XmlNode, schema: Schema) -> Self {
        let names: BTreeSet<&str> = root
            .descendants_with_tag(schema.tags().group)
            .filter_map(object_name)
            .collect();

        Self {
            schema,
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    /// Build a catalog from arbitrary names, sorting and deduplicating them.
    pub fn from_names<I, S>(schema: Schema, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            schema,
            names: names.into_iter().collect(),
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at a 1-based position.
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Names in the inclusive 1-based range `start..=end`.
    ///
    /// `None` unless `1 <= start <= end <= len`.
    pub fn range(&self, start: usize, end: usize) -> Option<&[String]> {
        if start == 0 || start > end || end > self.names.len() {
            return None;
        }
        Some(&self.names[start - 1..end])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// One line per group: right-aligned 3-digit index, colon, name.
    pub fn render_listing(&self) -> String {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{:3}: {}", i + 1, name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trimmed, non-empty `Name` child text of a group or host element.
pub fn object_name(node: &XmlNode) -> Option<&str> {
    node.child_text_trimmed("Name").filter(|name| !name.is_empty())
}
