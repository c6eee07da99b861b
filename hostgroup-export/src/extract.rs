//! Group extraction.
//!
//! Builds a new document holding the selected groups and exactly the hosts
//! they reference. The source tree is only read; everything placed in the
//! output is a deep copy.
//!
//! ## Output layout
//!
//! The output root replicates the source root's tag and attributes. Its
//! children are all exported hosts (document order, first occurrence of each
//! host name), followed by all exported groups (document order).
//!
//! ## Duplicates
//!
//! Hosts are deduplicated by name. Groups are not: every group element whose
//! name is selected is exported, even when several share a name.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use xml_tree_core::XmlNode;

use crate::catalog::object_name;
use crate::schema::Schema;

/// Host-list containers tried after the schema's own list tag.
const FALLBACK_LIST_TAGS: [&str; 3] = ["HostList", "IPHostList", "FQDNHostList"];

/// Output of [`extract_groups`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Newly built document.
    pub document: XmlNode,
    /// Number of host elements copied.
    pub host_count: usize,
    /// Number of group elements copied.
    pub group_count: usize,
    /// Referenced host names with no host object in the source, sorted.
    pub missing_hosts: Vec<String>,
}

/// Extract the groups named in `selected` and the hosts they reference.
pub fn extract_groups(
    root: &XmlNode,
    schema: Schema,
    selected: &BTreeSet<String>,
) -> Extraction {
    let tags = schema.tags();
    let mut document = root.shell();

    let groups: Vec<&XmlNode> = root
        .descendants_with_tag(tags.group)
        .filter(|group| {
            group
                .child_text_trimmed("Name")
                .is_some_and(|name| selected.contains(name))
        })
        .collect();

    let mut host_refs: BTreeSet<&str> = BTreeSet::new();
    for &group in &groups {
        host_refs.extend(group_host_refs(group, schema));
    }
    debug!(
        groups = groups.len(),
        references = host_refs.len(),
        "collected host references"
    );

    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    for host in root.iter_tag(tags.host) {
        let Some(name) = host.child_text_trimmed("Name") else {
            continue;
        };
        if host_refs.contains(name) && emitted.insert(name) {
            document.children.push(host.clone());
        }
    }
    let host_count = document.children.len();

    document
        .children
        .extend(groups.iter().map(|&group| group.clone()));

    let missing_hosts: Vec<String> = host_refs
        .difference(&emitted)
        .map(|name| name.to_string())
        .collect();
    for name in &missing_hosts {
        warn!(host = %name, "referenced host has no {} object", tags.host);
    }

    info!(
        hosts = host_count,
        groups = groups.len(),
        "extracted host groups"
    );

    Extraction {
        document,
        host_count,
        group_count: groups.len(),
        missing_hosts,
    }
}

/// Trimmed, non-empty host references of one group.
///
/// Uses the first list container found, trying the schema's list tag before
/// the generic ones. Every direct child of that container counts as a
/// reference.
pub fn group_host_refs(group: &XmlNode, schema: Schema) -> Vec<&str> {
    let list = std::iter::once(schema.tags().list)
        .chain(FALLBACK_LIST_TAGS)
        .find_map(|tag| group.get_child(tag));

    let Some(list) = list else {
        debug!(group = object_name(group).unwrap_or(""), "group has no host list");
        return Vec::new();
    };

    list.children
        .iter()
        .filter_map(|entry| entry.text.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
