use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::debug;
use xml_tree_core::XmlNode;

use crate::error::ExportError;

/// Element names that make up one host object schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSet {
    /// Group container element.
    pub group: &'static str,
    /// Host-list container inside a group.
    pub list: &'static str,
    /// Host reference element inside the list.
    pub reference: &'static str,
    /// Host object element.
    pub host: &'static str,
}

const IP_TAGS: TagSet = TagSet {
    group: "IPHostGroup",
    list: "IPHostList",
    reference: "IPHost",
    host: "IPHost",
};

const FQDN_TAGS: TagSet = TagSet {
    group: "FQDNHostGroup",
    list: "FQDNHostList",
    reference: "FQDNHost",
    host: "FQDNHost",
};

/// Address-family variant of the host objects in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Schema {
    /// `IPHost` / `IPHostGroup` objects.
    Ip,
    /// `FQDNHost` / `FQDNHostGroup` objects.
    Fqdn,
}

impl Schema {
    /// Detection order: the first schema whose group tag occurs wins.
    pub const PRIORITY: [Schema; 2] = [Schema::Ip, Schema::Fqdn];

    pub fn tags(self) -> &'static TagSet {
        match self {
            Schema::Ip => &IP_TAGS,
            Schema::Fqdn => &FQDN_TAGS,
        }
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Ip => write!(f, "IP"),
            Schema::Fqdn => write!(f, "FQDN"),
        }
    }
}

/// Decide which host schema a document uses.
///
/// Looks for each schema's group element anywhere below the root, IP first.
pub fn detect_schema(root: &XmlNode) -> Result<Schema, ExportError> {
    let schema = Schema::PRIORITY
        .into_iter()
        .find(|schema| root.find_descendant(schema.tags().group).is_some())
        .ok_or(ExportError::UnknownSchema)?;
    debug!(%schema, group_tag = schema.tags().group, "detected host schema");
    Ok(schema)
}
