use std::collections::BTreeMap;

/// An owned XML element.
///
/// Cloning a node copies the whole subtree, so two trees never share
/// elements.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// XML attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Optional text content.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create a new XML node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Copy only the tag and attributes of this node.
    pub fn shell(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        current.text.as_deref()
    }

    /// Trimmed text of the first child named `tag`.
    ///
    /// A missing child yields `None`; a present child without text yields
    /// `Some("")`.
    pub fn child_text_trimmed(&self, tag: &str) -> Option<&str> {
        self.get_child(tag)
            .map(|child| child.text.as_deref().unwrap_or("").trim())
    }

    /// Pre-order walk over this node and every element below it.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Pre-order walk yielding this node and its descendants named `tag`.
    pub fn iter_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.iter().filter(move |node| node.tag == tag)
    }

    /// Descendants named `tag` at any depth, excluding this node.
    pub fn descendants_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.iter().skip(1).filter(move |node| node.tag == tag)
    }

    /// First descendant named `tag` in document order, excluding this node.
    pub fn find_descendant<'a>(&'a self, tag: &'a str) -> Option<&'a XmlNode> {
        self.descendants_with_tag(tag).next()
    }
}

/// Document-order iterator returned by [`XmlNode::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
