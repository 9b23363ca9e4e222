use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ops::Path;

pub type Attrs = BTreeMap<String, String>;

pub const TEXT_NODE_NAME: &str = "#text";
pub const DOCUMENT_NODE_NAME: &str = "#document";
pub const FRAGMENT_NODE_NAME: &str = "#document-fragment";

/// The edited document. `children` are the nodes directly below the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::root(DOCUMENT_NODE_NAME, &self.children)
    }

    /// Resolves `path` to a cursor. The empty path is the root.
    pub fn node_ref(&self, path: &[usize]) -> Option<NodeRef<'_>> {
        self.root().descend(path)
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        node_ref(&self.children, path)
    }

    /// Children of the container at `path`, the root included.
    pub fn children_at(&self, path: &[usize]) -> Option<&[Node]> {
        if path.is_empty() {
            return Some(&self.children);
        }
        self.node(path).map(Node::children)
    }

    /// DOM length of the container at `path`: bytes for text, children otherwise.
    pub fn length_at(&self, path: &[usize]) -> Option<usize> {
        if path.is_empty() {
            return Some(self.children.len());
        }
        self.node(path).map(Node::length)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.collect_text(&mut out);
        }
        out
    }
}

/// A detached copy of part of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Fragment {
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::root(FRAGMENT_NODE_NAME, &self.children)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.collect_text(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Void(VoidNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode { text: text.into() })
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(ElementNode {
            tag: tag.into(),
            attrs: Attrs::default(),
            children,
        })
    }

    pub fn void(tag: impl Into<String>) -> Self {
        Node::Void(VoidNode {
            tag: tag.into(),
            attrs: Attrs::default(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::element("p", vec![Node::text(text)])
    }

    pub fn link(href: impl Into<String>, children: Vec<Node>) -> Self {
        let mut attrs = Attrs::default();
        attrs.insert("href".to_string(), href.into());
        Node::Element(ElementNode {
            tag: "a".to_string(),
            attrs,
            children,
        })
    }

    /// DOM node name: the tag for elements, `#text` for text.
    pub fn node_name(&self) -> &str {
        match self {
            Node::Element(el) => &el.tag,
            Node::Void(v) => &v.tag,
            Node::Text(_) => TEXT_NODE_NAME,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.node_name().eq_ignore_ascii_case(name)
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Text(_) | Node::Void(_) => &[],
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Node::Element(el) => el.children.len(),
            Node::Text(t) => t.text.len(),
            Node::Void(_) => 0,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = match self {
            Node::Element(el) => &el.attrs,
            Node::Void(v) => &v.attrs,
            Node::Text(_) => return None,
        };
        attrs.get(name).map(String::as_str)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Void(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Copy of this element without its children.
    pub fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }
}

/// Element that never has children (`img`, `br`, `hr`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

/// The structural capabilities tree searches rely on.
pub trait TreeNode: Sized {
    fn node_name(&self) -> &str;
    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;

    fn is_named(&self, name: &str) -> bool {
        self.node_name().eq_ignore_ascii_case(name)
    }
}

/// Borrowed cursor to a node of a document or fragment, addressed by path.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    root_name: &'static str,
    root_children: &'a [Node],
    path: Path,
}

impl<'a> NodeRef<'a> {
    fn root(root_name: &'static str, root_children: &'a [Node]) -> Self {
        Self {
            root_name,
            root_children,
            path: Path::new(),
        }
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// The node this cursor points at; `None` for the root.
    pub fn node(&self) -> Option<&'a Node> {
        node_ref(self.root_children, &self.path)
    }

    fn child_nodes(&self) -> &'a [Node] {
        if self.path.is_empty() {
            return self.root_children;
        }
        self.node().map(Node::children).unwrap_or(&[])
    }

    fn descend(mut self, path: &[usize]) -> Option<Self> {
        for &ix in path {
            if ix >= self.child_nodes().len() {
                return None;
            }
            self.path.push(ix);
        }
        Some(self)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.root_children, other.root_children) && self.path == other.path
    }
}

impl TreeNode for NodeRef<'_> {
    fn node_name(&self) -> &str {
        match self.node() {
            Some(node) => node.node_name(),
            None => self.root_name,
        }
    }

    fn parent(&self) -> Option<Self> {
        let (_, parent_path) = self.path.split_last()?;
        Some(Self {
            root_name: self.root_name,
            root_children: self.root_children,
            path: parent_path.to_vec(),
        })
    }

    fn children(&self) -> Vec<Self> {
        (0..self.child_nodes().len())
            .map(|ix| {
                let mut path = self.path.clone();
                path.push(ix);
                Self {
                    root_name: self.root_name,
                    root_children: self.root_children,
                    path,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError(pub String);

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PathError {}

pub(crate) fn node_ref<'a>(children: &'a [Node], path: &[usize]) -> Option<&'a Node> {
    let (&first, rest) = path.split_first()?;
    let mut node = children.get(first)?;
    for &ix in rest {
        node = node.children().get(ix)?;
    }
    Some(node)
}

pub(crate) fn node_mut<'a>(
    children: &'a mut Vec<Node>,
    path: &[usize],
) -> Result<&'a mut Node, PathError> {
    let Some((&first, rest)) = path.split_first() else {
        return Err(PathError("Empty path".into()));
    };
    let len = children.len();
    let Some(node) = children.get_mut(first) else {
        return Err(PathError(format!("Path out of bounds: {first} >= {len}")));
    };
    if rest.is_empty() {
        return Ok(node);
    }
    match node {
        Node::Element(el) => node_mut(&mut el.children, rest),
        Node::Text(_) | Node::Void(_) => Err(PathError(format!(
            "Non-container node on path at index {first}"
        ))),
    }
}

/// Children of the container at `path`; the empty path is the document root.
pub(crate) fn children_mut<'a>(
    doc: &'a mut Document,
    path: &[usize],
) -> Result<&'a mut Vec<Node>, PathError> {
    if path.is_empty() {
        return Ok(&mut doc.children);
    }
    match node_mut(&mut doc.children, path)? {
        Node::Element(el) => Ok(&mut el.children),
        Node::Text(_) | Node::Void(_) => Err(PathError("Parent is not a container".into())),
    }
}

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}
