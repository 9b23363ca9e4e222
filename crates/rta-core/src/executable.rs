use tracing::{debug, trace};

use crate::area::RichTextArea;
use crate::core::{Document, Node, TreeNode, clamp_to_char_boundary};
use crate::dom_utils::DomUtils;
use crate::ops::{Op, Path, Transaction, apply_op_to};
use crate::range::{Point, Range, Selection};

#[derive(Debug, Clone)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

/// A unit of editor functionality: an enablement predicate plus an action.
pub trait Executable: Send + Sync {
    /// Whether `execute` may run against the current state of `area`.
    fn is_enabled(&self, area: &RichTextArea) -> bool;

    fn execute(&self, area: &mut RichTextArea, param: Option<&str>) -> Result<(), CommandError>;

    /// Whether the effect of this executable is already present at the
    /// selection (toggle state for toolbar buttons).
    fn is_executed(&self, _area: &RichTextArea) -> bool {
        false
    }

    /// The value a host should offer as the default parameter.
    fn parameter(&self, _area: &RichTextArea) -> Option<String> {
        None
    }
}

/// Replaces the selection with nodes given as a JSON array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertHtmlExecutable;

impl InsertHtmlExecutable {
    pub fn new() -> Self {
        Self
    }
}

impl Executable for InsertHtmlExecutable {
    fn is_enabled(&self, area: &RichTextArea) -> bool {
        let enabled = area.is_editable() && !area.selection().is_empty();
        trace!(
            enabled,
            loaded = area.document().is_some(),
            ranges = area.selection().range_count(),
            "insert_html eligibility"
        );
        enabled
    }

    fn execute(&self, area: &mut RichTextArea, param: Option<&str>) -> Result<(), CommandError> {
        if !self.is_enabled(area) {
            return Err(CommandError::new("Insert HTML is not enabled"));
        }
        let param = param.ok_or_else(|| CommandError::new("Missing markup parameter"))?;
        let nodes: Vec<Node> = serde_json::from_str(param)
            .map_err(|err| CommandError::new(format!("Malformed markup parameter: {err}")))?;

        let (Some(doc), Some(range)) = (area.document(), area.selection().range_at(0)) else {
            return Err(CommandError::new("No selection to insert at"));
        };
        let tx = insert_nodes_transaction(doc, range, nodes)?.source("command:insert_html");
        area.apply(tx)
            .map_err(|e| CommandError::new(format!("Failed to insert markup: {e}")))
    }
}

/// Builds the transaction deleting `range` and inserting `nodes` where it
/// collapses. The selection ends up right after the inserted nodes.
pub fn insert_nodes_transaction(
    doc: &Document,
    range: &Range,
    nodes: Vec<Node>,
) -> Result<Transaction, CommandError> {
    let (mut ops, point) = range.delete_contents_ops(doc);

    let mut scratch = doc.clone();
    let mut scratch_selection = Selection::default();
    for op in ops.iter().cloned() {
        apply_op_to(&mut scratch, &mut scratch_selection, op)
            .map_err(|e| CommandError::new(format!("Failed to delete selection: {e}")))?;
    }

    let split = split_at_point(&scratch, &point)?;
    ops.extend(split.before);
    let count = nodes.len();
    for (k, node) in nodes.into_iter().enumerate() {
        ops.push(Op::InsertNode {
            path: child_path(&split.parent, split.index + k),
            node,
        });
    }
    if let Some(tail) = split.tail {
        ops.push(Op::InsertNode {
            path: child_path(&split.parent, split.index + count),
            node: tail,
        });
    }

    let after = Point::new(split.parent, split.index + count);
    Ok(Transaction::new(ops).selection_after(Selection::collapsed(after)))
}

struct Split {
    parent: Path,
    index: usize,
    before: Vec<Op>,
    tail: Option<Node>,
}

/// Where nodes go when inserted at `point`, splitting a text node if the
/// point falls inside one.
fn split_at_point(doc: &Document, point: &Point) -> Result<Split, CommandError> {
    let simple = |parent: Path, index: usize| Split {
        parent,
        index,
        before: Vec::new(),
        tail: None,
    };

    if point.path.is_empty() {
        return Ok(simple(Vec::new(), point.offset.min(doc.children.len())));
    }
    match doc.node(&point.path) {
        Some(Node::Element(el)) => Ok(simple(
            point.path.clone(),
            point.offset.min(el.children.len()),
        )),
        Some(Node::Text(t)) => {
            let Some((&ix, parent)) = point.path.split_last() else {
                return Err(CommandError::new("Text node without parent"));
            };
            let offset = clamp_to_char_boundary(&t.text, point.offset);
            if offset == 0 {
                return Ok(simple(parent.to_vec(), ix));
            }
            if offset >= t.text.len() {
                return Ok(simple(parent.to_vec(), ix + 1));
            }
            Ok(Split {
                parent: parent.to_vec(),
                index: ix + 1,
                before: vec![Op::RemoveText {
                    path: point.path.clone(),
                    range: offset..t.text.len(),
                }],
                tail: Some(Node::text(&t.text[offset..])),
            })
        }
        Some(Node::Void(v)) => Err(CommandError::new(format!(
            "Cannot insert inside void element <{}>",
            v.tag
        ))),
        None => Err(CommandError::new(format!(
            "Selection points at a missing node: {:?}",
            point.path
        ))),
    }
}

fn child_path(parent: &[usize], index: usize) -> Path {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

/// Link markup parameter for [`CreateLinkExecutable`].
pub fn link_markup(href: &str, label: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&[Node::link(href, vec![Node::text(label)])])
}

/// Inserts link markup, but only where it cannot end up nested in or
/// overlapping another link.
#[derive(Debug, Clone, Default)]
pub struct CreateLinkExecutable {
    insert: InsertHtmlExecutable,
    dom: DomUtils,
}

impl CreateLinkExecutable {
    pub fn new(insert: InsertHtmlExecutable, dom: DomUtils) -> Self {
        Self { insert, dom }
    }
}

impl Executable for CreateLinkExecutable {
    fn is_enabled(&self, area: &RichTextArea) -> bool {
        if !self.insert.is_enabled(area) {
            return false;
        }
        let (Some(doc), Some(range)) = (area.document(), area.selection().range_at(0)) else {
            return false;
        };
        let link_tag = area.config().link_tag.as_str();
        let range = self.dom.get_text_range(doc, range);

        // Ancestors first: the chain up to the root is short.
        let container = doc.node_ref(&range.common_ancestor_container());
        if let Some(link) = self.dom.get_first_ancestor_or_self(container, link_tag) {
            debug!(link = ?link.path(), "create_link disabled: selection inside a link");
            return false;
        }

        let contents = range.clone_contents(doc);
        if let Some(link) = self.dom.get_first_descendant(&contents.root(), link_tag) {
            debug!(
                link = ?link.path(),
                name = link.node_name(),
                "create_link disabled: selection contains a link"
            );
            return false;
        }
        true
    }

    fn execute(&self, area: &mut RichTextArea, param: Option<&str>) -> Result<(), CommandError> {
        if !self.is_enabled(area) {
            return Err(CommandError::new("Create link is not enabled"));
        }
        self.insert.execute(area, param)
    }

    /// The selected text, used as the default link label.
    fn parameter(&self, area: &RichTextArea) -> Option<String> {
        let doc = area.document()?;
        let range = area.selection().range_at(0)?;
        Some(range.text(doc))
    }
}
