use std::ops::Range as ByteRange;

use serde::{Deserialize, Serialize};

use crate::core::{Document, Node, PathError, children_mut, clamp_to_char_boundary, node_mut};
use crate::range::{Point, Selection};

pub type Path = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    InsertText {
        #[serde(default)]
        path: Path,
        offset: usize,
        text: String,
    },
    RemoveText {
        #[serde(default)]
        path: Path,
        range: ByteRange<usize>,
    },
    InsertNode {
        #[serde(default)]
        path: Path,
        node: Node,
    },
    RemoveNode {
        #[serde(default)]
        path: Path,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub ops: Vec<Op>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_after: Option<Selection>,
    #[serde(default)]
    pub meta: TransactionMeta,
}

impl Transaction {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            ops,
            selection_after: None,
            meta: TransactionMeta::default(),
        }
    }

    pub fn selection_after(mut self, selection_after: Selection) -> Self {
        self.selection_after = Some(selection_after);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }
}

#[derive(Debug)]
pub enum ApplyError {
    InvalidPath(String),
    InvalidOffset(String),
    TooManyOps { limit: usize, got: usize },
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyError::InvalidPath(msg) => write!(f, "invalid path: {msg}"),
            ApplyError::InvalidOffset(msg) => write!(f, "invalid offset: {msg}"),
            ApplyError::TooManyOps { limit, got } => {
                write!(f, "transaction has {got} ops, limit is {limit}")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

impl From<PathError> for ApplyError {
    fn from(value: PathError) -> Self {
        ApplyError::InvalidPath(value.0)
    }
}

/// Applies `op` to `doc`, keeping the points of `selection` attached to the
/// content they pointed at.
pub fn apply_op_to(
    doc: &mut Document,
    selection: &mut Selection,
    op: Op,
) -> Result<(), ApplyError> {
    match op {
        Op::InsertText { path, offset, text } => {
            let text_node = text_mut(doc, &path)?;
            if offset > text_node.len() || !text_node.is_char_boundary(offset) {
                return Err(ApplyError::InvalidOffset(format!(
                    "Cannot insert at {offset} in text of length {}",
                    text_node.len()
                )));
            }
            text_node.insert_str(offset, &text);
            transform_selection_insert_text(selection, &path, offset, text.len());
            Ok(())
        }
        Op::RemoveText { path, range } => {
            let text_node = text_mut(doc, &path)?;
            let start = clamp_to_char_boundary(text_node.as_str(), range.start);
            let end = clamp_to_char_boundary(text_node.as_str(), range.end);
            if start >= end {
                return Ok(());
            }
            text_node.replace_range(start..end, "");
            transform_selection_remove_text(selection, &path, start..end);
            Ok(())
        }
        Op::InsertNode { path, node } => {
            let Some((&index, parent_path)) = path.split_last() else {
                return Err(ApplyError::InvalidPath("Empty insert path".into()));
            };
            let children = children_mut(doc, parent_path)?;
            if index > children.len() {
                return Err(ApplyError::InvalidPath(format!(
                    "Insert index out of bounds: {index} > {}",
                    children.len()
                )));
            }
            children.insert(index, node);
            transform_selection_insert_node(selection, parent_path, index);
            Ok(())
        }
        Op::RemoveNode { path } => {
            let Some((&index, parent_path)) = path.split_last() else {
                return Err(ApplyError::InvalidPath("Empty remove path".into()));
            };
            let children = children_mut(doc, parent_path)?;
            if index >= children.len() {
                return Err(ApplyError::InvalidPath(format!(
                    "Remove index out of bounds: {index} >= {}",
                    children.len()
                )));
            }
            children.remove(index);
            transform_selection_remove_node(selection, parent_path, index);
            Ok(())
        }
    }
}

fn text_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut String, PathError> {
    match node_mut(&mut doc.children, path)? {
        Node::Text(t) => Ok(&mut t.text),
        _ => Err(PathError("Expected Text node".into())),
    }
}

fn points_mut(selection: &mut Selection) -> impl Iterator<Item = &mut Point> {
    selection
        .ranges_mut()
        .iter_mut()
        .flat_map(|range| range.points_mut())
}

fn transform_selection_insert_text(
    selection: &mut Selection,
    path: &[usize],
    offset: usize,
    len: usize,
) {
    for point in points_mut(selection) {
        if point.path == path && point.offset >= offset {
            point.offset = point.offset.saturating_add(len);
        }
    }
}

fn transform_selection_remove_text(
    selection: &mut Selection,
    path: &[usize],
    range: ByteRange<usize>,
) {
    let removed_len = range.end.saturating_sub(range.start);
    for point in points_mut(selection) {
        if point.path != path || point.offset <= range.start {
            continue;
        }
        if point.offset >= range.end {
            point.offset = point.offset.saturating_sub(removed_len);
        } else {
            point.offset = range.start;
        }
    }
}

fn transform_selection_insert_node(selection: &mut Selection, parent_path: &[usize], index: usize) {
    let depth = parent_path.len();
    for point in points_mut(selection) {
        if point.path == parent_path {
            if point.offset > index {
                point.offset += 1;
            }
            continue;
        }
        if point.path.len() > depth
            && point.path.starts_with(parent_path)
            && point.path[depth] >= index
        {
            point.path[depth] += 1;
        }
    }
}

fn transform_selection_remove_node(selection: &mut Selection, parent_path: &[usize], index: usize) {
    let depth = parent_path.len();
    for point in points_mut(selection) {
        if point.path == parent_path {
            if point.offset > index {
                point.offset -= 1;
            }
            continue;
        }
        if point.path.len() <= depth || !point.path.starts_with(parent_path) {
            continue;
        }
        let ix = point.path[depth];
        if ix > index {
            point.path[depth] = ix - 1;
        } else if ix == index {
            // Point was inside the removed subtree.
            point.path.truncate(depth);
            point.offset = index;
        }
    }
    selection.reorder();
}
