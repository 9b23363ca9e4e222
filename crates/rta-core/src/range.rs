use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::{Document, ElementNode, Fragment, Node, TextNode, clamp_to_char_boundary};
use crate::ops::{Op, Path};

/// A boundary point: a container node and an offset inside it.
///
/// The offset counts bytes when the container is a text node and children
/// otherwise. The empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Orders two boundary points in document order.
pub fn compare_points(a: &Point, b: &Point) -> Ordering {
    if a.path == b.path {
        return a.offset.cmp(&b.offset);
    }
    if b.path.starts_with(&a.path) {
        let child = b.path[a.path.len()];
        return if child < a.offset {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if a.path.starts_with(&b.path) {
        let child = a.path[b.path.len()];
        return if child < b.offset {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    a.path.cmp(&b.path)
}

#[derive(Deserialize)]
struct RangeRepr {
    start: Point,
    end: Point,
}

impl From<RangeRepr> for Range {
    fn from(value: RangeRepr) -> Self {
        Range::new(value.start, value.end)
    }
}

/// A pair of boundary points with `start` never after `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RangeRepr")]
pub struct Range {
    start: Point,
    end: Point,
}

impl Range {
    /// Builds a range from two points given in any order.
    pub fn new(a: Point, b: Point) -> Self {
        if compare_points(&a, &b) == Ordering::Greater {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        [&mut self.start, &mut self.end].into_iter()
    }

    pub(crate) fn reorder(&mut self) {
        if compare_points(&self.start, &self.end) == Ordering::Greater {
            std::mem::swap(&mut self.start, &mut self.end);
        }
    }

    /// Path of the nearest node containing both boundaries.
    pub fn common_ancestor_container(&self) -> Path {
        self.start
            .path
            .iter()
            .zip(&self.end.path)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect()
    }

    /// Detached copy of everything the range spans.
    ///
    /// Fully contained nodes are copied whole. Partially selected text is
    /// sliced and partially selected elements are copied without the children
    /// that fall outside the range.
    pub fn clone_contents(&self, doc: &Document) -> Fragment {
        if self.is_collapsed() {
            return Fragment::default();
        }
        let ancestor = self.common_ancestor_container();
        if ancestor.is_empty() {
            return Fragment::new(clone_children(&ancestor, &doc.children, &self.start, &self.end));
        }
        match doc.node(&ancestor) {
            Some(Node::Element(el)) => {
                Fragment::new(clone_children(&ancestor, &el.children, &self.start, &self.end))
            }
            Some(node @ Node::Text(_)) => Fragment::new(vec![clone_partial(
                &ancestor,
                node,
                &self.start,
                &self.end,
            )]),
            Some(Node::Void(_)) | None => Fragment::default(),
        }
    }

    /// Plain text covered by the range.
    pub fn text(&self, doc: &Document) -> String {
        self.clone_contents(doc).text_content()
    }

    /// Ops removing the range contents, and the point where the range
    /// collapses once they are applied.
    ///
    /// Partially selected elements stay in place with their selected part
    /// removed; nothing is merged.
    pub fn delete_contents_ops(&self, doc: &Document) -> (Vec<Op>, Point) {
        if self.is_collapsed() {
            return (Vec::new(), self.start.clone());
        }

        let ancestor = self.common_ancestor_container();
        let mut ops = Vec::new();
        if ancestor.is_empty() {
            collect_removals(&ancestor, &doc.children, &self.start, &self.end, &mut ops);
        } else {
            match doc.node(&ancestor) {
                Some(Node::Element(el)) => {
                    collect_removals(&ancestor, &el.children, &self.start, &self.end, &mut ops);
                }
                Some(Node::Text(t)) => {
                    let (from, to) = text_bounds(&ancestor, &t.text, &self.start, &self.end);
                    if from < to {
                        ops.push(Op::RemoveText {
                            path: ancestor.clone(),
                            range: from..to,
                        });
                    }
                }
                Some(Node::Void(_)) | None => {}
            }
        }
        // Later nodes first so earlier paths stay valid.
        ops.reverse();

        (ops, self.collapse_point_after_delete())
    }

    fn collapse_point_after_delete(&self) -> Point {
        if self.end.path.starts_with(&self.start.path) {
            return self.start.clone();
        }
        let mut reference = self.start.path.clone();
        while let Some((_, parent)) = reference.split_last() {
            if self.end.path.starts_with(parent) {
                break;
            }
            reference.pop();
        }
        match reference.split_last() {
            Some((&index, parent)) => Point::new(parent.to_vec(), index + 1),
            None => self.start.clone(),
        }
    }
}

fn child_path(parent: &[usize], index: usize) -> Path {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

/// Clips `start`/`end` to the child at `path` when it only holds one of them.
fn sub_bounds(path: &[usize], node: &Node, start: &Point, end: &Point) -> (Point, Point) {
    let sub_start = if start.path.starts_with(path) {
        start.clone()
    } else {
        Point::new(path.to_vec(), 0)
    };
    let sub_end = if end.path.starts_with(path) {
        end.clone()
    } else {
        Point::new(path.to_vec(), node.length())
    };
    (sub_start, sub_end)
}

fn text_bounds(path: &[usize], text: &str, start: &Point, end: &Point) -> (usize, usize) {
    let from = if start.path == path {
        clamp_to_char_boundary(text, start.offset)
    } else {
        0
    };
    let to = if end.path == path {
        clamp_to_char_boundary(text, end.offset)
    } else {
        text.len()
    };
    (from, to.max(from))
}

fn is_contained(parent: &[usize], index: usize, start: &Point, end: &Point) -> bool {
    let before = Point::new(parent.to_vec(), index);
    let after = Point::new(parent.to_vec(), index + 1);
    compare_points(start, &before) != Ordering::Greater
        && compare_points(&after, end) != Ordering::Greater
}

fn clone_children(path: &[usize], children: &[Node], start: &Point, end: &Point) -> Vec<Node> {
    let mut out = Vec::new();
    for (ix, child) in children.iter().enumerate() {
        let child_path = child_path(path, ix);
        if start.path.starts_with(&child_path) || end.path.starts_with(&child_path) {
            let (sub_start, sub_end) = sub_bounds(&child_path, child, start, end);
            out.push(clone_partial(&child_path, child, &sub_start, &sub_end));
        } else if is_contained(path, ix, start, end) {
            out.push(child.clone());
        }
    }
    out
}

fn clone_partial(path: &[usize], node: &Node, start: &Point, end: &Point) -> Node {
    match node {
        Node::Text(t) => {
            let (from, to) = text_bounds(path, &t.text, start, end);
            Node::Text(TextNode {
                text: t.text[from..to].to_string(),
            })
        }
        Node::Element(el) => Node::Element(ElementNode {
            children: clone_children(path, &el.children, start, end),
            ..el.shallow_clone()
        }),
        Node::Void(_) => node.clone(),
    }
}

fn collect_removals(
    path: &[usize],
    children: &[Node],
    start: &Point,
    end: &Point,
    ops: &mut Vec<Op>,
) {
    for (ix, child) in children.iter().enumerate() {
        let child_path = child_path(path, ix);
        if start.path.starts_with(&child_path) || end.path.starts_with(&child_path) {
            let (sub_start, sub_end) = sub_bounds(&child_path, child, start, end);
            match child {
                Node::Text(t) => {
                    let (from, to) = text_bounds(&child_path, &t.text, &sub_start, &sub_end);
                    if from < to {
                        ops.push(Op::RemoveText {
                            path: child_path,
                            range: from..to,
                        });
                    }
                }
                Node::Element(el) => {
                    collect_removals(&child_path, &el.children, &sub_start, &sub_end, ops);
                }
                Node::Void(_) => {}
            }
        } else if is_contained(path, ix, start, end) {
            ops.push(Op::RemoveNode { path: child_path });
        }
    }
}

/// The user's selection. Hosts usually hold zero or one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Selection {
    #[serde(default)]
    ranges: Vec<Range>,
}

impl Selection {
    pub fn new(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn collapsed(point: Point) -> Self {
        Self::from_range(Range::collapsed(point))
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn range_at(&self, index: usize) -> Option<&Range> {
        self.ranges.get(index)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub(crate) fn ranges_mut(&mut self) -> &mut Vec<Range> {
        &mut self.ranges
    }

    pub(crate) fn reorder(&mut self) {
        for range in &mut self.ranges {
            range.reorder();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(Range::is_collapsed)
    }
}
