use std::cmp::Ordering;

use tracing::trace;

use crate::core::{Document, Node, TreeNode};
use crate::ops::Path;
use crate::range::{Point, Range, compare_points};

/// Stateless structural queries over document trees.
///
/// Holds no state; hosts construct one and hand it to the executables that
/// need it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomUtils;

impl DomUtils {
    pub fn new() -> Self {
        Self
    }

    /// Moves the boundaries of `range` into text nodes where one is reachable.
    ///
    /// A boundary inside an element at child index `i` descends into child `i`
    /// along first children (for the start) or into child `i - 1` along last
    /// children (for the end), trying the other neighbour when there is no
    /// child on that side. It only moves when that descent reaches a text
    /// node, so no sibling and no void node is ever stepped over. Boundaries
    /// already in text nodes are kept. A collapsed range stays collapsed.
    /// When normalizing would invert the boundaries the original range is
    /// returned.
    pub fn get_text_range(&self, doc: &Document, range: &Range) -> Range {
        let start = text_boundary(doc, range.start(), Direction::Forward);
        if range.is_collapsed() {
            return Range::collapsed(start);
        }
        let end = text_boundary(doc, range.end(), Direction::Backward);
        if compare_points(&start, &end) == Ordering::Greater {
            trace!(?range, "text range normalization would invert boundaries");
            return range.clone();
        }
        Range::new(start, end)
    }

    /// Nearest strict ancestor of `node` named `tag_name`, ignoring ASCII case.
    pub fn get_first_ancestor<N: TreeNode>(&self, node: Option<N>, tag_name: &str) -> Option<N> {
        let mut current = node?.parent();
        while let Some(ancestor) = current {
            if ancestor.is_named(tag_name) {
                return Some(ancestor);
            }
            current = ancestor.parent();
        }
        None
    }

    /// Like [`DomUtils::get_first_ancestor`] but `node` itself is checked first.
    pub fn get_first_ancestor_or_self<N: TreeNode>(
        &self,
        node: Option<N>,
        tag_name: &str,
    ) -> Option<N> {
        let node = node?;
        if node.is_named(tag_name) {
            return Some(node);
        }
        self.get_first_ancestor(Some(node), tag_name)
    }

    /// First node below `root` named `tag_name` in pre-order, ignoring ASCII
    /// case. `root` itself is not a candidate.
    pub fn get_first_descendant<N: TreeNode>(&self, root: &N, tag_name: &str) -> Option<N> {
        let mut stack = root.children();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if node.is_named(tag_name) {
                return Some(node);
            }
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

fn text_boundary(doc: &Document, point: &Point, direction: Direction) -> Point {
    if !point.path.is_empty() && !matches!(doc.node(&point.path), Some(Node::Element(_))) {
        return point.clone();
    }
    let Some(children) = doc.children_at(&point.path) else {
        return point.clone();
    };
    let split = point.offset.min(children.len());

    // `None` when there is no neighbour on that side, `Some(None)` when the
    // neighbour does not lead into text.
    let forward = || {
        children
            .get(split)
            .map(|child| leading_text(child, child_path(&point.path, split)))
    };
    let backward = || {
        split
            .checked_sub(1)
            .map(|ix| trailing_text(&children[ix], child_path(&point.path, ix)))
    };

    let found = match direction {
        Direction::Forward => forward().or_else(backward),
        Direction::Backward => backward().or_else(forward),
    };
    found.flatten().unwrap_or_else(|| point.clone())
}

fn child_path(parent: &[usize], index: usize) -> Path {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

/// Start of the text reached by following first children from `node`.
fn leading_text(node: &Node, path: Path) -> Option<Point> {
    match node {
        Node::Text(_) => Some(Point::new(path, 0)),
        Node::Element(el) => {
            let first = el.children.first()?;
            leading_text(first, child_path(&path, 0))
        }
        Node::Void(_) => None,
    }
}

/// End of the text reached by following last children from `node`.
fn trailing_text(node: &Node, path: Path) -> Option<Point> {
    match node {
        Node::Text(t) => Some(Point::new(path, t.text.len())),
        Node::Element(el) => {
            let ix = el.children.len().checked_sub(1)?;
            trailing_text(&el.children[ix], child_path(&path, ix))
        }
        Node::Void(_) => None,
    }
}
