use rta_core::{Document, DomUtils, Fragment, Node, Point, Range, TreeNode};

/// `<p>ab<em>cd</em>ef</p><div><em><a href="1">x</a></em><a href="2">y</a></div>`
fn doc() -> Document {
    Document::new(vec![
        Node::element(
            "p",
            vec![
                Node::text("ab"),
                Node::element("em", vec![Node::text("cd")]),
                Node::text("ef"),
            ],
        ),
        Node::element(
            "div",
            vec![
                Node::element("em", vec![Node::link("1", vec![Node::text("x")])]),
                Node::link("2", vec![Node::text("y")]),
            ],
        ),
    ])
}

#[test]
fn first_ancestor_skips_the_node_itself() {
    let doc = doc();
    let dom = DomUtils::new();

    let link = doc.node_ref(&[1, 0, 0]);
    assert!(dom.get_first_ancestor(link.clone(), "a").is_none());

    let em = dom.get_first_ancestor(link.clone(), "EM").unwrap();
    assert_eq!(em.path(), &[1, 0]);

    let or_self = dom.get_first_ancestor_or_self(link, "a").unwrap();
    assert_eq!(or_self.path(), &[1, 0, 0]);
}

#[test]
fn first_ancestor_stops_at_the_root() {
    let doc = doc();
    let dom = DomUtils::new();

    let text = doc.node_ref(&[0, 1, 0]);
    assert!(dom.get_first_ancestor(text.clone(), "a").is_none());
    assert_eq!(
        dom.get_first_ancestor(text, "#document").unwrap().path(),
        &[] as &[usize]
    );
    assert!(dom.get_first_ancestor(None::<rta_core::NodeRef<'_>>, "a").is_none());
}

#[test]
fn first_descendant_is_found_in_pre_order() {
    let doc = doc();
    let dom = DomUtils::new();

    let div = doc.node_ref(&[1]).unwrap();
    let link = dom.get_first_descendant(&div, "a").unwrap();
    assert_eq!(link.path(), &[1, 0, 0]);
    assert_eq!(link.node().and_then(|n| n.attr("href")), Some("1"));

    assert!(dom.get_first_descendant(&doc.node_ref(&[0]).unwrap(), "a").is_none());
}

#[test]
fn first_descendant_excludes_the_root() {
    let dom = DomUtils::new();
    let doc = doc();
    let link = doc.node_ref(&[1, 1]).unwrap();
    assert!(dom.get_first_descendant(&link, "a").is_none());
    assert_eq!(
        dom.get_first_descendant(&link, "#text").unwrap().path(),
        &[1, 1, 0]
    );
}

#[test]
fn first_descendant_searches_fragments() {
    let dom = DomUtils::new();
    let fragment = Fragment::new(vec![
        Node::text("plain"),
        Node::element("span", vec![Node::element("A", vec![Node::text("z")])]),
    ]);
    let root = fragment.root();
    assert_eq!(root.node_name(), "#document-fragment");
    assert_eq!(dom.get_first_descendant(&root, "a").unwrap().path(), &[1, 0]);

    assert!(dom.get_first_descendant(&Fragment::default().root(), "a").is_none());
}

#[test]
fn text_range_moves_element_boundaries_into_text() {
    let doc = doc();
    let dom = DomUtils::new();

    let range = Range::new(Point::new(vec![0], 1), Point::new(vec![0], 2));
    let text_range = dom.get_text_range(&doc, &range);
    assert_eq!(text_range.start(), &Point::new(vec![0, 1, 0], 0));
    assert_eq!(text_range.end(), &Point::new(vec![0, 1, 0], 2));
}

#[test]
fn text_range_keeps_text_boundaries() {
    let doc = doc();
    let dom = DomUtils::new();

    let range = Range::new(Point::new(vec![0, 0], 1), Point::new(vec![0, 2], 1));
    assert_eq!(dom.get_text_range(&doc, &range), range);
}

#[test]
fn collapsed_text_range_stays_collapsed() {
    let doc = doc();
    let dom = DomUtils::new();

    let past_end = Range::collapsed(Point::new(vec![0], 3));
    let text_range = dom.get_text_range(&doc, &past_end);
    assert!(text_range.is_collapsed());
    assert_eq!(text_range.start(), &Point::new(vec![0, 2], 2));

    let at_root = Range::collapsed(Point::new(vec![], 1));
    let text_range = dom.get_text_range(&doc, &at_root);
    assert_eq!(text_range.start(), &Point::new(vec![1, 0, 0, 0], 0));
}

#[test]
fn text_range_falls_back_when_boundaries_would_cross() {
    let doc = Document::new(vec![Node::element(
        "p",
        vec![Node::text("x"), Node::void("img"), Node::text("y")],
    )]);
    let dom = DomUtils::new();

    let range = Range::new(Point::new(vec![0], 1), Point::new(vec![0], 2));
    assert_eq!(dom.get_text_range(&doc, &range), range);
}

#[test]
fn text_range_never_steps_over_a_text_free_link() {
    let dom = DomUtils::new();

    // <p><a><img></a>text</p>
    let doc = Document::new(vec![Node::element(
        "p",
        vec![Node::link("x", vec![Node::void("img")]), Node::text("text")],
    )]);
    let range = Range::new(Point::new(vec![0], 0), Point::new(vec![0], 2));
    let text_range = dom.get_text_range(&doc, &range);
    assert_eq!(text_range.start(), &Point::new(vec![0], 0));
    assert_eq!(text_range.end(), &Point::new(vec![0, 1], 4));
    let contents = text_range.clone_contents(&doc);
    assert_eq!(dom.get_first_descendant(&contents.root(), "a").unwrap().path(), &[0]);

    // <p>ab<a><img></a></p>
    let doc = Document::new(vec![Node::element(
        "p",
        vec![Node::text("ab"), Node::link("x", vec![Node::void("img")])],
    )]);
    let range = Range::new(Point::new(vec![0, 0], 1), Point::new(vec![0], 2));
    let text_range = dom.get_text_range(&doc, &range);
    assert_eq!(text_range, range);
    let contents = text_range.clone_contents(&doc);
    assert_eq!(dom.get_first_descendant(&contents.root(), "a").unwrap().path(), &[1]);
}

#[test]
fn text_range_stops_at_nested_void_nodes() {
    // <p><span><a><img></a>t</span></p>
    let doc = Document::new(vec![Node::element(
        "p",
        vec![Node::element(
            "span",
            vec![Node::link("x", vec![Node::void("img")]), Node::text("t")],
        )],
    )]);
    let dom = DomUtils::new();

    let range = Range::new(Point::new(vec![0], 0), Point::new(vec![0, 0, 1], 1));
    let text_range = dom.get_text_range(&doc, &range);
    assert_eq!(text_range.start(), &Point::new(vec![0], 0));
    let contents = text_range.clone_contents(&doc);
    assert!(dom.get_first_descendant(&contents.root(), "a").is_some());
}

#[test]
fn text_range_does_not_modify_the_document() {
    let doc = doc();
    let before = doc.clone();
    let range = Range::new(Point::new(vec![], 0), Point::new(vec![], 2));
    let _ = DomUtils::new().get_text_range(&doc, &range);
    assert_eq!(doc, before);
}
