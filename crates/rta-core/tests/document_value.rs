use anyhow::Result;
use rta_core::{
    AreaConfig, CreateLinkExecutable, DocumentValue, Executable, Node, RichTextArea, Selection,
    ValueError,
};

#[test]
fn area_loaded_from_json_reports_link_eligibility() -> Result<()> {
    let value = DocumentValue::from_json_str(
        &serde_json::json!({
            "schema": "rta-core",
            "version": 1,
            "document": {
                "children": [
                    {
                        "node": "element",
                        "tag": "p",
                        "children": [
                            { "node": "text", "text": "see " },
                            {
                                "node": "element",
                                "tag": "a",
                                "attrs": { "href": "https://example.com" },
                                "children": [{ "node": "text", "text": "here" }]
                            }
                        ]
                    }
                ]
            }
        })
        .to_string(),
    )?;

    let outside: Selection = serde_json::from_value(serde_json::json!({
        "ranges": [{
            "start": { "path": [0, 0], "offset": 0 },
            "end": { "path": [0, 0], "offset": 3 }
        }]
    }))?;
    let inside: Selection = serde_json::from_value(serde_json::json!({
        "ranges": [{
            "start": { "path": [0, 1, 0], "offset": 2 },
            "end": { "path": [0, 1, 0], "offset": 2 }
        }]
    }))?;

    let create_link = CreateLinkExecutable::default();
    let mut area = RichTextArea::from_value(value, outside);
    assert!(create_link.is_enabled(&area));

    area.set_selection(inside);
    assert!(!create_link.is_enabled(&area));
    Ok(())
}

#[test]
fn document_value_round_trips_through_pretty_json() -> Result<()> {
    let value = DocumentValue::from_document(rta_core::Document::new(vec![
        Node::paragraph("a"),
        Node::void("hr"),
    ]));
    let json = value.to_json_pretty()?;
    assert_eq!(DocumentValue::from_json_str(&json)?, value);
    Ok(())
}

#[test]
fn document_value_defaults_schema_and_version() -> Result<()> {
    let value = DocumentValue::from_json_str(r#"{ "document": { "children": [] } }"#)?;
    assert_eq!(value.schema, "rta-core");
    assert_eq!(value.version, 1);
    Ok(())
}

#[test]
fn document_value_rejects_foreign_envelopes() {
    let err = DocumentValue::from_json_str(r#"{ "schema": "other", "document": {} }"#).unwrap_err();
    assert!(matches!(err, ValueError::UnsupportedSchema(schema) if schema == "other"));

    let err = DocumentValue::from_json_str(r#"{ "version": 7, "document": {} }"#).unwrap_err();
    assert!(matches!(err, ValueError::UnsupportedVersion(7)));

    let err = DocumentValue::from_json_str("{").unwrap_err();
    assert!(matches!(err, ValueError::Json(_)));
}

#[test]
fn area_config_fills_in_defaults() -> Result<()> {
    let config = AreaConfig::from_json_str(r#"{ "read_only": true }"#)?;
    assert!(config.read_only);
    assert_eq!(config.link_tag, "a");
    assert_eq!(config.max_ops_per_transaction, 10_000);

    let config =
        AreaConfig::from_json_str(r#"{ "link_tag": "x-link", "max_ops_per_transaction": 4 }"#)?;
    assert_eq!(config.link_tag, "x-link");
    assert_eq!(config.max_ops_per_transaction, 4);
    Ok(())
}
