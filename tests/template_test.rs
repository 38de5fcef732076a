//! Integration tests for template parsing, validation and inspection.

use docweave::template::{Node, Paragraph, Section};
use docweave::{Error, Orientation, Template};
use serde_json::json;

const LETTER: &str = r#"{
    "metadata": {"title": "Switching letter"},
    "styles": {"signature": {"italic": true}},
    "sections": [
        {
            "children": [
                {"type": "heading", "level": 1, "text": "Dear {cfr.recipient.title_and_name}"},
                {"type": "paragraph", "runs": [
                    "Your plan ",
                    {"text": "{cfr.plan.name}", "style": "strong", "overrides": {"bold": true}}
                ]},
                {"type": "list", "items_from": "{cfr.reasons}"},
                {"type": "table",
                 "header": ["Fund", "Value"],
                 "rows": [[{"text": "Total", "colspan": 1}, "{cyc.total}"]],
                 "dynamic": {"source": "{cyc.funds}", "cells": ["{row.name}", "{row.value}"]}}
            ]
        },
        {
            "orientation": "LANDSCAPE",
            "children": [
                {"type": "paragraph", "text": "Signed {user_input.adviser}", "style": "signature"},
                {"type": "page_break"}
            ]
        }
    ]
}"#;

#[test]
fn test_parse_letter() {
    let template = Template::from_json_str(LETTER).unwrap();

    assert_eq!(template.metadata.title.as_deref(), Some("Switching letter"));
    assert!(template.metadata.page_numbers);
    assert!(template.metadata.builtin_styles);
    assert_eq!(template.sections.len(), 2);
    assert_eq!(template.sections[1].orientation, Some(Orientation::Landscape));

    let kinds: Vec<&str> = template.sections[0]
        .children
        .iter()
        .map(Node::kind)
        .collect();
    assert_eq!(kinds, vec!["heading", "paragraph", "list", "table"]);
}

#[test]
fn test_placeholders_in_document_order() {
    let template = Template::from_json_str(LETTER).unwrap();
    let found = template.placeholders().unwrap();

    let tokens: Vec<&str> = found.iter().map(|p| p.token.as_str()).collect();
    assert_eq!(
        tokens,
        vec![
            "{cfr.recipient.title_and_name}",
            "{cfr.plan.name}",
            "{cfr.reasons}",
            "{cyc.funds}",
            "{cyc.total}",
            "{row.name}",
            "{row.value}",
            "{user_input.adviser}",
        ]
    );

    assert_eq!(found[0].location, "sections[0].children[0].text");
    assert_eq!(found[1].location, "sections[0].children[1].runs[1]");
    assert_eq!(found[2].location, "sections[0].children[2].items_from");
    assert_eq!(found[7].source, "user_input");
}

#[test]
fn test_validate_accepts_letter() {
    let template = Template::from_json_str(LETTER).unwrap();
    assert!(template.validate().is_ok());
}

#[test]
fn test_validate_reports_malformed_location() {
    let template = Template::from_value(json!({"sections": [{"children": [
        {"type": "paragraph", "text": "fine"},
        {"type": "paragraph", "text": "oops {cfr.name"}
    ]}]}))
    .unwrap();

    match template.validate() {
        Err(Error::MalformedToken { reason, .. }) => {
            assert!(reason.ends_with("in sections[0].children[1].runs[0]"), "{}", reason);
        }
        other => panic!("expected MalformedToken, got {:?}", other),
    }
}

#[test]
fn test_validate_malformed_inside_table_cell() {
    let template = Template::from_value(json!({"sections": [{"children": [
        {"type": "table", "rows": [["ok", "{bad token}"]]}
    ]}]}))
    .unwrap();

    assert!(matches!(
        template.validate(),
        Err(Error::MalformedToken { .. })
    ));
}

#[test]
fn test_validate_structural_errors() {
    let cases = vec![
        json!({"type": "heading", "level": 9, "text": "Too deep"}),
        json!({"type": "list", "items_from": "prefix {cfr.reasons}"}),
        json!({"type": "list", "item_template": "{item.name}"}),
        json!({"type": "table", "dynamic": {"source": "{cyc.funds}", "cells": []}}),
        json!({"type": "table"}),
        json!({"type": "image", "reference": ""}),
    ];

    for node in cases {
        let template =
            Template::from_value(json!({"sections": [{"children": [node.clone()]}]})).unwrap();
        assert!(
            matches!(template.validate(), Err(Error::AssemblyAbort { .. })),
            "expected abort for {}",
            node
        );
    }
}

#[test]
fn test_bare_name_only_where_bound() {
    let outside = Template::from_value(json!({"sections": [{"children": [
        {"type": "paragraph", "text": "Dear {cfr}"}
    ]}]}))
    .unwrap();
    match outside.validate() {
        Err(Error::MalformedToken { offset, reason }) => {
            assert_eq!(offset, 5);
            assert!(reason.ends_with("in sections[0].children[0].runs[0]"), "{}", reason);
        }
        other => panic!("expected MalformedToken, got {:?}", other),
    }

    let fixed_row = Template::from_value(json!({"sections": [{"children": [
        {"type": "table", "rows": [["{row}"]]}
    ]}]}))
    .unwrap();
    assert!(matches!(
        fixed_row.validate(),
        Err(Error::MalformedToken { .. })
    ));

    let bound = Template::from_value(json!({"sections": [{"children": [
        {"type": "table", "dynamic": {"source": "{cyc.names}", "cells": ["{row}"]}},
        {"type": "list", "items_from": "{cfr.reasons}", "item_template": "- {item}"}
    ]}]}))
    .unwrap();
    assert!(bound.validate().is_ok());
}

#[test]
fn test_bare_data_source_rejected() {
    let template = Template::from_value(json!({"sections": [{"children": [
        {"type": "list", "items_from": "{cfr}"}
    ]}]}))
    .unwrap();
    assert!(matches!(
        template.validate(),
        Err(Error::AssemblyAbort { .. })
    ));
}

#[test]
fn test_unknown_node_type_rejected() {
    let result = Template::from_value(json!({"sections": [{"children": [
        {"type": "chart", "data": "{cyc.funds}"}
    ]}]}));
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_builder_matches_json() {
    let built = Template::new().with_section(
        Section::new(Orientation::Portrait)
            .with(Node::Paragraph(Paragraph::with_text("Hello {cfr.name}"))),
    );
    let parsed = Template::from_value(json!({"sections": [{
        "orientation": "portrait",
        "children": [{"type": "paragraph", "text": "Hello {cfr.name}"}]
    }]}))
    .unwrap();

    assert_eq!(built, parsed);
}

#[test]
fn test_walk_visits_cell_content_with_role_style() {
    let template = Template::from_value(json!({"sections": [{"style": "closing", "children": [
        {"type": "table", "header": ["H"], "rows": [["B"]]}
    ]}]}))
    .unwrap();

    let visits: Vec<_> = template.walk().collect();
    assert_eq!(visits.len(), 3);
    assert_eq!(visits[1].location, "sections[0].children[0].header[0].content[0]");
    assert_eq!(visits[1].context.style_name(), Some("table_header"));
    assert_eq!(visits[2].context.style_name(), Some("table_cell"));
    assert_eq!(visits[0].context.style_name(), Some("closing"));
}
