//! Integration tests for the concise dialect.

use marlin_parser::{CommentKind, ErrorCode, Event, RawPart, ScanOptions, ScriptletKind, TextMode};

/// Helper to scan concise syntax and return the events
fn scan(input: &str) -> Vec<Event> {
    marlin_parser::scan(input, ScanOptions::default())
}

/// Helper to render events as `kind:name` strings for order checks
fn outline(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event {
            Event::OpenTag(tag) => format!("open:{}", tag.tag_name),
            Event::CloseTag(close) => format!("close:{}", close.tag_name),
            Event::Text(text) => format!("text:{}", text.value),
            Event::Placeholder(placeholder) => format!("placeholder:{}", placeholder.value),
            Event::Error(diagnostic) => format!("error:{}", diagnostic.code),
            other => other.name().to_string(),
        })
        .collect()
}

#[test]
fn test_shorthand_class() {
    let events = scan("div.foo");
    assert_eq!(events.len(), 3);
    match &events[0] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "div");
            assert!(tag.concise);
            assert_eq!(tag.end_pos, 7);
            assert_eq!(tag.shorthand_class_names.len(), 1);
            let class = &tag.shorthand_class_names[0];
            assert_eq!(class.value, "\"foo\"");
            assert_eq!(
                class.raw_parts,
                vec![RawPart::Text {
                    text: "foo".to_string(),
                    pos: 4,
                    end_pos: 7,
                }]
            );
        }
        _ => panic!("Expected OpenTag event"),
    }
    match &events[1] {
        Event::CloseTag(close) => {
            assert_eq!(close.tag_name, "div");
            assert_eq!((close.pos, close.end_pos), (7, 7));
        }
        _ => panic!("Expected CloseTag event"),
    }
}

#[test]
fn test_shorthand_without_name_defaults_to_div() {
    let events = scan("#main.a.b");
    match &events[0] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "div");
            assert_eq!(tag.shorthand_id.as_ref().unwrap().value, "\"main\"");
            let classes: Vec<_> = tag
                .shorthand_class_names
                .iter()
                .map(|class| class.value.as_str())
                .collect();
            assert_eq!(classes, vec!["\"a\"", "\"b\""]);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_shorthand_with_placeholder() {
    let events = scan("div.col-${size}");
    match &events[1] {
        Event::OpenTag(tag) => {
            let class = &tag.shorthand_class_names[0];
            assert_eq!(class.value, "\"col-\"+(size)");
            assert_eq!(class.raw_parts.len(), 2);
            assert!(matches!(
                class.raw_parts[1],
                RawPart::Expression { ref expression, .. } if expression == "size"
            ));
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_multiple_shorthand_ids() {
    let events = scan("div#a#b");
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::InvalidTagShorthand);
            assert_eq!(diagnostic.pos, 5);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_nesting_by_indentation() {
    let events = scan("div\n  span\n");
    assert_eq!(
        outline(&events),
        vec!["open:div", "open:span", "close:span", "close:div", "finish"]
    );
    match &events[1] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.indent, "  ");
            assert_eq!((tag.pos, tag.end_pos), (6, 10));
        }
        _ => panic!("Expected OpenTag event"),
    }
    assert!(matches!(events[2], Event::CloseTag(ref close) if close.pos == 11 && close.end_pos == 11));
}

#[test]
fn test_siblings_close_each_other() {
    let events = scan("ul\n  li\n  li");
    assert_eq!(
        outline(&events),
        vec!["open:ul", "open:li", "close:li", "open:li", "close:li", "close:ul", "finish"]
    );
    assert!(matches!(events[2], Event::CloseTag(ref close) if close.pos == 10));
}

#[test]
fn test_bad_indentation() {
    let events = scan("ul\n    li\n  li");
    assert_eq!(
        outline(&events),
        vec!["open:ul", "open:li", "close:li", "error:BAD_INDENTATION", "finish"]
    );
    match &events[3] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.pos, 12);
            assert_eq!(
                diagnostic.message,
                "Line indentation does not match indentation of previous line"
            );
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_attributes() {
    let events = scan(r#"input type="text" disabled"#);
    assert_eq!(events.len(), 5);
    match &events[1] {
        Event::Expression(expression) => {
            assert_eq!(expression.value, "\"text\"");
            assert_eq!((expression.pos, expression.end_pos), (11, 17));
        }
        _ => panic!("Expected Expression event"),
    }
    match &events[2] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "input");
            assert_eq!(tag.attributes.len(), 2);
            assert_eq!(tag.attributes[0].name, "type");
            assert_eq!(tag.attributes[0].end_pos, 17);
            assert_eq!(tag.attributes[1].name, "disabled");
            assert_eq!(tag.attributes[1].value, None);
            assert_eq!(tag.end_pos, 26);
        }
        _ => panic!("Expected OpenTag event"),
    }
    assert!(matches!(events[3], Event::CloseTag(ref close) if close.pos == 26));
}

#[test]
fn test_tag_at_start_of_input() {
    let events = scan("a b=1");
    match &events[1] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "a");
            assert_eq!(tag.pos, 0);
            assert_eq!(tag.attributes[0].name, "b");
            assert_eq!(tag.attributes[0].pos, 2);
            assert_eq!(tag.attributes[0].value.as_deref(), Some("1"));
        }
        _ => panic!("Expected OpenTag event"),
    }
    assert_eq!(outline(&events), vec!["expression", "open:a", "close:a", "finish"]);
}

#[test]
fn test_slash_greater_than_is_attribute_text() {
    let events = scan("a/>");
    assert_eq!(outline(&events), vec!["open:a", "close:a", "finish"]);
    match &events[0] {
        Event::OpenTag(tag) => {
            assert!(!tag.self_closed);
            assert_eq!(tag.attributes.len(), 1);
            assert_eq!(tag.attributes[0].name, "/>");
        }
        _ => panic!("Expected OpenTag event"),
    }

    let events = scan("div x/>");
    match &events[0] {
        Event::OpenTag(tag) => {
            let names: Vec<_> = tag
                .attributes
                .iter()
                .map(|attribute| attribute.name.as_str())
                .collect();
            assert_eq!(names, vec!["x/>"]);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_attribute_group() {
    let events = scan("div [a=1 b=2]");
    match &events[2] {
        Event::OpenTag(tag) => {
            let values: Vec<_> = tag
                .attributes
                .iter()
                .map(|attribute| (attribute.name.as_str(), attribute.value.as_deref()))
                .collect();
            assert_eq!(values, vec![("a", Some("1")), ("b", Some("2"))]);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_attribute_group_across_lines() {
    let events = scan("div [\n  a=1\n  b=2\n]\n  span");
    assert_eq!(
        outline(&events),
        vec![
            "expression",
            "expression",
            "open:div",
            "open:span",
            "close:span",
            "close:div",
            "finish"
        ]
    );
}

#[test]
fn test_unclosed_attribute_group() {
    let events = scan("div [a=1");
    match events.iter().find(|event| matches!(event, Event::Error(_))) {
        Some(Event::Error(diagnostic)) => {
            assert_eq!(diagnostic.code, ErrorCode::MalformedOpenTag);
            assert_eq!(
                diagnostic.message,
                "EOF reached while within an attribute group (e.g. \"[ ... ]\")."
            );
            assert_eq!(diagnostic.pos, 0);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_single_line_html_block() {
    let events = scan("div\n  -- Hello ${name}");
    assert_eq!(
        outline(&events),
        vec!["open:div", "text:Hello ", "placeholder:name", "close:div", "finish"]
    );
    match &events[1] {
        Event::Text(text) => assert_eq!((text.pos, text.end_pos), (9, 15)),
        _ => panic!("Expected Text event"),
    }
}

#[test]
fn test_html_block_after_tag() {
    let events = scan("div -- text");
    assert_eq!(outline(&events), vec!["open:div", "text:text", "close:div", "finish"]);
    assert!(matches!(events[0], Event::OpenTag(ref tag) if tag.end_pos == 4));
    assert!(matches!(events[1], Event::Text(ref text) if text.pos == 7 && text.end_pos == 11));
}

#[test]
fn test_delimited_html_block() {
    let events = scan("div\n  --\n  <b>hi</b>\n  --\nspan");
    assert_eq!(
        outline(&events),
        vec![
            "open:div",
            "open:b",
            "text:hi",
            "close:b",
            "close:div",
            "open:span",
            "close:span",
            "finish"
        ]
    );
    match &events[1] {
        Event::OpenTag(tag) => {
            assert!(!tag.concise);
            assert_eq!((tag.pos, tag.end_pos), (11, 14));
        }
        _ => panic!("Expected OpenTag event"),
    }
    assert!(matches!(events[4], Event::CloseTag(ref close) if close.pos == 26));
}

#[test]
fn test_text_after_closing_delimiter() {
    let events = scan("--\nhello\n-- x");
    match events.last_chunk::<2>() {
        Some([Event::Error(diagnostic), Event::Finish]) => {
            assert_eq!(diagnostic.code, ErrorCode::InvalidCharacter);
            assert_eq!(diagnostic.pos, 12);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_mixed_mode_line() {
    let events = scan("div\n  <b>x</b> tail\n  span");
    assert_eq!(
        outline(&events),
        vec![
            "open:div",
            "open:b",
            "text:x",
            "close:b",
            "text: tail",
            "open:span",
            "close:span",
            "close:div",
            "finish"
        ]
    );
    match &events[4] {
        Event::Text(text) => assert_eq!((text.pos, text.end_pos), (14, 19)),
        _ => panic!("Expected Text event"),
    }
}

#[test]
fn test_script_tag_body_lines() {
    let events = scan("script\n  -- foo()");
    match &events[1] {
        Event::Text(text) => {
            assert_eq!(text.value, "foo()");
            assert_eq!(text.mode, TextMode::ParsedText);
            assert_eq!((text.pos, text.end_pos), (12, 17));
        }
        _ => panic!("Expected Text event"),
    }
    assert!(matches!(events[2], Event::CloseTag(ref close) if close.tag_name == "script"));
}

#[test]
fn test_text_only_tag_requires_dash() {
    let events = scan("script\n  foo()");
    assert_eq!(events.len(), 3);
    match &events[1] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::IllegalLineStart);
            assert_eq!(diagnostic.pos, 9);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_single_slash_line() {
    let events = scan("/foo");
    match &events[0] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::IllegalLineStart);
            assert_eq!(diagnostic.pos, 0);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_line_comment() {
    let events = scan("// hello\ndiv");
    match &events[0] {
        Event::Comment(comment) => {
            assert_eq!(comment.value, " hello");
            assert_eq!(comment.kind, CommentKind::Line);
            assert_eq!((comment.pos, comment.end_pos), (0, 8));
        }
        _ => panic!("Expected Comment event"),
    }
    assert!(matches!(events[1], Event::OpenTag(ref tag) if tag.tag_name == "div"));
}

#[test]
fn test_block_comment_must_end_line() {
    let events = scan("/* c */ div");
    assert!(matches!(events[0], Event::Comment(ref comment) if comment.kind == CommentKind::Block));
    match &events[1] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::InvalidCharacter);
            assert_eq!(diagnostic.pos, 8);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_semicolon_ends_tag() {
    let events = scan("div;\nspan");
    assert_eq!(
        outline(&events),
        vec!["open:div", "close:div", "open:span", "close:span", "finish"]
    );

    let events = scan("div; span");
    match &events[1] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::InvalidCharacter);
            assert_eq!(diagnostic.pos, 5);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_inline_scripts() {
    let events = scan("$ const x = 1;\ndiv");
    match &events[0] {
        Event::Scriptlet(scriptlet) => {
            assert_eq!(scriptlet.value, "const x = 1;");
            assert_eq!(scriptlet.kind, ScriptletKind::Line);
            assert_eq!((scriptlet.pos, scriptlet.end_pos), (0, 14));
        }
        _ => panic!("Expected Scriptlet event"),
    }
    assert!(matches!(events[1], Event::OpenTag(ref tag) if tag.tag_name == "div"));

    let events = scan("$ {\n  let a = 1;\n}\ndiv");
    match &events[0] {
        Event::Scriptlet(scriptlet) => {
            assert_eq!(scriptlet.kind, ScriptletKind::Block);
            assert_eq!(scriptlet.value.trim(), "let a = 1;");
        }
        _ => panic!("Expected Scriptlet event"),
    }
    assert!(matches!(events[1], Event::OpenTag(ref tag) if tag.tag_name == "div"));
}

#[test]
fn test_single_hyphen_is_deprecated_html_block() {
    let events = scan("- hello");
    match &events[0] {
        Event::Text(text) => {
            assert_eq!(text.value, "hello");
            assert_eq!((text.pos, text.end_pos), (2, 7));
        }
        _ => panic!("Expected Text event"),
    }
}
