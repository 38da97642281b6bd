//! Integration tests for the tag-syntax dialect.

use marlin_parser::{
    BodyMode, CommentKind, ErrorCode, Event, EventCollector, ScanOptions, Scanner, ScriptletKind,
    State, TagParseOptions, TextMode,
};

/// Helper to scan tag syntax and return the events
fn scan(input: &str) -> Vec<Event> {
    marlin_parser::scan(input, ScanOptions::html())
}

/// Helper to collect the diagnostics among `events`
fn errors(events: &[Event]) -> Vec<ErrorCode> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Error(diagnostic) => Some(diagnostic.code),
            _ => None,
        })
        .collect()
}

#[test]
fn test_initial_state_follows_dialect() {
    let html = Scanner::new(EventCollector::new(), ScanOptions::html());
    assert_eq!(html.state(), State::HtmlContent);
    let concise = Scanner::new(EventCollector::new(), ScanOptions::default());
    assert_eq!(concise.state(), State::ConciseHtmlContent);
}

#[test]
fn test_empty_input() {
    let events = scan("");
    assert_eq!(events, vec![Event::Finish]);
}

#[test]
fn test_plain_text() {
    let events = scan("Hello");
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Text(text) => {
            assert_eq!(text.value, "Hello");
            assert_eq!(text.mode, TextMode::Html);
            assert_eq!((text.pos, text.end_pos), (0, 5));
        }
        _ => panic!("Expected Text event"),
    }
    assert!(matches!(events[1], Event::Finish));
}

#[test]
fn test_nested_tags_with_placeholder() {
    let events = scan(r#"<div class="a"><img><span>${x}</span></div>"#);
    assert_eq!(events.len(), 10);

    match &events[0] {
        Event::String(string) => {
            assert_eq!(string.value, "\"a\"");
            assert!(string.is_string_literal);
            assert_eq!((string.pos, string.end_pos), (11, 14));
        }
        _ => panic!("Expected String event"),
    }
    match &events[1] {
        Event::Expression(expression) => {
            assert_eq!(expression.value, "\"a\"");
            assert!(expression.is_string_literal);
        }
        _ => panic!("Expected Expression event"),
    }
    match &events[2] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "div");
            assert_eq!(tag.attributes.len(), 1);
            assert_eq!(tag.attributes[0].name, "class");
            assert_eq!(tag.attributes[0].value.as_deref(), Some("\"a\""));
            assert!(tag.attributes[0].is_string_literal);
            assert!(!tag.concise);
            assert_eq!((tag.pos, tag.end_pos), (0, 15));
        }
        _ => panic!("Expected OpenTag event"),
    }
    match &events[3] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "img");
            assert!(tag.open_tag_only);
            assert_eq!(tag.end_pos, 20);
        }
        _ => panic!("Expected OpenTag event"),
    }
    match &events[4] {
        Event::CloseTag(close) => {
            assert_eq!(close.tag_name, "img");
            assert_eq!((close.pos, close.end_pos), (20, 20));
        }
        _ => panic!("Expected CloseTag event"),
    }
    assert!(matches!(events[5], Event::OpenTag(ref tag) if tag.tag_name == "span"));
    match &events[6] {
        Event::Placeholder(placeholder) => {
            assert_eq!(placeholder.value, "x");
            assert!(placeholder.escape);
            assert!(placeholder.within_body);
            assert!(!placeholder.within_open_tag);
            assert_eq!((placeholder.pos, placeholder.end_pos), (26, 30));
        }
        _ => panic!("Expected Placeholder event"),
    }
    match &events[7] {
        Event::CloseTag(close) => {
            assert_eq!(close.tag_name, "span");
            assert_eq!((close.pos, close.end_pos), (30, 37));
        }
        _ => panic!("Expected CloseTag event"),
    }
    match &events[8] {
        Event::CloseTag(close) => {
            assert_eq!(close.tag_name, "div");
            assert_eq!((close.pos, close.end_pos), (37, 43));
        }
        _ => panic!("Expected CloseTag event"),
    }
    assert!(matches!(events[9], Event::Finish));
}

#[test]
fn test_text_around_tags() {
    let events = scan("Hello <b>world</b>!");
    let texts: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some((text.value.as_str(), text.pos, text.end_pos)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![("Hello ", 0, 6), ("world", 9, 14), ("!", 18, 19)]);
}

#[test]
fn test_text_positions_cover_source() {
    let source = "<p>one ${two} three</p>\n<ul>\n  <li>four</li>\n</ul>\n";
    for event in scan(source) {
        if let Event::Text(text) = event {
            assert_eq!(&source[text.pos..text.end_pos], text.value);
        }
    }
}

#[test]
fn test_self_closed_tag() {
    let events = scan("<foo/>");
    assert_eq!(events.len(), 3);
    match &events[0] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "foo");
            assert!(tag.self_closed);
            assert_eq!(tag.end_pos, 6);
        }
        _ => panic!("Expected OpenTag event"),
    }
    match &events[1] {
        Event::CloseTag(close) => assert_eq!((close.pos, close.end_pos), (6, 6)),
        _ => panic!("Expected CloseTag event"),
    }
}

#[test]
fn test_lone_less_than_is_text() {
    let events = scan("a < b");
    assert!(matches!(events[0], Event::Text(ref text) if text.value == "a < b"));
    assert!(matches!(events[1], Event::Finish));
}

#[test]
fn test_crlf_is_text() {
    let events = scan("<a>\r\n</a>");
    match &events[1] {
        Event::Text(text) => {
            assert_eq!(text.value, "\r\n");
            assert_eq!((text.pos, text.end_pos), (3, 5));
        }
        _ => panic!("Expected Text event"),
    }
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let events = scan("\u{FEFF}<a></a>");
    match &events[0] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "a");
            assert_eq!(tag.pos, 3);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_chunks_are_concatenated() {
    let chunked = Scanner::new(EventCollector::new(), ScanOptions::html())
        .scan(["<a>he", "llo</", "a>"])
        .into_events();
    assert_eq!(chunked, scan("<a>hello</a>"));
}

#[test]
fn test_markup_declarations() {
    let events = scan(r#"<!DOCTYPE html><?xml version="1.0"?><!--hi--><![CDATA[<x>]]>"#);
    assert_eq!(events.len(), 5);
    match &events[0] {
        Event::DocumentType(literal) => {
            assert_eq!(literal.value, "DOCTYPE html");
            assert_eq!((literal.pos, literal.end_pos), (0, 15));
        }
        _ => panic!("Expected DocumentType event"),
    }
    match &events[1] {
        Event::Declaration(literal) => {
            assert_eq!(literal.value, r#"xml version="1.0""#);
            assert_eq!((literal.pos, literal.end_pos), (15, 36));
        }
        _ => panic!("Expected Declaration event"),
    }
    match &events[2] {
        Event::Comment(comment) => {
            assert_eq!(comment.value, "hi");
            assert_eq!(comment.kind, CommentKind::Html);
            assert_eq!((comment.pos, comment.end_pos), (36, 45));
        }
        _ => panic!("Expected Comment event"),
    }
    match &events[3] {
        Event::Cdata(literal) => {
            assert_eq!(literal.value, "<x>");
            assert_eq!((literal.pos, literal.end_pos), (45, 60));
        }
        _ => panic!("Expected Cdata event"),
    }
}

#[test]
fn test_scriptlet_ignores_end_marker_in_string() {
    let events = scan(r#"<% var x = "%>"; %>"#);
    match &events[0] {
        Event::Scriptlet(scriptlet) => {
            assert_eq!(scriptlet.value, r#" var x = "%>"; "#);
            assert_eq!(scriptlet.kind, ScriptletKind::Tag);
            assert_eq!((scriptlet.pos, scriptlet.end_pos), (0, 19));
        }
        _ => panic!("Expected Scriptlet event"),
    }
}

#[test]
fn test_inline_script_at_line_start() {
    let events = scan("$ x++;\n<a></a>");
    match &events[0] {
        Event::Scriptlet(scriptlet) => {
            assert_eq!(scriptlet.value, "x++;");
            assert_eq!(scriptlet.kind, ScriptletKind::Line);
        }
        _ => panic!("Expected Scriptlet event"),
    }
    assert!(matches!(events[1], Event::Text(ref text) if text.value == "\n"));
}

#[test]
fn test_escaped_placeholder() {
    let events = scan(r"\${x}");
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Text(text) => {
            assert_eq!(text.value, "${x}");
            assert_eq!((text.pos, text.end_pos), (0, 5));
        }
        _ => panic!("Expected Text event"),
    }
}

#[test]
fn test_unescaped_placeholder() {
    let events = scan("$!{html}");
    match &events[0] {
        Event::Placeholder(placeholder) => {
            assert_eq!(placeholder.value, "html");
            assert!(!placeholder.escape);
            assert_eq!((placeholder.pos, placeholder.end_pos), (0, 8));
        }
        _ => panic!("Expected Placeholder event"),
    }
}

#[test]
fn test_placeholder_with_braces_and_strings() {
    let events = scan(r#"${ {a:1}.a }${"}"}"#);
    assert!(matches!(events[0], Event::Placeholder(ref p) if p.value == " {a:1}.a "));
    assert!(matches!(events[1], Event::String(ref s) if s.value == "\"}\""));
    assert!(matches!(events[2], Event::Placeholder(ref p) if p.value == "\"}\""));
}

#[test]
fn test_script_body_is_parsed_text() {
    let events = scan("<script>if (a < b) {}</script>");
    assert_eq!(events.len(), 4);
    match &events[1] {
        Event::Text(text) => {
            assert_eq!(text.value, "if (a < b) {}");
            assert_eq!(text.mode, TextMode::ParsedText);
            assert_eq!((text.pos, text.end_pos), (8, 21));
        }
        _ => panic!("Expected Text event"),
    }
    match &events[2] {
        Event::CloseTag(close) => {
            assert_eq!(close.tag_name, "script");
            assert_eq!((close.pos, close.end_pos), (21, 30));
        }
        _ => panic!("Expected CloseTag event"),
    }
}

#[test]
fn test_listener_selects_static_text() {
    let collector = EventCollector::new().with_body_mode("textarea", BodyMode::StaticText);
    let events = Scanner::new(collector, ScanOptions::html())
        .scan(["<textarea><b>${x}</b></textarea>"])
        .into_events();
    assert_eq!(events.len(), 4);
    match &events[1] {
        Event::Text(text) => {
            assert_eq!(text.value, "<b>${x}</b>");
            assert_eq!(text.mode, TextMode::StaticText);
        }
        _ => panic!("Expected Text event"),
    }
    assert!(matches!(events[2], Event::CloseTag(ref close) if close.tag_name == "textarea"));
}

#[test]
fn test_tag_parse_options_ignore_attributes() {
    let options = ScanOptions::html().with_tag_parse_options(
        "x",
        TagParseOptions {
            ignore_attributes: true,
            ..TagParseOptions::default()
        },
    );
    let events = marlin_parser::scan("<x a=1></x>", options);
    match &events[1] {
        Event::OpenTag(tag) => assert!(tag.attributes.is_empty()),
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_open_tag_only_predicate() {
    let options = ScanOptions::html().with_open_tag_only(|name| (name == "foo").then_some(true));
    let events = marlin_parser::scan("<foo><img>", options);
    assert!(matches!(events[0], Event::OpenTag(ref tag) if tag.open_tag_only));
    assert!(matches!(events[1], Event::CloseTag(ref close) if close.tag_name == "foo"));
    assert!(matches!(events[3], Event::CloseTag(ref close) if close.tag_name == "img"));
    assert!(errors(&events).is_empty());
}

#[test]
fn test_attribute_argument_and_spread() {
    let events = scan("<button on-click(handle) ${attrs}></button>");
    let tag = events
        .iter()
        .find_map(|event| match event {
            Event::OpenTag(tag) => Some(tag),
            _ => None,
        })
        .unwrap();
    assert_eq!(tag.attributes.len(), 2);
    assert_eq!(tag.attributes[0].name, "on-click");
    assert_eq!(tag.attributes[0].argument.as_ref().unwrap().value, "handle");
    assert!(tag.attributes[1].spread);
    assert_eq!(tag.attributes[1].value.as_deref(), Some("attrs"));

    let spread = events
        .iter()
        .find_map(|event| match event {
            Event::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        })
        .unwrap();
    assert!(spread.within_open_tag);
    assert!(!spread.within_body);
}

#[test]
fn test_tag_argument() {
    let events = scan("<if(x > 1)>hi</if>");
    match &events[0] {
        Event::Expression(expression) => {
            assert_eq!(expression.value, "x > 1");
            assert_eq!((expression.pos, expression.end_pos), (4, 9));
        }
        _ => panic!("Expected Expression event"),
    }
    match &events[1] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name, "if");
            assert_eq!(tag.argument.as_ref().unwrap().value, "x > 1");
            assert_eq!(tag.end_pos, 11);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_dynamic_tag_name() {
    let events = scan("<${tag}>hi</>");
    match &events[0] {
        Event::Placeholder(placeholder) => {
            assert_eq!(placeholder.value, "tag");
            assert!(placeholder.within_tag_name);
        }
        _ => panic!("Expected Placeholder event"),
    }
    match &events[1] {
        Event::OpenTag(tag) => {
            assert_eq!(tag.tag_name_expression.as_deref(), Some("(tag)"));
            assert_eq!(tag.expected_close_tag_name, "${tag}");
        }
        _ => panic!("Expected OpenTag event"),
    }
    assert!(matches!(events[3], Event::CloseTag(ref close) if close.tag_name == "${tag}"));
    assert!(errors(&events).is_empty());
}

#[test]
fn test_mismatched_closing_tag() {
    let events = scan("<a></b>");
    assert_eq!(events.len(), 3);
    match &events[1] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::MismatchedClosingTag);
            assert_eq!(diagnostic.pos, 3);
            assert_eq!(
                diagnostic.message,
                "The closing \"b\" tag does not match the corresponding opening \"a\" tag"
            );
        }
        _ => panic!("Expected Error event"),
    }
    assert!(matches!(events[2], Event::Finish));
}

#[test]
fn test_only_first_error_is_reported() {
    let events = scan("<a></b></c></d>");
    assert_eq!(errors(&events), vec![ErrorCode::MismatchedClosingTag]);
    assert!(matches!(events.last(), Some(Event::Finish)));
}

#[test]
fn test_extra_closing_tag() {
    let events = scan("</a>");
    match &events[0] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::ExtraClosingTag);
            assert_eq!(diagnostic.pos, 0);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_missing_end_tag() {
    let events = scan("<a>text");
    assert_eq!(events.len(), 4);
    assert!(matches!(events[1], Event::Text(ref text) if text.value == "text"));
    match &events[2] {
        Event::Error(diagnostic) => {
            assert_eq!(diagnostic.code, ErrorCode::MissingEndTag);
            assert_eq!(diagnostic.message, "Missing ending \"a\" tag");
            assert_eq!(diagnostic.pos, 0);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_eof_in_open_tag() {
    let events = scan(r#"<a href="x""#);
    assert_eq!(errors(&events), vec![ErrorCode::MalformedOpenTag]);
}

#[test]
fn test_eof_in_constructs() {
    assert_eq!(errors(&scan("<!-- x")), vec![ErrorCode::MalformedComment]);
    assert_eq!(errors(&scan("<![CDATA[ x")), vec![ErrorCode::MalformedCdata]);
    assert_eq!(errors(&scan("<% x")), vec![ErrorCode::MalformedScriptlet]);
    assert_eq!(errors(&scan("${x")), vec![ErrorCode::MalformedPlaceholder]);
    assert_eq!(errors(&scan("<!DOCTYPE")), vec![ErrorCode::MalformedDocumentType]);
    assert_eq!(errors(&scan("<?xml")), vec![ErrorCode::MalformedDeclaration]);
    assert_eq!(errors(&scan("<a></a")), vec![ErrorCode::MalformedCloseTag]);
}

#[test]
fn test_commas_must_separate_all_attributes() {
    let events = scan("<a x=1, y=2 z=3>");
    match events.iter().find(|event| matches!(event, Event::Error(_))) {
        Some(Event::Error(diagnostic)) => {
            assert_eq!(diagnostic.code, ErrorCode::CommasRequired);
            assert_eq!(diagnostic.pos, 8);
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_commas_between_every_attribute() {
    let events = scan("<a x=1, y=2, z=3></a>");
    assert!(errors(&events).is_empty());
    match &events[3] {
        Event::OpenTag(tag) => {
            let values: Vec<_> = tag
                .attributes
                .iter()
                .map(|attribute| attribute.value.as_deref().unwrap())
                .collect();
            assert_eq!(values, vec!["1", "2", "3"]);
        }
        _ => panic!("Expected OpenTag event"),
    }
}

#[test]
fn test_invalid_attribute_name() {
    let events = scan("<a <b>");
    assert_eq!(errors(&events), vec![ErrorCode::InvalidAttributeName]);
}

#[test]
fn test_second_tag_argument() {
    let events = scan("<if(a)(b)>");
    assert_eq!(errors(&events), vec![ErrorCode::IllegalTagArgument]);
}
