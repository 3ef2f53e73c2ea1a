use livemark_engine::{
    DecorationKind, EditorMode, EngineOptions, Selection, Span, WidgetSpec, compute_decorations,
    styles,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

fn render(text: &str, sel: Selection) -> livemark_engine::DecorationSet {
    compute_decorations(
        &Rope::from(text),
        &sel,
        EditorMode::Render,
        &EngineOptions::default(),
    )
}

fn edit(text: &str, sel: Selection) -> livemark_engine::DecorationSet {
    compute_decorations(
        &Rope::from(text),
        &sel,
        EditorMode::Edit,
        &EngineOptions::default(),
    )
}

fn classes(set: &livemark_engine::DecorationSet, class: &str) -> Vec<Span> {
    set.iter()
        .filter(|d| d.class() == Some(class))
        .map(|d| d.span)
        .collect()
}

#[rstest]
#[case::bold("**bold**", 2)]
#[case::italic("*italic*", 2)]
#[case::strikethrough("~~gone~~", 2)]
#[case::highlight("==note==", 2)]
#[case::inline_code("`code`", 2)]
#[case::heading("# title", 1)]
fn markers_dim_without_cursor_and_activate_with_one(#[case] text: &str, #[case] markers: usize) {
    let far = edit(text, Selection::default());
    assert_eq!(classes(&far, styles::MARKER_DIM).len(), markers);
    assert!(classes(&far, styles::MARKER_ACTIVE).is_empty());

    let near = edit(text, Selection::caret(1));
    assert_eq!(classes(&near, styles::MARKER_ACTIVE).len(), markers);
    assert!(classes(&near, styles::MARKER_DIM).is_empty());
}

#[test]
fn identical_inputs_yield_identical_sets() {
    let text = "# Title\n\n**bold** and *italic*\n\n- item\n> quote\n\n```js\nlet x = 1;\n```\n\n<div><b>hi</b></div>\n";
    let a = render(text, Selection::caret(9));
    let b = render(text, Selection::caret(9));
    assert_eq!(a, b);
}

#[test]
fn decorating_never_mutates_the_text() {
    let text = "# Title\n**bold** <div>x</div>\n```\ncode\n```\n";
    let rope = Rope::from(text);
    let _ = compute_decorations(
        &rope,
        &Selection::caret(3),
        EditorMode::Render,
        &EngineOptions::default(),
    );
    assert_eq!(String::from(&rope), text);
}

#[test]
fn every_span_slices_back_into_the_source() {
    let text = "## head\n- one\n- two\n**b** `c`\n<div><span>x</span></div>\n";
    let set = render(text, Selection::caret(0));
    for d in set.iter() {
        assert!(d.span.start <= d.span.end);
        assert!(d.span.end <= text.len());
        assert!(text.get(d.span.start..d.span.end).is_some());
    }
}

#[test]
fn output_is_position_ordered() {
    let text = "# a\n**b** *c* ==d== ~~e~~\n- f\n> g\n<i>h</i>\n";
    let set = render(text, Selection::caret(0));
    let starts: Vec<usize> = set.iter().map(|d| d.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert!(set.iter().all(|d| !d.span.is_empty()));
}

#[test]
fn escaped_markers_are_never_live_syntax() {
    let set = edit(r"\*\*not bold\*\*", Selection::default());
    assert!(classes(&set, styles::STRONG).is_empty());
}

#[test]
fn rendered_fence_is_one_replace_with_lines_and_language() {
    let set = render("```js\nlet x = 1;\n```", Selection::default());
    let replaces: Vec<_> = set.iter().filter(|d| d.is_replace()).collect();
    assert_eq!(replaces.len(), 1);
    assert_eq!(replaces[0].span, Span::new(0, 20));
    match &replaces[0].kind {
        DecorationKind::Replace(WidgetSpec::CodeBlock {
            lines,
            language,
            raw,
        }) => {
            assert_eq!(lines, &vec!["let x = 1;".to_string()]);
            assert_eq!(language.as_deref(), Some("js"));
            assert_eq!(raw, "```js\nlet x = 1;\n```");
        }
        other => panic!("expected code block widget, got {other:?}"),
    }
}

#[test]
fn proximity_is_local_per_construct() {
    let text = "**bold** and *italic*";
    let set = edit(text, Selection::caret(0));
    // bold markers active
    assert_eq!(
        classes(&set, styles::MARKER_ACTIVE),
        vec![Span::new(0, 2), Span::new(6, 8)]
    );
    // italic markers dim
    assert_eq!(
        classes(&set, styles::MARKER_DIM),
        vec![Span::new(13, 14), Span::new(20, 21)]
    );
}

#[test]
fn unbalanced_markup_renders_as_plain_text() {
    let set = render("<div><span></div>", Selection::default());
    assert!(set.is_empty());
}

#[test]
fn nested_regions_share_edit_mode() {
    let text = "<div>a<span>x</span>b</div>";
    // cursor at the very start touches only the outer region directly
    let set = render(text, Selection::caret(0));
    assert!(set.iter().all(|d| !d.is_replace()));
    assert_eq!(classes(&set, styles::HTML_RAW).len(), 2);
}

#[test]
fn far_cursor_renders_region_as_one_widget() {
    let text = "text\n\n<div><span>x</span></div>";
    let set = render(text, Selection::caret(0));
    let replaces: Vec<_> = set.iter().filter(|d| d.is_replace()).collect();
    assert_eq!(replaces.len(), 1);
    match &replaces[0].kind {
        DecorationKind::Replace(WidgetSpec::RawMarkupPreview { html, block }) => {
            assert_eq!(html, "<div><span>x</span></div>");
            assert!(!block);
        }
        other => panic!("expected raw markup preview, got {other:?}"),
    }
}

#[test]
fn list_bullets_follow_the_cursor_line() {
    let text = "- item one\n- item two";
    let far = edit(text, Selection::default());
    let widgets: Vec<Span> = far
        .iter()
        .filter(|d| d.is_replace())
        .map(|d| d.span)
        .collect();
    assert_eq!(widgets, vec![Span::new(0, 1), Span::new(11, 12)]);

    let near = edit(text, Selection::caret(2));
    assert_eq!(
        classes(&near, styles::MARKER_ACTIVE),
        vec![Span::new(0, 1)]
    );
    let widgets: Vec<Span> = near
        .iter()
        .filter(|d| d.is_replace())
        .map(|d| d.span)
        .collect();
    assert_eq!(widgets, vec![Span::new(11, 12)]);
}

#[test]
fn blockquote_rendering_differs_by_mode() {
    let text = "> quoted";
    let rendered = render(text, Selection::default());
    let bars: Vec<_> = rendered.iter().filter(|d| d.is_replace()).collect();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].span, Span::new(0, 2));

    let editing = edit(text, Selection::caret(4));
    assert!(editing.iter().all(|d| !d.is_replace()));
    assert_eq!(classes(&editing, styles::MARKER_ACTIVE), vec![Span::new(0, 2)]);
}

#[test]
fn disabled_html_option_leaves_regions_undecorated() {
    let options = EngineOptions {
        highlight_html: false,
        ..EngineOptions::default()
    };
    let set = compute_decorations(
        &Rope::from("<div>x</div>"),
        &Selection::default(),
        EditorMode::Render,
        &options,
    );
    assert!(set.is_empty());
}

#[test]
fn code_language_table_resolves_widget_language() {
    let mut options = EngineOptions::default();
    options
        .code_languages
        .insert("js".to_string(), "javascript".to_string());
    let set = compute_decorations(
        &Rope::from("```js\nx\n```"),
        &Selection::default(),
        EditorMode::Render,
        &options,
    );
    match &set.items()[0].kind {
        DecorationKind::Replace(WidgetSpec::CodeBlock { language, .. }) => {
            assert_eq!(language.as_deref(), Some("javascript"));
        }
        other => panic!("expected code block widget, got {other:?}"),
    }
}
