//! Client-side markdown for dataset and task descriptions.

use crate::state::UiSession;
use pulldown_cmark::{html::push_html, Event, Options, Parser};
use web_sys::Element;

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Render `text` to HTML. Raw HTML in the source comes out as text.
pub(crate) fn render(text: &str) -> String {
    let events = Parser::new_ext(text, options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html = String::new();
    push_html(&mut html, events);
    html
}

pub(crate) fn mount_markdown(_session: &UiSession, el: &Element) {
    let source = el.text_content().unwrap_or_default();
    el.set_inner_html(&render(source.trim()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rendering() {
        let html = render("# Task\n\nPick **one** label.");
        assert!(html.contains("<h1>Task</h1>"));
        assert!(html.contains("<strong>one</strong>"));
    }

    #[test]
    fn test_extensions_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
