//! Article bodies: markup, reading time and social embeds.

use crate::html::strip_tags;
use pulldown_cmark::{Event, Options, Parser, html};
use regex::Regex;
use std::sync::LazyLock;

const WORDS_PER_MINUTE: usize = 200;

static POST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:p|reel)/([A-Za-z0-9_-]+)").unwrap());

/// Bodies that already look like HTML are passed through; anything else is
/// treated as markdown, with single newlines kept as line breaks.
pub fn render_body(body: &str) -> String {
    if body.trim_start().starts_with('<') {
        return body.to_string();
    }

    let parser = Parser::new_ext(body, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

pub fn word_count(body: &str) -> usize {
    strip_tags(body).split_whitespace().count()
}

/// Whole minutes at 200 words per minute, rounded up. `None` for an empty body.
pub fn reading_minutes(body: &str) -> Option<usize> {
    match word_count(body) {
        0 => None,
        words => Some(words.div_ceil(WORDS_PER_MINUTE)),
    }
}

pub fn reading_time_label(body: &str) -> Option<String> {
    reading_minutes(body).map(|minutes| format!("{} min lectura", minutes))
}

/// Post id from an Instagram-style `/p/<id>` or `/reel/<id>` link.
pub fn social_post_id(url: &str) -> Option<&str> {
    POST_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_body_passes_through() {
        let body = "<p>Ya es <strong>HTML</strong></p>";
        assert_eq!(render_body(body), body);
        assert_eq!(render_body("  <div>x</div>"), "  <div>x</div>");
    }

    #[test]
    fn test_markdown_body() {
        let html = render_body("Hola **mundo** y *todos*\n\nSegundo párrafo");
        assert!(html.contains("<p>Hola <strong>mundo</strong> y <em>todos</em></p>"));
        assert!(html.contains("<p>Segundo párrafo</p>"));
    }

    #[test]
    fn test_markdown_single_newline_is_line_break() {
        let html = render_body("línea uno\nlínea dos");
        assert!(html.contains("línea uno<br />"));
    }

    #[test]
    fn test_reading_time_400_words() {
        let body = vec!["palabra"; 400].join(" ");
        assert_eq!(reading_time_label(&body).as_deref(), Some("2 min lectura"));
    }

    #[test]
    fn test_reading_time_rounds_up_and_ignores_tags() {
        let body = format!("<p>{}</p>", vec!["palabra"; 201].join(" "));
        assert_eq!(reading_minutes(&body), Some(2));
        assert_eq!(reading_minutes("<p>uno</p>"), Some(1));
        assert_eq!(reading_minutes("<br/>  "), None);
    }

    #[test]
    fn test_social_post_id() {
        assert_eq!(
            social_post_id("https://www.instagram.com/p/C1a2B3c_-9/"),
            Some("C1a2B3c_-9")
        );
        assert_eq!(
            social_post_id("https://www.instagram.com/reel/XyZ123/?igsh=abc"),
            Some("XyZ123")
        );
        assert_eq!(social_post_id("https://www.instagram.com/ceciliagortari/"), None);
    }
}
