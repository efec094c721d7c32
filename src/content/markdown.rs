//! Minimal Markdown dialect rendering
//!
//! Converts the constrained Markdown subset used by post bodies into HTML.
//! Input is HTML-escaped before any syntax is interpreted, so literal angle
//! brackets in source text never reach the output as tags; the only tags in
//! the result are the ones the dialect itself introduces.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref RE_CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    // Longer header prefixes must run first so `###` is not swallowed by `#`
    static ref RE_H3: Regex = Regex::new(r"(?m)^###\s?(.*)$").unwrap();
    static ref RE_H2: Regex = Regex::new(r"(?m)^##\s?(.*)$").unwrap();
    static ref RE_H1: Regex = Regex::new(r"(?m)^#\s?(.*)$").unwrap();
    static ref RE_BOLD: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
    static ref RE_ITALIC: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
    static ref RE_LINK: Regex = Regex::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)").unwrap();
    static ref RE_LIST_ITEM: Regex = Regex::new(r"(?m)^-(.*)$").unwrap();
    static ref RE_LIST_RUN: Regex = Regex::new(r"<li>.*</li>(?:\n<li>.*</li>)*").unwrap();
    static ref RE_BLANK_LINES: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref RE_BLOCK_TAG: Regex = Regex::new(r"^\s*<(h1|h2|h3|ul|li|img|p|blockquote)").unwrap();
}

/// Escape HTML metacharacters; `&` first so entities are not double-escaped
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert the Markdown dialect to HTML.
///
/// Rules apply in a fixed order, each on the output of the previous: inline
/// code, headers (most-specific prefix first), bold, italic, http(s) links,
/// list items with consecutive runs wrapped in a single `<ul>`, then
/// paragraph wrapping on blank-line boundaries. Malformed syntax is never an
/// error; unmatched markers simply pass through as literal text.
pub fn md_to_html(md: &str) -> String {
    let mut t = escape_html(md);

    t = RE_CODE.replace_all(&t, "<code>${1}</code>").into_owned();
    t = RE_H3.replace_all(&t, "<h3>${1}</h3>").into_owned();
    t = RE_H2.replace_all(&t, "<h2>${1}</h2>").into_owned();
    t = RE_H1.replace_all(&t, "<h1>${1}</h1>").into_owned();
    t = RE_BOLD.replace_all(&t, "<strong>${1}</strong>").into_owned();
    t = RE_ITALIC.replace_all(&t, "<em>${1}</em>").into_owned();
    t = RE_LINK
        .replace_all(
            &t,
            r#"<a href="${2}" target="_blank" rel="noopener">${1}</a>"#,
        )
        .into_owned();
    t = RE_LIST_ITEM
        .replace_all(&t, |caps: &Captures| {
            format!("<li>{}</li>", caps[1].trim())
        })
        .into_owned();
    t = RE_LIST_RUN
        .replace_all(&t, |caps: &Captures| format!("<ul>{}</ul>", &caps[0]))
        .into_owned();

    // Paragraph wrapping: blocks are separated by blank lines; a block that
    // already starts with a block-level tag passes through unwrapped
    RE_BLANK_LINES
        .split(&t)
        .map(|block| {
            if RE_BLOCK_TAG.is_match(block) {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping_precedes_syntax() {
        let html = md_to_html("<script>alert(1)</script>");
        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));

        let html = md_to_html("<img onerror=alert(1) src=x>");
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_ampersand_escaped_first() {
        let html = md_to_html("kicks & punches");
        assert!(html.contains("kicks &amp; punches"));
    }

    #[test]
    fn test_header_precedence() {
        assert_eq!(md_to_html("### Title"), "<h3>Title</h3>");
        assert_eq!(md_to_html("## Title"), "<h2>Title</h2>");
        assert_eq!(md_to_html("# Title"), "<h1>Title</h1>");
    }

    #[test]
    fn test_header_space_optional() {
        assert_eq!(md_to_html("##Tight"), "<h2>Tight</h2>");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            md_to_html("**bold** and *italic*"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn test_unmatched_bold_passes_through() {
        let html = md_to_html("**bold with no close");
        assert!(html.contains("**bold with no close"));
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(md_to_html("run `kata` now"), "<p>run <code>kata</code> now</p>");
    }

    #[test]
    fn test_links_http_only() {
        let html = md_to_html("[dojo](https://example.com/dojo)");
        assert!(html.contains(
            r#"<a href="https://example.com/dojo" target="_blank" rel="noopener">dojo</a>"#
        ));

        // Non-http schemes and relative paths are not linkified
        assert!(!md_to_html("[x](ftp://example.com)").contains("<a "));
        assert!(!md_to_html("[x](/about)").contains("<a "));
    }

    #[test]
    fn test_list_run_wrapped_once() {
        let html = md_to_html("- first\n- second\n- third");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
        assert!(html.contains("<li>first</li>"));
    }

    #[test]
    fn test_separate_lists_wrapped_separately() {
        let html = md_to_html("- one\n\n- two");
        assert_eq!(html.matches("<ul>").count(), 2);
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        assert_eq!(
            md_to_html("one\ntwo\n\nthree"),
            "<p>one<br>two</p>\n<p>three</p>"
        );
    }

    #[test]
    fn test_block_tags_not_rewrapped() {
        let html = md_to_html("# Head\n\nbody text");
        assert_eq!(html, "<h1>Head</h1>\n<p>body text</p>");
    }

    #[test]
    fn test_deterministic() {
        let input = "## Schedule\n\n- Mon\n- Tue\n\nSee **you** there";
        assert_eq!(md_to_html(input), md_to_html(input));
    }
}
