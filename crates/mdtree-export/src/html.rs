//! Markdown to standalone HTML page.

use std::fmt::Write;

use mdtree_meta::split_front_matter;
use pulldown_cmark::{html, Options, Parser};

/// Stylesheet used when no custom CSS is configured.
pub const DEFAULT_CSS: &str = include_str!("../assets/export.css");

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render document text to a standalone HTML page.
///
/// The front matter block is not rendered; its `title` field, if present,
/// becomes the page title instead of `fallback_title`. `css` is embedded in a
/// `<style>` element.
#[must_use]
pub fn render_html(text: &str, fallback_title: &str, css: &str) -> String {
    let (front_matter, body) = split_front_matter(text);
    let title = front_matter
        .and_then(|fm| fm.title())
        .unwrap_or_else(|| fallback_title.to_owned());

    let mut content = String::with_capacity(body.len() * 2);
    html::push_html(&mut content, Parser::new_ext(body, parser_options()));

    let mut page = String::with_capacity(content.len() + css.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(page, "<title>{}</title>", escape_html(&title));
    let _ = write!(page, "<style>\n{}\n</style>\n", css.trim_end());
    page.push_str("</head>\n<body>\n");
    page.push_str(&content);
    page.push_str("</body>\n</html>\n");
    page
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
