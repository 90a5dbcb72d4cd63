//! Splitting stored text into front matter and body, and joining it back.

use crate::FrontMatter;

const OPEN: &str = "---";
const CLOSE: [&str; 2] = ["---", "..."];
const BOM: char = '\u{feff}';

/// Split a leading front matter block off `text`.
///
/// The block opens with a `---` line on the very first line and closes with the
/// next `---` or `...` line. Text without an opening line, or with an opening
/// line that is never closed, has no front matter and is returned unchanged as
/// the body.
///
/// The returned body starts right after the closing line.
pub fn split_front_matter(text: &str) -> (Option<FrontMatter>, &str) {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text);
    };
    if first.trim_end() != OPEN {
        return (None, text);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if CLOSE.contains(&line.trim_end()) {
            let raw = &text[block_start..offset];
            let raw = raw
                .strip_suffix("\r\n")
                .or_else(|| raw.strip_suffix('\n'))
                .unwrap_or(raw);
            let body = &text[offset + line.len()..];
            return (Some(FrontMatter::new(raw)), body);
        }
        offset += line.len();
    }

    (None, text)
}

/// Join an optional front matter block and a body into stored text.
///
/// The front matter is written verbatim between `---` lines, followed by a
/// blank line. Leading blank lines of the body are dropped and trailing
/// whitespace is normalized to a single newline.
pub fn join_front_matter(front_matter: Option<&FrontMatter>, body: &str) -> String {
    let body = body.trim_start_matches(['\n', '\r']).trim_end();
    let mut out = String::with_capacity(body.len() + 64);

    if let Some(front_matter) = front_matter {
        out.push_str(OPEN);
        out.push('\n');
        if !front_matter.raw().is_empty() {
            out.push_str(front_matter.raw());
            out.push('\n');
        }
        out.push_str(OPEN);
        out.push('\n');
        if !body.is_empty() {
            out.push('\n');
        }
    }

    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_without_front_matter() {
        let (fm, body) = split_front_matter("# Root\n\ntext\n");

        assert!(fm.is_none());
        assert_eq!(body, "# Root\n\ntext\n");
    }

    #[test]
    fn test_split_with_front_matter() {
        let (fm, body) = split_front_matter("---\ntitle: Notes\ntags: [a, b]\n---\n\n# Root\n");

        assert_eq!(fm.unwrap().raw(), "title: Notes\ntags: [a, b]");
        assert_eq!(body, "\n# Root\n");
    }

    #[test]
    fn test_split_dots_close_block() {
        let (fm, body) = split_front_matter("---\ntitle: Notes\n...\n# Root\n");

        assert_eq!(fm.unwrap().raw(), "title: Notes");
        assert_eq!(body, "# Root\n");
    }

    #[test]
    fn test_split_empty_block() {
        let (fm, body) = split_front_matter("---\n---\n# Root\n");

        assert_eq!(fm.unwrap().raw(), "");
        assert_eq!(body, "# Root\n");
    }

    #[test]
    fn test_split_unclosed_block_is_body() {
        let text = "---\ntitle: Notes\n# Root\n";
        let (fm, body) = split_front_matter(text);

        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_rule_not_on_first_line_is_body() {
        let text = "# Root\n\n---\n\nmore\n---\n";
        let (fm, body) = split_front_matter(text);

        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_strips_bom() {
        let (fm, body) = split_front_matter("\u{feff}---\na: 1\n---\nbody");

        assert_eq!(fm.unwrap().raw(), "a: 1");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_crlf() {
        let (fm, body) = split_front_matter("---\r\na: 1\r\n---\r\nbody");

        assert_eq!(fm.unwrap().raw(), "a: 1");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_join_without_front_matter() {
        assert_eq!(join_front_matter(None, "# Root\n\n\n"), "# Root\n");
    }

    #[test]
    fn test_join_with_front_matter() {
        let fm = FrontMatter::new("title: Notes");

        assert_eq!(
            join_front_matter(Some(&fm), "# Root\n\ntext\n\n"),
            "---\ntitle: Notes\n---\n\n# Root\n\ntext\n"
        );
    }

    #[test]
    fn test_join_empty_front_matter_and_body() {
        let fm = FrontMatter::new("");

        assert_eq!(join_front_matter(Some(&fm), ""), "---\n---\n");
    }

    #[test]
    fn test_front_matter_is_preserved_verbatim() {
        let raw = "title:   \"Spaced\"   # comment kept\nlist:\n  - b\n  - a";
        let text = format!("---\n{raw}\n---\n\n# Root\n");

        let (fm, body) = split_front_matter(&text);
        let joined = join_front_matter(fm.as_ref(), body);

        assert_eq!(joined, text);
    }
}
