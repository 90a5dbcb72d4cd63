//! Heading-structured text to section tree, and back.

use crate::error::DocumentError;
use crate::heading::{close_open_fence, normalize_name, title_case, FenceState, Heading};
use crate::tree::{Tree, TreeBuilder};

/// Root name used when neither the text nor the document name provides one.
const FALLBACK_ROOT: &str = "Document";

/// Name of the root synthesized for a body without headings.
pub(crate) fn synthesized_root_name(doc_name: &str) -> String {
    let name = normalize_name(&title_case(doc_name));
    if name.is_empty() {
        FALLBACK_ROOT.to_owned()
    } else {
        name
    }
}

/// Drop leading blank lines and trailing whitespace.
///
/// Indentation of the first non-blank line is kept, so indented code survives.
pub(crate) fn trim_blank_lines(text: &str) -> &str {
    let text = text.trim_end();
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    &text[start..]
}

/// Content of a section as it will be stored.
pub(crate) fn finish_content(raw: &str) -> String {
    close_open_fence(trim_blank_lines(raw).to_owned())
}

/// Parse a body (front matter already removed) into a section tree.
///
/// Sections whose names exist in `reuse` keep their handle and metadata.
/// Text before the first heading is kept as the start of the root's content.
/// A body without any heading gets a root named after `doc_name`.
///
/// # Errors
///
/// - [`DocumentError::MultipleRoots`] on a second level-1 heading.
/// - [`DocumentError::InvalidNesting`] when a heading is more than one level
///   deeper than the previous one, or a deeper heading precedes the root.
/// - [`DocumentError::NameCollision`] when two headings share a name in any
///   letter case.
pub(crate) fn parse_body(
    text: &str,
    doc_name: &str,
    reuse: Option<&Tree>,
) -> Result<Tree, DocumentError> {
    let mut builder = TreeBuilder::new(reuse);
    let mut fence = FenceState::default();
    let mut current = None;
    let mut preamble = String::new();
    let mut buffer = String::new();

    for (index, line) in text.split_inclusive('\n').enumerate() {
        fence.observe(line);
        let heading = if fence.inside() {
            None
        } else {
            Heading::parse(line)
        };
        let Some(heading) = heading else {
            buffer.push_str(line);
            continue;
        };

        match current {
            Some(id) => builder.set_content(id, finish_content(&buffer)),
            None => preamble = std::mem::take(&mut buffer),
        }
        buffer.clear();

        let parent = match current {
            None if heading.level == 1 => None,
            None => {
                return Err(DocumentError::InvalidNesting {
                    name: heading.name.to_owned(),
                    level: heading.level,
                    line: index + 1,
                });
            }
            Some(_) if heading.level == 1 => {
                let first = builder.root().map_or("", |root| builder.name_of(root));
                return Err(DocumentError::MultipleRoots {
                    first: first.to_owned(),
                    second: heading.name.to_owned(),
                });
            }
            Some(id) => {
                let target = if heading.level > builder.level_of(id) + 1 {
                    None
                } else {
                    builder.ancestor_at(id, heading.level - 1)
                };
                let Some(parent) = target else {
                    return Err(DocumentError::InvalidNesting {
                        name: heading.name.to_owned(),
                        level: heading.level,
                        line: index + 1,
                    });
                };
                Some(parent)
            }
        };

        current = Some(builder.add(heading.name, heading.level, parent)?);
    }

    match current {
        Some(id) => builder.set_content(id, finish_content(&buffer)),
        None => {
            let root = builder.add(&synthesized_root_name(doc_name), 1, None)?;
            builder.set_content(root, finish_content(&buffer));
        }
    }

    let preamble = trim_blank_lines(&preamble);
    if let Some(root) = builder.root()
        && !preamble.is_empty()
    {
        builder.prepend_content(root, preamble);
    }

    builder.build()
}

/// Serialize a tree to heading-structured text.
///
/// Sections are written in pre-order as `#`×level, a space, the name and a
/// blank line, followed by the content and a blank line when non-empty.
pub(crate) fn linearize(tree: &Tree) -> String {
    let mut out = String::new();
    for id in tree.preorder() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        for _ in 0..node.level {
            out.push('#');
        }
        out.push(' ');
        out.push_str(&node.name);
        out.push_str("\n\n");
        if !node.content.is_empty() {
            out.push_str(&node.content);
            out.push_str("\n\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn outline(tree: &Tree) -> Vec<(usize, String, String)> {
        tree.preorder()
            .into_iter()
            .filter_map(|id| tree.node(id))
            .map(|node| (node.level, node.name.clone(), node.content.clone()))
            .collect()
    }

    fn entry(level: usize, name: &str, content: &str) -> (usize, String, String) {
        (level, name.to_owned(), content.to_owned())
    }

    #[test]
    fn test_trim_blank_lines() {
        assert_eq!(trim_blank_lines("\n\n  \n    code\ntext  \n\n"), "    code\ntext");
        assert_eq!(trim_blank_lines(" \n \n"), "");
    }

    #[test]
    fn test_parse_nested() {
        let text = "# Root\n\nintro\n\n## A\n\na text\n\n### A1\n\n## B\n\nb text\n";

        let tree = parse_body(text, "doc", None).unwrap();

        assert_eq!(
            outline(&tree),
            vec![
                entry(1, "Root", "intro"),
                entry(2, "A", "a text"),
                entry(3, "A1", ""),
                entry(2, "B", "b text"),
            ]
        );
    }

    #[test]
    fn test_parse_shallower_heading_walks_up() {
        let text = "# R\n## A\n### A1\n#### A2\n## B\n### B1\n";

        let tree = parse_body(text, "doc", None).unwrap();
        let b1 = tree.get("B1").unwrap();
        let b = tree.get("B").unwrap();

        assert_eq!(tree.node(b1).unwrap().parent, Some(b));
        assert_eq!(tree.node(b).unwrap().parent, Some(tree.root()));
    }

    #[test]
    fn test_parse_level_jump_fails() {
        let err = parse_body("# Root\n\n### Too deep\n", "doc", None).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::InvalidNesting { ref name, level: 3, line: 3 } if name == "Too deep"
        ));
    }

    #[test]
    fn test_parse_subheading_before_root_fails() {
        let err = parse_body("## Orphan\n# Root\n", "doc", None).unwrap_err();

        assert!(matches!(err, DocumentError::InvalidNesting { level: 2, line: 1, .. }));
    }

    #[test]
    fn test_parse_second_root_fails() {
        let err = parse_body("# One\n## Child\n# Two\n", "doc", None).unwrap_err();

        assert!(matches!(
            err,
            DocumentError::MultipleRoots { ref first, ref second } if first == "One" && second == "Two"
        ));
    }

    #[test]
    fn test_parse_duplicate_name_fails() {
        let err = parse_body("# Root\n## Notes\n## notes\n", "doc", None).unwrap_err();

        assert!(matches!(err, DocumentError::NameCollision { .. }));
    }

    #[test]
    fn test_parse_headings_inside_fence_are_content() {
        let text = "# Root\n\n```bash\n# install\n## more\n```\n\n## Next\n";

        let tree = parse_body(text, "doc", None).unwrap();

        assert_eq!(
            outline(&tree),
            vec![
                entry(1, "Root", "```bash\n# install\n## more\n```"),
                entry(2, "Next", ""),
            ]
        );
    }

    #[test]
    fn test_parse_unclosed_fence_is_closed() {
        let tree = parse_body("# Root\n\n```\n# not a heading\n", "doc", None).unwrap();

        assert_eq!(
            outline(&tree),
            vec![entry(1, "Root", "```\n# not a heading\n```")]
        );
    }

    #[test]
    fn test_parse_without_headings_synthesizes_root() {
        let tree = parse_body("\njust some text\n", "weekly notes", None).unwrap();

        assert_eq!(outline(&tree), vec![entry(1, "Weekly Notes", "just some text")]);
    }

    #[test]
    fn test_synthesized_root_name_is_normalized() {
        assert_eq!(synthesized_root_name("C#"), "C");
        assert_eq!(synthesized_root_name("## notes ##"), "Notes");
        assert_eq!(synthesized_root_name(" # "), "Document");

        let tree = parse_body("text", "c#", None).unwrap();
        assert_eq!(outline(&tree), vec![entry(1, "C", "text")]);
        assert_eq!(linearize(&tree), "# C\n\ntext\n\n");
    }

    #[test]
    fn test_parse_empty_text_with_empty_name() {
        let tree = parse_body("", "", None).unwrap();

        assert_eq!(outline(&tree), vec![entry(1, "Document", "")]);
    }

    #[test]
    fn test_parse_preamble_joins_root_content() {
        let tree = parse_body("preface\n\n# Root\n\nbody\n", "doc", None).unwrap();

        assert_eq!(outline(&tree), vec![entry(1, "Root", "preface\n\nbody")]);
    }

    #[test]
    fn test_parse_bare_hash_line_is_content() {
        let tree = parse_body("# Root\n#\ntext\n", "doc", None).unwrap();

        assert_eq!(outline(&tree), vec![entry(1, "Root", "#\ntext")]);
    }

    #[test]
    fn test_parse_crlf() {
        let tree = parse_body("# Root\r\n\r\ntext\r\n## A\r\n", "doc", None).unwrap();

        assert_eq!(
            outline(&tree),
            vec![entry(1, "Root", "text"), entry(2, "A", "")]
        );
    }

    #[test]
    fn test_linearize_format() {
        let tree = parse_body("# Root\nintro\n## A\n## B\nb\n", "doc", None).unwrap();

        assert_eq!(
            linearize(&tree),
            "# Root\n\nintro\n\n## A\n\n## B\n\nb\n\n"
        );
    }

    #[test]
    fn test_round_trip_is_stable() {
        let text = "# Root\n\n  indented first line\n\n## A\n\n```\ncode\n```\n\n### A1\n\nx\n\n## B\n\n";

        let tree = parse_body(text, "doc", None).unwrap();
        let once = linearize(&tree);
        let reparsed = parse_body(&once, "doc", Some(&tree)).unwrap();

        assert_eq!(outline(&reparsed), outline(&tree));
        assert_eq!(linearize(&reparsed), once);
        assert_eq!(reparsed.preorder(), tree.preorder());
    }
}
