//! Line-level heading and code fence recognition.
//!
//! Both the parser and the content preparation of new sections go through the
//! functions in this module, so "what counts as a heading" has exactly one
//! definition.

/// Marker that toggles a fenced code block.
const FENCE: &str = "```";

/// A heading line split into its level and normalized name.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    pub level: usize,
    pub name: &'a str,
}

impl<'a> Heading<'a> {
    /// Recognize a heading line.
    ///
    /// The first non-whitespace characters must be one or more `#`. The level is
    /// the number of leading `#`, the name is the remainder trimmed of
    /// whitespace and `#`. A line whose name comes out empty is not a heading.
    ///
    /// Fence state is not considered here; callers track it with [`FenceState`].
    pub fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim_start();
        let level = trimmed.bytes().take_while(|&b| b == b'#').count();
        if level == 0 {
            return None;
        }
        let name = normalize(&trimmed[level..]);
        if name.is_empty() {
            return None;
        }
        Some(Self { level, name })
    }
}

/// Tracks whether the scan is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceState {
    inside: bool,
}

impl FenceState {
    /// Feed the next line; toggles the state on a fence line.
    pub fn observe(&mut self, line: &str) {
        if line.trim().starts_with(FENCE) {
            self.inside = !self.inside;
        }
    }

    /// Whether the last observed line left the scan inside a fence.
    pub fn inside(&self) -> bool {
        self.inside
    }
}

fn normalize(name: &str) -> &str {
    name.trim_matches(|c: char| c == '#' || c.is_whitespace())
}

/// Normalize a section name the way the heading parser does.
///
/// Surrounding whitespace and `#` characters are removed and line breaks are
/// replaced by spaces. A name survives a linearize/parse round trip unchanged
/// only if it is already normalized.
///
/// # Examples
///
/// ```
/// use mdtree_sections::normalize_name;
///
/// assert_eq!(normalize_name("  ## Intro ##"), "Intro");
/// assert_eq!(normalize_name("C#"), "C");
/// ```
pub fn normalize_name(name: &str) -> String {
    normalize(&name.replace(['\r', '\n'], " ")).to_owned()
}

/// Title-case a document name: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased.
///
/// # Examples
///
/// ```
/// use mdtree_sections::title_case;
///
/// assert_eq!(title_case("weekly notes"), "Weekly Notes");
/// assert_eq!(title_case("src_structure"), "Src_Structure");
/// ```
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Rewrite heading lines of `content` into emphasized markers.
///
/// Every heading line outside a fenced block becomes `***<name>***`; lines
/// inside fences are kept verbatim.
pub(crate) fn strip_nested_headings(content: &str) -> String {
    let mut fence = FenceState::default();
    let mut lines = Vec::new();
    for line in content.lines() {
        fence.observe(line);
        match Heading::parse(line) {
            Some(heading) if !fence.inside() => lines.push(format!("***{}***", heading.name)),
            _ => lines.push(line.to_owned()),
        }
    }
    lines.join("\n")
}

/// Close a fenced block left open at the end of `content`.
///
/// An unterminated fence would swallow every heading that follows the content
/// once the document is linearized.
pub(crate) fn close_open_fence(mut content: String) -> String {
    let mut fence = FenceState::default();
    for line in content.lines() {
        fence.observe(line);
    }
    if fence.inside() {
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(FENCE);
    }
    content
}
