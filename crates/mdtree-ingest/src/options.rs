//! Entry filtering for directory ingestion.

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern};

use crate::IngestError;

/// `*` never crosses a path separator.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Which directory entries end up in the generated document.
///
/// Patterns are matched from the right: a relative pattern matches an entry if
/// it matches any trailing run of the entry's path components, so `target`
/// matches every entry named `target` and `src/*.rs` matches Rust files
/// directly inside any `src` directory. Absolute patterns must match the
/// whole path.
///
/// Filters apply to directories and files alike. An excluded directory is
/// not descended into.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    exclude: Vec<Pattern>,
    include: Vec<Pattern>,
}

impl IngestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip entries matching any of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Pattern`] for an invalid glob.
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Result<Self, IngestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude.extend(compile(patterns)?);
        Ok(self)
    }

    /// Keep only entries matching one of `patterns` (all entries when empty).
    ///
    /// Exact paths work as patterns too.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Pattern`] for an invalid glob.
    pub fn with_include<I, S>(mut self, patterns: I) -> Result<Self, IngestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include.extend(compile(patterns)?);
        Ok(self)
    }

    /// Whether the entry at `path` passes both filters.
    pub(crate) fn accepts(&self, path: &Path) -> bool {
        if self.exclude.iter().any(|pattern| matches_tail(pattern, path)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|pattern| matches_tail(pattern, path))
    }
}

fn compile<I, S>(patterns: I) -> Result<Vec<Pattern>, IngestError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Pattern::new(pattern).map_err(|source| IngestError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })
        })
        .collect()
}

fn matches_tail(pattern: &Pattern, path: &Path) -> bool {
    if pattern.as_str().starts_with('/') {
        return pattern.matches_path_with(path, MATCH_OPTIONS);
    }
    let parts: Vec<_> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    (1..=parts.len()).any(|count| {
        let tail = parts[parts.len() - count..].join("/");
        pattern.matches_with(&tail, MATCH_OPTIONS)
    })
}
