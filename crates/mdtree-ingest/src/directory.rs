//! Breadth-first conversion of a directory into a document.

use std::collections::VecDeque;
use std::fs;
use std::path::{Component, Path, PathBuf};

use mdtree_sections::{
    meta_path_anchor, normalize_name, AddSection, ConflictPolicy, Document, DocumentError,
    SectionId, SectionMeta,
};
use tracing::{debug, info, warn};

use crate::language::{fence_language, FileKind};
use crate::{IngestError, IngestOptions};

/// Name of the table-of-contents section of generated documents.
pub const DIRECTORY_TOC_NAME: &str = "Directory Structure";

/// A listed directory entry.
struct Entry {
    path: PathBuf,
    is_dir: bool,
}

/// Build a document mirroring the layout of `dir`.
///
/// Every accepted entry becomes one section below the section of its parent
/// directory; directories are visited breadth-first, and within a directory
/// subdirectories come first, then files, each group ordered by lower-cased
/// name. Text files are embedded in a fenced block, images and PDFs are linked.
///
/// Section names are file names. When a name is already used elsewhere in the
/// document, it is prefixed with its parent directory name (`src|main.rs`),
/// then the grandparent's, and so on.
///
/// The returned document is named `<dir>_structure`, carries each entry's
/// path relative to the parent of `dir` as `path` metadata, and has a
/// table of contents linking those paths.
///
/// # Errors
///
/// - [`IngestError::NotADirectory`] / [`IngestError::Io`] if `dir` can't be listed.
/// - [`IngestError::NameExhausted`] if no unique name can be found for an entry.
/// - [`IngestError::Document`] for any other document error.
pub fn read_directory(dir: &Path, options: &IngestOptions) -> Result<Document, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::NotADirectory(dir.to_path_buf()));
    }
    let root_dir = dir.canonicalize().map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let base = root_dir.parent().unwrap_or(&root_dir).to_path_buf();
    let dir_name = file_name(&root_dir);

    let mut doc = Document::new(format!("{dir_name}_structure"));
    doc.set_toc_name(DIRECTORY_TOC_NAME);
    doc.set_base_dir(&base);
    let root_name = normalize_name(&dir_name);
    if !root_name.is_empty() {
        doc.set_root_name(&root_name)?;
    }
    let root = doc.root().id();
    doc.merge_meta(root, SectionMeta::with_path(relative_path(&base, &root_dir)))?;

    let mut queue = VecDeque::from([(root, list(&root_dir).map_err(|source| IngestError::Io {
        path: root_dir.clone(),
        source,
    })?)]);

    while let Some((parent, entries)) = queue.pop_front() {
        for entry in entries {
            if !options.accepts(&entry.path) {
                debug!(path = %entry.path.display(), "Skipping filtered entry");
                continue;
            }

            let rel_path = relative_path(&base, &entry.path);
            let content = if entry.is_dir {
                String::new()
            } else {
                file_content(&entry.path, &rel_path)
            };
            let id = add_unique(&mut doc, parent, &entry.path, content, &rel_path)?;

            if entry.is_dir {
                match list(&entry.path) {
                    Ok(children) => queue.push_back((id, children)),
                    Err(err) => {
                        warn!(path = %entry.path.display(), error = %err, "Cannot list directory");
                    }
                }
            }
        }
    }

    doc.render_table_of_contents(meta_path_anchor)?;
    info!(
        dir = %root_dir.display(),
        sections = doc.len(),
        "Ingested directory"
    );
    Ok(doc)
}

/// Entries of `dir`, directories first, then by lower-cased name.
fn list(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| {
            let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
            let key = e.file_name().to_string_lossy().to_lowercase();
            (
                Entry {
                    path: e.path(),
                    is_dir,
                },
                key,
            )
        })
        .collect();
    entries.sort_by(|(a, a_key), (b, b_key)| b.is_dir.cmp(&a.is_dir).then_with(|| a_key.cmp(b_key)));
    Ok(entries.into_iter().map(|(entry, _)| entry).collect())
}

/// `./`-prefixed, `/`-separated path of `path` below `base`.
fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("./{}", parts.join("/"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Section content for the file at `path`.
fn file_content(path: &Path, rel_path: &str) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match FileKind::from_extension(&extension) {
        FileKind::Image => format!("![{stem}]({rel_path})"),
        FileKind::Pdf => format!("[{stem}]({rel_path})"),
        FileKind::Text => match fs::read_to_string(path) {
            Ok(text) => format!(
                "```{}\n{}\n```",
                fence_language(&extension),
                text.trim_end_matches(['\n', '\r'])
            ),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Cannot read file");
                format!("Cannot read file: {err}")
            }
        },
    }
}

/// Add the section for `path`, prefixing parent directory names until the
/// name is unique in the document.
fn add_unique(
    doc: &mut Document,
    parent: SectionId,
    path: &Path,
    content: String,
    rel_path: &str,
) -> Result<SectionId, IngestError> {
    let mut candidate = file_name(path);
    let mut ancestor = path;
    loop {
        let name = normalize_name(&candidate);
        if !name.is_empty() {
            let request = AddSection::new(&name)
                .with_content(content.clone())
                .with_meta(SectionMeta::with_path(rel_path))
                .on_conflict(ConflictPolicy::ErrorIfExists);
            match doc.add_or_replace_child(parent, request) {
                Ok(id) => return Ok(id),
                Err(DocumentError::NameCollision { .. } | DocumentError::InvalidName(_)) => {
                    debug!(name = %name, path = %path.display(), "Section name taken");
                }
                Err(err) => return Err(err.into()),
            }
        }

        let Some(up) = ancestor.parent() else {
            return Err(IngestError::NameExhausted(path.to_path_buf()));
        };
        let Some(up_name) = up.file_name() else {
            return Err(IngestError::NameExhausted(path.to_path_buf()));
        };
        candidate = format!("{}|{candidate}", up_name.to_string_lossy());
        ancestor = up;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(path: &Path, content: impl AsRef<[u8]>) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn project() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("project");
        write(&project.join("src/main.rs"), "fn main() {}\n");
        write(&project.join("src/lib.rs"), "pub mod a;\n");
        write(&project.join("docs/guide.md"), "# Guide\n\nText\n");
        write(&project.join("tools/main.rs"), "fn main() {}\n");
        write(&project.join("target/debug.txt"), "build output");
        write(&project.join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff]);
        write(&project.join("manual.pdf"), [0x25, 0x50, 0xff]);
        write(&project.join("README.md"), "Read me");
        (temp_dir, project)
    }

    fn names(doc: &Document) -> Vec<(usize, String)> {
        doc.sections()
            .iter()
            .map(|s| (s.level(), s.name().to_owned()))
            .collect()
    }

    fn entry(level: usize, name: &str) -> (usize, String) {
        (level, name.to_owned())
    }

    #[test]
    fn test_read_directory_layout() {
        let (_temp_dir, project) = project();
        let options = IngestOptions::new().with_exclude(["target"]).unwrap();

        let doc = read_directory(&project, &options).unwrap();

        assert_eq!(doc.name(), "project_structure");
        assert_eq!(doc.root().meta().path.as_deref(), Some("./project"));
        assert_eq!(
            names(&doc),
            vec![
                entry(1, "project"),
                entry(2, "Directory Structure"),
                entry(2, "docs"),
                entry(3, "guide.md"),
                entry(2, "src"),
                entry(3, "lib.rs"),
                entry(3, "main.rs"),
                entry(2, "tools"),
                entry(3, "tools|main.rs"),
                entry(2, "logo.png"),
                entry(2, "manual.pdf"),
                entry(2, "README.md"),
            ]
        );
    }

    #[test]
    fn test_file_contents() {
        let (_temp_dir, project) = project();

        let doc = read_directory(&project, &IngestOptions::new()).unwrap();

        let main = doc.get("main.rs").unwrap();
        assert_eq!(main.content(), "```rust\nfn main() {}\n```");
        assert_eq!(main.meta().path.as_deref(), Some("./project/src/main.rs"));
        assert_eq!(
            doc.get("guide.md").unwrap().content(),
            "```markdown\n# Guide\n\nText\n```"
        );
        assert_eq!(doc.get("README.md").unwrap().content(), "```markdown\nRead me\n```");
        assert_eq!(
            doc.get("logo.png").unwrap().content(),
            "![logo](./project/logo.png)"
        );
        assert_eq!(
            doc.get("manual.pdf").unwrap().content(),
            "[manual](./project/manual.pdf)"
        );
        assert_eq!(
            doc.get("tools|main.rs").unwrap().meta().path.as_deref(),
            Some("./project/tools/main.rs")
        );
    }

    #[test]
    fn test_links_resolve_against_parent_dir() {
        let (_temp_dir, project) = project();

        let doc = read_directory(&project, &IngestOptions::new()).unwrap();

        let links = doc.get("manual.pdf").unwrap().document_links();
        assert_eq!(links.len(), 1);
        assert!(links[0].1.ends_with("project/manual.pdf"));
    }

    #[test]
    fn test_unreadable_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = temp_dir.path().join("bin");
        write(&project.join("blob.dat"), [0xff, 0xfe, 0x00]);

        let doc = read_directory(&project, &IngestOptions::new()).unwrap();

        assert!(doc.get("blob.dat").unwrap().content().starts_with("Cannot read file:"));
    }

    #[test]
    fn test_table_of_contents_uses_paths() {
        let (_temp_dir, project) = project();
        let options = IngestOptions::new()
            .with_include(["docs", "*.md"])
            .unwrap();

        let doc = read_directory(&project, &options).unwrap();

        assert_eq!(
            doc.get(DIRECTORY_TOC_NAME).unwrap().content(),
            "- [project](./project)\n  - [docs](./project/docs)\n    - [guide.md](./project/docs/guide.md)\n  - [README.md](./project/README.md)"
        );
    }

    #[test]
    fn test_not_a_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file.txt");
        write(&file, "x");

        assert!(matches!(
            read_directory(&file, &IngestOptions::new()),
            Err(IngestError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_name_exhausted() {
        let mut doc = Document::parse("doc", "# Root\n## main.rs\n## x|main.rs\n").unwrap();
        let root = doc.root().id();

        let err = add_unique(&mut doc, root, Path::new("/x/main.rs"), String::new(), "./x/main.rs")
            .unwrap_err();

        assert!(matches!(err, IngestError::NameExhausted(_)));
    }
}
