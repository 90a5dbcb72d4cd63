//! CLI command implementations.

mod add;
mod delete;
mod export;
mod ingest;
mod template;
mod toc;
mod tree;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use mdtree_config::Config;
use mdtree_sections::{ConflictPolicy, Document};
use mdtree_storage::FsStorage;

use crate::error::CliError;

pub(crate) use add::AddArgs;
pub(crate) use delete::DeleteArgs;
pub(crate) use export::ExportArgs;
pub(crate) use ingest::IngestArgs;
pub(crate) use template::TemplateArgs;
pub(crate) use toc::TocArgs;
pub(crate) use tree::TreeArgs;

/// `--on-conflict` values.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum OnConflict {
    /// Update the content of an existing section with the same name.
    #[default]
    Update,
    /// Fail if the name is already used.
    Error,
    /// Replace the existing section and its subsections.
    Replace,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Update => Self::UpdateContentIfExists,
            OnConflict::Error => Self::ErrorIfExists,
            OnConflict::Replace => Self::Replace,
        }
    }
}

/// A markdown file accessed through storage rooted at its directory.
pub(crate) struct DocumentFile {
    storage: FsStorage,
    file_name: PathBuf,
}

impl DocumentFile {
    pub(crate) fn new(path: &Path) -> Result<Self, CliError> {
        let file_name = path
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| CliError::Validation(format!("Not a file path: {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            storage: FsStorage::new(dir),
            file_name,
        })
    }

    /// Load the document; it must exist.
    pub(crate) fn load(&self, config: &Config) -> Result<Document, CliError> {
        let doc = Document::load(&self.storage, &self.file_name)?;
        Ok(self.prepare(doc, config))
    }

    /// Load the document, or start an empty one named after the file.
    pub(crate) fn open_or_create(&self, config: &Config) -> Result<Document, CliError> {
        let doc = Document::open_or_create(&self.storage, &self.file_name)?;
        Ok(self.prepare(doc, config))
    }

    pub(crate) fn save(&self, doc: &mut Document) -> Result<(), CliError> {
        doc.save(&self.storage, &self.file_name)?;
        Ok(())
    }

    pub(crate) fn path(&self) -> PathBuf {
        self.storage.root_dir().join(&self.file_name)
    }

    fn prepare(&self, mut doc: Document, config: &Config) -> Document {
        doc.set_toc_name(config.document.toc_name.clone());
        doc.set_base_dir(self.storage.root_dir());
        doc
    }
}

/// Look up a section by exact name, then ignoring case.
pub(crate) fn find_section<'a>(
    doc: &'a Document,
    name: &str,
) -> Result<mdtree_sections::SectionRef<'a>, CliError> {
    doc.get(name)
        .or_else(|| doc.find_ignore_case(name))
        .ok_or_else(|| CliError::Validation(format!("Section not found: {name}")))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_document_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.md");
        let file = DocumentFile::new(&path).unwrap();
        let config = Config::default();

        let mut doc = file.open_or_create(&config).unwrap();
        assert_eq!(doc.root().name(), "Notes");
        assert_eq!(doc.base_dir(), Some(temp_dir.path()));
        file.save(&mut doc).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Notes\n");
        assert_eq!(file.path(), path);
        assert_eq!(file.load(&config).unwrap().root().name(), "Notes");
    }

    #[test]
    fn test_document_file_bare_name() {
        let file = DocumentFile::new(Path::new("notes.md")).unwrap();

        assert_eq!(file.path(), PathBuf::from("./notes.md"));
    }

    #[test]
    fn test_document_file_applies_toc_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = DocumentFile::new(&temp_dir.path().join("a.md")).unwrap();
        let mut config = Config::default();
        config.document.toc_name = "Index".to_owned();

        let doc = file.open_or_create(&config).unwrap();

        assert_eq!(doc.toc_name(), "Index");
    }

    #[test]
    fn test_find_section_ignores_case() {
        let doc = Document::parse("doc", "# Guide\n## Install\n").unwrap();

        assert_eq!(find_section(&doc, "install").unwrap().name(), "Install");
        assert!(matches!(
            find_section(&doc, "Usage"),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_on_conflict_policy() {
        assert_eq!(
            ConflictPolicy::from(OnConflict::Replace),
            ConflictPolicy::Replace
        );
        assert_eq!(
            ConflictPolicy::from(OnConflict::default()),
            ConflictPolicy::UpdateContentIfExists
        );
    }
}
