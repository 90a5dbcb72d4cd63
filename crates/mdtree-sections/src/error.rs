//! Error type for section tree operations.

use mdtree_storage::StorageError;

use crate::SectionId;

/// Error returned by [`Document`](crate::Document) operations.
///
/// Structural variants are raised before the document is touched: a failed
/// mutation always leaves the previous tree in place.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A section name collides (case-insensitively) with an existing one.
    #[error("Section name '{name}' collides with existing section '{existing}'")]
    NameCollision { name: String, existing: String },

    /// A second level-1 heading was found.
    #[error("Multiple root sections: '{first}' and '{second}'")]
    MultipleRoots { first: String, second: String },

    /// A heading skips levels or precedes the root heading.
    #[error("Invalid nesting at line {line}: '{name}' has level {level}")]
    InvalidNesting {
        name: String,
        level: usize,
        line: usize,
    },

    /// The root section can only be renamed, never deleted.
    #[error("Cannot delete root section '{0}'")]
    CannotDeleteRoot(String),

    /// The tree rebuilt from text does not match the intended structure.
    #[error("Level invariant violated: {0}")]
    LevelInvariantViolation(String),

    /// A section name does not survive heading normalization.
    #[error("Invalid section name: {0:?}")]
    InvalidName(String),

    /// The handle does not refer to a live section.
    #[error("Unknown {0}")]
    UnknownSection(SectionId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_display() {
        let err = DocumentError::NameCollision {
            name: "intro".to_owned(),
            existing: "Intro".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Section name 'intro' collides with existing section 'Intro'"
        );

        let err = DocumentError::InvalidNesting {
            name: "Deep".to_owned(),
            level: 4,
            line: 7,
        };
        assert_eq!(err.to_string(), "Invalid nesting at line 7: 'Deep' has level 4");

        assert_eq!(
            DocumentError::UnknownSection(SectionId(3)).to_string(),
            "Unknown section #3"
        );
        assert_eq!(
            DocumentError::InvalidName(" x".to_owned()).to_string(),
            "Invalid section name: \" x\""
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: DocumentError = StorageError::not_found("doc.md").into();

        assert!(matches!(err, DocumentError::Storage(ref e) if e.is_not_found()));
    }
}
