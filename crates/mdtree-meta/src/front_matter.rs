//! Opaque front matter payload with typed YAML access.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Raw front matter block, stored exactly as it appeared between the
/// delimiter lines.
///
/// The raw text is the source of truth. Typed views are produced on demand and
/// never written back unless the caller explicitly replaces the block with
/// [`FrontMatter::from_value`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    raw: String,
}

/// Commonly used front matter fields.
///
/// Lightweight struct for display purposes; unknown keys are ignored.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatterFields {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Error type for front matter operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// The block is not valid YAML for the requested type.
    #[error("Invalid front matter: {0}")]
    Parse(#[source] serde_yaml::Error),
    /// The value could not be serialized to YAML.
    #[error("Cannot serialize front matter: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl FrontMatter {
    /// Wrap a raw block (without delimiter lines).
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Build a block by serializing `value` to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError::Serialize`] if `value` can't be represented as YAML.
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, FrontMatterError> {
        let yaml = serde_yaml::to_string(value).map_err(FrontMatterError::Serialize)?;
        Ok(Self::new(yaml.trim_end()))
    }

    /// The block exactly as stored.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Check if the block holds no YAML at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Deserialize the block into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError::Parse`] if the YAML is malformed or doesn't match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, FrontMatterError> {
        serde_yaml::from_str(self.raw.trim()).map_err(FrontMatterError::Parse)
    }

    /// Extract the common fields, leniently.
    ///
    /// Returns `None` if the block is empty or not valid YAML.
    #[must_use]
    pub fn fields(&self) -> Option<FrontMatterFields> {
        if self.is_empty() {
            return None;
        }
        self.parse().ok()
    }

    /// Title declared in the block, if any.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.fields().and_then(|fields| fields.title)
    }
}
