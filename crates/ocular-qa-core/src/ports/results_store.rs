//! Results store port.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::error::StorageError;

/// Destination for retained images.
pub trait ResultsStore: Send + Sync {
    /// Relocates `image` into the store under a name derived from `at`,
    /// returning the final path. Never overwrites an existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Relocation`] if the image could not be moved.
    /// The source is left in place on failure.
    fn retain(&self, image: &Path, at: OffsetDateTime) -> Result<PathBuf, StorageError>;
}
