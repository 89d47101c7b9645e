//! Disposition policy: log every run, keep only images that pass the gate.

use std::path::Path;

use tracing::info;

use crate::domain::{AuditRecord, Disposition};
use crate::error::StorageError;
use crate::ports::{AuditLog, ResultsStore};

/// Decides what happens to an image once its verdict is known.
pub struct DispositionPolicy {
    log: Box<dyn AuditLog>,
    store: Box<dyn ResultsStore>,
}

impl DispositionPolicy {
    /// Creates a policy writing to `log` and retaining into `store`.
    #[must_use]
    pub fn new(log: Box<dyn AuditLog>, store: Box<dyn ResultsStore>) -> Self {
        Self { log, store }
    }

    /// Appends `record` to the audit log, then relocates `image` into the
    /// results store unless the verdict is `Bad`.
    ///
    /// The record is appended for every verdict. When the append fails the
    /// image is not relocated, so a kept image always has a log row.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AuditLog`] or [`StorageError::Relocation`];
    /// a `Bad` verdict is never an error.
    pub fn dispose(&self, record: &AuditRecord, image: &Path) -> Result<Disposition, StorageError> {
        self.log.append(record)?;

        if !record.overall().is_retained() {
            info!("Rejected {} ({})", image.display(), record.overall());
            return Ok(Disposition::rejected());
        }

        let path = self.store.retain(image, record.timestamp())?;
        info!("Saved {} ({})", path.display(), record.overall());
        Ok(Disposition::Saved { path })
    }
}
