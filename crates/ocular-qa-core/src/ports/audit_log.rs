//! Audit log port.

use crate::domain::AuditRecord;
use crate::error::StorageError;

/// Durable, append-only record of every run.
pub trait AuditLog: Send + Sync {
    /// Appends one record as a single atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AuditLog`] if the record could not be written.
    fn append(&self, record: &AuditRecord) -> Result<(), StorageError>;
}
