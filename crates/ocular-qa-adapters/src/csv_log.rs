//! CSV audit log shared between concurrent runs.
//!
//! Rows are appended under an exclusive advisory lock held on a sidecar
//! `.<log>.lock` file, so the log itself can be replaced atomically when a
//! new check column has to be added to the header.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use ocular_qa_core::domain::AuditRecord;
use ocular_qa_core::error::StorageError;
use ocular_qa_core::ports::AuditLog;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Append-only CSV log with columns `timestamp, overall, <check labels...>`.
#[derive(Debug, Clone)]
pub struct CsvAuditLog {
    path: PathBuf,
    lock_path: PathBuf,
}

impl CsvAuditLog {
    /// Creates a log at `path`. Nothing is written until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| "audit".into(), |n| n.to_string_lossy().into_owned());
        let lock_path = path.with_file_name(format!(".{name}.lock"));
        Self { path, lock_path }
    }

    /// Log file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_locked(&self, record: &AuditRecord) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write()?;

        let columns: Vec<String> = record.columns().into_iter().map(String::from).collect();
        let mut buf = Vec::new();

        let header = match read_header(&self.path)? {
            None => {
                buf.extend(encode(&columns)?);
                columns
            }
            Some(header) => {
                let missing: Vec<String> = columns
                    .into_iter()
                    .filter(|c| !header.contains(c))
                    .collect();
                if missing.is_empty() {
                    header
                } else {
                    let mut extended = header;
                    extended.extend(missing);
                    self.rewrite(&extended)?;
                    extended
                }
            }
        };

        let row: Vec<String> = header
            .iter()
            .map(|column| record.value(column).unwrap_or_default())
            .collect();
        buf.extend(encode(&row)?);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buf)?;
        file.sync_data()?;

        debug!("Appended audit row to {}", self.path.display());
        Ok(())
    }

    /// Replaces the log with a copy whose header is `header`, padding older
    /// rows with empty cells. The replacement keeps the log's permissions.
    fn rewrite(&self, header: &[String]) -> io::Result<()> {
        info!(
            "Extending audit log header of {} to {} columns",
            self.path.display(),
            header.len()
        );

        let dir = self
            .path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;

        {
            let mut writer = writer(staged.as_file_mut());
            writer.write_record(header)?;

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_path(&self.path)?;
            for row in reader.records() {
                let row = row?;
                let cells = (0..header.len()).map(|i| row.get(i).unwrap_or(""));
                writer.write_record(cells)?;
            }
            writer.flush()?;
        }

        fs::set_permissions(staged.path(), fs::metadata(&self.path)?.permissions())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl AuditLog for CsvAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), StorageError> {
        self.append_locked(record)
            .map_err(|source| StorageError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }
}

/// First row of the log, or `None` if the log is missing or empty.
fn read_header(path: &Path) -> io::Result<Option<Vec<String>>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    match reader.records().next() {
        Some(row) => Ok(Some(row?.iter().map(String::from).collect())),
        None => Ok(None),
    }
}

fn writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

/// Encodes one row, newline terminated.
fn encode(row: &[String]) -> io::Result<Vec<u8>> {
    let mut writer = writer(Vec::new());
    writer.write_record(row)?;
    writer.into_inner().map_err(csv::IntoInnerError::into_error)
}
