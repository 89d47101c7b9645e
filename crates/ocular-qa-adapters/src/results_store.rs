//! Results directory for retained images.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use ocular_qa_core::error::StorageError;
use ocular_qa_core::ports::ResultsStore;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Second-resolution stamp used in retained file names.
const STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Upper bound on same-second collisions before giving up.
const MAX_SUFFIX: u32 = 10_000;

/// Extension used when the source has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Moves retained images into a directory as
/// `quality_results_<YYYYMMDD_HHMMSS>[_<n>].<ext>`.
///
/// The image is first staged as a hidden temporary file inside the target
/// directory with the source's permissions, then linked under the first free
/// name. An existing file is never replaced.
#[derive(Debug, Clone)]
pub struct FsResultsStore {
    dir: PathBuf,
}

impl FsResultsStore {
    /// Creates a store rooted at `dir`. The directory is created on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn relocate(&self, image: &Path, at: OffsetDateTime) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stamp = at.format(STAMP).map_err(io::Error::other)?;
        let ext = image
            .extension()
            .and_then(OsStr::to_str)
            .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_lowercase);

        let metadata = fs::metadata(image)?;
        let expected = metadata.len();
        let mut staged = tempfile::Builder::new()
            .prefix(".staging-")
            .tempfile_in(&self.dir)?;
        let copied = io::copy(&mut File::open(image)?, staged.as_file_mut())?;
        fs::set_permissions(staged.path(), metadata.permissions())?;
        staged.as_file().sync_all()?;
        if copied != expected {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("copied {copied} of {expected} bytes"),
            ));
        }

        for n in 0..MAX_SUFFIX {
            let dest = self.dir.join(file_name(&stamp, n, &ext));
            match staged.persist_noclobber(&dest) {
                Ok(_) => {
                    if let Err(e) = fs::remove_file(image) {
                        warn!("Could not remove {} after saving: {e}", image.display());
                    }
                    return Ok(dest);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next suffix", dest.display());
                    staged = e.file;
                }
                Err(e) => return Err(e.error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for quality_results_{stamp}"),
        ))
    }
}

impl ResultsStore for FsResultsStore {
    fn retain(&self, image: &Path, at: OffsetDateTime) -> Result<PathBuf, StorageError> {
        self.relocate(image, at)
            .map_err(|source| StorageError::Relocation {
                image: image.to_path_buf(),
                dir: self.dir.clone(),
                source,
            })
    }
}

fn file_name(stamp: &str, n: u32, ext: &str) -> String {
    if n == 0 {
        format!("quality_results_{stamp}.{ext}")
    } else {
        format!("quality_results_{stamp}_{n}.{ext}")
    }
}
