//! Image source port for discovering images to gate.

use std::path::PathBuf;

/// Port for enumerating submitted images.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over image paths from this source.
    fn images(&self) -> Box<dyn Iterator<Item = PathBuf> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
