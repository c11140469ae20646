pub mod commands;
pub mod index;
pub mod srt;

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use crate::{error::CollaboratorError, log_info, log_warn};

pub use index::CaptionIndex;

const ENABLE_LOGS: bool = true;

/// The caption track of the currently loaded video, replaced wholesale on each load.
#[derive(Default)]
pub struct CaptionStore {
    current: RwLock<Arc<CaptionIndex>>,
}

impl CaptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Arc<CaptionIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, index: CaptionIndex) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(index);
    }
}

/// Caption file expected next to `video`: same stem, `extension` suffix.
pub fn caption_path_for(video: &Path, extension: &str) -> PathBuf {
    video.with_extension(extension)
}

/// Loads the caption track that sits next to `video`.
///
/// A missing caption file is not an error and yields an empty index.
pub fn load_caption_track(video: &Path, extension: &str) -> Result<CaptionIndex, CollaboratorError> {
    let path = caption_path_for(video, extension);
    let contents = match fs::read(&path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log_info!("No caption file at {}", path.display());
            return Ok(CaptionIndex::empty());
        }
        Err(err) => {
            return Err(CollaboratorError::captions(format!(
                "failed to read {}: {err}",
                path.display()
            )))
        }
    };

    let entries = srt::parse(&contents);
    let index = CaptionIndex::new(entries)
        .map_err(|err| CollaboratorError::captions(format!("{}: {err}", path.display())))?;
    if index.is_empty() {
        log_warn!("{} contains no usable captions", path.display());
    } else {
        log_info!("Loaded {} captions from {}", index.len(), path.display());
    }
    Ok(index)
}
