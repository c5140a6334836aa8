use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    encode::png::EncodedCard,
    foundation::error::{CardError, CardResult},
};

/// Where a sink put a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub bytes_written: usize,
    /// Final location, for sinks that write to the filesystem.
    pub path: Option<PathBuf>,
}

/// Persists finished cards. Receives the complete buffer in one call.
pub trait FileSink {
    fn save(&self, card: &EncodedCard) -> CardResult<SavedFile>;
}

impl<S: FileSink + ?Sized> FileSink for Arc<S> {
    fn save(&self, card: &EncodedCard) -> CardResult<SavedFile> {
        (**self).save(card)
    }
}

/// Writes cards into a directory.
///
/// Each card is written to `<name>.part` and renamed into place, so a reader never sees a
/// truncated file under the final name.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirSink {
    fn save(&self, card: &EncodedCard) -> CardResult<SavedFile> {
        let name = Path::new(&card.file_name);
        if card.file_name.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(CardError::save(format!(
                "refusing to save under '{}'",
                card.file_name
            )));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CardError::save(format!("create output dir '{}': {e}", self.dir.display()))
        })?;

        let final_path = self.dir.join(name);
        let part_path = self.dir.join(format!("{}.part", card.file_name));
        if let Err(e) = write_file(&part_path, &card.png) {
            let _ = std::fs::remove_file(&part_path);
            return Err(e);
        }
        std::fs::rename(&part_path, &final_path).map_err(|e| {
            let _ = std::fs::remove_file(&part_path);
            CardError::save(format!("rename into '{}': {e}", final_path.display()))
        })?;

        tracing::debug!(path = %final_path.display(), bytes = card.png.len(), "saved card");
        Ok(SavedFile {
            file_name: card.file_name.clone(),
            bytes_written: card.png.len(),
            path: Some(final_path),
        })
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> CardResult<()> {
    let mut f = std::fs::File::create(path)
        .map_err(|e| CardError::save(format!("create '{}': {e}", path.display())))?;
    f.write_all(bytes)
        .and_then(|()| f.sync_all())
        .map_err(|e| CardError::save(format!("write '{}': {e}", path.display())))
}

/// Keeps saved cards in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<EncodedCard>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards saved so far, oldest first.
    pub fn files(&self) -> Vec<EncodedCard> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileSink for MemorySink {
    fn save(&self, card: &EncodedCard) -> CardResult<SavedFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(card.clone());
        Ok(SavedFile {
            file_name: card.file_name.clone(),
            bytes_written: card.png.len(),
            path: None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
