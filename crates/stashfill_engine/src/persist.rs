//! Stores torrent files delivered inline by the fill backend.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stashfill_logging::fill_debug;
use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use output directory {dir:?}: {source}")]
    OutputDir { dir: PathBuf, source: io::Error },
    #[error("output path {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("refusing to write file named {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` (and parents) unless it already exists as a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| PersistError::OutputDir {
                dir: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(PersistError::OutputDir {
            dir: dir.to_path_buf(),
            source,
        }),
    }
}

/// Final path component of a backend-supplied name, if it is a plain file name.
pub fn safe_file_name(name: &str) -> Option<&str> {
    let candidate = Path::new(name).file_name()?.to_str()?.trim();
    match candidate {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Writes torrents into one directory. Each file is staged next to its
/// target and renamed into place, so readers never see a partial torrent.
#[derive(Debug, Clone)]
pub struct TorrentWriter {
    dir: PathBuf,
}

impl TorrentWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` as `{dir}/{name}`, replacing any existing file.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let file_name =
            safe_file_name(name).ok_or_else(|| PersistError::InvalidName(name.to_string()))?;
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut staged = Builder::new()
            .prefix(".stashfill-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;

        fill_debug!("Wrote {} bytes to {:?}", content.len(), target);
        Ok(target)
    }
}
