use std::{
    fs::File,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use fs4::fs_std::FileExt;
use log::debug;
use thiserror::Error;

const LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// Exclusive lock held until dropped. Concurrent invocations that target different subprojects of
/// the same build write to the same output directory.
pub struct FileLock {
    _file: File,
}

#[derive(Error, Debug)]
#[error("Failed to lock {}: {source}", path.display())]
pub struct Error {
    path: PathBuf,
    source: std::io::Error,
}

impl FileLock {
    pub fn new(path: &Path) -> Result<Self, Error> {
        let error = |source| Error {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(error)?;
        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(_) => return Ok(Self { _file: file }),
                Err(e)
                    if e.raw_os_error() == fs4::lock_contended_error().raw_os_error()
                        && start.elapsed() < LOCK_TIMEOUT =>
                {
                    debug!("{} is locked by another process, waiting", path.display());
                    std::thread::sleep(Duration::from_secs(1));
                }
                Err(e) => return Err(error(e)),
            }
        }
    }
}
