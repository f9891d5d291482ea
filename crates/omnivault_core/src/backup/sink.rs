//! Delivery targets for exported backups.

use std::io;
use std::path::{Path, PathBuf};

/// Receives an encoded backup and makes it available to the user.
pub trait ExportSink {
    fn deliver(&self, file_name: &str, contents: &str) -> io::Result<()>;
}

/// Writes backups as files into one directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExportSink {
    fn deliver(&self, file_name: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(file_name), contents)
    }
}
