use super::{ExecutionContext, FileStatus};
use crate::config::Config;
use std::io;
use std::path::Path;

/// Local file system plus a loaded [`Config`].
#[derive(Debug, Clone)]
pub struct LocalContext {
    config: Config,
}

impl LocalContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ExecutionContext for LocalContext {
    fn file_status(&self, path: &Path) -> io::Result<FileStatus> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileStatus {
            len: metadata.len(),
            is_file: metadata.is_file(),
        })
    }

    fn conf(&self, key: &str) -> Option<String> {
        self.config.get(key)
    }
}
