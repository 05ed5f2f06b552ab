//! Scan-input file filter.
//!
//! Decides which files of a table directory are small enough to be coalesced into a
//! combined scan. The filter never reaches for global state: file-system and
//! configuration access go through an [`ExecutionContext`] passed to every call.

mod context;

pub use context::LocalContext;

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Context key of the largest mergeable file size, in bytes
pub const MERGE_FILTER_SIZE_KEY: &str = "sqlext.merge.filter.size";

/// Context key of the skip-filtering flag
pub const SKIP_PATH_FILTER_KEY: &str = "sqlext.skip.path.filter";

/// 128 MiB
pub const DEFAULT_MERGE_FILTER_SIZE: u64 = 134_217_728;

/// What the filter needs to know about one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStatus {
    pub len: u64,
    pub is_file: bool,
}

/// File-system and configuration access for the filter.
pub trait ExecutionContext {
    fn file_status(&self, path: &Path) -> io::Result<FileStatus>;

    /// Configuration value by key, `None` when unset
    fn conf(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombineFilter {
    skip_filtering: bool,
}

impl CombineFilter {
    pub fn new(skip_filtering: bool) -> Self {
        Self { skip_filtering }
    }

    /// Build the filter from the context's skip flag. A missing or unparsable flag
    /// means the filter is active.
    pub fn from_context(ctx: &dyn ExecutionContext) -> Self {
        let skip = ctx
            .conf(SKIP_PATH_FILTER_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(false);
        Self::new(skip)
    }

    pub fn skips_filtering(&self) -> bool {
        self.skip_filtering
    }

    /// Accept regular, non-hidden files no larger than the configured threshold.
    ///
    /// Any failure while looking at the file excludes it.
    pub fn accept(&self, ctx: &dyn ExecutionContext, path: &Path) -> bool {
        if self.skip_filtering {
            return true;
        }
        match Self::check(ctx, path) {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::debug!(path = %path.display(), "excluding file: {}", e);
                false
            }
        }
    }

    fn check(ctx: &dyn ExecutionContext, path: &Path) -> io::Result<bool> {
        let status = ctx.file_status(path)?;
        let max_len = match ctx.conf(MERGE_FILTER_SIZE_KEY) {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} = '{}': {}", MERGE_FILTER_SIZE_KEY, value, e),
                )
            })?,
            None => DEFAULT_MERGE_FILTER_SIZE,
        };
        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false);

        Ok(status.is_file && !hidden && status.len <= max_len)
    }
}

/// Accepted files directly inside `dir`, sorted by path. Subdirectories are not
/// descended into.
pub fn list_input_files(
    ctx: &dyn ExecutionContext,
    filter: &CombineFilter,
    dir: &Path,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if filter.accept(ctx, path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), accepted = files.len(), "listed scan input");
    files
}
