#![deny(missing_docs)]

//! # Source Collection
//!
//! Reads `.rs` files from a file or directory tree into a `SourceIndex`.

use crate::error::{CliError, CliResult};
use paramdoc_core::SourceIndex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Lists the Rust files under `root` in a stable order.
///
/// A file path is returned as-is regardless of extension.
pub fn collect_rust_files(root: &Path) -> CliResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(CliError::General(format!("Source path not found: {:?}", root)));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Builds an index over every Rust file under `root`.
pub fn load_index(root: &Path) -> CliResult<SourceIndex> {
    let mut index = SourceIndex::new();
    for path in collect_rust_files(root)? {
        debug!(path = %path.display(), "indexing");
        let code = fs::read_to_string(&path)?;
        index.add_source(&code);
    }
    Ok(index)
}
