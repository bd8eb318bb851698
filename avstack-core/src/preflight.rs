// SPDX-License-Identifier: Apache-2.0

//! Preflight checks run before the orchestrator is touched.
//!
//! Missing environment files are fatal with instructive guidance; a missing
//! dictionary directory is self-healed with a placeholder so the image
//! build does not fail on the path, and the stack runs AI-only.

use std::path::{Path, PathBuf};

use crate::config::StackOptions;
use crate::error::{StackError, StackResult};

/// Marker file written into an empty dictionary directory.
pub const PLACEHOLDER_FILE: &str = ".gitkeep";

/// Outcome of the dictionary-directory check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryDir {
    /// Directory holds dictionary data; the API can run dictionary-assisted.
    Populated { files: usize },
    /// Directory was missing or empty; a placeholder was written and the
    /// stack will run AI-only validation.
    Placeholder,
}

impl DictionaryDir {
    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated { .. })
    }
}

/// Resolve the environment file: primary first, fallback second.
/// Neither existing is fatal - the orchestrator must never run without one.
pub fn resolve_env_file(options: &StackOptions) -> StackResult<PathBuf> {
    let primary = options.project_dir.join(&options.env_file);
    if primary.is_file() {
        tracing::debug!(path = %primary.display(), "Using primary environment file");
        return Ok(primary);
    }

    let fallback = options.project_dir.join(&options.env_file_fallback);
    if fallback.is_file() {
        tracing::info!(path = %fallback.display(), "Primary environment file absent, using fallback");
        return Ok(fallback);
    }

    Err(StackError::EnvFileMissing {
        primary: options.env_file.clone(),
        fallback: options.env_file_fallback.clone(),
        template: options.env_template.clone(),
    })
}

/// Check the dictionary directory, creating it with a placeholder when
/// missing or empty. Only IO failures are fatal; absence is a degraded
/// mode, not an error.
pub fn ensure_dictionary_dir(options: &StackOptions) -> StackResult<DictionaryDir> {
    let dir = options.project_dir.join(&options.dictionary_dir);

    if !dir.is_dir() {
        tracing::info!(path = %dir.display(), "Dictionary directory missing, creating placeholder");
        std::fs::create_dir_all(&dir).map_err(|e| StackError::Io {
            context: "creating dictionary directory",
            source: e,
        })?;
        write_placeholder(&dir)?;
        return Ok(DictionaryDir::Placeholder);
    }

    let files = count_data_files(&dir)?;
    if files == 0 {
        write_placeholder(&dir)?;
        return Ok(DictionaryDir::Placeholder);
    }

    Ok(DictionaryDir::Populated { files })
}

/// Count directory entries, ignoring the placeholder marker itself so a
/// previously self-healed directory still reads as empty.
fn count_data_files(dir: &Path) -> StackResult<usize> {
    let entries = std::fs::read_dir(dir).map_err(|e| StackError::Io {
        context: "reading dictionary directory",
        source: e,
    })?;

    let mut files = 0;
    for entry in entries {
        let entry = entry.map_err(|e| StackError::Io {
            context: "reading dictionary directory",
            source: e,
        })?;
        if entry.file_name() != PLACEHOLDER_FILE {
            files += 1;
        }
    }
    Ok(files)
}

fn write_placeholder(dir: &Path) -> StackResult<()> {
    let marker = dir.join(PLACEHOLDER_FILE);
    if !marker.exists() {
        std::fs::write(&marker, b"").map_err(|e| StackError::Io {
            context: "writing dictionary placeholder",
            source: e,
        })?;
    }
    Ok(())
}
