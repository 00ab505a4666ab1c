#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::Context;
use itertools::Itertools;

use crate::{
    config::FixtureConfig,
    constants::{INTERNAL_FILE_PREFIX, MASK_SUFFIX, NON_EXECUTABLE_EXTENSIONS, VPL_SYSTEM_FILES},
    error::Result,
};

/// Returns the names of all entries in `dir`, sorted.
///
/// The OS makes no promise about listing order, and language detection
/// must not depend on it, so the listing is normalized here once.
pub fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Could not list fixture directory {}", dir.display()))?;

    let names = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .sorted()
        .collect();

    Ok(names)
}

/// True when `file` is a key source file, under either its declared name
/// or its masked on-disk name.
fn is_key_file(file: &str, key_source_files: &[String]) -> bool {
    if key_source_files.iter().any(|key| key == file) {
        return true;
    }
    file.strip_suffix(MASK_SUFFIX)
        .is_some_and(|stripped| key_source_files.iter().any(|key| key == stripped))
}

/// True when `file` carries an extension that can never be part of a
/// runnable submission.
fn has_denied_extension(file: &str, extra: &[String]) -> bool {
    NON_EXECUTABLE_EXTENSIONS
        .iter()
        .any(|ext| file.ends_with(ext))
        || extra.iter().any(|ext| file.ends_with(ext.as_str()))
}

/// Scans `dir` and returns the candidate student files: everything that is
/// not a declared key file, a declared ignore file, a VPL system file, the
/// test-definition file, an internal `__` entry, or a denied extension.
///
/// Pure filter; nothing on disk is touched.
pub fn find_student_files(dir: &Path, config: &FixtureConfig) -> Result<Vec<String>> {
    let student_files: Vec<String> = list_directory(dir)?
        .into_iter()
        .filter(|file| {
            !is_key_file(file, &config.key_source_files)
                && !config.ignore_files.iter().any(|ignored| ignored == file)
                && !VPL_SYSTEM_FILES.contains(&file.as_str())
                && config.test_file_name.as_deref() != Some(file.as_str())
                && !file.starts_with(INTERNAL_FILE_PREFIX)
                && !has_denied_extension(file, &config.ignore_extensions)
        })
        .collect();

    tracing::debug!(?student_files, dir = %dir.display(), "classified student candidates");
    Ok(student_files)
}
