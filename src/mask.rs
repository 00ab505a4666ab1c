#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{constants::MASK_SUFFIX, error::Result};

/// Scoped record of masked key files that were renamed back to their real
/// names for the duration of a fixture.
///
/// The VPL jail auto-compiles any recognizable source file it finds, so
/// key solutions ship disguised with [`MASK_SUFFIX`] and are only revealed
/// while the harness needs them. Reversal is tied to `Drop` so the masked
/// names come back on every exit path, including a failing setup.
#[derive(Debug)]
pub struct MaskGuard {
    /// The fixture directory the renames happened in.
    dir:     PathBuf,
    /// Unmasked names currently on disk that must be re-masked.
    renamed: Vec<String>,
}

impl MaskGuard {
    /// Strips [`MASK_SUFFIX`] from every declared key file found masked on
    /// disk, renaming in place. Files already unmasked are left alone.
    pub fn unmask(dir: &Path, key_source_files: &[String]) -> Result<MaskGuard> {
        let mut renamed = Vec::new();

        for key_file in key_source_files {
            let masked = dir.join(format!("{key_file}{MASK_SUFFIX}"));
            if !masked.exists() {
                continue;
            }

            std::fs::rename(&masked, dir.join(key_file)).with_context(|| {
                format!("Could not unmask key file {}", masked.display())
            })?;
            tracing::debug!(file = key_file, "unmasked key file");
            renamed.push(key_file.clone());
        }

        Ok(MaskGuard {
            dir: dir.to_path_buf(),
            renamed,
        })
    }

    /// The key files this guard will re-mask.
    pub fn unmasked_files(&self) -> &[String] {
        &self.renamed
    }
}

impl Drop for MaskGuard {
    fn drop(&mut self) {
        for file in self.renamed.drain(..) {
            let unmasked = self.dir.join(&file);
            let masked = self.dir.join(format!("{file}{MASK_SUFFIX}"));
            if let Err(err) = std::fs::rename(&unmasked, &masked) {
                tracing::warn!(file, %err, "could not restore masked key file");
            }
        }
    }
}
