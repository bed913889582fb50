//! Placing generated audio into an app's resource tree.
//!
//! Both operations name files with [`with_language_suffix`], so a destination
//! that already follows the `<stem>_<lang>.<ext>` scheme is left as it is.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    naming::{is_audio_file, with_language_suffix},
};

/// A file that was (or would have been) moved or copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub renamed: Vec<Placement>,
    /// Unsuffixed files left alone because their suffixed name is already taken.
    pub conflicts: Vec<Placement>,
}

/// Directory for one language's audio below the resource root: `<root>/TTS/<lang>`.
pub fn tts_dir(resources_root: &Path, language: &str) -> PathBuf {
    resources_root.join("TTS").join(language)
}

/// Audio files directly inside `dir`, sorted by name.
fn audio_files<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_audio_file(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn suffixed_path(path: &Path, language: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let new_name = with_language_suffix(name, language);
    (new_name != name).then(|| path.with_file_name(new_name))
}

/// Give every unsuffixed audio file in `dir` its `_<lang>` suffix.
///
/// A missing directory is not an error; there is simply nothing to migrate.
pub fn rename_existing<S: AsRef<str>>(
    dir: &Path,
    language: &str,
    extensions: &[S],
) -> Result<RenameReport, Error> {
    let mut report = RenameReport::default();
    if !dir.is_dir() {
        return Ok(report);
    }

    for path in audio_files(dir, extensions)? {
        let Some(new_path) = suffixed_path(&path, language) else {
            continue;
        };
        let placement = Placement {
            from: path,
            to: new_path,
        };
        if placement.to.exists() {
            tracing::warn!(
                from = %placement.from.display(),
                to = %placement.to.display(),
                "Suffixed name already exists, leaving file in place"
            );
            report.conflicts.push(placement);
            continue;
        }
        tracing::info!(
            "Renaming existing resource {} -> {}",
            placement.from.display(),
            placement.to.display()
        );
        fs::rename(&placement.from, &placement.to)?;
        report.renamed.push(placement);
    }

    Ok(report)
}

/// Copy `<output_root>/<lang>/*` audio into `dest_dir` under suffixed names.
///
/// Returns `None` when nothing was generated for the language. Existing files
/// in the destination are overwritten.
pub fn copy_into_project<S: AsRef<str>>(
    output_root: &Path,
    dest_dir: &Path,
    language: &str,
    extensions: &[S],
) -> Result<Option<Vec<Placement>>, Error> {
    let src = output_root.join(language);
    if !src.is_dir() {
        tracing::warn!(
            language,
            src = %src.display(),
            "No generated files, skipping language"
        );
        return Ok(None);
    }

    fs::create_dir_all(dest_dir)?;
    let mut copied = Vec::new();
    for path in audio_files(&src, extensions)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let dest = dest_dir.join(with_language_suffix(name, language));
        fs::copy(&path, &dest)?;
        tracing::info!("copied {} -> {}", path.display(), dest.display());
        copied.push(Placement {
            from: path,
            to: dest,
        });
    }

    Ok(Some(copied))
}
