//! Filename policy for generated audio.
//!
//! A key becomes `sanitize(key).<ext>` in the per-language output directory.
//! When files move into a directory shared by several languages' builds they
//! carry an explicit `_<lang>` suffix. The same suffix predicate is used for
//! freshly copied files and for migrating older unsuffixed ones, so applying
//! it any number of times gives the same name.

use std::path::{Path, PathBuf};

use crate::types::AudioEncoding;

/// Extensions the deployment steps treat as audio when none are configured.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Replace every character that is not an ASCII letter, digit, `_` or `-` with `_`.
///
/// Exactly one output character per input character.
pub fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `sanitize(key)` plus the encoding's extension.
pub fn base_filename(key: &str, encoding: AudioEncoding) -> String {
    format!("{}.{}", sanitize(key), encoding.extension())
}

pub fn has_language_suffix(stem: &str, language: &str) -> bool {
    stem.ends_with(&format!("_{language}"))
}

/// The name a file is stored under in a multi-language destination.
///
/// `greeting.mp3` becomes `greeting_ja.mp3`; `greeting_ja.mp3` is returned as is.
pub fn with_language_suffix(filename: &str, language: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if has_language_suffix(&stem, language) {
        return filename.to_string();
    }

    match path.extension() {
        Some(ext) => format!("{stem}_{language}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{language}"),
    }
}

/// Whether `path` has one of `extensions` (compared case-insensitively, with or without dot).
pub fn is_audio_file<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Destination of one synthesized entry, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedAudioTarget {
    pub relative_path: PathBuf,
}

impl NamedAudioTarget {
    /// `<language>/<sanitize(key)>.<ext>`
    pub fn for_entry(key: &str, language: &str, encoding: AudioEncoding) -> Self {
        NamedAudioTarget {
            relative_path: PathBuf::from(language).join(base_filename(key, encoding)),
        }
    }

    pub fn file_name(&self) -> String {
        self.relative_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name the file will carry once deployed into the shared resource tree.
    pub fn deployed_name(&self, language: &str) -> String {
        with_language_suffix(&self.file_name(), language)
    }
}
