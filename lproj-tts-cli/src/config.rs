//! Optional `lproj-tts.toml` project configuration.
//!
//! Precedence, highest first: command-line flag, config file, built-in default.
//!
//! ```toml
//! langs = "ja,en"
//! strings_root = "MyApp"
//! output = "tts_output"
//! resources = "MyApp/MyApp/Resources"
//! encoding = "mp3"
//! rate = 1.0
//! pitch = 2.0
//!
//! [voices]
//! ja = "ja-JP-Wavenet-B"
//!
//! [roles.girl]
//! ja = "ja-JP-Neural2-C"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lproj_tts::{AudioEncoding, VoiceMap};
use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lproj-tts.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub langs: Option<String>,
    pub strings_root: Option<PathBuf>,
    pub table: Option<String>,
    pub output: Option<PathBuf>,
    pub resources: Option<PathBuf>,
    pub encoding: Option<AudioEncoding>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub project: Option<String>,
    pub role: Option<String>,
    pub audio_extensions: Option<Vec<String>>,
    /// language -> voice
    pub voices: BTreeMap<String, String>,
    /// language -> provider locale
    pub locales: BTreeMap<String, String>,
    /// role label -> (language -> voice)
    pub roles: BTreeMap<String, BTreeMap<String, String>>,
}

impl FileConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Voice map seeded from the `[voices]`, `[locales]` and `[roles.*]` tables.
    pub fn voice_map(&self) -> VoiceMap {
        let mut voices = VoiceMap::new();
        for (language, voice) in &self.voices {
            voices.set_language_voice(language, voice);
        }
        for (language, locale) in &self.locales {
            voices.set_locale(language, locale);
        }
        for (label, per_language) in &self.roles {
            for (language, voice) in per_language {
                voices.add_role_voice(label, language, voice);
            }
        }
        voices
    }
}

/// Load the config file.
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig, String> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if !path.is_file() {
        if required {
            return Err(format!("Config file does not exist: {}", path.display()));
        }
        return Ok(FileConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
    let config = FileConfig::from_toml_str(&text)
        .map_err(|e| format!("{} ({})", e, path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
