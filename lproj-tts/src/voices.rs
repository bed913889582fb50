//! Voice selection: which provider voice and locale speak a given language.
//!
//! Operator configuration is layered over built-in defaults:
//!
//! 1. an explicit voice for the language (`--voice-map ja:ja-JP-Wavenet-B`),
//! 2. the voice of the requested role label (`girl`, `boy`, `robot`, ...),
//!    operator entries first, then the built-in role table,
//! 3. with no role requested, the first operator role entry for the language,
//! 4. the built-in voice for the language,
//! 5. nothing, letting the provider choose from the locale alone.

use std::collections::BTreeMap;

use crate::{error::Error, types::LanguageCode};

/// Built-in `(role, language, voice)` entries.
const BUILTIN_ROLE_VOICES: &[(&str, &str, &str)] = &[
    ("girl", "ja", "ja-JP-Neural2-C"),
    ("girl", "en", "en-US-Neural2-C"),
    ("boy", "ja", "ja-JP-Neural2-B"),
    ("boy", "en", "en-US-Neural2-B"),
    ("robot", "ja", "ja-JP-Chirp3-HD-Achernar"),
    ("robot", "en", "en-US-Chirp3-HD-Achernar"),
];

const BUILTIN_LANGUAGE_VOICES: &[(&str, &str)] =
    &[("ja", "ja-JP-Wavenet-A"), ("en", "en-US-Wavenet-A")];

const BUILTIN_LOCALES: &[(&str, &str)] = &[("ja", "ja-JP"), ("en", "en-US")];

/// An operator-supplied `(role, language) -> voice` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleVoice {
    pub label: String,
    pub language: String,
    pub voice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceMap {
    languages: BTreeMap<String, String>,
    locales: BTreeMap<String, String>,
    roles: Vec<RoleVoice>,
}

impl VoiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language_voice(mut self, language: &str, voice: &str) -> Self {
        self.set_language_voice(language, voice);
        self
    }

    pub fn with_locale(mut self, language: &str, locale: &str) -> Self {
        self.set_locale(language, locale);
        self
    }

    pub fn with_role_voice(mut self, label: &str, language: &str, voice: &str) -> Self {
        self.add_role_voice(label, language, voice);
        self
    }

    pub fn set_language_voice(&mut self, language: &str, voice: &str) {
        self.languages
            .insert(language.trim().to_string(), voice.trim().to_string());
    }

    pub fn set_locale(&mut self, language: &str, locale: &str) {
        self.locales
            .insert(language.trim().to_string(), locale.trim().to_string());
    }

    /// Later entries for the same `(label, language)` replace earlier ones in place.
    pub fn add_role_voice(&mut self, label: &str, language: &str, voice: &str) {
        let label = label.trim();
        let language = language.trim();
        let voice = voice.trim().to_string();
        match self
            .roles
            .iter_mut()
            .find(|r| r.label == label && r.language == language)
        {
            Some(existing) => existing.voice = voice,
            None => self.roles.push(RoleVoice {
                label: label.to_string(),
                language: language.to_string(),
                voice,
            }),
        }
    }

    /// Merge a `lang:voice,lang:voice` list of explicit per-language voices.
    pub fn extend_from_voice_map(&mut self, spec: &str) -> Result<(), Error> {
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (language, voice) = part
                .split_once(':')
                .map(|(l, v)| (l.trim(), v.trim()))
                .filter(|(l, v)| !l.is_empty() && !v.is_empty())
                .ok_or_else(|| {
                    Error::InvalidVoiceMap(format!("expected `lang:voice`, got `{part}`"))
                })?;
            self.set_language_voice(language, voice);
        }
        Ok(())
    }

    /// Merge a `label:lang:voice,...` list of role voices.
    ///
    /// The short `label:voice` form is accepted only when exactly one language
    /// is being generated, and applies to that language. Malformed segments are
    /// skipped and returned so the caller can report them.
    pub fn extend_from_role_map(&mut self, spec: &str, languages: &[LanguageCode]) -> Vec<String> {
        let mut ignored = Vec::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let segments: Vec<&str> = part.split(':').map(str::trim).collect();
            match segments.as_slice() {
                [label, language, voice]
                    if !label.is_empty() && !language.is_empty() && !voice.is_empty() =>
                {
                    self.add_role_voice(label, language, voice);
                }
                [label, voice] if languages.len() == 1 && !label.is_empty() && !voice.is_empty() => {
                    self.add_role_voice(label, languages[0].as_str(), voice);
                }
                _ => {
                    tracing::warn!(segment = part, "Ignoring malformed role map segment");
                    ignored.push(part.to_string());
                }
            }
        }
        ignored
    }

    /// Provider locale for a language (`ja` -> `ja-JP`); unknown codes pass through.
    pub fn locale_for(&self, language: &str) -> String {
        self.locales
            .get(language)
            .map(String::as_str)
            .or_else(|| lookup(BUILTIN_LOCALES, language))
            .unwrap_or(language)
            .to_string()
    }

    /// Voice of `label` for `language`, operator table first.
    pub fn role_voice(&self, label: &str, language: &str) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.label == label && r.language == language)
            .map(|r| r.voice.as_str())
            .or_else(|| {
                BUILTIN_ROLE_VOICES
                    .iter()
                    .find(|(l, lang, _)| *l == label && *lang == language)
                    .map(|(_, _, voice)| *voice)
            })
    }

    /// Pick the voice for `language`, optionally for a role label.
    pub fn resolve(&self, language: &str, role: Option<&str>) -> Option<String> {
        if let Some(voice) = self.languages.get(language) {
            return Some(voice.clone());
        }

        let from_role = match role {
            Some(label) => {
                let voice = self.role_voice(label, language);
                if voice.is_none() {
                    tracing::warn!(
                        role = label,
                        language,
                        "No voice configured for role, falling back to language default"
                    );
                }
                voice
            }
            None => self
                .roles
                .iter()
                .find(|r| r.language == language)
                .map(|r| r.voice.as_str()),
        };

        from_role
            .or_else(|| lookup(BUILTIN_LANGUAGE_VOICES, language))
            .map(str::to_string)
    }

    /// All role labels known for a language, built-ins included, without duplicates.
    pub fn role_labels(&self, language: &str) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        let operator = self
            .roles
            .iter()
            .filter(|r| r.language == language)
            .map(|r| r.label.as_str());
        let builtin = BUILTIN_ROLE_VOICES
            .iter()
            .filter(|(_, lang, _)| *lang == language)
            .map(|(label, _, _)| *label);
        for label in operator.chain(builtin) {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        labels
    }
}

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
