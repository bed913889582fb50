//! Core value types shared by the parser, the namer and the synthesis pipeline.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A short language identifier such as `ja` or `en`.
///
/// It selects both the `<code>.lproj` strings table and the synthesis locale.
/// The code is kept exactly as the operator typed it, since it also becomes
/// part of directory names and filename suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) || trimmed.ends_with('-') {
            return Err(Error::InvalidLanguage(s.to_string()));
        }
        // `und` parses fine but means nothing to a strings table or a voice.
        match trimmed.parse::<LanguageIdentifier>() {
            Ok(id) if id.language.as_str() != "und" => Ok(LanguageCode(trimmed.to_string())),
            _ => Err(Error::InvalidLanguage(s.to_string())),
        }
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a comma-separated language list (`"ja, en"`), dropping empty segments.
pub fn parse_language_list(list: &str) -> Result<Vec<LanguageCode>, Error> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(LanguageCode::from_str)
        .collect()
}

/// Audio container requested from the synthesis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Wav,
    OggOpus,
}

impl AudioEncoding {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::Wav => "wav",
            AudioEncoding::OggOpus => "ogg",
        }
    }

    /// Encoding name on the provider's wire format.
    pub fn provider_name(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Wav => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
        }
    }
}

impl FromStr for AudioEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.replace('-', "_").as_str() {
            "mp3" => Ok(AudioEncoding::Mp3),
            "wav" | "linear16" => Ok(AudioEncoding::Wav),
            "ogg" | "ogg_opus" | "opus" => Ok(AudioEncoding::OggOpus),
            _ => Err(Error::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for AudioEncoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AudioEncoding> for String {
    fn from(value: AudioEncoding) -> Self {
        value.extension().to_string()
    }
}

impl Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// One call to the synthesis provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text to speak.
    pub text: String,
    /// Provider locale, e.g. `ja-JP`.
    pub locale: String,
    /// Provider voice name; `None` lets the provider pick one for the locale.
    pub voice: Option<String>,
    pub encoding: AudioEncoding,
    pub speaking_rate: f32,
    pub pitch: f32,
}
