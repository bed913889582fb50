//! Strings table -> audio files, one language and one entry at a time.
//!
//! A missing or empty table skips that language; a blank value or a failed
//! synthesis skips that entry. Nothing here aborts the whole batch.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    formats::strings::{self, DEFAULT_TABLE, Format},
    naming::NamedAudioTarget,
    traits::{Parser, Synthesizer},
    types::{AudioEncoding, LanguageCode, SynthesisRequest},
    voices::VoiceMap,
};

/// Where to read tables, where to write audio, and how to voice it.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory containing the `<lang>.lproj` folders.
    pub strings_root: PathBuf,
    /// Table file name inside each `.lproj` folder.
    pub table: String,
    /// Audio is written to `<output_root>/<lang>/`.
    pub output_root: PathBuf,
    pub encoding: AudioEncoding,
    pub speaking_rate: f32,
    pub pitch: f32,
    /// Role label used to pick voices, if any.
    pub role: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            strings_root: PathBuf::from("."),
            table: DEFAULT_TABLE.to_string(),
            output_root: PathBuf::from("tts_output"),
            encoding: AudioEncoding::Mp3,
            speaking_rate: 1.0,
            pitch: 2.0,
            role: None,
        }
    }
}

impl GenerateOptions {
    pub fn table_path(&self, language: &str) -> PathBuf {
        strings::table_path(&self.strings_root, language, &self.table)
    }
}

/// What happened to one requested language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageStatus {
    Processed,
    /// The strings table does not exist.
    MissingInput,
    /// The table exists but could not be decoded.
    Unreadable(String),
    /// The table exists but has no entries.
    EmptyInput,
    /// The output directory could not be created.
    OutputUnavailable(String),
}

/// A single entry that could not be synthesized or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub key: String,
    pub message: String,
    /// The provider reported its speech API as not enabled for the account.
    pub service_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: LanguageCode,
    pub strings_path: PathBuf,
    pub status: LanguageStatus,
    pub written: Vec<PathBuf>,
    /// Keys whose value was blank.
    pub skipped_blank: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

impl LanguageReport {
    fn new(language: &LanguageCode, strings_path: PathBuf, status: LanguageStatus) -> Self {
        Self {
            language: language.clone(),
            strings_path,
            status,
            written: Vec::new(),
            skipped_blank: Vec::new(),
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub languages: Vec<LanguageReport>,
}

impl GenerateReport {
    pub fn written(&self) -> usize {
        self.languages.iter().map(|l| l.written.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&LanguageCode, &EntryFailure)> {
        self.languages
            .iter()
            .flat_map(|l| l.failures.iter().map(move |f| (&l.language, f)))
    }

    pub fn skipped_languages(&self) -> impl Iterator<Item = &LanguageReport> {
        self.languages
            .iter()
            .filter(|l| l.status != LanguageStatus::Processed)
    }

    pub fn any_service_disabled(&self) -> bool {
        self.failures().any(|(_, f)| f.service_disabled)
    }

    /// No skipped language and no failed entry.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none() && self.skipped_languages().next().is_none()
    }
}

/// Generate audio for every speakable entry of every requested language.
pub fn generate<S: Synthesizer + ?Sized>(
    synthesizer: &S,
    voices: &VoiceMap,
    languages: &[LanguageCode],
    options: &GenerateOptions,
) -> GenerateReport {
    let languages = languages
        .iter()
        .map(|language| generate_language(synthesizer, voices, language, options))
        .collect();
    GenerateReport { languages }
}

fn generate_language<S: Synthesizer + ?Sized>(
    synthesizer: &S,
    voices: &VoiceMap,
    language: &LanguageCode,
    options: &GenerateOptions,
) -> LanguageReport {
    let strings_path = options.table_path(language.as_str());

    let table = match Format::read_from(&strings_path) {
        Ok(table) => table,
        Err(Error::NotFound(_)) => {
            tracing::warn!(
                language = %language,
                path = %strings_path.display(),
                "Strings file not found, skipping language"
            );
            return LanguageReport::new(language, strings_path, LanguageStatus::MissingInput);
        }
        Err(e) => {
            tracing::warn!(language = %language, error = %e, "Cannot read strings file, skipping language");
            return LanguageReport::new(
                language,
                strings_path,
                LanguageStatus::Unreadable(e.to_string()),
            );
        }
    };

    if table.pairs.is_empty() {
        tracing::warn!(
            language = %language,
            path = %strings_path.display(),
            "No strings found, skipping language"
        );
        return LanguageReport::new(language, strings_path, LanguageStatus::EmptyInput);
    }

    let out_dir = options.output_root.join(language.as_str());
    if let Err(e) = fs::create_dir_all(&out_dir) {
        tracing::warn!(language = %language, error = %e, "Cannot create output directory");
        return LanguageReport::new(
            language,
            strings_path,
            LanguageStatus::OutputUnavailable(e.to_string()),
        );
    }

    let locale = voices.locale_for(language.as_str());
    let voice = voices.resolve(language.as_str(), options.role.as_deref());
    tracing::info!(
        language = %language,
        entries = table.pairs.len(),
        locale = %locale,
        voice = voice.as_deref().unwrap_or("<provider default>"),
        out_dir = %out_dir.display(),
        "Generating audio"
    );

    let mut report = LanguageReport::new(language, strings_path, LanguageStatus::Processed);
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pair in table.pairs.iter().filter(|pair| pair.is_blank()) {
        tracing::info!(key = %pair.key, "Skipping empty value");
        report.skipped_blank.push(pair.key.clone());
    }

    for pair in table.speakable() {
        let target = NamedAudioTarget::for_entry(&pair.key, language.as_str(), options.encoding);
        let out_path = options.output_root.join(&target.relative_path);
        if !seen.insert(out_path.clone()) {
            tracing::warn!(
                key = %pair.key,
                path = %out_path.display(),
                "Another entry already wrote this file, overwriting"
            );
        }

        tracing::info!("Generating {} <- {}", target.relative_path.display(), pair.value);
        let request = SynthesisRequest {
            text: pair.value.clone(),
            locale: locale.clone(),
            voice: voice.clone(),
            encoding: options.encoding,
            speaking_rate: options.speaking_rate,
            pitch: options.pitch,
        };

        match synthesize_to(synthesizer, &request, &out_path) {
            Ok(()) => report.written.push(out_path),
            Err(e) => {
                tracing::warn!(key = %pair.key, language = %language, error = %e, "Failed to synthesize");
                report.failures.push(EntryFailure {
                    key: pair.key.clone(),
                    message: e.to_string(),
                    service_disabled: e.is_service_disabled(),
                });
            }
        }
    }

    report
}

fn synthesize_to<S: Synthesizer + ?Sized>(
    synthesizer: &S,
    request: &SynthesisRequest,
    out_path: &Path,
) -> Result<(), Error> {
    let audio = synthesizer.synthesize(request)?;
    fs::write(out_path, audio)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.table, "Localizable.strings");
        assert_eq!(options.speaking_rate, 1.0);
        assert_eq!(options.pitch, 2.0);
        assert_eq!(
            options.table_path("ja"),
            PathBuf::from(".").join("ja.lproj").join("Localizable.strings")
        );
    }

    #[test]
    fn test_report_helpers() {
        let ja: LanguageCode = "ja".parse().unwrap();
        let mut processed = LanguageReport::new(&ja, PathBuf::new(), LanguageStatus::Processed);
        processed.written.push(PathBuf::from("ja/a.mp3"));
        let report = GenerateReport {
            languages: vec![processed.clone()],
        };
        assert_eq!(report.written(), 1);
        assert!(report.is_clean());
        assert!(!report.any_service_disabled());

        processed.failures.push(EntryFailure {
            key: "b".to_string(),
            message: "HTTP 403".to_string(),
            service_disabled: true,
        });
        let report = GenerateReport {
            languages: vec![processed],
        };
        assert!(!report.is_clean());
        assert!(report.any_service_disabled());
    }
}
