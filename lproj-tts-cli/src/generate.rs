use std::path::PathBuf;

use clap::Args;
use lproj_tts::{
    AudioEncoding, GenerateOptions, GenerateReport, GoogleTts, GoogleTtsConfig, LanguageCode,
    LanguageStatus, VoiceMap, generate,
    formats::DEFAULT_TABLE,
    synthesis::{Credentials, detect_project_id_from_env, service_disabled_hint},
};
use serde_json::json;

use crate::config::FileConfig;
use crate::validation::{validate_languages, validate_pitch, validate_rate};

pub const DEFAULT_LANGS: &str = "ja";
pub const DEFAULT_OUTPUT: &str = "tts_output";
pub const DEFAULT_RATE: f32 = 1.0;
/// Slightly raised pitch for a brighter voice.
pub const DEFAULT_PITCH: f32 = 2.0;

/// Flags shared by `generate` and `embed`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Comma-separated languages to generate (e.g. ja,en)
    #[arg(long)]
    pub langs: Option<String>,

    /// Directory containing the <lang>.lproj folders
    #[arg(long)]
    pub strings_root: Option<PathBuf>,

    /// Strings table file name inside each .lproj folder
    #[arg(long)]
    pub table: Option<String>,

    /// Base output directory for generated audio
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Explicit voices per language, e.g. "ja:ja-JP-Wavenet-A,en:en-US-Wavenet-A"
    #[arg(long)]
    pub voice_map: Option<String>,

    /// Role voices, e.g. "girl:ja:ja-JP-Neural2-C,boy:ja:ja-JP-Neural2-B"
    #[arg(long)]
    pub friendly_map: Option<String>,

    /// Role label whose voice to use (girl, boy, robot, or one from --friendly-map)
    #[arg(long)]
    pub role: Option<String>,

    /// Speaking rate (default 1.0)
    #[arg(long)]
    pub rate: Option<f32>,

    /// Pitch in semitones (default 2.0)
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: Option<f32>,

    /// Audio encoding: mp3, wav or ogg
    #[arg(long)]
    pub encoding: Option<AudioEncoding>,

    /// Google Cloud project id (detected from GOOGLE_APPLICATION_CREDENTIALS if omitted)
    #[arg(long)]
    pub project: Option<String>,

    /// Exit non-zero if any entry failed or any language was skipped
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub report_json: Option<String>,
}

/// Everything a generation run needs, after merging flags, config and defaults.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    pub languages: Vec<LanguageCode>,
    pub options: GenerateOptions,
    pub voices: VoiceMap,
    pub project: Option<String>,
}

impl GenerateSettings {
    pub fn resolve(args: &GenerationArgs, config: &FileConfig) -> Result<Self, String> {
        let langs = args
            .langs
            .as_deref()
            .or(config.langs.as_deref())
            .unwrap_or(DEFAULT_LANGS);
        let languages = validate_languages(langs)?;

        let speaking_rate = args.rate.or(config.rate).unwrap_or(DEFAULT_RATE);
        validate_rate(speaking_rate)?;
        let pitch = args.pitch.or(config.pitch).unwrap_or(DEFAULT_PITCH);
        validate_pitch(pitch)?;

        let mut voices = config.voice_map();
        if let Some(spec) = &args.voice_map {
            voices.extend_from_voice_map(spec).map_err(|e| e.to_string())?;
        }
        if let Some(spec) = &args.friendly_map {
            for segment in voices.extend_from_role_map(spec, &languages) {
                eprintln!("Ignoring malformed friendly-map segment: {}", segment);
            }
        }

        let options = GenerateOptions {
            strings_root: args
                .strings_root
                .clone()
                .or_else(|| config.strings_root.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            table: args
                .table
                .clone()
                .or_else(|| config.table.clone())
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            output_root: args
                .out
                .clone()
                .or_else(|| config.output.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            encoding: args.encoding.or(config.encoding).unwrap_or_default(),
            speaking_rate,
            pitch,
            role: args.role.clone().or_else(|| config.role.clone()),
        };

        let project = args.project.clone().or_else(|| config.project.clone());

        let settings = GenerateSettings {
            languages,
            options,
            voices,
            project,
        };
        for warning in settings.unvoiced_role_warnings() {
            eprintln!("{}", warning);
        }
        Ok(settings)
    }

    /// One line per language the selected role has no voice for, naming the
    /// roles that language does have.
    pub fn unvoiced_role_warnings(&self) -> Vec<String> {
        let Some(role) = self.options.role.as_deref() else {
            return Vec::new();
        };
        self.languages
            .iter()
            .map(LanguageCode::as_str)
            .filter(|lang| self.voices.role_voice(role, lang).is_none())
            .map(|lang| {
                let known = self.voices.role_labels(lang);
                let known = if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                };
                format!(
                    "Role '{}' has no voice for {} (known roles: {}); using the language default",
                    role, lang, known
                )
            })
            .collect()
    }

    /// Explicit project id, or the one in the service-account file.
    pub fn project_id(&self) -> Option<String> {
        self.project.clone().or_else(detect_project_id_from_env)
    }
}

/// Run the synthesis step against Google Cloud and print a summary.
pub fn run_generation(settings: &GenerateSettings) -> Result<GenerateReport, String> {
    let credentials = Credentials::from_env().map_err(|e| e.to_string())?;
    let project_id = settings.project_id();
    let client = GoogleTts::new(
        credentials,
        GoogleTtsConfig::default().with_project_id(project_id.clone()),
    )
    .map_err(|e| format!("Failed to initialize the speech client: {}", e))?;

    let report = generate(
        &client,
        &settings.voices,
        &settings.languages,
        &settings.options,
    );
    print_report(&report, project_id.as_deref());
    Ok(report)
}

pub fn print_report(report: &GenerateReport, project_id: Option<&str>) {
    for language in &report.languages {
        match &language.status {
            LanguageStatus::Processed => println!(
                "{}: {} written, {} empty skipped, {} failed",
                language.language,
                language.written.len(),
                language.skipped_blank.len(),
                language.failures.len()
            ),
            LanguageStatus::MissingInput => println!(
                "{}: strings file not found: {} - skipping",
                language.language,
                language.strings_path.display()
            ),
            LanguageStatus::Unreadable(reason) => println!(
                "{}: cannot read {}: {} - skipping",
                language.language,
                language.strings_path.display(),
                reason
            ),
            LanguageStatus::EmptyInput => println!(
                "{}: no strings found in {} - skipping",
                language.language,
                language.strings_path.display()
            ),
            LanguageStatus::OutputUnavailable(reason) => println!(
                "{}: cannot create output directory: {} - skipping",
                language.language, reason
            ),
        }
        for failure in &language.failures {
            eprintln!(
                "Failed to synthesize '{}' for {}: {}",
                failure.key, language.language, failure.message
            );
        }
    }

    if report.any_service_disabled() {
        eprintln!("{}", service_disabled_hint(project_id));
    }
}

/// Machine-readable summary of a run.
pub fn report_to_json(report: &GenerateReport) -> serde_json::Value {
    let languages: Vec<_> = report
        .languages
        .iter()
        .map(|l| {
            let status = match &l.status {
                LanguageStatus::Processed => "processed",
                LanguageStatus::MissingInput => "missing_input",
                LanguageStatus::Unreadable(_) => "unreadable",
                LanguageStatus::EmptyInput => "empty_input",
                LanguageStatus::OutputUnavailable(_) => "output_unavailable",
            };
            json!({
                "language": l.language.as_str(),
                "strings": l.strings_path,
                "status": status,
                "written": l.written,
                "skipped_blank": l.skipped_blank,
                "failures": l.failures.iter().map(|f| json!({
                    "key": f.key,
                    "message": f.message,
                    "service_disabled": f.service_disabled,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "written": report.written(),
        "clean": report.is_clean(),
        "languages": languages,
    })
}

pub fn write_report(path: &str, report: &GenerateReport) -> Result<(), String> {
    let text = serde_json::to_string_pretty(&report_to_json(report))
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write report JSON '{}': {}", path, e))
}

/// `--strict`: any skipped language or failed entry fails the command.
pub fn check_strict(report: &GenerateReport) -> Result<(), String> {
    let failed = report.failures().count();
    let skipped = report.skipped_languages().count();
    if failed == 0 && skipped == 0 {
        return Ok(());
    }
    Err(format!(
        "Strict mode failure (failed entries={}, skipped languages={})",
        failed, skipped
    ))
}

pub fn run_generate_command(
    settings: &GenerateSettings,
    report_json: Option<&str>,
    strict: bool,
) -> Result<(), String> {
    let report = run_generation(settings)?;
    if let Some(path) = report_json {
        write_report(path, &report)?;
        println!("Report JSON written: {}", path);
    }
    println!("\nAll done. {} file(s) written.", report.written());
    if strict {
        check_strict(&report)?;
    }
    Ok(())
}
