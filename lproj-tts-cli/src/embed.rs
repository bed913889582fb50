use std::path::{Path, PathBuf};

use clap::Args;
use lproj_tts::{
    AudioEncoding, copy_into_project, naming::DEFAULT_AUDIO_EXTENSIONS, rename_existing, tts_dir,
};

use crate::config::FileConfig;
use crate::generate::{GenerateSettings, GenerationArgs, check_strict, run_generation, write_report};
use crate::git::{GitOutcome, commit_and_push, manual_recovery_hint};

pub const DEFAULT_RESOURCES: &str = "Resources";

#[derive(Args, Debug, Clone, Default)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Reuse audio already in the output directory instead of synthesizing
    #[arg(long, default_value_t = false)]
    pub skip_generate: bool,

    /// App resource directory; audio goes to <resources>/TTS/<lang>
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Do not stage or commit anything
    #[arg(long, default_value_t = false)]
    pub no_git: bool,

    /// Commit but do not push
    #[arg(long, default_value_t = false)]
    pub no_push: bool,

    /// Commit message (defaults to one naming the languages)
    #[arg(long)]
    pub message: Option<String>,
}

/// Per-language counts from the deploy step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySummary {
    pub renamed: usize,
    pub conflicts: usize,
    pub copied: usize,
    /// Language directories whose contents changed.
    pub touched: Vec<PathBuf>,
}

/// Rename legacy files then copy fresh audio for every language.
pub fn deploy_languages(
    settings: &GenerateSettings,
    resources: &Path,
    extensions: &[String],
) -> Result<DeploySummary, String> {
    let mut summary = DeploySummary::default();
    for language in &settings.languages {
        let lang = language.as_str();
        let dest = tts_dir(resources, lang);

        let renamed = rename_existing(&dest, lang, extensions)
            .map_err(|e| format!("Failed to rename files in {}: {}", dest.display(), e))?;
        for conflict in &renamed.conflicts {
            eprintln!(
                "Not renaming {}: {} already exists",
                conflict.from.display(),
                conflict.to.display()
            );
        }
        summary.renamed += renamed.renamed.len();
        summary.conflicts += renamed.conflicts.len();
        let migrated = !renamed.renamed.is_empty();

        let copied = copy_into_project(&settings.options.output_root, &dest, lang, extensions)
            .map_err(|e| format!("Failed to copy audio into {}: {}", dest.display(), e))?;
        let copied_any = match copied {
            Some(placements) => {
                println!("{}: {} file(s) -> {}", lang, placements.len(), dest.display());
                summary.copied += placements.len();
                true
            }
            None => {
                println!(
                    "{}: nothing generated in {} - skipping",
                    lang,
                    settings.options.output_root.join(lang).display()
                );
                false
            }
        };
        // migrated names are changes too
        if copied_any || migrated {
            summary.touched.push(dest);
        }
    }
    Ok(summary)
}

/// Extensions the deploy step moves: the configured list, or the defaults
/// plus whatever the selected encoding produces.
pub fn audio_extensions(config: &FileConfig, encoding: AudioEncoding) -> Vec<String> {
    if let Some(configured) = &config.audio_extensions {
        return configured.clone();
    }
    let mut extensions: Vec<String> = DEFAULT_AUDIO_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect();
    let produced = encoding.extension();
    if !extensions.iter().any(|e| e.eq_ignore_ascii_case(produced)) {
        extensions.push(produced.to_string());
    }
    extensions
}

pub fn default_message(settings: &GenerateSettings) -> String {
    let langs = settings
        .languages
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!("Add generated TTS for langs: {}", langs)
}

pub fn run_embed_command(args: &EmbedArgs, config: &FileConfig) -> Result<(), String> {
    let settings = GenerateSettings::resolve(&args.generation, config)?;
    let resources = args
        .resources
        .clone()
        .or_else(|| config.resources.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES));
    let extensions = audio_extensions(config, settings.options.encoding);

    let report = if args.skip_generate {
        None
    } else {
        let report = run_generation(&settings)?;
        if let Some(path) = &args.generation.report_json {
            write_report(path, &report)?;
            println!("Report JSON written: {}", path);
        }
        Some(report)
    };

    let summary = deploy_languages(&settings, &resources, &extensions)?;
    println!(
        "Deployed {} file(s), renamed {} existing file(s)",
        summary.copied, summary.renamed
    );

    if args.no_git {
        println!("Skipping git (--no-git)");
    } else if summary.touched.is_empty() {
        println!("Nothing to commit");
    } else {
        let message = args
            .message
            .clone()
            .unwrap_or_else(|| default_message(&settings));
        match commit_and_push(Path::new("."), &summary.touched, &message, !args.no_push) {
            Ok(GitOutcome::NothingToCommit) => println!("No changes to commit"),
            Ok(GitOutcome::Committed) => println!("Committed: {}", message),
            Ok(GitOutcome::CommittedAndPushed) => println!("Committed and pushed: {}", message),
            Err(e) => {
                eprintln!("{}", e);
                eprintln!("{}", manual_recovery_hint(&summary.touched));
            }
        }
    }

    if args.generation.strict {
        if let Some(report) = &report {
            check_strict(report)?;
        }
    }
    Ok(())
}
