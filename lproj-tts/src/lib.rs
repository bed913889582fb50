#![forbid(unsafe_code)]
//! Speech clips for Apple `.strings` localization tables.
//!
//! Reads `<lang>.lproj/Localizable.strings`, synthesizes one audio clip per
//! entry through a text-to-speech provider, and places the clips into an app's
//! resource tree under collision-free, language-suffixed names.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lproj_tts::{
//!     GenerateOptions, GoogleTts, GoogleTtsConfig, VoiceMap, generate,
//!     synthesis::Credentials, types::parse_language_list,
//! };
//!
//! let client = GoogleTts::new(Credentials::from_env()?, GoogleTtsConfig::default())?;
//! let languages = parse_language_list("ja,en")?;
//! let options = GenerateOptions {
//!     strings_root: "MyApp".into(),
//!     ..GenerateOptions::default()
//! };
//! let report = generate(&client, &VoiceMap::new(), &languages, &options);
//! println!("{} files written", report.written());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pieces
//!
//! - [`formats::strings`]: line-oriented `.strings` parser with escape decoding
//! - [`naming`]: safe filenames and the `_<lang>` suffix rule
//! - [`voices`]: language/role to provider voice mapping
//! - [`synthesis`]: the [`Synthesizer`] seam and a Google Cloud client
//! - [`generate`](mod@generate) and [`deploy`]: the batch pipeline

pub mod deploy;
pub mod error;
pub mod formats;
pub mod generate;
pub mod naming;
pub mod synthesis;
pub mod traits;
pub mod types;
pub mod voices;

// Re-export most used types for easy consumption
pub use crate::{
    deploy::{Placement, RenameReport, copy_into_project, rename_existing, tts_dir},
    error::Error,
    formats::{Pair, StringsFormat},
    generate::{
        EntryFailure, GenerateOptions, GenerateReport, LanguageReport, LanguageStatus, generate,
    },
    naming::{NamedAudioTarget, base_filename, sanitize, with_language_suffix},
    synthesis::{GoogleTts, GoogleTtsConfig},
    traits::{Parser, Synthesizer},
    types::{AudioEncoding, LanguageCode, SynthesisRequest},
    voices::VoiceMap,
};
