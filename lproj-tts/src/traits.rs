//! Traits at the seams of lproj-tts: reading localization tables and turning text into audio.

use std::{
    io::{BufRead, Cursor},
    path::Path,
};

use crate::{error::Error, types::SynthesisRequest};

/// A trait for parsing a localization table from one file.
///
/// # Example
///
/// ```rust,no_run
/// use lproj_tts::traits::Parser;
/// let table = lproj_tts::formats::strings::Format::read_from("ja.lproj/Localizable.strings")?;
/// println!("{} entries", table.pairs.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// Anything that is not an existing regular file is reported as [`Error::NotFound`].
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// A text-to-speech backend.
///
/// Calls are made strictly one at a time; implementations need not be thread-safe.
pub trait Synthesizer {
    /// Synthesize `request.text` and return the encoded audio bytes.
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error>;
}

impl<S: Synthesizer + ?Sized> Synthesizer for &S {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        (**self).synthesize(request)
    }
}

impl<S: Synthesizer + ?Sized> Synthesizer for Box<S> {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        (**self).synthesize(request)
    }
}
