//! Localization table formats lproj-tts can read.
//!
//! Only Apple `.strings` tables are needed to drive speech generation.

pub mod strings;

// Reexporting the formats for easier access
pub use strings::{DEFAULT_TABLE, Format as StringsFormat, Pair};
