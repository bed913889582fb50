use std::path::Path;

use lproj_tts::{LanguageCode, types::parse_language_list};

/// Speaking rates the provider accepts.
pub const RATE_RANGE: (f32, f32) = (0.25, 4.0);
/// Pitch shifts (semitones) the provider accepts.
pub const PITCH_RANGE: (f32, f32) = (-20.0, 20.0);

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Parse a comma-separated language list, requiring at least one language
pub fn validate_languages(list: &str) -> Result<Vec<LanguageCode>, String> {
    let languages = parse_language_list(list).map_err(|e| {
        format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            e
        )
    })?;
    if languages.is_empty() {
        return Err("No languages specified via --langs".to_string());
    }
    Ok(languages)
}

pub fn validate_rate(rate: f32) -> Result<(), String> {
    validate_range("speaking rate", rate, RATE_RANGE)
}

pub fn validate_pitch(pitch: f32) -> Result<(), String> {
    validate_range("pitch", pitch, PITCH_RANGE)
}

fn validate_range(name: &str, value: f32, (min, max): (f32, f32)) -> Result<(), String> {
    if !value.is_finite() || value < min || value > max {
        return Err(format!(
            "Invalid {}: {}. Expected a value between {} and {}",
            name, value, min, max
        ));
    }
    Ok(())
}
