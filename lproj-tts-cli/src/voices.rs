use lproj_tts::{
    GoogleTts, GoogleTtsConfig,
    synthesis::{Credentials, VoiceInfo},
};

pub fn format_voice(voice: &VoiceInfo) -> String {
    let gender = if voice.ssml_gender.is_empty() {
        "UNSPECIFIED"
    } else {
        voice.ssml_gender.as_str()
    };
    format!(
        "{}\tgender={}\tlanguages={}",
        voice.name,
        gender,
        voice.language_codes.join(",")
    )
}

/// Print the provider's voices, optionally only those for one language.
pub fn run_voices_command(lang: Option<&str>, project: Option<String>) -> Result<(), String> {
    let credentials = Credentials::from_env().map_err(|e| e.to_string())?;
    let client = GoogleTts::new(credentials, GoogleTtsConfig::default().with_project_id(project))
        .map_err(|e| format!("Failed to initialize the speech client: {}", e))?;

    let mut voices = client
        .list_voices(lang)
        .map_err(|e| format!("Failed to list voices: {}", e))?;
    voices.sort_by(|a, b| a.name.cmp(&b.name));

    if voices.is_empty() {
        match lang {
            Some(lang) => println!("No voices found for language: {}", lang),
            None => println!("No voices found"),
        }
        return Ok(());
    }
    for voice in &voices {
        println!("{}", format_voice(voice));
    }
    println!("\n{} voice(s)", voices.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_voice() {
        let voice = VoiceInfo {
            name: "ja-JP-Neural2-B".to_string(),
            language_codes: vec!["ja-JP".to_string()],
            ssml_gender: "FEMALE".to_string(),
            natural_sample_rate_hertz: 24000,
        };
        assert_eq!(
            format_voice(&voice),
            "ja-JP-Neural2-B\tgender=FEMALE\tlanguages=ja-JP"
        );
    }
}
