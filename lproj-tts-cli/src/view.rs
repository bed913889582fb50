use lproj_tts::{AudioEncoding, NamedAudioTarget, Parser, StringsFormat};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::validation::validate_file_path;

/// Display columns shown for a value before it is cut.
const MAX_VALUE_WIDTH: usize = 50;

/// Cut `value` to at most `max_width` display columns, appending "...".
pub fn truncate_to_width(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Print every entry of a strings table with the file name its audio gets.
pub fn print_view(
    format: &StringsFormat,
    lang: Option<&str>,
    encoding: AudioEncoding,
    full: bool,
) {
    let language = lang.unwrap_or(&format.language);
    println!(
        "Language: {}",
        if language.is_empty() { "(unknown)" } else { language }
    );
    println!("Entries: {}", format.pairs.len());

    for (i, pair) in format.pairs.iter().enumerate() {
        println!("\n  Entry {}: {}", i + 1, pair.key);

        let value = pair.value.replace('\n', "\\n");
        let value = if full {
            value
        } else {
            truncate_to_width(&value, MAX_VALUE_WIDTH)
        };
        if pair.is_blank() {
            println!("    Value: (empty - no audio)");
            continue;
        }
        println!("    Value: {}", value);

        let target = NamedAudioTarget::for_entry(&pair.key, language, encoding);
        println!("    File: {}", target.file_name());
        if !language.is_empty() {
            println!("    Deployed as: {}", target.deployed_name(language));
        }
    }
}

pub fn run_view_command(
    input: &str,
    lang: Option<&str>,
    encoding: AudioEncoding,
    full: bool,
) -> Result<(), String> {
    validate_file_path(input)?;
    let format = StringsFormat::read_from(input)
        .map_err(|e| format!("Failed to read {}: {}", input, e))?;
    if format.pairs.is_empty() {
        return Err(format!("No entries found in {}", input));
    }
    print_view(&format, lang, encoding, full);
    Ok(())
}
