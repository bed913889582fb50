//! Support for reading Apple `.strings` localization tables.
//!
//! Only single-line `"key" = "value";` entries are recognized. Everything else
//! (comments, blank lines, malformed entries) is skipped line by line, so one
//! bad line never aborts the rest of the table.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, traits::Parser};

lazy_static! {
    static ref PAIR_REGEX: Regex =
        Regex::new(r#"^\s*"((?:[^"\\]|\\.)+)"\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#).unwrap();
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
}

/// Conventional table name inside each `<lang>.lproj` directory.
pub const DEFAULT_TABLE: &str = "Localizable.strings";

/// Represents an Apple `.strings` localization table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Language code taken from the enclosing `<lang>.lproj` directory, if any.
    pub language: String,
    /// All recognized key-value pairs, in file order. Duplicates are kept.
    pub pairs: Vec<Pair>,
}

impl Format {
    /// Parse a single line, returning `None` when it is not a well-formed entry.
    pub fn parse_line(line: &str) -> Option<Pair> {
        let captures = PAIR_REGEX.captures(line)?;
        Some(Pair {
            key: unescape(&captures[1]),
            value: unescape(&captures[2]),
        })
    }

    /// Pairs whose value has something to say.
    pub fn speakable(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter().filter(|pair| !pair.is_blank())
    }
}

impl Parser for Format {
    /// The language is left empty: it is only known from the file's location.
    fn from_reader<R: std::io::BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        // classic Mac tables end lines with a lone CR
        let pairs = LINE_BREAK_REGEX
            .split(&text)
            .filter_map(Format::parse_line)
            .collect();

        Ok(Format {
            language: String::new(),
            pairs,
        })
    }

    /// BOM-aware decoding, so UTF-16 tables read the same as UTF-8 ones.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        let mut format = Self::from_str(&decoded)?;
        format.language = language_from_path(path).unwrap_or_default();
        Ok(format)
    }
}

/// A single key-value pair in a `.strings` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The key for this localization entry, unescaped.
    pub key: String,
    /// The text for this localization entry, unescaped.
    pub value: String,
}

impl Pair {
    /// Empty or whitespace-only values are parsed but never synthesized.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Location of the strings table for `language` below `root`:
/// `<root>/<language>.lproj/<table>`.
pub fn table_path(root: &Path, language: &str, table: &str) -> PathBuf {
    root.join(format!("{language}.lproj")).join(table)
}

/// Infer the language from the nearest `<lang>.lproj` path component.
pub fn language_from_path(path: &Path) -> Option<String> {
    path.components().rev().find_map(|c| {
        let component = c.as_os_str().to_str()?;
        component
            .strip_suffix(".lproj")
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

/// Decode backslash escapes.
///
/// Handles the single-character escapes (`\n`, `\t`, `\r`, `\0`, `\a`, `\b`,
/// `\f`, `\v`, `\\`, `\"`, `\'`) and Apple's four-digit `\Uxxxx` / `\uxxxx`
/// form, including UTF-16 surrogate pairs. Unknown or truncated escapes are
/// kept verbatim.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' | '"' | '\'' => out.push(next),
            'u' | 'U' => match decode_unicode_escape(&mut chars) {
                Some(decoded) => out.push(decoded),
                None => {
                    out.push('\\');
                    out.push(next);
                }
            },
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Reads four hex digits (and a trailing low surrogate escape when the first
/// unit is a high surrogate). Leaves `chars` untouched on failure.
fn decode_unicode_escape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    fn hex4(chars: &std::str::Chars<'_>) -> Option<u32> {
        let digits: String = chars.clone().take(4).collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(&digits, 16).ok()
    }

    let unit = hex4(chars)?;
    if (0xD800..0xDC00).contains(&unit) {
        let mut ahead = chars.clone();
        ahead.nth(3);
        if ahead.next() == Some('\\') && matches!(ahead.next(), Some('u' | 'U')) {
            if let Some(low) = hex4(&ahead).filter(|low| (0xDC00..0xE000).contains(low)) {
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                let decoded = char::from_u32(combined)?;
                ahead.nth(3);
                *chars = ahead;
                return Some(decoded);
            }
        }
        return None;
    }

    let decoded = char::from_u32(unit)?;
    chars.nth(3);
    Some(decoded)
}
