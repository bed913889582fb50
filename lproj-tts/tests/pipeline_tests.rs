use std::cell::RefCell;
use std::fs;
use std::path::Path;

use indoc::indoc;
use lproj_tts::{
    AudioEncoding, Error, GenerateOptions, LanguageCode, LanguageStatus, SynthesisRequest,
    Synthesizer, VoiceMap, copy_into_project, generate, rename_existing, tts_dir,
};
use tempfile::TempDir;

/// Records every request and answers with the text's bytes, failing on demand.
#[derive(Default)]
struct FakeSynthesizer {
    requests: RefCell<Vec<SynthesisRequest>>,
    fail_on: Option<(&'static str, &'static str)>,
}

impl FakeSynthesizer {
    fn failing_on(text: &'static str, message: &'static str) -> Self {
        Self {
            fail_on: Some((text, message)),
            ..Default::default()
        }
    }
}

impl Synthesizer for FakeSynthesizer {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        self.requests.borrow_mut().push(request.clone());
        match self.fail_on {
            Some((text, message)) if request.text == text => {
                Err(Error::synthesis(message, Some(403)))
            }
            _ => Ok(request.text.as_bytes().to_vec()),
        }
    }
}

fn write_table(root: &Path, lang: &str, content: &str) {
    let dir = root.join(format!("{lang}.lproj"));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Localizable.strings"), content).unwrap();
}

fn langs(codes: &[&str]) -> Vec<LanguageCode> {
    codes.iter().map(|c| c.parse().unwrap()).collect()
}

fn options(root: &Path) -> GenerateOptions {
    GenerateOptions {
        strings_root: root.join("App"),
        output_root: root.join("tts_output"),
        ..GenerateOptions::default()
    }
}

#[test]
fn test_generate_writes_one_file_per_speakable_entry() {
    let temp_dir = TempDir::new().unwrap();
    write_table(
        &temp_dir.path().join("App"),
        "ja",
        indoc! {r#"
            /* Greetings */
            "greeting_hello" = "こんにちは";
            "a\"b" = "line1\nline2";
            "empty_key" = "";
            not an entry
        "#},
    );
    let synth = FakeSynthesizer::default();
    let options = options(temp_dir.path());

    let report = generate(&synth, &VoiceMap::new(), &langs(&["ja"]), &options);

    let ja = &report.languages[0];
    assert_eq!(ja.status, LanguageStatus::Processed);
    assert_eq!(ja.skipped_blank, vec!["empty_key"]);
    assert!(ja.failures.is_empty());
    assert_eq!(report.written(), 2);

    let out = options.output_root.join("ja");
    assert_eq!(
        fs::read_to_string(out.join("greeting_hello.mp3")).unwrap(),
        "こんにちは"
    );
    assert_eq!(fs::read_to_string(out.join("a_b.mp3")).unwrap(), "line1\nline2");
    assert!(!out.join("empty_key.mp3").exists());

    let requests = synth.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].locale, "ja-JP");
    assert_eq!(requests[0].voice.as_deref(), Some("ja-JP-Wavenet-A"));
    assert_eq!(requests[0].encoding, AudioEncoding::Mp3);
    assert_eq!(requests[0].speaking_rate, 1.0);
    assert_eq!(requests[0].pitch, 2.0);
}

#[test]
fn test_missing_and_empty_languages_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("App");
    write_table(&app, "en", "// nothing to say\n");
    write_table(&app, "ja", "\"ok\" = \"はい\";\n");
    let synth = FakeSynthesizer::default();

    let report = generate(
        &synth,
        &VoiceMap::new(),
        &langs(&["fr", "en", "ja"]),
        &options(temp_dir.path()),
    );

    let statuses: Vec<_> = report.languages.iter().map(|l| l.status.clone()).collect();
    assert_eq!(
        statuses,
        vec![
            LanguageStatus::MissingInput,
            LanguageStatus::EmptyInput,
            LanguageStatus::Processed
        ]
    );
    assert_eq!(report.written(), 1);
    assert_eq!(report.skipped_languages().count(), 2);
    assert!(!report.is_clean());
}

#[test]
fn test_failed_entry_does_not_stop_the_batch() {
    let temp_dir = TempDir::new().unwrap();
    write_table(
        &temp_dir.path().join("App"),
        "en",
        "\"first\" = \"one\";\n\"second\" = \"two\";\n\"third\" = \"three\";\n",
    );
    let synth = FakeSynthesizer::failing_on(
        "two",
        "HTTP 403 PERMISSION_DENIED [SERVICE_DISABLED]: Cloud Text-to-Speech API has not been used",
    );
    let options = options(temp_dir.path());

    let report = generate(&synth, &VoiceMap::new(), &langs(&["en"]), &options);

    let en = &report.languages[0];
    assert_eq!(en.written.len(), 2);
    assert_eq!(en.failures.len(), 1);
    assert_eq!(en.failures[0].key, "second");
    assert!(en.failures[0].service_disabled);
    assert!(report.any_service_disabled());
    assert!(options.output_root.join("en").join("third.mp3").exists());
    assert!(!options.output_root.join("en").join("second.mp3").exists());
}

#[test]
fn test_duplicate_keys_overwrite_in_file_order() {
    let temp_dir = TempDir::new().unwrap();
    write_table(
        &temp_dir.path().join("App"),
        "en",
        "\"dup\" = \"first\";\n\"dup\" = \"second\";\n",
    );
    let options = options(temp_dir.path());

    let report = generate(
        &FakeSynthesizer::default(),
        &VoiceMap::new(),
        &langs(&["en"]),
        &options,
    );

    assert_eq!(report.written(), 2);
    assert_eq!(
        fs::read_to_string(options.output_root.join("en").join("dup.mp3")).unwrap(),
        "second"
    );
}

#[test]
fn test_role_and_encoding_reach_the_synthesizer() {
    let temp_dir = TempDir::new().unwrap();
    write_table(&temp_dir.path().join("App"), "ja", "\"k\" = \"v\";\n");
    let synth = FakeSynthesizer::default();
    let options = GenerateOptions {
        role: Some("robot".to_string()),
        encoding: AudioEncoding::Wav,
        ..options(temp_dir.path())
    };

    generate(&synth, &VoiceMap::new(), &langs(&["ja"]), &options);

    let requests = synth.requests.borrow();
    assert_eq!(requests[0].voice.as_deref(), Some("ja-JP-Chirp3-HD-Achernar"));
    assert_eq!(requests[0].encoding, AudioEncoding::Wav);
    assert!(options.output_root.join("ja").join("k.wav").exists());
}

#[test]
fn test_generate_then_deploy_then_redeploy() {
    let temp_dir = TempDir::new().unwrap();
    write_table(
        &temp_dir.path().join("App"),
        "ja",
        "\"greeting_hello\" = \"こんにちは\";\n",
    );
    let options = options(temp_dir.path());
    let resources = temp_dir.path().join("App").join("Resources");
    let dest = tts_dir(&resources, "ja");

    // a clip from an older run, before names carried the language
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("legacy.mp3"), b"old").unwrap();

    generate(
        &FakeSynthesizer::default(),
        &VoiceMap::new(),
        &langs(&["ja"]),
        &options,
    );

    for _ in 0..2 {
        rename_existing(&dest, "ja", &["mp3", "wav"]).unwrap();
        copy_into_project(&options.output_root, &dest, "ja", &["mp3", "wav"]).unwrap();

        let mut names: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["greeting_hello_ja.mp3", "legacy_ja.mp3"]);
    }
}
