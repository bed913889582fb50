use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn lproj_tts_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lproj-tts"));
    cmd.current_dir(dir)
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GOOGLE_ACCESS_TOKEN")
        .env_remove("GOOGLE_APPLICATION_CREDENTIALS")
        .env_remove("RUST_LOG");
    cmd
}

fn write_table(root: &Path, lang: &str, content: &str) -> std::path::PathBuf {
    let dir = root.join(format!("{lang}.lproj"));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("Localizable.strings");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_view_prints_entries_and_file_names() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_table(
        temp_dir.path(),
        "ja",
        "\"greeting_hello\" = \"こんにちは\";\n\"a/b\" = \"x\";\n\"blank\" = \"\";\n",
    );

    let output = lproj_tts_cmd(temp_dir.path())
        .args(["view", "-i", input.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Language: ja"));
    assert!(stdout.contains("Entries: 3"));
    assert!(stdout.contains("File: greeting_hello.mp3"));
    assert!(stdout.contains("Deployed as: greeting_hello_ja.mp3"));
    assert!(stdout.contains("File: a_b.mp3"));
    assert!(stdout.contains("(empty - no audio)"));
}

#[test]
fn test_view_with_lang_and_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("table.strings");
    fs::write(&input, "\"k\" = \"v\";\n").unwrap();

    let output = lproj_tts_cmd(temp_dir.path())
        .args([
            "view",
            "-i",
            input.to_str().unwrap(),
            "--lang",
            "en",
            "--encoding",
            "wav",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File: k.wav"));
    assert!(stdout.contains("Deployed as: k_en.wav"));
}

#[test]
fn test_view_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = lproj_tts_cmd(temp_dir.path())
        .args(["view", "-i", "nope.strings"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File does not exist"));
}

#[test]
fn test_generate_without_credentials_fails() {
    let temp_dir = TempDir::new().unwrap();
    write_table(temp_dir.path(), "ja", "\"k\" = \"v\";\n");

    let output = lproj_tts_cmd(temp_dir.path())
        .args(["generate", "--langs", "ja"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing credentials"));
    assert!(stderr.contains("GOOGLE_API_KEY"));
    assert!(!temp_dir.path().join("tts_output").join("ja").join("k.mp3").exists());
}

#[test]
fn test_generate_rejects_empty_language_list() {
    let temp_dir = TempDir::new().unwrap();
    let output = lproj_tts_cmd(temp_dir.path())
        .args(["generate", "--langs", ","])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No languages specified"));
}

#[test]
fn test_generate_rejects_out_of_range_rate() {
    let temp_dir = TempDir::new().unwrap();
    let output = lproj_tts_cmd(temp_dir.path())
        .args(["generate", "--langs", "ja", "--rate", "9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid speaking rate"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = lproj_tts_cmd(temp_dir.path())
        .args(["--config", "missing.toml", "generate"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file does not exist"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("lproj-tts.toml"), "speed = 3\n").unwrap();

    let output = lproj_tts_cmd(temp_dir.path())
        .args(["generate"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid config"));
}

#[test]
fn test_embed_skip_generate_deploys_and_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let generated = root.join("tts_output").join("ja");
    fs::create_dir_all(&generated).unwrap();
    fs::write(generated.join("greeting_hello.mp3"), b"new").unwrap();

    let dest = root.join("Resources").join("TTS").join("ja");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("legacy.mp3"), b"old").unwrap();

    for _ in 0..2 {
        let output = lproj_tts_cmd(root)
            .args(["embed", "--langs", "ja,en", "--skip-generate", "--no-git"])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "CLI failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Skipping git"));

        let mut names: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["greeting_hello_ja.mp3", "legacy_ja.mp3"]);
    }

    assert_eq!(fs::read(dest.join("greeting_hello_ja.mp3")).unwrap(), b"new");
    assert_eq!(fs::read(dest.join("legacy_ja.mp3")).unwrap(), b"old");
    assert!(!root.join("Resources").join("TTS").join("en").exists());
}

#[test]
fn test_embed_deploys_clips_of_the_selected_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let generated = root.join("tts_output").join("ja");
    fs::create_dir_all(&generated).unwrap();
    fs::write(generated.join("greeting_hello.ogg"), b"opus").unwrap();

    let output = lproj_tts_cmd(root)
        .args([
            "embed",
            "--langs",
            "ja",
            "--encoding",
            "ogg",
            "--skip-generate",
            "--no-git",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deployed 1 file(s)"));
    let deployed = root.join("Resources/TTS/ja/greeting_hello_ja.ogg");
    assert_eq!(fs::read(deployed).unwrap(), b"opus");
}

#[test]
fn test_embed_uses_config_resources() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join("lproj-tts.toml"),
        "langs = \"en\"\nresources = \"App/Res\"\noutput = \"audio\"\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("audio").join("en")).unwrap();
    fs::write(root.join("audio").join("en").join("ok.mp3"), b"a").unwrap();

    let output = lproj_tts_cmd(root)
        .args(["embed", "--skip-generate", "--no-git"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(root.join("App/Res/TTS/en/ok_en.mp3").exists());
}

#[test]
fn test_completions_for_bash() {
    let temp_dir = TempDir::new().unwrap();
    let output = lproj_tts_cmd(temp_dir.path())
        .args(["completions", "bash"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lproj-tts"));
    assert!(stdout.contains("generate"));
}
