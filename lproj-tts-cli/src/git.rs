use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// What `commit_and_push` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOutcome {
    /// Nothing was staged, so no commit was made.
    NothingToCommit,
    Committed,
    CommittedAndPushed,
}

fn run_git(repo: &Path, args: &[&str]) -> Result<Output, String> {
    tracing::debug!(repo = %repo.display(), ?args, "Running git");
    Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map_err(|e| format!("Failed to run git {}: {}", args.join(" "), e))
}

fn run_git_checked(repo: &Path, args: &[&str]) -> Result<(), String> {
    let output = run_git(repo, args)?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(format!("git {} failed: {}", args.join(" "), stderr.trim()))
}

/// Stage `paths`, commit with `message`, and optionally push.
pub fn commit_and_push(
    repo: &Path,
    paths: &[PathBuf],
    message: &str,
    push: bool,
) -> Result<GitOutcome, String> {
    let mut add_args = vec!["add".to_string(), "--".to_string()];
    add_args.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));
    let add_args: Vec<&str> = add_args.iter().map(String::as_str).collect();
    run_git_checked(repo, &add_args)?;

    // exit status 0 means the index matches HEAD
    let diff = run_git(repo, &["diff", "--cached", "--quiet"])?;
    if diff.status.success() {
        return Ok(GitOutcome::NothingToCommit);
    }

    run_git_checked(repo, &["commit", "-m", message])?;
    if !push {
        return Ok(GitOutcome::Committed);
    }
    run_git_checked(repo, &["push"])?;
    Ok(GitOutcome::CommittedAndPushed)
}

/// Printed after a failed git step so the files can be committed by hand.
pub fn manual_recovery_hint(paths: &[PathBuf]) -> String {
    let joined = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Audio files are in place but were not committed. Run manually:\n  git add {}\n  git commit -m \"...\"\n  git push",
        joined
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_lists_paths() {
        let hint = manual_recovery_hint(&[
            PathBuf::from("Resources/TTS/ja"),
            PathBuf::from("Resources/TTS/en"),
        ]);
        assert!(hint.contains("git add Resources/TTS/ja Resources/TTS/en"));
    }

    /// A fresh repository with a local identity, or None when git is absent.
    fn init_repo() -> Option<tempfile::TempDir> {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = temp_dir.path();
        if run_git(repo, &["init", "--quiet"]).is_err() {
            return None;
        }
        run_git_checked(repo, &["config", "user.email", "tts@example.com"]).unwrap();
        run_git_checked(repo, &["config", "user.name", "TTS"]).unwrap();
        run_git_checked(repo, &["config", "commit.gpgsign", "false"]).unwrap();
        Some(temp_dir)
    }

    #[test]
    fn test_commit_then_push_without_remote_fails() {
        let Some(temp_dir) = init_repo() else {
            return;
        };
        let repo = temp_dir.path();
        let dir = repo.join("TTS");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello_ja.mp3"), b"audio").unwrap();

        let err = commit_and_push(repo, &[PathBuf::from("TTS")], "Add audio", true).unwrap_err();
        assert!(err.contains("git push failed"), "unexpected error: {}", err);

        // the commit landed before the push was attempted
        let log = run_git(repo, &["log", "--format=%s"]).unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "Add audio");
    }

    #[test]
    fn test_unchanged_paths_are_not_committed() {
        let Some(temp_dir) = init_repo() else {
            return;
        };
        let repo = temp_dir.path();
        let dir = repo.join("TTS");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello_ja.mp3"), b"audio").unwrap();

        let paths = [PathBuf::from("TTS")];
        assert_eq!(
            commit_and_push(repo, &paths, "Add audio", false).unwrap(),
            GitOutcome::Committed
        );
        assert_eq!(
            commit_and_push(repo, &paths, "Add audio", false).unwrap(),
            GitOutcome::NothingToCommit
        );
    }
}
