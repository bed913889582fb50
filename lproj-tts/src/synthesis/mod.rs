//! Speech synthesis backends and the credentials they need.

pub mod google;
pub mod service_account;

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

pub use google::{GoogleTts, GoogleTtsConfig, VoiceInfo};
pub use service_account::ServiceAccountKey;

/// Environment variable holding a Google Cloud API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment variable holding an OAuth access token (e.g. `gcloud auth print-access-token`).
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";
/// Environment variable pointing at a service-account JSON file.
pub const APPLICATION_CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// How requests to the provider are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    AccessToken(String),
    /// Exchanged for short-lived access tokens as requests are made.
    ServiceAccount(ServiceAccountKey),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(..)"),
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
            Credentials::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
        }
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`.
    ///
    /// An API key wins over an access token, which wins over the
    /// service-account file named by `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            return Ok(Credentials::ApiKey(key.trim().to_string()));
        }
        if let Some(token) = non_empty(ACCESS_TOKEN_ENV) {
            return Ok(Credentials::AccessToken(token.trim().to_string()));
        }
        if let Some(path) = non_empty(APPLICATION_CREDENTIALS_ENV) {
            let key = ServiceAccountKey::from_file(Path::new(path.trim()))?;
            tracing::info!(client_email = %key.client_email, "Using service-account credentials");
            return Ok(Credentials::ServiceAccount(key));
        }
        Err(Error::MissingCredentials(format!(
            "set {API_KEY_ENV} or {ACCESS_TOKEN_ENV} (for example from `gcloud auth print-access-token`), \
             or point {APPLICATION_CREDENTIALS_ENV} at a service-account key file"
        )))
    }
}

#[derive(Deserialize)]
struct ServiceAccountFile {
    project_id: Option<String>,
}

/// Project id recorded in a service-account JSON file.
///
/// Unreadable or unrelated files yield `None`: the id is only used to make
/// error messages more precise.
pub fn detect_project_id(credentials_path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(credentials_path).ok()?;
    let parsed: ServiceAccountFile = serde_json::from_str(&text).ok()?;
    parsed.project_id.filter(|id| !id.trim().is_empty())
}

/// Project id from the file named by `GOOGLE_APPLICATION_CREDENTIALS`, if any.
pub fn detect_project_id_from_env() -> Option<String> {
    let path = std::env::var_os(APPLICATION_CREDENTIALS_ENV)?;
    let project_id = detect_project_id(Path::new(&path))?;
    tracing::info!(project_id = %project_id, "Detected project id from credentials");
    Some(project_id)
}

/// Remediation text for a "Text-to-Speech API not enabled" failure.
pub fn service_disabled_hint(project_id: Option<&str>) -> String {
    match project_id {
        Some(project) => format!(
            "It looks like the Text-to-Speech API is disabled for project '{project}'.\n\
             Enable it here: https://console.developers.google.com/apis/api/texttospeech.googleapis.com/overview?project={project}"
        ),
        None => "The Text-to-Speech API appears disabled for the project associated with your credentials.\n\
                 Enable it in the Google Cloud Console: https://console.developers.google.com/apis/library/texttospeech.googleapis.com"
            .to_string(),
    }
}
