//! Google Cloud Text-to-Speech over its REST API.
//!
//! API:
//! POST {base_url}/v1/text:synthesize
//! Request: {"input": {"text"}, "voice": {"languageCode", "name"}, "audioConfig": {...}}
//! Response: {"audioContent": "<base64>"}
//!
//! GET {base_url}/v1/voices?languageCode=ja-JP
//! Response: {"voices": [{"languageCodes", "name", "ssmlGender", "naturalSampleRateHertz"}]}

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::Credentials;
use super::service_account::{JWT_BEARER_GRANT, ServiceAccountKey, TokenResponse};
use crate::{error::Error, traits::Synthesizer, types::SynthesisRequest};

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct VoiceSelection<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AudioConfig {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'static str,
    #[serde(rename = "speakingRate")]
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent", default)]
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceInfo>,
}

/// One voice offered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    pub name: String,
    #[serde(default)]
    pub language_codes: Vec<String>,
    #[serde(default)]
    pub ssml_gender: String,
    #[serde(default)]
    pub natural_sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Billing/quota project sent with token-authenticated requests.
    pub project_id: Option<String>,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com".to_string(),
            timeout_secs: 60,
            project_id: None,
        }
    }
}

impl GoogleTtsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }
}

/// Service-account tokens are renewed this long before they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Blocking Google Cloud Text-to-Speech client.
pub struct GoogleTts {
    client: Client,
    credentials: Credentials,
    config: GoogleTtsConfig,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleTts {
    pub fn new(credentials: Credentials, config: GoogleTtsConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            credentials,
            config,
            token: Mutex::new(None),
        })
    }

    fn synthesize_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.config.base_url.trim_end_matches('/'))
    }

    fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, Error> {
        let request = match &self.credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key)]),
            Credentials::AccessToken(token) => {
                let request = request.bearer_auth(token);
                match &self.config.project_id {
                    Some(project) => request.header("x-goog-user-project", project),
                    None => request,
                }
            }
            Credentials::ServiceAccount(key) => {
                let request = request.bearer_auth(self.service_account_token(key)?);
                // the account's own project is billed unless another one is named
                match &self.config.project_id {
                    Some(project) if key.project_id.as_ref() != Some(project) => {
                        request.header("x-goog-user-project", project)
                    }
                    _ => request,
                }
            }
        };
        Ok(request)
    }

    /// A live access token for `key`, exchanging a fresh assertion when the
    /// cached one is missing or about to expire.
    fn service_account_token(&self, key: &ServiceAccountKey) -> Result<String, Error> {
        let mut cached = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let assertion = key.assertion(now)?;
        tracing::debug!(token_uri = %key.token_uri, "Exchanging service-account assertion");

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(transport_error)?;
        let response = check_status(response).map_err(|e| match e {
            Error::Synthesis { message, .. } => {
                Error::MissingCredentials(format!("token exchange failed: {message}"))
            }
            other => other,
        })?;
        let token: TokenResponse = serde_json::from_str(&response.text()?)?;

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(token.access_token)
    }

    /// List the voices the provider offers, optionally only for one locale.
    pub fn list_voices(&self, language: Option<&str>) -> Result<Vec<VoiceInfo>, Error> {
        let mut request = self.client.get(self.voices_url());
        if let Some(language) = language {
            request = request.query(&[("languageCode", language)]);
        }

        let response = self.authorize(request)?.send().map_err(transport_error)?;
        let response = check_status(response)?;
        let body: ListVoicesResponse = serde_json::from_str(&response.text()?)?;
        Ok(body.voices)
    }
}

/// JSON body of a synthesize call. A blank voice name is left out so the
/// provider picks its default for the locale.
fn body(request: &SynthesisRequest) -> SynthesizeBody<'_> {
    SynthesizeBody {
        input: SynthesisInput {
            text: &request.text,
        },
        voice: VoiceSelection {
            language_code: &request.locale,
            name: request.voice.as_deref().filter(|v| !v.trim().is_empty()),
        },
        audio_config: AudioConfig {
            audio_encoding: request.encoding.provider_name(),
            speaking_rate: request.speaking_rate,
            pitch: request.pitch,
        },
    }
}

impl Synthesizer for GoogleTts {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, Error> {
        tracing::debug!(
            url = %self.synthesize_url(),
            locale = %request.locale,
            voice = ?request.voice,
            text_len = request.text.len(),
            "Sending synthesize request"
        );

        let response = self
            .authorize(self.client.post(self.synthesize_url()))?
            .json(&body(request))
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        let parsed: SynthesizeResponse = serde_json::from_str(&response.text()?)?;
        if parsed.audio_content.is_empty() {
            return Err(Error::synthesis("response contained no audio", None));
        }
        let audio = STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| Error::synthesis(format!("invalid audioContent: {e}"), None))?;

        tracing::debug!(audio_size = audio.len(), "Synthesize request completed");
        Ok(audio)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::synthesis(format!("request timed out: {err}"), None)
    } else if err.is_connect() {
        Error::synthesis(format!("cannot connect to the speech service: {err}"), None)
    } else {
        Error::Http(err)
    }
}

fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().unwrap_or_default();
    Err(Error::synthesis(
        describe_error(status.as_u16(), &text),
        Some(status.as_u16()),
    ))
}

/// Flatten a provider error body into one line, keeping the status and
/// reason codes the service-disabled check looks for.
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let mut message = format!("HTTP {status}");
            if !envelope.error.status.is_empty() {
                message.push(' ');
                message.push_str(&envelope.error.status);
            }
            let reasons: Vec<String> = envelope
                .error
                .details
                .into_iter()
                .filter_map(|d| d.reason)
                .collect();
            if !reasons.is_empty() {
                message.push_str(&format!(" [{}]", reasons.join(", ")));
            }
            if !envelope.error.message.is_empty() {
                message.push_str(": ");
                message.push_str(&envelope.error.message);
            }
            message
        }
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}
