//! Service-account keys and the signed assertion exchanged for an access token.
//!
//! Token endpoint:
//! POST {token_uri}
//! Form: grant_type=urn:ietf:params:oauth:grant-type:jwt-bearer&assertion=<RS256 JWT>
//! Response: {"access_token", "expires_in", "token_type"}

use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion; the token endpoint caps it at one hour.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account JSON key file that signing needs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// Token endpoint reply.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

impl ServiceAccountKey {
    /// Parse a key file's contents. Files of another credential type
    /// (e.g. `authorized_user`) are rejected.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let key: ServiceAccountKey = serde_json::from_str(text).map_err(|e| {
            Error::MissingCredentials(format!("not a service-account key file: {e}"))
        })?;
        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(Error::MissingCredentials(
                "service-account key has no client_email or private_key".to_string(),
            ));
        }
        Ok(key)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            Error::MissingCredentials(reason) => {
                Error::MissingCredentials(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Signed JWT asserting this account, issued at `now` (seconds since the epoch).
    pub fn assertion(&self, now: u64) -> Result<String, Error> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}
