//! Service-account token acquisition for the model endpoint
//!
//! Standard JWT-bearer flow: sign an RS256 assertion with the service
//! account's private key, exchange it at the token endpoint, cache the
//! access token until shortly before expiry.

use crate::errors::{AppError, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::debug;

const CLOUD_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens are refreshed this long before their stated expiry
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Caching access-token provider backed by a service-account key file
pub struct GoogleTokenProvider {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleTokenProvider {
    /// Load the service-account key from a JSON credential file
    pub fn from_file(path: &str, http: reqwest::Client) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::Configuration {
            message: format!("cannot read credentials file {path}: {e}"),
        })?;
        let key: ServiceAccountKey =
            serde_json::from_str(&raw).map_err(|e| AppError::Configuration {
                message: format!("malformed credentials file {path}: {e}"),
            })?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::Configuration {
                message: format!("invalid private key in {path}: {e}"),
            }
        })?;

        Ok(Self {
            key,
            signing_key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Return a valid access token, reusing the cached one when possible
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if SystemTime::now() + EXPIRY_SLACK < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let token_uri = self.key.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal {
                message: format!("system clock before epoch: {e}"),
            })?
            .as_secs();

        let claims = Claims {
            iss: &self.key.client_email,
            scope: CLOUD_SCOPE,
            aud: token_uri,
            iat: now,
            exp: now + 3600,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| AppError::Internal {
                message: format!("failed to sign token assertion: {e}"),
            })?;

        let response: TokenResponse = self
            .http
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(expires_in = response.expires_in, "Access token refreshed");

        Ok(CachedToken {
            access_token: response.access_token,
            expires_at: SystemTime::now() + Duration::from_secs(response.expires_in),
        })
    }
}
