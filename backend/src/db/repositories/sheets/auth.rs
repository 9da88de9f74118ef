//! Request authentication for the Sheets API.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::db::credentials::ServiceCredential;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Google's OAuth token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope requested for service-account tokens.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion; Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the token actually lapses.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Claims of the JWT-bearer assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// How a fresh access token is obtained.
enum Grant {
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    JwtBearer {
        client_email: String,
        key_id: Option<String>,
        key: EncodingKey,
    },
}

/// OAuth token endpoint client with a cached access token.
pub struct TokenSource {
    grant: Grant,
    token_uri: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    fn new(grant: Grant, token_uri: Option<String>) -> Self {
        Self {
            grant,
            token_uri: token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            cached: Mutex::new(None),
        }
    }

    /// Service-account flow; the PEM key is parsed up front.
    fn service_account(
        client_email: String,
        private_key: &str,
        key_id: Option<String>,
        token_uri: Option<String>,
    ) -> RepositoryResult<Self> {
        let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
            RepositoryError::configuration(format!("Invalid service account private key: {}", e))
        })?;
        Ok(Self::new(
            Grant::JwtBearer {
                client_email,
                key_id,
                key,
            },
            token_uri,
        ))
    }

    pub fn kind(&self) -> &'static str {
        match self.grant {
            Grant::RefreshToken { .. } => "authorized_user",
            Grant::JwtBearer { .. } => "service_account",
        }
    }

    fn cached_token(&self) -> Option<String> {
        let cached = self.cached.lock();
        cached
            .as_ref()
            .filter(|t| t.expires_at > Instant::now() + EXPIRY_MARGIN)
            .map(|t| t.token.clone())
    }

    /// Current access token, running the grant when needed.
    pub async fn access_token(&self, http: &reqwest::Client) -> RepositoryResult<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let response = self.exchange(http).await?;
        let token = response.access_token.clone();
        *self.cached.lock() = Some(CachedToken {
            token: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        tracing::debug!(
            grant = self.kind(),
            expires_in = response.expires_in,
            "Refreshed Sheets access token"
        );
        Ok(token)
    }

    /// Signed RS256 assertion for the JWT-bearer grant, issued at `now`
    /// (Unix seconds).
    pub fn assertion(&self, now: i64) -> RepositoryResult<String> {
        let Grant::JwtBearer {
            client_email,
            key_id,
            key,
        } = &self.grant
        else {
            return Err(RepositoryError::configuration(
                "Assertions are only used by service account credentials",
            ));
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key_id.clone();
        let claims = AssertionClaims {
            iss: client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, key).map_err(|e| {
            RepositoryError::authentication(format!("Failed to sign token assertion: {}", e))
        })
    }

    fn grant_form(&self) -> RepositoryResult<Vec<(&'static str, String)>> {
        Ok(match &self.grant {
            Grant::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => vec![
                ("grant_type", "refresh_token".to_string()),
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
                ("refresh_token", refresh_token.clone()),
            ],
            Grant::JwtBearer { .. } => vec![
                ("grant_type", JWT_BEARER_GRANT.to_string()),
                ("assertion", self.assertion(chrono::Utc::now().timestamp())?),
            ],
        })
    }

    async fn exchange(&self, http: &reqwest::Client) -> RepositoryResult<TokenResponse> {
        let context = ErrorContext::new("exchange_token").with_details(self.token_uri.clone());
        let form = self.grant_form().map_err(|e| e.with_context(context.clone()))?;

        let response = http
            .post(&self.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    format!("Failed to send token request: {}", e),
                    context.clone(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::authentication(format!(
                "Token exchange failed with status {}: {}",
                status, body
            ))
            .with_context(context));
        }

        response.json().await.map_err(|e| {
            RepositoryError::authentication(format!("Failed to parse token response: {}", e))
                .with_context(context)
        })
    }
}

/// How each Sheets request is authenticated.
pub enum SheetsAuth {
    ApiKey(String),
    Bearer(String),
    OAuth(TokenSource),
}

impl SheetsAuth {
    pub fn from_credential(credential: ServiceCredential) -> RepositoryResult<Self> {
        Ok(match credential {
            ServiceCredential::ApiKey { key } => SheetsAuth::ApiKey(key),
            ServiceCredential::AccessToken { token } => SheetsAuth::Bearer(token),
            ServiceCredential::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => SheetsAuth::OAuth(TokenSource::new(
                Grant::RefreshToken {
                    client_id,
                    client_secret,
                    refresh_token,
                },
                token_uri,
            )),
            ServiceCredential::ServiceAccount {
                client_email,
                private_key,
                private_key_id,
                token_uri,
            } => SheetsAuth::OAuth(TokenSource::service_account(
                client_email,
                &private_key,
                private_key_id,
                token_uri,
            )?),
        })
    }

    /// Attach credentials to an outgoing request.
    pub async fn apply(
        &self,
        http: &reqwest::Client,
        request: reqwest::RequestBuilder,
    ) -> RepositoryResult<reqwest::RequestBuilder> {
        Ok(match self {
            SheetsAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            SheetsAuth::Bearer(token) => request.bearer_auth(token),
            SheetsAuth::OAuth(source) => request.bearer_auth(source.access_token(http).await?),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SheetsAuth::ApiKey(_) => "api_key",
            SheetsAuth::Bearer(_) => "access_token",
            SheetsAuth::OAuth(source) => source.kind(),
        }
    }
}
