use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::error::AppError;
use crate::models::Credential;

/// Lifetime of every issued token. There is no refresh.
pub const TOKEN_LIFETIME_HOURS: i64 = 2;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the credential the token was issued to.
    pub sub: i32,
    /// Username of the credential the token was issued to.
    pub username: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch), `iat` plus two hours.
    pub exp: i64,
}

/// Issues and verifies HS256 tokens with a pre-shared key.
///
/// Built once from `JwtSettings` and shared with handlers and the guard
/// middleware through `web::Data`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
        }
    }

    /// Issues a token for `credential` that expires two hours from now.
    pub fn issue(&self, credential: &Credential) -> Result<String, AppError> {
        self.issue_at(credential, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        credential: &Credential,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expires_at = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);
        let claims = Claims {
            sub: credential.id,
            username: credential.username.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature, expiry, issuer and audience, and returns the claims.
    ///
    /// Every failure is an `AppError::Unauthorized` naming the jsonwebtoken error
    /// kind, e.g. `Invalid token: ExpiredSignature`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
