pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::{login, provision_account};
pub use token::{Claims, TokenService, TOKEN_LIFETIME_HOURS};

/// Represents the payload for a login request.
///
/// Both fields default to empty strings, which simply fail authentication.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token, valid for two hours.
    pub token: String,
}
