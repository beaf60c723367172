//! Credential checks and token issuance.
//!
//! `login` is the only way to obtain a token. `provision_account` creates the
//! account configured for start-up; there is no other account management.

use log::{info, warn};

use super::password::{hash_password, verify_password};
use super::token::TokenService;
use crate::error::AppError;
use crate::models::Credential;
use crate::storage::CredentialRepository;

/// Message shared by every failed login so callers cannot probe for usernames.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Checks `username`/`password` against the stored hash and issues a token.
///
/// An unknown username, a wrong password and an unreadable stored hash all
/// produce the same `AppError::Unauthorized`.
pub async fn login(
    credentials: &dyn CredentialRepository,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let credential = match credentials.find_by_username(username).await? {
        Some(credential) => credential,
        None => {
            warn!("login rejected: unknown username");
            return Err(invalid_credentials());
        }
    };

    match verify_password(password, &credential.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("login rejected: wrong password for user {}", credential.id);
            return Err(invalid_credentials());
        }
        Err(e) => {
            warn!("login rejected: stored hash for user {} unusable: {}", credential.id, e);
            return Err(invalid_credentials());
        }
    }

    info!("user {} logged in", credential.id);
    tokens.issue(&credential)
}

/// Creates the account unless the username is already taken, in which case the
/// stored credential is returned untouched.
pub async fn provision_account(
    credentials: &dyn CredentialRepository,
    username: &str,
    password: &str,
) -> Result<Credential, AppError> {
    if let Some(existing) = credentials.find_by_username(username).await? {
        return Ok(existing);
    }

    let password_hash = hash_password(password)?;
    let credential = credentials.insert(username, &password_hash).await?;
    info!("provisioned account {:?} (id {})", credential.username, credential.id);
    Ok(credential)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.into())
}
