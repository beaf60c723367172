use std::env;
use std::io;

const DEFAULT_TOKEN_PARTY: &str = "task-organizer";
/// HS256 keys shorter than the hash output are rejected.
pub const MIN_SECRET_LEN: usize = 32;

/// Settings for signing and verifying access tokens.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// An account created at start-up when it does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub seed_account: Option<SeedAccount>,
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| invalid(format!("SERVER_PORT must be a number, got {:?}", port)))?,
            None => 8080,
        };

        let secret = var("JWT_SECRET").ok_or_else(|| invalid("JWT_SECRET must be set".into()))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(invalid(format!(
                "JWT_SECRET must be at least {} bytes long",
                MIN_SECRET_LEN
            )));
        }

        let seed_account = match (var("SEED_USERNAME"), var("SEED_PASSWORD")) {
            (Some(username), Some(password)) => Some(SeedAccount { username, password }),
            (None, None) => None,
            _ => {
                return Err(invalid(
                    "SEED_USERNAME and SEED_PASSWORD must be set together".into(),
                ))
            }
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            server_port,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt: JwtSettings {
                secret,
                issuer: var("JWT_ISSUER").unwrap_or_else(|| DEFAULT_TOKEN_PARTY.to_string()),
                audience: var("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_TOKEN_PARTY.to_string()),
            },
            seed_account,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
