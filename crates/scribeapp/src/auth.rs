//! Users service client: registration, login, and the stored session token.
//!
//! The notes service accepts any request carrying `Authorization: Bearer
//! <token>` where the token came from `POST /login`. Tokens expire on the
//! server side; an expired token surfaces as [`ScribeError::Auth`] from any
//! store call, and the only remedy is logging in again.

use crate::error::{Result, ScribeError};
use crate::store::http::{check_status, read_json};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Bearer token issued by the users service.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub message: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: AuthToken,
}

/// Checks credentials the same way the users service does, before any
/// request is sent. Returns the trimmed username.
pub fn validate_credentials<'a>(username: &'a str, password: &str) -> Result<&'a str> {
    let username = validate_username(username)?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ScribeError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(username)
}

pub fn validate_username(username: &str) -> Result<&str> {
    let username = username.trim();
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(ScribeError::Validation(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_CHARS
        )));
    }
    Ok(username)
}

pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn register(&self, username: &str, password: &str) -> Result<RegisteredUser> {
        let username = validate_credentials(username, password)?;
        info!(%username, "registering user");
        let response = self
            .client
            .post(format!("{}/register", self.base_url))
            .json(&Credentials { username, password })
            .send()?;
        read_json(check_status(response)?)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthToken> {
        let username = validate_credentials(username, password)?;
        info!(%username, "logging in");
        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&Credentials { username, password })
            .send()?;
        let body: LoginResponse = read_json(check_status(response)?)?;
        Ok(body.token)
    }
}

pub fn save_token(path: &Path, token: &AuthToken) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token.as_str())?;
    debug!(path = %path.display(), "token saved");
    Ok(())
}

/// Reads the stored token. A missing or empty file means "not logged in".
pub fn load_token(path: &Path) -> Result<Option<AuthToken>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(AuthToken::new(raw)))
}

/// Returns whether a token was present.
pub fn clear_token(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn credentials_follow_service_rules() {
        assert_eq!(validate_credentials("  alice ", "secret1").unwrap(), "alice");
        assert!(matches!(
            validate_credentials(" al ", "secret1"),
            Err(ScribeError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("alice", "12345"),
            Err(ScribeError::Validation(_))
        ));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("eyJhbGciOi.secret");
        assert_eq!(format!("{:?}", token), "AuthToken(<redacted>)");
    }

    #[test]
    fn login_response_parses() {
        let body: LoginResponse = serde_json::from_str(r#"{"token":"abc.def"}"#).unwrap();
        assert_eq!(body.token.as_str(), "abc.def");
    }

    #[test]
    fn token_file_lifecycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        assert!(load_token(&path).unwrap().is_none());

        save_token(&path, &AuthToken::new("abc")).unwrap();
        assert_eq!(load_token(&path).unwrap(), Some(AuthToken::new("abc")));

        assert!(clear_token(&path).unwrap());
        assert!(!clear_token(&path).unwrap());
        assert!(load_token(&path).unwrap().is_none());
    }

    #[test]
    fn blank_token_file_means_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert!(load_token(&path).unwrap().is_none());
    }
}
