use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    /// The store rejected the payload (empty title or content, bad credentials shape).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired token. Callers must re-authenticate.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The note is gone or belongs to someone else.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or server failure.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ScribeError {
    /// Errors after which local collections can no longer be trusted.
    pub fn requires_resync(&self) -> bool {
        matches!(self, ScribeError::NotFound(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ScribeError::Auth(_))
    }
}

impl From<reqwest::Error> for ScribeError {
    fn from(err: reqwest::Error) -> Self {
        ScribeError::Transport(err.to_string())
    }
}

impl From<confique::Error> for ScribeError {
    fn from(err: confique::Error) -> Self {
        ScribeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_requires_resync() {
        assert!(ScribeError::NotFound("note 3".into()).requires_resync());
        assert!(!ScribeError::Transport("timeout".into()).requires_resync());
        assert!(!ScribeError::Validation("empty".into()).requires_resync());
        assert!(!ScribeError::Auth("expired".into()).requires_resync());
    }

    #[test]
    fn display_includes_kind() {
        let err = ScribeError::Auth("Invalid token".into());
        assert_eq!(err.to_string(), "Authentication error: Invalid token");
        assert!(err.is_auth());
    }
}
