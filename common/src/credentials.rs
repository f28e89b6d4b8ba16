//! # Credentials File
//!
//! Login material shared by every switch in the walk, read from a JSON file:
//!
//! ```json
//! { "username": "netops", "password": "...", "enablepw": "..." }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CREDENTIALS_PATH: &str = "creds.json";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read credentials from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse credentials: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Secret for `enable`, only needed when logins land in user EXEC mode.
    #[serde(rename = "enablepw", alias = "secret", default)]
    pub enable_secret: Option<String>,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, CredentialsError> {
        let raw: String = fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CredentialsError> {
        Ok(serde_json::from_str(raw)?)
    }
}

// Keeps secrets out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field(
                "enable_secret",
                &self.enable_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
