use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

pub const TOKEN_HEADER: &str = "X-Auth-Token";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Identity attached to outgoing requests.
///
/// A credential is an immutable value: switching identity means building a
/// new one, never mutating the one a client already holds.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    #[default]
    Anonymous,
    Token(String),
    Basic { username: String, password: String },
}

impl Credential {
    pub fn token(token: impl AsRef<str>) -> Self {
        Credential::Token(token.as_ref().trim().to_string())
    }

    pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Credential::Basic {
            username: username.as_ref().trim().to_string(),
            password: password.as_ref().trim().to_string(),
        }
    }

    /// Builds a credential from a token, or from a username when `secret` is present.
    ///
    /// A blank identifier yields [`Credential::Anonymous`]; a blank secret is
    /// treated as absent.
    pub fn from_parts(identifier: &str, secret: Option<&str>) -> Self {
        if identifier.trim().is_empty() {
            return Credential::Anonymous;
        }

        match secret.filter(|s| !s.trim().is_empty()) {
            Some(password) => Credential::basic(identifier, password),
            None => Credential::token(identifier),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credential::Anonymous)
    }

    /// Header pairs this credential contributes to a request.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Credential::Anonymous => Vec::new(),
            Credential::Token(token) => vec![(TOKEN_HEADER, token.clone())],
            Credential::Basic { username, password } => vec![(
                AUTHORIZATION_HEADER,
                basic_header_value(username, password),
            )],
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Anonymous => f.write_str("Anonymous"),
            Credential::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
            Credential::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// `Basic <base64(trim(username):trim(password))>`
pub fn basic_header_value(username: &str, password: &str) -> String {
    let raw = format!("{}:{}", username.trim(), password.trim());
    format!("Basic {}", STANDARD.encode(raw))
}

/// Helper to construct a key for profile secrets.
pub fn token_key(profile: &str) -> String {
    profile.to_string()
}

/// Token storage backed by a JSON file with 600 permissions.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// Store under `~/.<app_name>/credentials`.
    pub fn new(app_name: &str) -> Self {
        Self {
            path: dirs::home_dir().map(|h| h.join(format!(".{app_name}")).join("credentials")),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .context("Cannot determine home directory")
    }

    pub fn set_secret(&self, account: &str, secret: &str) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut creds = self.read_all()?;
        creds.insert(account.to_string(), secret.to_string());
        write_credentials(path, &creds)
    }

    pub fn get_secret(&self, account: &str) -> Result<Option<String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        let creds = self.read_all()?;
        Ok(creds.get(account).cloned())
    }

    pub fn delete_secret(&self, account: &str) -> Result<()> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(());
        }
        let mut creds = self.read_all()?;
        creds.remove(account);
        write_credentials(path, &creds)
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to read credentials at {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed credentials file {}", path.display()))
    }
}

fn write_credentials(path: &Path, creds: &HashMap<String, String>) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        let json = serde_json::to_string_pretty(creds)?;
        file.write_all(json.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        serde_json::to_writer_pretty(file, creds)?;
    }

    Ok(())
}
