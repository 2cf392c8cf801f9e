use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::NOTE_BASE_URL;
use crate::http::{HttpClient, HttpError};

const XSRF_COOKIE: &str = "XSRF-TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read session file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write session file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed session file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Session has no cookies")]
    NoCookies,

    #[error("Session rejected (HTTP {status}){}: {body}", describe_age(*age_hours))]
    Invalid {
        status: u16,
        body: String,
        /// Hours since the session was saved, when the file has a timestamp.
        age_hours: Option<f64>,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}

fn describe_age(age_hours: Option<f64>) -> String {
    age_hours
        .map(|hours| format!(", saved {hours:.1} hours ago"))
        .unwrap_or_default()
}

/// Login cookies saved by a previous browser login.
///
/// On disk: `{"timestamp": "2025-01-01T12:00:00.123456", "cookies": {"name": "value"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Session {
    /// A session stamped with the current local time.
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self {
            timestamp: Some(Local::now().naive_local()),
            cookies,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SessionError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SessionError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|source| SessionError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| SessionError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn age_hours(&self) -> Option<f64> {
        self.age_hours_at(Local::now().naive_local())
    }

    pub fn age_hours_at(&self, now: NaiveDateTime) -> Option<f64> {
        self.timestamp
            .map(|saved| (now - saved).num_milliseconds() as f64 / 3_600_000.0)
    }

    /// The `XSRF-TOKEN` cookie, percent-decoded.
    pub fn xsrf_token(&self) -> Option<String> {
        self.cookies
            .get(XSRF_COOKIE)
            .filter(|token| !token.is_empty())
            .map(|token| percent_decode_str(token).decode_utf8_lossy().into_owned())
    }

    /// Asks note.com whether the cookies still belong to a logged-in user.
    ///
    /// `http` must already carry this session's cookies.
    pub fn validate(&self, http: &HttpClient) -> Result<(), SessionError> {
        if self.cookies.is_empty() {
            return Err(SessionError::NoCookies);
        }
        let url = format!("{NOTE_BASE_URL}/api/v3/users/user_features");
        let response = http.get(&url)?;
        if response.is_success() {
            log::info!("Session is valid");
            return Ok(());
        }
        Err(SessionError::Invalid {
            status: response.status,
            body: response.body,
            age_hours: self.age_hours(),
        })
    }
}
