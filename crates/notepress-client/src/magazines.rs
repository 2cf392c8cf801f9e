use std::sync::OnceLock;

use regex::Regex;

use crate::NOTE_BASE_URL;
use crate::http::{HttpClient, HttpError};

#[derive(Debug, thiserror::Error)]
pub enum MagazineError {
    #[error("Failed to fetch magazine page {url} (HTTP {status})")]
    Fetch { url: String, status: u16 },

    #[error("Magazine id not found in {url}")]
    IdNotFound { url: String },

    #[error(transparent)]
    Http(#[from] HttpError),
}

fn magazine_id_regexes() -> &'static [Regex; 2] {
    static REGEXES: OnceLock<[Regex; 2]> = OnceLock::new();
    REGEXES.get_or_init(|| {
        [
            Regex::new(r"magazineLayout\s*:\s*\{\s*id\s*:\s*(\d+)")
                .expect("Invalid magazine layout regex"),
            Regex::new(r#""magazineLayout"\s*:\s*\{\s*"id"\s*:\s*(\d+)"#)
                .expect("Invalid magazine layout JSON regex"),
        ]
    })
}

/// Finds the numeric magazine id embedded in a magazine page.
///
/// The page carries it either as a JS object literal (`magazineLayout:{id:123`)
/// or as JSON (`"magazineLayout":{"id":123`).
pub fn extract_magazine_id(html: &str) -> Option<u64> {
    magazine_id_regexes().iter().find_map(|re| {
        re.captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|id| id.as_str().parse().ok())
    })
}

pub fn magazine_page_url(user_urlname: &str, key: &str) -> String {
    format!("{NOTE_BASE_URL}/{user_urlname}/m/{key}")
}

/// Maps magazine keys (the `m/<key>` part of a magazine URL) to ids.
pub struct MagazineResolver<'h> {
    http: &'h HttpClient,
    user_urlname: &'h str,
}

impl<'h> MagazineResolver<'h> {
    pub fn new(http: &'h HttpClient, user_urlname: &'h str) -> Self {
        Self { http, user_urlname }
    }

    /// An empty key resolves to `None` without a request.
    pub fn resolve(&self, key: &str) -> Result<Option<u64>, MagazineError> {
        if key.is_empty() {
            return Ok(None);
        }
        let url = magazine_page_url(self.user_urlname, key);
        let response = self.http.get_public(&url)?;
        if !response.is_success() {
            return Err(MagazineError::Fetch {
                url,
                status: response.status,
            });
        }
        match extract_magazine_id(&response.body) {
            Some(id) => {
                log::debug!("Magazine {key} has id {id}");
                Ok(Some(id))
            }
            None => Err(MagazineError::IdNotFound { url }),
        }
    }

    /// Resolves every key in order, skipping empty keys and zero ids.
    pub fn resolve_all(&self, keys: &[String]) -> Result<Vec<u64>, MagazineError> {
        let mut ids = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(id) = self.resolve(key)?
                && id != 0
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
