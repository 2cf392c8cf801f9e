//! # Publishing
//!
//! One run: validate the session, compile the document (uploading its
//! images), resolve magazines, create an empty note, attach the eyecatch,
//! then either save a draft or save and publish.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use notepress_engine::{
    CompileError, CompileOptions, Document, ImageError, ParseResult, compile_with,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::http::{HttpClient, HttpError, HttpResponse};
use crate::images::{NoteImageUploader, upload_eyecatch};
use crate::magazines::{MagazineError, MagazineResolver};
use crate::session::{Session, SessionError};
use crate::{EDITOR_BASE_URL, NOTE_BASE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    CreateNote,
    DraftSave,
    TempSave,
    Publish,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStep::CreateNote => "Creating the note",
            PublishStep::DraftSave => "Saving the draft",
            PublishStep::TempSave => "Saving before publishing",
            PublishStep::Publish => "Publishing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Magazine(#[from] MagazineError),

    #[error("Failed to upload eyecatch: {0}")]
    Eyecatch(#[source] ImageError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("{step} failed (HTTP {status}): {body}")]
    Rejected {
        step: PublishStep,
        status: u16,
        body: String,
    },

    #[error("{step} returned an unexpected response: {detail}")]
    MalformedResponse { step: PublishStep, detail: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishRequest {
    pub markdown: PathBuf,
    pub title: String,
    pub eyecatch: Option<PathBuf>,
    pub hashtags: Vec<String>,
    /// Price in yen; anything above zero puts the pay section behind the paywall.
    pub price: u32,
    /// Magazine keys to add the note to.
    pub magazines: Vec<String>,
    /// Publish instead of leaving a draft.
    pub publish: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PublishOutcome {
    Draft {
        note_id: u64,
        note_key: String,
        edit_url: String,
    },
    Published {
        note_id: u64,
        note_key: String,
        public_url: String,
        edit_url: String,
        has_pay: bool,
    },
}

/// The empty note returned by the create call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedNote {
    pub id: u64,
    pub key: String,
    /// Every field of the note as returned; the publish call sends them back.
    pub data: Map<String, Value>,
}

pub struct Publisher {
    http: HttpClient,
    session: Session,
    user_urlname: String,
    options: CompileOptions,
}

impl Publisher {
    pub fn new(mut http: HttpClient, session: Session, user_urlname: impl Into<String>) -> Self {
        http.set_cookies(&session.cookies);
        Self {
            http,
            session,
            user_urlname: user_urlname.into(),
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, PublishError> {
        self.session.validate(&self.http)?;

        let doc = Document::load(&request.markdown).map_err(CompileError::from)?;
        let mut uploader = NoteImageUploader::new(&self.http).with_base_dir(doc.base_dir());
        let result = compile_with(&doc, &mut uploader, self.options.clone())?;
        log::info!(
            "Compiled {} ({} images, paywall: {})",
            doc.path().display(),
            result.image_keys().len(),
            result.has_pay()
        );

        let magazine_ids =
            MagazineResolver::new(&self.http, &self.user_urlname).resolve_all(&request.magazines)?;

        let note = self.create_note()?;
        log::info!("Created note {} ({})", note.key, note.id);

        if let Some(eyecatch) = &request.eyecatch {
            upload_eyecatch(&self.http, note.id, eyecatch).map_err(PublishError::Eyecatch)?;
        }

        if !request.publish {
            self.save_draft(&note, &request.title, &result)?;
            log::info!("Saved draft {}", note.key);
            return Ok(PublishOutcome::Draft {
                note_id: note.id,
                edit_url: edit_url(&note.key),
                note_key: note.key,
            });
        }

        self.temp_save(&note, &request.title, &result)?;
        let payload = publish_payload(&note.data, request, &result, &magazine_ids);
        let url = format!("{NOTE_BASE_URL}/api/v1/text_notes/{}", note.id);
        let response = self.http.put_json(&url, &payload)?;
        expect_success(PublishStep::Publish, response)?;
        log::info!("Published {}", note.key);

        Ok(PublishOutcome::Published {
            note_id: note.id,
            public_url: public_url(&self.user_urlname, &note.key),
            edit_url: edit_url(&note.key),
            note_key: note.key,
            has_pay: request.price > 0,
        })
    }

    fn create_note(&self) -> Result<CreatedNote, PublishError> {
        let url = format!("{NOTE_BASE_URL}/api/v1/text_notes");
        let response = self
            .http
            .post_json(&url, &[], &json!({ "template_key": null }))?;
        if !response.is_success() || response.json.is_none() {
            return Err(rejected(PublishStep::CreateNote, response));
        }
        parse_created_note(response.json.as_ref())
    }

    fn save_draft(
        &self,
        note: &CreatedNote,
        title: &str,
        result: &ParseResult,
    ) -> Result<(), PublishError> {
        let xsrf = self.session.xsrf_token().unwrap_or_default();
        let referer = format!("{EDITOR_BASE_URL}/");
        let headers = [
            ("X-XSRF-TOKEN", xsrf.as_str()),
            ("X-Requested-With", "XMLHttpRequest"),
            ("Referer", referer.as_str()),
        ];
        let body = draft_payload(title, result);
        let response = self
            .http
            .post_json(&draft_save_url(note.id), &headers, &body)?;
        expect_success(PublishStep::DraftSave, response)
    }

    fn temp_save(
        &self,
        note: &CreatedNote,
        title: &str,
        result: &ParseResult,
    ) -> Result<(), PublishError> {
        let body = json!({
            "body": result.combined_html(),
            "name": title,
            "index": true,
        });
        let response = self.http.post_json(&draft_save_url(note.id), &[], &body)?;
        expect_success(PublishStep::TempSave, response)
    }
}

fn draft_save_url(note_id: u64) -> String {
    format!("{NOTE_BASE_URL}/api/v1/text_notes/draft_save?id={note_id}&is_temp_saved=true")
}

pub fn edit_url(note_key: &str) -> String {
    format!("{EDITOR_BASE_URL}/notes/{note_key}/edit")
}

pub fn public_url(user_urlname: &str, note_key: &str) -> String {
    format!("{NOTE_BASE_URL}/{user_urlname}/n/{note_key}")
}

/// Number of characters left once every tag is stripped.
pub fn body_length(html: &str) -> usize {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));
    tag.replace_all(html, "").chars().count()
}

pub fn format_hashtag(tag: &str) -> String {
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    }
}

pub fn draft_payload(title: &str, result: &ParseResult) -> Value {
    json!({
        "body": result.combined_html(),
        "body_length": body_length(result.combined_html()),
        "name": title,
        "index": false,
        "is_lead_form": false,
        "image_keys": result.image_keys(),
    })
}

/// The created note's fields overlaid with the published content. Null fields
/// are left out.
pub fn publish_payload(
    note_data: &Map<String, Value>,
    request: &PublishRequest,
    result: &ParseResult,
    magazine_ids: &[u64],
) -> Value {
    let paid = request.price > 0;
    let separator = result
        .separator_id()
        .filter(|_| paid)
        .map(|id| id.as_str().to_string());
    let pay_body = if paid { result.pay_html() } else { "" };
    let hashtags: Vec<String> = request.hashtags.iter().map(|t| format_hashtag(t)).collect();

    let overlay = json!({
        "name": request.title,
        "free_body": result.free_html(),
        "pay_body": pay_body,
        "status": "published",
        "price": request.price,
        "separator": separator,
        "is_refund": false,
        "limited": false,
        "index": true,
        "image_keys": result.image_keys(),
        "hashtags": hashtags,
        "magazine_ids": magazine_ids,
        "magazine_keys": [],
        "body_length": body_length(result.combined_html()),
        "send_notifications_flag": true,
        "lead_form": {"is_active": false, "consent_url": ""},
        "line_add_friend": {"is_active": false, "keyword": "", "add_friend_url": ""},
    });

    let mut payload = note_data.clone();
    if let Value::Object(overlay) = overlay {
        payload.extend(overlay);
    }
    payload.retain(|_, value| !value.is_null());
    Value::Object(payload)
}

/// Reads `data.id` and `data.key` from the create-note response.
pub fn parse_created_note(json: Option<&Value>) -> Result<CreatedNote, PublishError> {
    let malformed = |detail: &str| PublishError::MalformedResponse {
        step: PublishStep::CreateNote,
        detail: detail.to_string(),
    };

    let data = json
        .and_then(|json| json.get("data"))
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("missing data"))?;
    let id = data
        .get("id")
        .and_then(Value::as_u64)
        .filter(|id| *id != 0)
        .ok_or_else(|| malformed("missing id"))?;
    let key = data
        .get("key")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| malformed("missing key"))?;

    Ok(CreatedNote {
        id,
        key: key.to_string(),
        data: data.clone(),
    })
}

fn expect_success(step: PublishStep, response: HttpResponse) -> Result<(), PublishError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(rejected(step, response))
    }
}

fn rejected(step: PublishStep, response: HttpResponse) -> PublishError {
    PublishError::Rejected {
        step,
        status: response.status,
        body: response.body,
    }
}
