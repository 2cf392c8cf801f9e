use std::collections::HashMap;
use std::path::{Path, PathBuf};

use notepress_engine::images::resolve_path;
use notepress_engine::{ImageBridge, ImageError, ResolvedImage};
use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;
use uuid::Uuid;

use crate::NOTE_BASE_URL;
use crate::http::{HttpClient, HttpError, HttpResponse};

const DEFAULT_EXTENSION: &str = ".png";
const EYECATCH_WIDTH: u32 = 1920;
const EYECATCH_HEIGHT: u32 = 1080;

/// Upload target handed out by note.com before the file itself is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    /// Storage endpoint receiving the multipart upload.
    pub action: String,
    /// Form fields that must accompany the file.
    pub fields: Vec<(String, String)>,
    pub url: String,
    pub path: String,
}

/// [`ImageBridge`] backed by note.com's presigned uploads.
///
/// Each distinct file is uploaded once per uploader.
pub struct NoteImageUploader<'h> {
    http: &'h HttpClient,
    base_dir: Option<PathBuf>,
    uploaded: HashMap<PathBuf, ResolvedImage>,
}

impl<'h> NoteImageUploader<'h> {
    pub fn new(http: &'h HttpClient) -> Self {
        Self {
            http,
            base_dir: None,
            uploaded: HashMap::new(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: Option<&Path>) -> Self {
        self.base_dir = base_dir.map(Path::to_path_buf);
        self
    }

    fn presign(&self, file_name: &str) -> Result<PresignedPost, ImageError> {
        let url = format!("{NOTE_BASE_URL}/api/v3/images/upload/presigned_post");
        let form = Form::new().text("filename", file_name.to_string());
        let response = self.http.post_multipart(&url, form).map_err(transport)?;
        if !response.is_success() || response.json.is_none() {
            return Err(rejected(response));
        }
        parse_presigned(response.json.as_ref())
    }

    fn upload(&self, path: &Path) -> Result<ResolvedImage, ImageError> {
        let file_name = upload_file_name(path);
        let target = self.presign(&file_name)?;

        let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(|err| ImageError::Transport {
                status: None,
                message: err.to_string(),
            })?;

        let form = target
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part("file", file);

        let response = self
            .http
            .post_multipart_bare(&target.action, form)
            .map_err(transport)?;
        if !response.is_success() {
            return Err(rejected(response));
        }

        Ok(ResolvedImage {
            url: target.url,
            storage_key: target.path,
        })
    }
}

impl ImageBridge for NoteImageUploader<'_> {
    fn resolve(&mut self, source: &str) -> Result<ResolvedImage, ImageError> {
        let path = resolve_path(self.base_dir.as_deref(), source);
        if let Some(hit) = self.uploaded.get(&path) {
            log::debug!("Reusing upload of {}", path.display());
            return Ok(hit.clone());
        }
        if !path.is_file() {
            return Err(ImageError::FileNotFound { path });
        }

        log::info!("Uploading image {}", path.display());
        let image = self.upload(&path)?;
        log::debug!("Uploaded {} as {}", path.display(), image.storage_key);

        self.uploaded.insert(path, image.clone());
        Ok(image)
    }
}

/// Sets the header image of a note. An empty path uploads nothing.
pub fn upload_eyecatch(http: &HttpClient, note_id: u64, path: &Path) -> Result<(), ImageError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if !path.is_file() {
        return Err(ImageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    log::info!("Uploading eyecatch {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = Part::bytes(bytes)
        .file_name("blob")
        .mime_str("image/png")
        .map_err(|err| ImageError::Transport {
            status: None,
            message: err.to_string(),
        })?;
    let form = Form::new()
        .part("file", file)
        .text("note_id", note_id.to_string())
        .text("width", EYECATCH_WIDTH.to_string())
        .text("height", EYECATCH_HEIGHT.to_string());

    let url = format!("{NOTE_BASE_URL}/api/v1/image_upload/note_eyecatch");
    let response = http.post_multipart(&url, form).map_err(transport)?;
    if !response.is_success() {
        return Err(rejected(response));
    }
    Ok(())
}

/// Random name the file is uploaded under, keeping its extension.
pub fn upload_file_name(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}{extension}", Uuid::new_v4().simple())
}

/// Reads `data.{action, post, url, path}` from a presign response.
pub fn parse_presigned(json: Option<&Value>) -> Result<PresignedPost, ImageError> {
    let data = json
        .and_then(|json| json.get("data"))
        .ok_or_else(|| malformed("missing data"))?;

    let field = |name: &str| {
        data.get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| malformed(&format!("missing {name}")))
    };
    let action = field("action")?;
    let url = field("url")?;
    let path = field("path")?;

    let fields = match data.get("post") {
        Some(Value::Object(post)) => post
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect(),
        _ => vec![],
    };

    Ok(PresignedPost {
        action,
        fields,
        url,
        path,
    })
}

fn malformed(detail: &str) -> ImageError {
    ImageError::MalformedResponse {
        detail: detail.to_string(),
    }
}

fn rejected(response: HttpResponse) -> ImageError {
    ImageError::Transport {
        status: Some(response.status),
        message: response.body,
    }
}

fn transport(err: HttpError) -> ImageError {
    ImageError::Transport {
        status: None,
        message: err.to_string(),
    }
}
