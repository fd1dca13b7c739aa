//! Image Uploads
//! Mission: Accept admin image uploads onto disk and list what is there

use crate::auth::Identity;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/webp", ".webp"),
];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file received")]
    MissingFile,
    #[error("invalid file")]
    Rejected(Vec<String>),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No file received" })),
            )
                .into_response(),
            UploadError::Rejected(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid file", "details": details })),
            )
                .into_response(),
            UploadError::Multipart(e) => {
                (e.status(), Json(json!({ "error": e.body_text() }))).into_response()
            }
            UploadError::Io(e) => {
                error!("Upload I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    pub original_name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub file_name: String,
    pub url: String,
    pub size: u64,
    pub uploaded_at: String,
}

#[derive(Clone)]
pub struct UploadState {
    dir: Arc<PathBuf>,
    max_bytes: usize,
}

impl UploadState {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self {
            dir: Arc::new(dir),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Extension for an accepted content type, `None` when the type is not allowed.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(content_type))
        .map(|(_, ext)| *ext)
}

/// Every reason a file is refused, in the order checked.
pub fn check_file(content_type: &str, size: usize, max_bytes: usize) -> Vec<String> {
    let mut problems = Vec::new();
    if extension_for(content_type).is_none() {
        problems.push("File type not allowed. Only JPG, PNG and WebP are accepted".to_string());
    }
    if size > max_bytes {
        problems.push(format!(
            "File is too large. Maximum {}MB",
            max_bytes / (1024 * 1024)
        ));
    }
    problems
}

/// `{unix_millis}-{uuid}{ext}`
pub fn unique_file_name(ext: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}{}", now.timestamp_millis(), Uuid::new_v4(), ext)
}

fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Image files in `dir`, newest first.
pub async fn list_images(dir: &Path) -> std::io::Result<Vec<StoredImage>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut found = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_image_name(&name) {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        let modified: DateTime<Utc> = meta.modified()?.into();
        found.push((modified, name, meta.len()));
    }

    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    Ok(found
        .into_iter()
        .map(|(modified, name, size)| StoredImage {
            url: format!("/uploads/{}", name),
            file_name: name,
            size,
            uploaded_at: modified.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
        .collect())
}

/// POST /api/upload
pub async fn upload_image(
    State(state): State<UploadState>,
    identity: Identity,
    mut multipart: Multipart,
) -> Result<Json<UploadedFile>, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        let problems = check_file(&content_type, bytes.len(), state.max_bytes);
        if !problems.is_empty() {
            return Err(UploadError::Rejected(problems));
        }
        let ext = extension_for(&content_type).unwrap_or_default();

        tokio::fs::create_dir_all(state.dir()).await?;
        let file_name = unique_file_name(ext, Utc::now());
        tokio::fs::write(state.dir().join(&file_name), &bytes).await?;

        info!(
            "Stored upload {} ({} bytes, from {:?}) for {}",
            file_name,
            bytes.len(),
            original_name,
            identity.email
        );

        return Ok(Json(UploadedFile {
            url: format!("/uploads/{}", file_name),
            file_name,
            original_name,
            size: bytes.len(),
            content_type,
        }));
    }

    Err(UploadError::MissingFile)
}

/// GET /api/upload
pub async fn get_images(
    State(state): State<UploadState>,
    _identity: Identity,
) -> Result<Json<Vec<StoredImage>>, UploadError> {
    Ok(Json(list_images(state.dir()).await?))
}

/// Upload routes. Both handlers require an `Identity`.
pub fn router(state: UploadState) -> Router {
    let body_limit = state.max_bytes.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route("/api/upload", get(get_images).post(upload_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
