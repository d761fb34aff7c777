//! Image selection for the product form: a local file becomes raw bytes
//! for upload plus a data-URL preview, without any network I/O.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::AdminError;
use crate::models::ImageUpload;

/// Largest accepted upload, matching the "up to 10MB" hint of the form.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A chosen image: what gets uploaded and how it is previewed.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// `data:<mime>;base64,...`, for display only; never uploaded.
    pub preview: String,
}

impl SelectedImage {
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Self, AdminError> {
        let content_type = content_type_for(file_name).ok_or_else(|| {
            AdminError::ImageRejected(format!("{} is not a PNG, JPG, GIF or WEBP file", file_name))
        })?;
        if bytes.is_empty() {
            return Err(AdminError::ImageRejected(format!("{} is empty", file_name)));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AdminError::ImageRejected(format!(
                "{} is larger than 10MB",
                file_name
            )));
        }
        let preview = format!(
            "data:{};base64,{}",
            content_type,
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );
        Ok(Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
            preview,
        })
    }

    pub fn to_upload(&self) -> ImageUpload {
        ImageUpload {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// A file read started by [`ImagePicker::begin`].
#[derive(Debug)]
pub struct PendingRead {
    ticket: u64,
    path: PathBuf,
}

/// Outcome of a [`PendingRead`], handed back to [`ImagePicker::finish`].
#[derive(Debug)]
pub struct ImageRead {
    ticket: u64,
    result: Result<SelectedImage, AdminError>,
}

impl PendingRead {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(self) -> ImageRead {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let result = match tokio::fs::read(&self.path).await {
            Ok(bytes) => SelectedImage::from_bytes(&file_name, bytes),
            Err(source) => Err(AdminError::Image {
                path: self.path.clone(),
                source,
            }),
        };
        ImageRead {
            ticket: self.ticket,
            result,
        }
    }
}

/// Holds at most one selected image. Starting a new read or clearing
/// supersedes any read still in flight; its result is dropped on arrival.
#[derive(Debug, Default)]
pub struct ImagePicker {
    ticket: u64,
    selected: Option<SelectedImage>,
}

impl ImagePicker {
    pub fn begin(&mut self, path: impl Into<PathBuf>) -> PendingRead {
        self.ticket += 1;
        PendingRead {
            ticket: self.ticket,
            path: path.into(),
        }
    }

    /// Applies a finished read. `Ok(false)` means the read was superseded.
    pub fn finish(&mut self, read: ImageRead) -> Result<bool, AdminError> {
        if read.ticket != self.ticket {
            tracing::debug!(ticket = read.ticket, current = self.ticket, "Dropping stale image read");
            return Ok(false);
        }
        self.selected = Some(read.result?);
        Ok(true)
    }

    /// Reads `path` and selects it.
    pub async fn select(&mut self, path: impl Into<PathBuf>) -> Result<&SelectedImage, AdminError> {
        let read = self.begin(path).read().await;
        self.finish(read)?;
        self.selected
            .as_ref()
            .ok_or_else(|| AdminError::ImageRejected("image read was superseded".into()))
    }

    /// Selects an image already in memory (e.g. an uploaded form part).
    pub fn set(&mut self, image: SelectedImage) {
        self.ticket += 1;
        self.selected = Some(image);
    }

    pub fn clear(&mut self) {
        self.ticket += 1;
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.preview.as_str())
    }
}
