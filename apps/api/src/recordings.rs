//! Audio recording uploads, written to `RECORDINGS_DIR`.
//!
//! The client filename is kept where it is safe to: only its final path
//! component survives, restricted to `[A-Za-z0-9._-]`, and an existing file
//! is never overwritten.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

const AUDIO_FIELD: &str = "audio";
const FALLBACK_EXTENSION: &str = "webm";
const MAX_FILENAME_LEN: usize = 128;

#[derive(Debug, Serialize)]
pub struct AudioUploadResponse {
    pub message: String,
    pub filename: String,
}

/// POST /api/upload-audio
pub async fn handle_upload_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioUploadResponse>, AppError> {
    let mut upload: Option<(Option<String>, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::multipart(e, "Malformed multipart request body."))?
    {
        if field.name() == Some(AUDIO_FIELD) && upload.is_none() {
            let filename = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::multipart(e, "Failed to read uploaded file."))?;
            upload = Some((filename, data));
        } else {
            field
                .bytes()
                .await
                .map_err(|e| AppError::multipart(e, "Malformed multipart request body."))?;
        }
    }

    let (client_name, data) = upload
        .filter(|(_, data)| !data.is_empty())
        .ok_or_else(|| AppError::validation("An audio file is required."))?;

    let stored = save_recording(
        &state.config.recordings_dir,
        client_name.as_deref(),
        &data,
    )
    .await?;

    let filename = stored
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Stored recording {} ({} bytes)", filename, data.len());

    Ok(Json(AudioUploadResponse {
        message: "Audio uploaded successfully.".to_string(),
        filename,
    }))
}

/// Reduces a client-supplied filename to something safe to join onto the
/// recordings directory. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    // Both separators, whatever the host platform.
    let last = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .take(MAX_FILENAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Writes `data` under `dir` and returns the final path. Never overwrites:
/// on collision a short random suffix goes in before the extension.
pub async fn save_recording(
    dir: &Path,
    client_name: Option<&str>,
    data: &[u8],
) -> Result<PathBuf, AppError> {
    let name = client_name
        .and_then(sanitize_filename)
        .unwrap_or_else(|| format!("recording-{}.{FALLBACK_EXTENSION}", Uuid::new_v4()));

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating recordings directory {}", dir.display()))?;

    let mut candidate = dir.join(&name);
    loop {
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(mut file) => {
                file.write_all(data)
                    .await
                    .with_context(|| format!("writing {}", candidate.display()))?;
                file.flush().await.context("flushing recording")?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                candidate = dir.join(with_suffix(&name, &short_id()));
            }
            Err(e) => {
                return Err(AppError::Internal(
                    anyhow::Error::new(e).context(format!("opening {}", candidate.display())),
                ))
            }
        }
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// `answer.webm` + `ab12` → `answer-ab12.webm`
fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{suffix}.{ext}"),
        _ => format!("{name}-{suffix}"),
    }
}
