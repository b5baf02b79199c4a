use axum::extract::Multipart;
use tracing::warn;

use crate::documents::extract::{DocumentKind, DocumentRole, UploadedDocument};
use crate::errors::AppError;

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only TXT and PDF files are allowed.";
pub const MISSING_FILES: &str = "Both job description and resume files are required.";

/// Parsed fields of `POST /api/upload`.
#[derive(Debug)]
pub struct UploadForm {
    pub job_description: UploadedDocument,
    pub resume: UploadedDocument,
    /// Optional `experience` text field: "fresher" or "experienced".
    pub experience: Option<String>,
    /// Optional `yearsOfExperience` text field, only meaningful when experienced.
    pub years_of_experience: Option<String>,
}

/// Reads the multipart body of an upload request.
///
/// File parts are type-checked as they arrive, so an unsupported MIME type is
/// rejected before either document is extracted. Missing files are reported
/// only after the whole body has been read.
pub async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut job_description: Option<UploadedDocument> = None;
    let mut resume: Option<UploadedDocument> = None;
    let mut experience: Option<String> = None;
    let mut years_of_experience: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::multipart(e, "Malformed multipart request body."))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "jobDescription" | "resume" => {
                let role = if name == "resume" {
                    DocumentRole::Resume
                } else {
                    DocumentRole::JobDescription
                };

                let kind = field
                    .content_type()
                    .and_then(DocumentKind::from_mime)
                    .ok_or_else(|| {
                        warn!(
                            "Rejected {} upload with content type {:?}",
                            role.field_name(),
                            field.content_type()
                        );
                        AppError::validation(INVALID_FILE_TYPE)
                    })?;

                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::multipart(e, "Failed to read uploaded file."))?;

                let slot = match role {
                    DocumentRole::JobDescription => &mut job_description,
                    DocumentRole::Resume => &mut resume,
                };
                if slot.is_some() {
                    return Err(AppError::validation(format!(
                        "Only one {} file may be uploaded.",
                        role.field_name()
                    )));
                }
                *slot = Some(UploadedDocument {
                    role,
                    kind,
                    filename,
                    bytes,
                });
            }
            "experience" => experience = read_text_field(field).await?,
            "yearsOfExperience" => years_of_experience = read_text_field(field).await?,
            _ => {
                // Unknown fields are drained and ignored
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::multipart(e, "Malformed multipart request body."))?;
            }
        }
    }

    match (job_description, resume) {
        (Some(job_description), Some(resume)) => Ok(UploadForm {
            job_description,
            resume,
            experience,
            years_of_experience,
        }),
        _ => {
            warn!("Missing job description or resume file.");
            Err(AppError::validation(MISSING_FILES))
        }
    }
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
) -> Result<Option<String>, AppError> {
    let value = field
        .text()
        .await
        .map_err(|e| AppError::multipart(e, "Failed to read form field."))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
