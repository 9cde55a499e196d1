//! File handlers for the Filebay API.

use axum::{
    body::{Body, Bytes},
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    ApiResponse, FileInfo, ListingResponse, RenameRequest, RenameResponse, UploadResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Content disposition flavor for raw file serving.
#[derive(Debug, Clone, Copy)]
enum Disposition {
    Attachment,
    Inline,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

/// Generate a safe Content-Disposition header value.
///
/// Sanitizes the filename to prevent header injection and uses RFC 5987
/// encoding for non-ASCII filenames.
fn content_disposition_header(disposition: Disposition, filename: &str) -> String {
    let kind = disposition.as_str();

    // ASCII fallback with control characters removed and quote/backslash
    // replaced.
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("{kind}; filename=\"{filename}\"");
    }

    // RFC 5987 filename* parameter with UTF-8 encoding
    let encoded = urlencoding::encode(filename);

    format!("{kind}; filename=\"{sanitized}\"; filename*=UTF-8''{encoded}")
}

/// Build a raw-bytes response with content type and disposition headers.
fn serve_bytes(name: &str, content: Vec<u8>, disposition: Disposition) -> Result<Response, ApiError> {
    let content_type = mime_guess::from_path(name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(disposition, name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// GET /files - List stored files.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ListingResponse>>, ApiError> {
    let entries = state.store.list()?;
    let total_bytes = entries.iter().map(|e| e.size).sum();
    let files = entries.into_iter().map(FileInfo::from).collect();

    Ok(Json(ApiResponse::new(ListingResponse { files, total_bytes })))
}

/// Map a multipart read failure, preserving the transport's 413 for bodies
/// over the configured limit.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the size limit")
    } else {
        tracing::error!("Failed to read multipart data: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// POST /files - Upload one or more files.
///
/// Accepts multipart form data; every field carrying a filename is stored.
/// All fields are read and size-checked before the first save, so an
/// oversized field rejects the whole request without leaving earlier fields
/// behind in storage. Returns the stored names, or 400 if no valid file was
/// present.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let limit = state.store.max_upload_bytes();
    let mut pending: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        if filename.is_empty() {
            continue;
        }

        let content = field.bytes().await.map_err(multipart_error)?;
        if content.len() as u64 > limit {
            return Err(ApiError::payload_too_large(format!(
                "File '{}' exceeds the size limit",
                filename
            )));
        }

        pending.push((filename, content));
    }

    if pending.is_empty() {
        return Err(ApiError::bad_request("No valid files in upload"));
    }

    let mut saved = Vec::new();
    for (filename, content) in pending {
        let stored = state.store.save(&filename, &content)?;
        tracing::info!(original = %filename, stored = %stored, size = content.len(), "uploaded file");
        saved.push(stored);
    }

    Ok(Json(ApiResponse::new(UploadResponse { saved })))
}

/// GET /files/:name/download - Serve a file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.store.read_bytes(&name)?;
    serve_bytes(&name, content, Disposition::Attachment)
}

/// GET /files/:name/view - Serve a file inline (browser preview).
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.store.read_bytes(&name)?;
    serve_bytes(&name, content, Disposition::Inline)
}

/// GET /files/:name/content - Read a file as UTF-8 text for editing.
///
/// Fails with 400 for files that are not editable inline or whose bytes are
/// not valid UTF-8.
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let entry = state.store.stat(&name)?;
    if !entry.editable {
        return Err(ApiError::bad_request(
            "File is not editable inline (extension or size)",
        ));
    }

    let text = state.store.read_text(&name)?;

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(text))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// PUT /files/:name/content - Overwrite a file's content.
///
/// A `text/plain` body is treated as an inline text edit and is only
/// accepted for editable files (allow-listed extension, size within the
/// edit ceiling). Any other content type replaces the file's bytes
/// wholesale, subject only to the global upload limit.
pub async fn update_content(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let is_text_edit = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("text/plain"))
        .unwrap_or(false);

    if is_text_edit {
        let entry = state.store.stat(&name)?;
        if !entry.editable {
            return Err(ApiError::bad_request(
                "File is not editable inline (extension or size)",
            ));
        }
        let text = std::str::from_utf8(&body)
            .map_err(|_| ApiError::bad_request("Edit body is not valid UTF-8"))?;
        state.store.write_text(&name, text)?;
    } else {
        state.store.replace(&name, &body)?;
    }

    Ok(Json(ApiResponse::new(())))
}

/// POST /files/:name/rename - Rename a file.
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ApiResponse<RenameResponse>>, ApiError> {
    let final_name = state.store.rename(&name, &request.new_name)?;
    Ok(Json(ApiResponse::new(RenameResponse { name: final_name })))
}

/// DELETE /files/:name - Delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.store.delete(&name)?;
    Ok(Json(ApiResponse::new(())))
}
