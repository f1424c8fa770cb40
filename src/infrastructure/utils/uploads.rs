use std::path::Path;

use chrono::Utc;

use crate::constants::{MAX_IMAGE_BYTES, UPLOAD_URL_PREFIX};
use crate::errors::AppError;

/// Strips path separators and anything exotic from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Persists an uploaded profile image and returns its public URL path.
///
/// The file type is sniffed from the bytes, not the filename. Only JPEG and
/// PNG are accepted.
pub async fn save_resume_image(
    upload_dir: &str,
    original_filename: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidInput("Image exceeds 5MB limit".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| AppError::InvalidInput("Invalid file type, upload JPEG/PNG only".to_string()))?;
    match kind.mime_type() {
        "image/jpeg" | "image/png" => {}
        _ => {
            return Err(AppError::InvalidInput(
                "Invalid file type, upload JPEG/PNG only".to_string(),
            ));
        }
    }

    let stored_name = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(original_filename)
    );

    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(Path::new(upload_dir).join(&stored_name), bytes).await?;

    Ok(format!("{}/{}", UPLOAD_URL_PREFIX, stored_name))
}
