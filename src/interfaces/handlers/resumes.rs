use actix_multipart::Multipart;
use actix_web::error::ResponseError;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use tracing::instrument;

use crate::entities::resume::{PaginationQuery, ResumeEnvelope};
use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::utils::uploads::save_resume_image;
use crate::AppState;

/// Drains a multipart payload into flat `(name, value)` text fields.
///
/// The one file part, `image`, is stored on disk and comes back as a
/// server-relative URL instead of a text field. A `personal[image]` text
/// field (the previously stored path) stays a text field, which is how an
/// update without new bytes keeps its existing image.
async fn collect_fields(
    mut payload: Multipart,
    upload_dir: &str,
) -> Result<(Vec<(String, String)>, Option<String>), AppError> {
    let mut fields = Vec::new();
    let mut stored_image = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart payload: {}", e)))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = web::BytesMut::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Malformed multipart payload: {}", e)))?
        {
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if name == "image" && !bytes.is_empty() => {
                stored_image = Some(save_resume_image(upload_dir, &filename, &bytes).await?);
            }
            _ => {
                fields.push((name, String::from_utf8_lossy(&bytes).into_owned()));
            }
        }
    }

    Ok((fields, stored_image))
}

#[post("")]
#[instrument(skip(claims, state, payload))]
pub async fn create_resume(
    claims: AuthClaims,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    let (fields, stored_image) = match collect_fields(payload, &state.upload_dir).await {
        Ok(parts) => parts,
        Err(e) => return e.to_http_response(),
    };

    match state
        .resume_handler
        .create_resume(&user_id, &fields, stored_image)
        .await
    {
        Ok(record) => HttpResponse::Created()
            .json(ResumeEnvelope::success(record, Some("Resume saved successfully"))),
        Err(e) => e.to_http_response(),
    }
}

#[get("")]
#[instrument(skip(claims, state, query))]
pub async fn get_all_resumes(
    claims: AuthClaims,
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state
        .resume_handler
        .get_all_resumes(&user_id, query.page, query.limit)
        .await
    {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(e) => e.to_http_response(),
    }
}

/// Public share-link lookup; registered ahead of `/{id}` so "shared" never
/// parses as a resume id.
#[get("/shared/{token}")]
#[instrument(skip(state, token))]
pub async fn get_shared_resume(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> impl Responder {
    match state.resume_handler.get_shared_resume(&token).await {
        Ok(record) => HttpResponse::Ok().json(ResumeEnvelope::success(record, None)),
        Err(e) => e.to_http_response(),
    }
}

#[get("/{id}")]
#[instrument(skip(claims, state, id))]
pub async fn get_resume_by_id(
    claims: AuthClaims,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.get_resume_by_id(&user_id, &id).await {
        Ok(record) => HttpResponse::Ok().json(ResumeEnvelope::success(record, None)),
        Err(e) => e.to_http_response(),
    }
}

#[put("/{id}")]
#[instrument(skip(claims, state, id, payload))]
pub async fn update_resume(
    claims: AuthClaims,
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: Multipart,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    let (fields, stored_image) = match collect_fields(payload, &state.upload_dir).await {
        Ok(parts) => parts,
        Err(e) => return e.to_http_response(),
    };

    match state
        .resume_handler
        .update_resume(&user_id, &id, &fields, stored_image)
        .await
    {
        Ok(record) => HttpResponse::Ok()
            .json(ResumeEnvelope::success(record, Some("Resume updated successfully"))),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/{id}")]
#[instrument(skip(claims, state, id))]
pub async fn delete_resume(
    claims: AuthClaims,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.delete_resume(&user_id, &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "message": "Resume deleted successfully"
        })),
        Err(e) => e.to_http_response(),
    }
}

#[get("/{id}/download")]
#[instrument(skip(claims, state, id))]
pub async fn download_resume_pdf(
    claims: AuthClaims,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.resume_handler.download_pdf(&user_id, &id).await {
        Ok((filename, bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(bytes),
        Err(e) => e.to_http_response(),
    }
}
