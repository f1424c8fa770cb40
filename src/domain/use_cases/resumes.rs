use uuid::Uuid;

use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::domain::encode;
use crate::domain::validation;
use crate::entities::resume::{ResumeContent, ResumeListResponse, ResumeRecord};
use crate::errors::AppError;
use crate::infrastructure::pdf;
use crate::repositories::resume::ResumeRepository;
use crate::utils::valid_uuid::valid_uuid;

/// `hasMore` for offset pagination: more rows exist past the current page.
pub fn has_more(page: u32, limit: u32, total_docs: u64) -> bool {
    (page as u64) * (limit as u64) < total_docs
}

pub struct ResumeHandler<R>
where
    R: ResumeRepository,
{
    pub resume_repo: R,
}

impl<R> ResumeHandler<R>
where
    R: ResumeRepository,
{
    pub fn new(resume_repo: R) -> Self {
        ResumeHandler { resume_repo }
    }

    /// Decodes the flat multipart fields, re-runs the whole validation
    /// table server-side and persists a new resume. `stored_image` is the
    /// server-relative path of a freshly saved upload, if any.
    pub async fn create_resume(
        &self,
        user_id: &Uuid,
        fields: &[(String, String)],
        stored_image: Option<String>,
    ) -> Result<ResumeRecord, AppError> {
        let mut content = encode::decode_fields(fields)?;
        if let Some(path) = stored_image {
            content.personal.image = Some(path);
        }
        Self::check_content(&content)?;

        self.resume_repo.create(user_id, &content).await
    }

    pub async fn get_all_resumes(
        &self,
        user_id: &Uuid,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<ResumeListResponse, AppError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, 100);

        let (resumes, total_docs) = self.resume_repo.list(user_id, page, limit).await?;

        Ok(ResumeListResponse {
            status: "success".to_string(),
            page,
            limit,
            total_docs,
            total_pages: total_docs.div_ceil(limit as u64),
            has_more: has_more(page, limit, total_docs),
            resumes,
        })
    }

    pub async fn get_resume_by_id(&self, user_id: &Uuid, id: &str) -> Result<ResumeRecord, AppError> {
        let id = valid_uuid(id)?;
        self.resume_repo
            .get(user_id, &id)
            .await?
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
    }

    /// Wholesale replacement of the stored document. A freshly uploaded
    /// image wins; otherwise a resent `personal[image]` path (already in
    /// the decoded fields) keeps the previously stored file.
    pub async fn update_resume(
        &self,
        user_id: &Uuid,
        id: &str,
        fields: &[(String, String)],
        stored_image: Option<String>,
    ) -> Result<ResumeRecord, AppError> {
        let id = valid_uuid(id)?;
        let mut content = encode::decode_fields(fields)?;
        if let Some(path) = stored_image {
            content.personal.image = Some(path);
        }
        Self::check_content(&content)?;

        self.resume_repo
            .update(user_id, &id, &content)
            .await?
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
    }

    pub async fn delete_resume(&self, user_id: &Uuid, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        if self.resume_repo.delete(user_id, &id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Resume not found".to_string()))
        }
    }

    /// Renders the stored record to PDF bytes for download.
    pub async fn download_pdf(&self, user_id: &Uuid, id: &str) -> Result<(String, Vec<u8>), AppError> {
        let record = self.get_resume_by_id(user_id, id).await?;
        let filename = record.pdf_filename();
        let bytes = pdf::render_resume(&record.content())?;
        Ok((filename, bytes))
    }

    /// Public lookup by share token; only records actually shared resolve.
    pub async fn get_shared_resume(&self, share_token: &str) -> Result<ResumeRecord, AppError> {
        self.resume_repo
            .get_shared(share_token)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Shared CV not found or has been removed".to_string())
            })
    }

    fn check_content(content: &ResumeContent) -> Result<(), AppError> {
        let errors = validation::validate_form(content);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::from_error_map(errors.iter()))
        }
    }
}
