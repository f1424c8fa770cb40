use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::resume::{ResumeContent, ResumeRecord},
    errors::AppError,
    repositories::sqlx_repo::SqlxResumeRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn create(&self, user_id: &Uuid, content: &ResumeContent) -> Result<ResumeRecord, AppError>;

    /// Offset-paginated listing for one owner, newest first, with the
    /// owner's total row count.
    async fn list(
        &self,
        user_id: &Uuid,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ResumeRecord>, u64), AppError>;

    async fn get(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<ResumeRecord>, AppError>;

    async fn update(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        content: &ResumeContent,
    ) -> Result<Option<ResumeRecord>, AppError>;

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, AppError>;

    /// Fetches by share token, only when sharing is switched on. No owner
    /// check: share links are the public surface.
    async fn get_shared(&self, share_token: &str) -> Result<Option<ResumeRecord>, AppError>;

    /// Stamps a fresh share token onto the resume and flips it shared.
    /// Returns false when the resume does not exist.
    async fn set_share_token(
        &self,
        id: &Uuid,
        share_token: &str,
        shared_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}

impl SqlxResumeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxResumeRepo { pool }
    }
}

const RESUME_COLUMNS: &str = "id, user_id, personal, education, experience, projects, skills, \
     socials, layout_options, layout_choice, share_token, is_shared, shared_at, created_at, updated_at";

#[async_trait]
impl ResumeRepository for SqlxResumeRepo {
    async fn create(&self, user_id: &Uuid, content: &ResumeContent) -> Result<ResumeRecord, AppError> {
        let record = sqlx::query_as::<_, ResumeRecord>(&format!(
            r#"INSERT INTO resumes (
                user_id, personal, education, experience, projects, skills,
                socials, layout_options, layout_choice
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {RESUME_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(Json(&content.personal))
        .bind(Json(&content.education))
        .bind(Json(&content.experience))
        .bind(Json(&content.projects))
        .bind(Json(&content.skills))
        .bind(Json(&content.socials))
        .bind(Json(&content.layout_options))
        .bind(&content.layout_choice)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(record)
    }

    async fn list(
        &self,
        user_id: &Uuid,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ResumeRecord>, u64), AppError> {
        let offset = (page as i64 - 1) * limit as i64;

        let resumes = sqlx::query_as::<_, ResumeRecord>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        ))
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        let total_docs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok((resumes, total_docs as u64))
    }

    async fn get(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<ResumeRecord>, AppError> {
        sqlx::query_as::<_, ResumeRecord>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2",
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update(
        &self,
        user_id: &Uuid,
        id: &Uuid,
        content: &ResumeContent,
    ) -> Result<Option<ResumeRecord>, AppError> {
        sqlx::query_as::<_, ResumeRecord>(&format!(
            r#"UPDATE resumes SET
                personal = $3,
                education = $4,
                experience = $5,
                projects = $6,
                skills = $7,
                socials = $8,
                layout_options = $9,
                layout_choice = $10,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {RESUME_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .bind(Json(&content.personal))
        .bind(Json(&content.education))
        .bind(Json(&content.experience))
        .bind(Json(&content.projects))
        .bind(Json(&content.skills))
        .bind(Json(&content.socials))
        .bind(Json(&content.layout_options))
        .bind(&content.layout_choice)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_shared(&self, share_token: &str) -> Result<Option<ResumeRecord>, AppError> {
        sqlx::query_as::<_, ResumeRecord>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE share_token = $1 AND is_shared = TRUE",
        ))
        .bind(share_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_share_token(
        &self,
        id: &Uuid,
        share_token: &str,
        shared_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE resumes SET share_token = $2, is_shared = TRUE, shared_at = $3, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(share_token)
        .bind(shared_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
