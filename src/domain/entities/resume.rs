use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Singular personal section of a draft. `image` is `None` until the user
/// picks a file; once persisted it holds the server-relative path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Personal {
    pub image: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub introduction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub organization: String,
    pub location: String,
    pub position: String,
    pub ctc: String,
    pub joining_date: String,
    pub leaving_date: String,
    pub technologies: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    pub title: String,
    pub team_size: String,
    pub duration: String,
    pub technologies: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillEntry {
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialEntry {
    pub platform: String,
    pub link: String,
}

/// Presentation-only styling; carries no business invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub color: String,
    pub font: String,
    pub font_size: i32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            color: "#000000".to_string(),
            font: "Helvetica".to_string(),
            font_size: 12,
        }
    }
}

/// The full editable resume document: one singular section plus the
/// ordered collections. This is what the draft controller mutates, the
/// validation engine inspects, and the submission encoder flattens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeContent {
    pub personal: Personal,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<SkillEntry>,
    pub socials: Vec<SocialEntry>,
    pub layout_options: LayoutOptions,
    pub layout_choice: String,
}

/// Persisted resume row. Sections are stored as JSONB columns so the
/// document keeps its nested shape end to end.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub personal: Json<Personal>,
    pub education: Json<Vec<EducationEntry>>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub projects: Json<Vec<ProjectEntry>>,
    pub skills: Json<Vec<SkillEntry>>,
    pub socials: Json<Vec<SocialEntry>>,
    pub layout_options: Json<LayoutOptions>,
    pub layout_choice: String,
    pub share_token: Option<String>,
    pub is_shared: bool,
    pub shared_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRecord {
    pub fn content(&self) -> ResumeContent {
        ResumeContent {
            personal: self.personal.0.clone(),
            education: self.education.0.clone(),
            experience: self.experience.0.clone(),
            projects: self.projects.0.clone(),
            skills: self.skills.0.clone(),
            socials: self.socials.0.clone(),
            layout_options: self.layout_options.0.clone(),
            layout_choice: self.layout_choice.clone(),
        }
    }

    /// Filename offered in the Content-Disposition header of a PDF download.
    pub fn pdf_filename(&self) -> String {
        let name = self.personal.0.name.trim();
        if name.is_empty() {
            "resume.pdf".to_string()
        } else {
            format!("{}.pdf", name)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeListResponse {
    pub status: String,
    pub page: u32,
    pub limit: u32,
    pub total_docs: u64,
    pub total_pages: u64,
    pub has_more: bool,
    pub resumes: Vec<ResumeRecord>,
}

#[derive(Debug, Serialize)]
pub struct ResumeEnvelope {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub resume: ResumeRecord,
}

impl ResumeEnvelope {
    pub fn success(resume: ResumeRecord, message: Option<&str>) -> Self {
        ResumeEnvelope {
            status: "success".to_string(),
            message: message.map(str::to_string),
            resume,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
