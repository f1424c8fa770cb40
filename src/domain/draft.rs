//! Draft controller: holds the editable resume document together with its
//! error map and mediates every mutation through the validation policies.
//!
//! The error map is keyed by dotted field path (`experience.0.ctc`). An
//! empty map means the form is valid; clearing an error removes its key
//! entirely rather than storing an empty message.

use std::collections::BTreeMap;

use crate::entities::resume::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeContent, SkillEntry, SocialEntry,
};
use crate::validation::{self, ValidationPolicy};

/// Ordered collections of the draft. There is no removal operation;
/// sections only grow while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySection {
    Education,
    Experience,
    Projects,
    Skills,
    Socials,
}

impl ArraySection {
    pub fn key(&self) -> &'static str {
        match self {
            ArraySection::Education => "education",
            ArraySection::Experience => "experience",
            ArraySection::Projects => "projects",
            ArraySection::Skills => "skills",
            ArraySection::Socials => "socials",
        }
    }
}

#[derive(Debug, Default)]
pub struct DraftController {
    content: ResumeContent,
    errors: BTreeMap<String, String>,
}

impl DraftController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the draft from an existing record or template.
    pub fn from_content(content: ResumeContent) -> Self {
        DraftController {
            content,
            errors: BTreeMap::new(),
        }
    }

    pub fn content(&self) -> &ResumeContent {
        &self.content
    }

    pub fn into_content(self) -> ResumeContent {
        self.content
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Upserts or clears one entry of the error map. An empty message
    /// removes the key.
    pub fn set_error(&mut self, path: &str, message: &str) {
        if message.is_empty() {
            self.errors.remove(path);
        } else {
            self.errors.insert(path.to_string(), message.to_string());
        }
    }

    /// Sets one field of the singular `personal` section. Fields whose
    /// policy is OnChange are validated immediately; OnBlur fields wait
    /// for [`blur_personal_field`](Self::blur_personal_field).
    pub fn set_scalar_field(&mut self, field: &str, value: &str) {
        if !write_personal(&mut self.content, field, value) {
            return;
        }
        if validation::policy_for("personal", field) == Some(ValidationPolicy::OnChange) {
            let message = validation::validate_field("personal", field, value);
            self.set_error(&format!("personal.{}", field), message.as_deref().unwrap_or(""));
        }
    }

    /// Replaces one element of an ordered section without touching the
    /// others: the section vector is rebuilt so prior elements keep their
    /// values untouched by the write.
    pub fn set_array_field(&mut self, section: ArraySection, index: usize, field: &str, value: &str) {
        let written = match section {
            ArraySection::Education => {
                replace_at(&mut self.content.education, index, |e| write_education(e, field, value))
            }
            ArraySection::Experience => {
                replace_at(&mut self.content.experience, index, |e| write_experience(e, field, value))
            }
            ArraySection::Projects => {
                replace_at(&mut self.content.projects, index, |e| write_project(e, field, value))
            }
            ArraySection::Skills => {
                replace_at(&mut self.content.skills, index, |e| write_skill(e, field, value))
            }
            ArraySection::Socials => {
                replace_at(&mut self.content.socials, index, |e| write_social(e, field, value))
            }
        };
        if !written {
            return;
        }
        if validation::policy_for(section.key(), field) == Some(ValidationPolicy::OnChange) {
            let message = validation::validate_field(section.key(), field, value);
            self.set_error(
                &format!("{}.{}.{}", section.key(), index, field),
                message.as_deref().unwrap_or(""),
            );
        }
    }

    /// Appends a zero-value record to a section. Always succeeds.
    pub fn append_array_item(&mut self, section: ArraySection) {
        match section {
            ArraySection::Education => self.content.education.push(EducationEntry::default()),
            ArraySection::Experience => self.content.experience.push(ExperienceEntry::default()),
            ArraySection::Projects => self.content.projects.push(ProjectEntry::default()),
            ArraySection::Skills => self.content.skills.push(SkillEntry::default()),
            ArraySection::Socials => self.content.socials.push(SocialEntry::default()),
        }
    }

    /// Runs the blur-time rule for a long-text personal field.
    pub fn blur_personal_field(&mut self, field: &str) {
        let value = read_personal(&self.content, field).unwrap_or_default();
        let message = validation::validate_field("personal", field, &value);
        self.set_error(&format!("personal.{}", field), message.as_deref().unwrap_or(""));
    }

    /// Runs the blur-time rule for an array field (experience descriptions).
    pub fn blur_array_field(&mut self, section: ArraySection, index: usize, field: &str) {
        let value = match (section, field) {
            (ArraySection::Experience, "description") => self
                .content
                .experience
                .get(index)
                .map(|e| e.description.clone()),
            _ => None,
        };
        let Some(value) = value else { return };
        let message = validation::validate_field(section.key(), field, &value);
        self.set_error(
            &format!("{}.{}.{}", section.key(), index, field),
            message.as_deref().unwrap_or(""),
        );
    }

    /// Wholesale validation: re-runs every rule, replaces the error map
    /// and returns the verdict. This is the sole gate before submission.
    pub fn validate_all(&mut self) -> bool {
        self.errors = validation::validate_form(&self.content);
        self.errors.is_empty()
    }
}

/// Writes through to the element at `index`. Out-of-range writes are
/// ignored. The write helpers touch nothing when the field is unknown, so
/// a failed write leaves the record as it was.
fn replace_at<T, F>(items: &mut [T], index: usize, mutate: F) -> bool
where
    F: FnOnce(&mut T) -> bool,
{
    match items.get_mut(index) {
        Some(item) => mutate(item),
        None => false,
    }
}

fn write_personal(content: &mut ResumeContent, field: &str, value: &str) -> bool {
    let p = &mut content.personal;
    match field {
        "image" => p.image = Some(value.to_string()),
        "name" => p.name = value.to_string(),
        "email" => p.email = value.to_string(),
        "phone" => p.phone = value.to_string(),
        "address" => p.address = value.to_string(),
        "city" => p.city = value.to_string(),
        "state" => p.state = value.to_string(),
        "pincode" => p.pincode = value.to_string(),
        "introduction" => p.introduction = value.to_string(),
        _ => return false,
    }
    true
}

fn read_personal(content: &ResumeContent, field: &str) -> Option<String> {
    let p = &content.personal;
    match field {
        "image" => p.image.clone(),
        "name" => Some(p.name.clone()),
        "email" => Some(p.email.clone()),
        "phone" => Some(p.phone.clone()),
        "address" => Some(p.address.clone()),
        "city" => Some(p.city.clone()),
        "state" => Some(p.state.clone()),
        "pincode" => Some(p.pincode.clone()),
        "introduction" => Some(p.introduction.clone()),
        _ => None,
    }
}

fn write_education(e: &mut EducationEntry, field: &str, value: &str) -> bool {
    match field {
        "degree" => e.degree = value.to_string(),
        "institution" => e.institution = value.to_string(),
        "percentage" => e.percentage = value.to_string(),
        _ => return false,
    }
    true
}

fn write_experience(e: &mut ExperienceEntry, field: &str, value: &str) -> bool {
    match field {
        "organization" => e.organization = value.to_string(),
        "location" => e.location = value.to_string(),
        "position" => e.position = value.to_string(),
        "ctc" => e.ctc = value.to_string(),
        "joiningDate" => e.joining_date = value.to_string(),
        "leavingDate" => e.leaving_date = value.to_string(),
        "technologies" => e.technologies = value.to_string(),
        "description" => e.description = value.to_string(),
        _ => return false,
    }
    true
}

fn write_project(p: &mut ProjectEntry, field: &str, value: &str) -> bool {
    match field {
        "title" => p.title = value.to_string(),
        "teamSize" => p.team_size = value.to_string(),
        "duration" => p.duration = value.to_string(),
        "technologies" => p.technologies = value.to_string(),
        "description" => p.description = value.to_string(),
        _ => return false,
    }
    true
}

fn write_skill(s: &mut SkillEntry, field: &str, value: &str) -> bool {
    match field {
        "name" => s.name = value.to_string(),
        "level" => s.level = value.to_string(),
        _ => return false,
    }
    true
}

fn write_social(s: &mut SocialEntry, field: &str, value: &str) -> bool {
    match field {
        "platform" => s.platform = value.to_string(),
        "link" => s.link = value.to_string(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_fields_validate_live() {
        let mut draft = DraftController::new();
        draft.set_scalar_field("email", "broken");
        assert_eq!(
            draft.errors().get("personal.email").map(String::as_str),
            Some("Invalid email address")
        );

        draft.set_scalar_field("email", "fixed@example.com");
        assert!(!draft.errors().contains_key("personal.email"));
    }

    #[test]
    fn blur_only_fields_skip_live_validation() {
        let mut draft = DraftController::new();
        let long = "x".repeat(2001);
        draft.set_scalar_field("introduction", &long);
        assert!(draft.errors().is_empty(), "OnBlur field must not validate on change");

        draft.blur_personal_field("introduction");
        assert_eq!(
            draft.errors().get("personal.introduction").map(String::as_str),
            Some("Introduction is too long")
        );
    }

    #[test]
    fn append_never_mutates_prior_elements() {
        let mut draft = DraftController::new();
        draft.append_array_item(ArraySection::Skills);
        draft.set_array_field(ArraySection::Skills, 0, "name", "Rust");
        draft.set_array_field(ArraySection::Skills, 0, "level", "90");

        let before = draft.content().skills.clone();
        draft.append_array_item(ArraySection::Skills);

        assert_eq!(draft.content().skills.len(), 2);
        assert_eq!(&draft.content().skills[..1], &before[..]);
        assert_eq!(draft.content().skills[1], SkillEntry::default());
    }

    #[test]
    fn array_writes_replace_only_the_target_element() {
        let mut draft = DraftController::new();
        draft.append_array_item(ArraySection::Education);
        draft.append_array_item(ArraySection::Education);
        draft.set_array_field(ArraySection::Education, 0, "degree", "BSc");
        draft.set_array_field(ArraySection::Education, 1, "degree", "MSc");

        assert_eq!(draft.content().education[0].degree, "BSc");
        assert_eq!(draft.content().education[1].degree, "MSc");

        // out-of-range writes are ignored
        draft.set_array_field(ArraySection::Education, 5, "degree", "PhD");
        assert_eq!(draft.content().education.len(), 2);
    }

    #[test]
    fn array_writes_validate_per_policy() {
        let mut draft = DraftController::new();
        draft.append_array_item(ArraySection::Experience);
        draft.set_array_field(ArraySection::Experience, 0, "ctc", "not-a-number");
        assert!(draft.errors().contains_key("experience.0.ctc"));

        // description is blur-only
        let long = "y".repeat(1501);
        draft.set_array_field(ArraySection::Experience, 0, "description", &long);
        assert!(!draft.errors().contains_key("experience.0.description"));
        draft.blur_array_field(ArraySection::Experience, 0, "description");
        assert!(draft.errors().contains_key("experience.0.description"));
    }

    #[test]
    fn set_error_with_empty_message_clears_the_key() {
        let mut draft = DraftController::new();
        draft.set_error("personal.name", "Name is required");
        assert!(!draft.is_valid());
        draft.set_error("personal.name", "");
        assert!(draft.is_valid());
        assert!(!draft.errors().contains_key("personal.name"));
    }

    #[test]
    fn validate_all_fails_iff_error_map_is_nonempty() {
        let mut draft = DraftController::new();
        assert!(!draft.validate_all());
        assert!(!draft.errors().is_empty());

        draft.set_scalar_field("name", "Asha Rao");
        draft.set_scalar_field("email", "asha@example.com");
        draft.set_scalar_field("phone", "9876543210");
        draft.set_scalar_field("city", "Bengaluru");
        draft.set_scalar_field("state", "Karnataka");
        draft.set_scalar_field("pincode", "560001");
        assert!(draft.validate_all());
        assert!(draft.errors().is_empty());
    }
}
