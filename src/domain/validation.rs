//! Per-field validation rules for the resume draft.
//!
//! Every rule is a pure function from field identity + value to an optional
//! error message. Fields carry an explicit [`ValidationPolicy`] deciding
//! whether they are checked on every change or only on blur; the draft
//! controller dispatches through that policy instead of special-casing
//! individual fields.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::constants::{DESCRIPTION_MAX_CHARS, INTRODUCTION_MAX_CHARS};
use crate::entities::resume::ResumeContent;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.+").unwrap());

/// When a field's rule fires: on every value change (short enumerable
/// fields) or only when focus leaves the field (long free text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    OnChange,
    OnBlur,
}

/// Policy lookup for a field. `None` means the field carries no rule at all.
pub fn policy_for(section: &str, field: &str) -> Option<ValidationPolicy> {
    use ValidationPolicy::*;
    match (section, field) {
        ("personal", "name" | "email" | "phone" | "city" | "state" | "pincode") => Some(OnChange),
        ("personal", "introduction") => Some(OnBlur),
        ("education", "degree" | "institution" | "percentage") => Some(OnChange),
        ("experience", "organization" | "position" | "ctc") => Some(OnChange),
        ("experience", "description") => Some(OnBlur),
        ("projects", "title" | "teamSize") => Some(OnChange),
        ("skills", "name" | "level") => Some(OnChange),
        ("socials", "link") => Some(OnChange),
        _ => None,
    }
}

fn required(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is required", label))
    } else {
        None
    }
}

fn validate_email(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(value) {
        return Some("Invalid email address".to_string());
    }
    None
}

fn validate_phone(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Phone is required".to_string());
    }
    if !DIGITS_RE.is_match(value) {
        return Some("Phone must contain only digits".to_string());
    }
    if value.len() != 10 {
        return Some("Phone must be 10 digits".to_string());
    }
    None
}

fn validate_pincode(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Pincode is required".to_string());
    }
    if !DIGITS_RE.is_match(value) {
        return Some("Pincode must be numeric".to_string());
    }
    None
}

fn validate_positive_number(value: &str, label: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{} is required", label));
    }
    if !NUMBER_RE.is_match(value) {
        return Some(format!("{} must be a positive number", label));
    }
    None
}

fn validate_percentage(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Percentage is required".to_string());
    }
    if !NUMBER_RE.is_match(value) {
        return Some("Percentage must be a number".to_string());
    }
    match value.parse::<f64>() {
        Ok(n) if (0.0..=100.0).contains(&n) => None,
        _ => Some("Percentage must be between 0 and 100".to_string()),
    }
}

fn validate_skill_level(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Skill level is required".to_string());
    }
    if !DIGITS_RE.is_match(value) {
        return Some("Skill level must be an integer 0-100".to_string());
    }
    match value.parse::<i64>() {
        Ok(n) if (0..=100).contains(&n) => None,
        _ => Some("Skill level must be between 0 and 100".to_string()),
    }
}

fn validate_link(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if !LINK_RE.is_match(value) {
        return Some("Link must start with http:// or https://".to_string());
    }
    None
}

/// Long free-text limits, applied on blur and by the wholesale pass.
fn validate_long_text(section: &str, field: &str, value: &str) -> Option<String> {
    match (section, field) {
        ("personal", "introduction") if value.chars().count() > INTRODUCTION_MAX_CHARS => {
            Some("Introduction is too long".to_string())
        }
        ("experience", "description") if value.chars().count() > DESCRIPTION_MAX_CHARS => {
            Some("Description is too long".to_string())
        }
        _ => None,
    }
}

/// Pure per-field validator. Returns `None` when the value passes (or the
/// field has no rule), otherwise a user-facing message.
pub fn validate_field(section: &str, field: &str, value: &str) -> Option<String> {
    match (section, field) {
        ("personal", "name") => required(value, "Name"),
        ("personal", "email") => validate_email(value),
        ("personal", "phone") => validate_phone(value),
        ("personal", "city") => required(value, "City"),
        ("personal", "state") => required(value, "State"),
        ("personal", "pincode") => validate_pincode(value),
        ("personal", "introduction") => validate_long_text(section, field, value),

        ("education", "degree") => required(value, "Degree"),
        ("education", "institution") => required(value, "Institution"),
        ("education", "percentage") => validate_percentage(value),

        ("experience", "organization") => required(value, "Organization"),
        ("experience", "position") => required(value, "Position"),
        ("experience", "ctc") => validate_positive_number(value, "CTC"),
        ("experience", "description") => validate_long_text(section, field, value),

        ("projects", "title") => required(value, "Project Title"),
        ("projects", "teamSize") => {
            if value.is_empty() {
                None
            } else {
                validate_positive_number(value, "Team size")
            }
        }

        ("skills", "name") => required(value, "Skill name"),
        ("skills", "level") => validate_skill_level(value),

        ("socials", "link") => validate_link(value),

        _ => None,
    }
}

/// Joining date must not be after leaving date when both parse as dates.
/// Unparseable values are left to their own field rules.
pub fn validate_date_order(joining: &str, leaving: &str) -> Option<String> {
    let joining = NaiveDate::parse_from_str(joining, "%Y-%m-%d").ok()?;
    let leaving = NaiveDate::parse_from_str(leaving, "%Y-%m-%d").ok()?;
    if joining > leaving {
        Some("Joining date cannot be after leaving date".to_string())
    } else {
        None
    }
}

/// Wholesale pass over the draft: runs every rule for every section and
/// returns the full error map keyed by dotted field path. The empty map is
/// the sole green light for submission.
pub fn validate_form(content: &ResumeContent) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    let personal = &content.personal;
    let personal_fields = [
        ("name", personal.name.as_str()),
        ("email", personal.email.as_str()),
        ("phone", personal.phone.as_str()),
        ("city", personal.city.as_str()),
        ("state", personal.state.as_str()),
        ("pincode", personal.pincode.as_str()),
        ("introduction", personal.introduction.as_str()),
    ];
    for (field, value) in personal_fields {
        if let Some(msg) = validate_field("personal", field, value) {
            errors.insert(format!("personal.{}", field), msg);
        }
    }

    for (i, ed) in content.education.iter().enumerate() {
        let fields = [
            ("degree", ed.degree.as_str()),
            ("institution", ed.institution.as_str()),
            ("percentage", ed.percentage.as_str()),
        ];
        for (field, value) in fields {
            if let Some(msg) = validate_field("education", field, value) {
                errors.insert(format!("education.{}.{}", i, field), msg);
            }
        }
    }

    for (i, ex) in content.experience.iter().enumerate() {
        let fields = [
            ("organization", ex.organization.as_str()),
            ("position", ex.position.as_str()),
            ("ctc", ex.ctc.as_str()),
            ("description", ex.description.as_str()),
        ];
        for (field, value) in fields {
            if let Some(msg) = validate_field("experience", field, value) {
                errors.insert(format!("experience.{}.{}", i, field), msg);
            }
        }
        if let Some(msg) = validate_date_order(&ex.joining_date, &ex.leaving_date) {
            errors.insert(format!("experience.{}.dates", i), msg);
        }
    }

    for (i, p) in content.projects.iter().enumerate() {
        for (field, value) in [("title", p.title.as_str()), ("teamSize", p.team_size.as_str())] {
            if let Some(msg) = validate_field("projects", field, value) {
                errors.insert(format!("projects.{}.{}", i, field), msg);
            }
        }
    }

    for (i, s) in content.skills.iter().enumerate() {
        for (field, value) in [("name", s.name.as_str()), ("level", s.level.as_str())] {
            if let Some(msg) = validate_field("skills", field, value) {
                errors.insert(format!("skills.{}.{}", i, field), msg);
            }
        }
    }

    for (i, s) in content.socials.iter().enumerate() {
        if let Some(msg) = validate_field("socials", "link", &s.link) {
            errors.insert(format!("socials.{}.link", i), msg);
        }
    }

    errors
}
