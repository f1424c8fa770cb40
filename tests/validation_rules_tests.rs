//! The field-level rule table, exercised through the public API with the
//! exact messages the form surfaces.

use cvcraft_backend::validation::{validate_field, validate_form, ValidationPolicy, policy_for};
use cvcraft_backend::entities::resume::{ExperienceEntry, ResumeContent, SkillEntry, SocialEntry};

#[test]
fn required_personal_fields_report_when_empty() {
    assert!(validate_field("personal", "name", "").is_some());
    assert!(validate_field("personal", "name", "Asha").is_none());
}

#[test]
fn phone_must_be_exactly_ten_digits() {
    assert_eq!(
        validate_field("personal", "phone", "98765"),
        Some("Phone must be 10 digits".to_string())
    );
    assert!(validate_field("personal", "phone", "9876543210").is_none());
    assert!(validate_field("personal", "phone", "98765432100").is_some());
    assert!(validate_field("personal", "phone", "98765abc10").is_some());
}

#[test]
fn percentage_is_a_number_between_zero_and_hundred() {
    assert!(validate_field("education", "percentage", "84.5").is_none());
    assert!(validate_field("education", "percentage", "0").is_none());
    assert!(validate_field("education", "percentage", "100").is_none());
    assert_eq!(
        validate_field("education", "percentage", "101"),
        Some("Percentage must be between 0 and 100".to_string())
    );
    assert!(validate_field("education", "percentage", "eighty").is_some());
}

#[test]
fn skill_level_is_an_integer_between_zero_and_hundred() {
    assert!(validate_field("skills", "level", "0").is_none());
    assert!(validate_field("skills", "level", "100").is_none());
    assert_eq!(
        validate_field("skills", "level", "90.5"),
        Some("Skill level must be an integer 0-100".to_string())
    );
    assert!(validate_field("skills", "level", "101").is_some());
}

#[test]
fn social_links_require_an_http_scheme() {
    assert!(validate_field("socials", "link", "https://github.com/a").is_none());
    assert!(validate_field("socials", "link", "http://example.com").is_none());
    assert_eq!(
        validate_field("socials", "link", "github.com/a"),
        Some("Link must start with http:// or https://".to_string())
    );
}

#[test]
fn long_text_fields_are_blur_validated() {
    assert_eq!(
        policy_for("personal", "introduction"),
        Some(ValidationPolicy::OnBlur)
    );
    assert_eq!(
        policy_for("experience", "description"),
        Some(ValidationPolicy::OnBlur)
    );
    assert_eq!(policy_for("personal", "phone"), Some(ValidationPolicy::OnChange));
    assert_eq!(policy_for("personal", "address"), None);
}

#[test]
fn validate_form_collects_every_failure_under_its_dotted_path() {
    let mut content = ResumeContent::default();
    content.personal.phone = "123".to_string();
    content.experience.push(ExperienceEntry {
        joining_date: "2024-05-01".to_string(),
        leaving_date: "2020-05-01".to_string(),
        ..ExperienceEntry::default()
    });
    content.skills.push(SkillEntry {
        name: "Rust".to_string(),
        level: "150".to_string(),
    });
    content.socials.push(SocialEntry {
        platform: "GitHub".to_string(),
        link: "github.com/a".to_string(),
    });

    let errors = validate_form(&content);

    assert_eq!(
        errors.get("personal.phone").map(String::as_str),
        Some("Phone must be 10 digits")
    );
    assert!(errors.contains_key("experience.0.dates"));
    assert!(errors.contains_key("skills.0.level"));
    assert!(errors.contains_key("socials.0.link"));
}
