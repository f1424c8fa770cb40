//! End-to-end exercise of the form pipeline: edit a draft under the
//! validation policies, flatten it to multipart text fields, and decode it
//! back into the same document.

use cvcraft_backend::draft::{ArraySection, DraftController};
use cvcraft_backend::encode::{decode_fields, encode_content};
use cvcraft_backend::validation::validate_form;

fn filled_draft() -> DraftController {
    let mut draft = DraftController::new();
    draft.set_scalar_field("name", "Asha Rao");
    draft.set_scalar_field("email", "asha@example.com");
    draft.set_scalar_field("phone", "9876543210");
    draft.set_scalar_field("address", "12 MG Road");
    draft.set_scalar_field("city", "Bengaluru");
    draft.set_scalar_field("state", "Karnataka");
    draft.set_scalar_field("pincode", "560001");
    draft.set_scalar_field("introduction", "Backend engineer.");
    draft.blur_personal_field("introduction");

    draft.append_array_item(ArraySection::Education);
    draft.set_array_field(ArraySection::Education, 0, "degree", "BSc");
    draft.set_array_field(ArraySection::Education, 0, "institution", "IISc");
    draft.set_array_field(ArraySection::Education, 0, "percentage", "84");

    draft.append_array_item(ArraySection::Experience);
    draft.set_array_field(ArraySection::Experience, 0, "organization", "Acme");
    draft.set_array_field(ArraySection::Experience, 0, "location", "Remote");
    draft.set_array_field(ArraySection::Experience, 0, "position", "Engineer");
    draft.set_array_field(ArraySection::Experience, 0, "ctc", "12.5");
    draft.set_array_field(ArraySection::Experience, 0, "joiningDate", "2021-01-04");
    draft.set_array_field(ArraySection::Experience, 0, "leavingDate", "2023-06-30");
    draft.set_array_field(ArraySection::Experience, 0, "technologies", "Rust, Postgres");
    draft.set_array_field(ArraySection::Experience, 0, "description", "Built the billing stack.");
    draft.blur_array_field(ArraySection::Experience, 0, "description");

    draft.append_array_item(ArraySection::Skills);
    draft.set_array_field(ArraySection::Skills, 0, "name", "Rust");
    draft.set_array_field(ArraySection::Skills, 0, "level", "90");

    draft.append_array_item(ArraySection::Socials);
    draft.set_array_field(ArraySection::Socials, 0, "platform", "GitHub");
    draft.set_array_field(ArraySection::Socials, 0, "link", "https://github.com/asharao");

    draft
}

#[test]
fn a_fully_valid_draft_survives_the_wire_format() {
    let mut draft = filled_draft();
    assert!(draft.validate_all(), "unexpected errors: {:?}", draft.errors());

    let content = draft.into_content();
    let fields = encode_content(&content);
    let decoded = decode_fields(&fields).unwrap();

    assert_eq!(decoded, content);
    assert!(validate_form(&decoded).is_empty());
}

#[test]
fn live_edits_surface_errors_immediately_and_clear_on_fix() {
    let mut draft = DraftController::new();

    draft.set_scalar_field("phone", "12345");
    assert_eq!(
        draft.errors().get("personal.phone").map(String::as_str),
        Some("Phone must be 10 digits")
    );

    draft.set_scalar_field("phone", "9876543210");
    assert!(!draft.errors().contains_key("personal.phone"));
}

#[test]
fn blur_only_fields_stay_quiet_while_typing() {
    let mut draft = DraftController::new();
    let long = "x".repeat(2001);

    draft.set_scalar_field("introduction", &long);
    assert!(draft.errors().is_empty());

    draft.blur_personal_field("introduction");
    assert_eq!(
        draft.errors().get("personal.introduction").map(String::as_str),
        Some("Introduction is too long")
    );
}

#[test]
fn submit_catches_errors_live_editing_never_reported() {
    let mut draft = filled_draft();
    // dates reversed: only checked on submit
    draft.set_array_field(ArraySection::Experience, 0, "joiningDate", "2024-01-01");
    draft.set_array_field(ArraySection::Experience, 0, "leavingDate", "2022-01-01");
    assert!(draft.errors().is_empty());

    assert!(!draft.validate_all());
    assert!(draft.errors().contains_key("experience.0.dates"));
}

#[test]
fn editing_a_stored_record_round_trips_through_the_draft() {
    let mut draft = filled_draft();
    assert!(draft.validate_all());
    let stored = draft.into_content();

    // reopen for editing, change one field, resubmit
    let mut reopened = DraftController::from_content(stored.clone());
    reopened.set_scalar_field("city", "Mysuru");
    assert!(reopened.validate_all());

    let edited = reopened.into_content();
    assert_eq!(edited.personal.city, "Mysuru");
    assert_eq!(edited.education, stored.education);

    let decoded = decode_fields(&encode_content(&edited)).unwrap();
    assert_eq!(decoded, edited);
}

#[test]
fn decoding_skips_unknown_fields_and_preserves_known_ones() {
    let fields = vec![
        ("personal[name]".to_string(), "Asha".to_string()),
        ("mystery[0][thing]".to_string(), "ignored".to_string()),
        ("skills[0][name]".to_string(), "Rust".to_string()),
        ("skills[0][level]".to_string(), "80".to_string()),
    ];

    let decoded = decode_fields(&fields).unwrap();
    assert_eq!(decoded.personal.name, "Asha");
    assert_eq!(decoded.skills.len(), 1);
    assert_eq!(decoded.skills[0].level, "80");
}
