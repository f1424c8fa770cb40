//! Submission encoder: maps the nested resume document to the flat
//! `outer[index][field]` multipart key convention and back.
//!
//! Both directions are driven by the serde shape of [`ResumeContent`]
//! rather than a hand-maintained field list, so the client-side encoder
//! and the server-side decoder can never drift apart. The transport is
//! multipart because an optional binary image travels with the text
//! fields; everything here deals only with the text parts.

use serde_json::{Map, Value};

use crate::entities::resume::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeContent, SkillEntry, SocialEntry,
};
use crate::errors::AppError;

const ARRAY_SECTIONS: [&str; 5] = ["education", "experience", "projects", "skills", "socials"];

/// Highest bracket index the decoder will back-fill to. The form never
/// produces more than a handful of rows per section; anything beyond this
/// is a hostile key, not a resume.
const MAX_ARRAY_INDEX: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

/// Parses a bracket-path key (`experience[0][ctc]`, `personal[email]`,
/// `layoutChoice`) into path segments. Returns `None` for malformed keys.
pub fn parse_key(key: &str) -> Option<Vec<PathSeg>> {
    let mut segments = Vec::new();
    let head_end = key.find('[').unwrap_or(key.len());
    let head = &key[..head_end];
    if head.is_empty() {
        return None;
    }
    segments.push(PathSeg::Key(head.to_string()));

    let mut rest = &key[head_end..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return None;
        }
        let close = rest.find(']')?;
        let inner = &rest[1..close];
        if inner.is_empty() {
            return None;
        }
        let seg = match inner.parse::<usize>() {
            Ok(idx) => PathSeg::Index(idx),
            Err(_) => PathSeg::Key(inner.to_string()),
        };
        segments.push(seg);
        rest = &rest[close + 1..];
    }
    Some(segments)
}

/// Flattens a draft into the transport field list. A `None` image is
/// simply absent; a stored server-relative path is resent as a plain
/// `personal[image]` field so an update without new bytes keeps the
/// stored file.
pub fn encode_content(content: &ResumeContent) -> Vec<(String, String)> {
    let root = match serde_json::to_value(content) {
        Ok(Value::Object(map)) => map,
        _ => return Vec::new(),
    };

    let mut fields = Vec::new();

    if let Some(Value::Object(personal)) = root.get("personal") {
        push_object_fields(&mut fields, "personal", personal);
    }

    for section in ARRAY_SECTIONS {
        if let Some(Value::Array(items)) = root.get(section) {
            for (i, item) in items.iter().enumerate() {
                if let Value::Object(obj) = item {
                    let prefix = format!("{}[{}]", section, i);
                    push_object_fields(&mut fields, &prefix, obj);
                }
            }
        }
    }

    if let Some(Value::Object(layout)) = root.get("layoutOptions") {
        push_object_fields(&mut fields, "layoutOptions", layout);
    }

    if let Some(choice) = root.get("layoutChoice").and_then(scalar_to_string) {
        fields.push(("layoutChoice".to_string(), choice));
    }

    fields
}

fn push_object_fields(fields: &mut Vec<(String, String)>, prefix: &str, obj: &Map<String, Value>) {
    for (key, value) in obj {
        if let Some(text) = scalar_to_string(value) {
            fields.push((format!("{}[{}]", prefix, key), text));
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Rebuilds a [`ResumeContent`] from flat transport fields. Unknown keys
/// are ignored; array indexes may arrive in any order and gaps are filled
/// with zero-value records so `experience[2][...]` without earlier rows
/// still lands at index 2. Indexes above [`MAX_ARRAY_INDEX`] are dropped.
pub fn decode_fields(fields: &[(String, String)]) -> Result<ResumeContent, AppError> {
    let mut root = serde_json::to_value(ResumeContent::default())
        .map_err(|e| AppError::InternalError(format!("Schema serialization failed: {}", e)))?;

    for (key, value) in fields {
        let Some(path) = parse_key(key) else { continue };
        set_path(&mut root, &path, value);
    }

    serde_json::from_value(root)
        .map_err(|e| AppError::InvalidInput(format!("Malformed resume payload: {}", e)))
}

fn set_path(root: &mut Value, path: &[PathSeg], value: &str) {
    let section = match path.first() {
        Some(PathSeg::Key(k)) => k.clone(),
        _ => return,
    };

    let mut cursor = root;
    for (pos, seg) in path.iter().enumerate() {
        let last = pos == path.len() - 1;
        match seg {
            PathSeg::Key(key) => {
                let Value::Object(map) = cursor else { return };
                if last {
                    match map.get(key) {
                        // unknown field: not part of the schema, skip
                        None => return,
                        Some(existing) => {
                            let coerced = coerce_like(existing, value);
                            map.insert(key.clone(), coerced);
                            return;
                        }
                    }
                }
                let Some(next) = map.get_mut(key) else { return };
                cursor = next;
            }
            PathSeg::Index(idx) => {
                if *idx > MAX_ARRAY_INDEX {
                    return;
                }
                let Value::Array(items) = cursor else { return };
                while items.len() <= *idx {
                    match default_item_for(&section) {
                        Some(template) => items.push(template),
                        None => return,
                    }
                }
                if last {
                    // a bare index never addresses a scalar in this schema
                    return;
                }
                cursor = &mut items[*idx];
            }
        }
    }
}

/// Coerces the incoming text to the type the schema slot already holds, so
/// string transports round-trip typed fields (`fontSize`) exactly.
fn coerce_like(existing: &Value, value: &str) -> Value {
    match existing {
        Value::Number(_) => value
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| value.parse::<f64>().map(Value::from))
            .unwrap_or_else(|_| existing.clone()),
        Value::Bool(_) => value
            .parse::<bool>()
            .map(Value::Bool)
            .unwrap_or_else(|_| existing.clone()),
        _ => Value::String(value.to_string()),
    }
}

fn default_item_for(section: &str) -> Option<Value> {
    let value = match section {
        "education" => serde_json::to_value(EducationEntry::default()),
        "experience" => serde_json::to_value(ExperienceEntry::default()),
        "projects" => serde_json::to_value(ProjectEntry::default()),
        "skills" => serde_json::to_value(SkillEntry::default()),
        "socials" => serde_json::to_value(SocialEntry::default()),
        _ => return None,
    };
    value.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::resume::{LayoutOptions, Personal};

    fn sample_content() -> ResumeContent {
        ResumeContent {
            personal: Personal {
                image: None,
                name: "Asha Rao".into(),
                email: "asha@example.com".into(),
                phone: "9876543210".into(),
                address: "12 MG Road".into(),
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                pincode: "560001".into(),
                introduction: "Backend engineer.".into(),
            },
            education: vec![EducationEntry {
                degree: "BSc".into(),
                institution: "IISc".into(),
                percentage: "84".into(),
            }],
            experience: vec![ExperienceEntry {
                organization: "Acme".into(),
                location: "Remote".into(),
                position: "Engineer".into(),
                ctc: "24".into(),
                joining_date: "2021-02-01".into(),
                leaving_date: "2023-08-31".into(),
                technologies: "Rust, Postgres".into(),
                description: "Built the billing pipeline.".into(),
            }],
            projects: vec![ProjectEntry {
                title: "CVCraft".into(),
                team_size: "3".into(),
                duration: "6 months".into(),
                technologies: "actix-web".into(),
                description: "Resume builder.".into(),
            }],
            skills: vec![
                SkillEntry { name: "Rust".into(), level: "90".into() },
                SkillEntry { name: "SQL".into(), level: "75".into() },
            ],
            socials: vec![SocialEntry {
                platform: "github".into(),
                link: "https://github.com/asha".into(),
            }],
            layout_options: LayoutOptions {
                color: "#336699".into(),
                font: "Helvetica".into(),
                font_size: 13,
            },
            layout_choice: "Basic".into(),
        }
    }

    #[test]
    fn parse_key_handles_every_shape() {
        assert_eq!(
            parse_key("experience[0][ctc]"),
            Some(vec![
                PathSeg::Key("experience".into()),
                PathSeg::Index(0),
                PathSeg::Key("ctc".into()),
            ])
        );
        assert_eq!(
            parse_key("personal[email]"),
            Some(vec![PathSeg::Key("personal".into()), PathSeg::Key("email".into())])
        );
        assert_eq!(parse_key("layoutChoice"), Some(vec![PathSeg::Key("layoutChoice".into())]));
        assert_eq!(parse_key("[oops]"), None);
        assert_eq!(parse_key("broken[0"), None);
        assert_eq!(parse_key("broken[]"), None);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let content = sample_content();
        let fields = encode_content(&content);
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn encode_uses_the_bracket_convention() {
        let fields = encode_content(&sample_content());
        let get = |k: &str| {
            fields
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("personal[name]"), Some("Asha Rao"));
        assert_eq!(get("experience[0][ctc]"), Some("24"));
        assert_eq!(get("experience[0][joiningDate]"), Some("2021-02-01"));
        assert_eq!(get("skills[1][level]"), Some("75"));
        assert_eq!(get("layoutOptions[fontSize]"), Some("13"));
        assert_eq!(get("layoutChoice"), Some("Basic"));
        // image is None, so no key is emitted for it
        assert_eq!(get("personal[image]"), None);
    }

    #[test]
    fn stored_image_path_is_resent_as_plain_field() {
        let mut content = sample_content();
        content.personal.image = Some("/uploads/resumes/123-me.png".into());
        let fields = encode_content(&content);
        assert!(fields
            .iter()
            .any(|(k, v)| k == "personal[image]" && v == "/uploads/resumes/123-me.png"));

        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.personal.image.as_deref(), Some("/uploads/resumes/123-me.png"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let fields = vec![
            ("personal[name]".to_string(), "Asha".to_string()),
            ("personal[nickname]".to_string(), "ash".to_string()),
            ("gadgets[0][model]".to_string(), "x".to_string()),
            ("not a key at all".to_string(), "zzz".to_string()),
        ];
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.personal.name, "Asha");
        assert_eq!(decoded, {
            let mut expected = ResumeContent::default();
            expected.personal.name = "Asha".into();
            expected
        });
    }

    #[test]
    fn sparse_indexes_are_back_filled_with_zero_values() {
        let fields = vec![("skills[2][name]".to_string(), "Rust".to_string())];
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.skills.len(), 3);
        assert_eq!(decoded.skills[0], SkillEntry::default());
        assert_eq!(decoded.skills[2].name, "Rust");
    }

    #[test]
    fn oversized_indexes_are_dropped_not_back_filled() {
        let fields = vec![
            ("skills[100000][name]".to_string(), "x".to_string()),
            ("skills[1][name]".to_string(), "SQL".to_string()),
        ];
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.skills.len(), 2);
        assert_eq!(decoded.skills[1].name, "SQL");
    }

    #[test]
    fn typed_fields_are_coerced_from_text() {
        let fields = vec![("layoutOptions[fontSize]".to_string(), "15".to_string())];
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.layout_options.font_size, 15);

        // unparsable numbers keep the schema default
        let fields = vec![("layoutOptions[fontSize]".to_string(), "big".to_string())];
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded.layout_options.font_size, 12);
    }
}
