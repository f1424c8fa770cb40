//! Stateless PDF transcription of a stored resume.
//!
//! Sections are walked in a fixed order (header, contact, introduction,
//! education, experience, projects, skills, socials) with a y-cursor,
//! greedy word wrap and page breaks. Accent color and body size come from
//! the record's layout options. This is a transcription, not a layout
//! engine.

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb};

use crate::entities::resume::ResumeContent;
use crate::errors::AppError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const PT_TO_MM: f32 = 0.352_78;
// Average glyph advance for Helvetica, as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

struct PdfCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    body_size: f32,
    accent: Color,
    black: Color,
}

impl PdfCursor {
    fn new(title: &str, body_size: f32, accent: Color) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::InternalError(format!("PDF font error: {}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::InternalError(format!("PDF font error: {}", e)))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PdfCursor {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            body_size,
            accent,
            black: Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        })
    }

    fn line_height(size: f32) -> f32 {
        size * PT_TO_MM * 1.4
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn write_line(&mut self, text: &str, size: f32, color: &Color, bold: bool) {
        let font = if bold { self.bold.clone() } else { self.regular.clone() };
        for line in wrap_text(text, max_chars_per_line(size)) {
            self.ensure_room(Self::line_height(size));
            self.layer.set_fill_color(color.clone());
            self.layer
                .use_text(line, size, Mm(MARGIN_MM), Mm(self.y), &font);
            self.y -= Self::line_height(size);
        }
    }

    fn heading(&mut self, text: &str) {
        let size = self.body_size + 2.0;
        self.gap(2.0);
        let accent = self.accent.clone();
        self.write_line(text, size, &accent, true);
    }

    fn body(&mut self, text: &str) {
        let size = self.body_size;
        let black = self.black.clone();
        self.write_line(text, size, &black, false);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| AppError::InternalError(format!("PDF serialization failed: {}", e)))
    }
}

fn max_chars_per_line(size: f32) -> usize {
    let usable_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let glyph_mm = size * PT_TO_MM * AVG_GLYPH_WIDTH;
    ((usable_mm / glyph_mm) as usize).max(16)
}

/// Greedy word wrap. Words longer than the limit get a line of their own.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Parses `#rrggbb`; anything else falls back to black.
fn parse_accent(color: &str) -> Color {
    let hex = color.strip_prefix('#').unwrap_or(color);
    // length + ascii check before slicing: the color string is stored
    // verbatim, so it can hold multibyte characters
    if hex.len() == 6 && hex.is_ascii() {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::Rgb(Rgb::new(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                None,
            ));
        }
    }
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

pub fn render_resume(content: &ResumeContent) -> Result<Vec<u8>, AppError> {
    let accent = parse_accent(&content.layout_options.color);
    let body_size = (content.layout_options.font_size.clamp(8, 16)) as f32;
    let title = if content.personal.name.is_empty() {
        "Resume".to_string()
    } else {
        content.personal.name.clone()
    };

    let mut pdf = PdfCursor::new(&title, body_size, accent)?;

    // Header
    let name = if content.personal.name.is_empty() { "Name" } else { &content.personal.name };
    let accent = pdf.accent.clone();
    pdf.write_line(name, 20.0, &accent, true);
    pdf.gap(2.0);

    // Contact
    pdf.body(&format!("{} · {}", content.personal.email, content.personal.phone));
    pdf.body(&format!("{}, {}", content.personal.city, content.personal.state));
    pdf.gap(2.0);

    // Introduction
    if !content.personal.introduction.is_empty() {
        pdf.body(&content.personal.introduction);
        pdf.gap(2.0);
    }

    if !content.education.is_empty() {
        pdf.heading("Education:");
        for e in &content.education {
            pdf.body(&format!("{}, {} ({})", e.degree, e.institution, e.percentage));
        }
    }

    if !content.experience.is_empty() {
        pdf.heading("Experience:");
        for exp in &content.experience {
            pdf.body(&format!(
                "{} at {} ({} - {})",
                exp.position, exp.organization, exp.joining_date, exp.leaving_date
            ));
            if !exp.description.is_empty() {
                pdf.body(&format!("  • {}", exp.description));
            }
        }
    }

    if !content.projects.is_empty() {
        pdf.heading("Projects:");
        for proj in &content.projects {
            pdf.body(&format!("{} ({}, Team: {})", proj.title, proj.duration, proj.team_size));
            if !proj.description.is_empty() {
                pdf.body(&format!("  • {}", proj.description));
            }
        }
    }

    if !content.skills.is_empty() {
        pdf.heading("Skills:");
        let names: Vec<&str> = content.skills.iter().map(|s| s.name.as_str()).collect();
        pdf.body(&names.join(", "));
    }

    if !content.socials.is_empty() {
        pdf.heading("Socials:");
        for s in &content.socials {
            pdf.body(&format!("{}: {}", s.platform, s.link));
        }
    }

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::resume::{EducationEntry, SkillEntry};

    #[test]
    fn wrap_text_respects_the_limit() {
        let lines = wrap_text("one two three four five six seven", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six seven");

        // oversized single words still get emitted
        let lines = wrap_text("antidisestablishmentarianism", 10);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn renders_a_pdf_byte_stream() {
        let mut content = ResumeContent::default();
        content.personal.name = "Asha Rao".into();
        content.personal.email = "asha@example.com".into();
        content.personal.phone = "9876543210".into();
        content.personal.city = "Bengaluru".into();
        content.personal.state = "Karnataka".into();
        content.personal.introduction = "Engineer. ".repeat(120);
        content.education.push(EducationEntry {
            degree: "BSc".into(),
            institution: "IISc".into(),
            percentage: "84".into(),
        });
        content.skills.push(SkillEntry { name: "Rust".into(), level: "90".into() });

        let bytes = render_resume(&content).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn accent_color_parses_or_falls_back() {
        // both arms execute without panicking on malformed input
        let _ = parse_accent("#336699");
        let _ = parse_accent("rebeccapurple");
        let _ = parse_accent("#33669");
        // a multibyte char lands a non-boundary at byte 2
        let _ = parse_accent("#a\u{e9}aaa");
    }

    #[test]
    fn renders_with_a_multibyte_color_string() {
        let mut content = ResumeContent::default();
        content.personal.name = "Asha Rao".into();
        content.layout_options.color = "#a\u{e9}aaa".into();

        let bytes = render_resume(&content).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
