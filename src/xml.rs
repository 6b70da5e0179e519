//! XML serialization of a [`PromptSpecification`].
//!
//! A pure function: fixed field values plus a fixed timestamp always produce
//! byte-identical output. The timestamp is injected rather than read here so
//! the function stays deterministic under test; callers stamp it at export
//! time (see `render` in main and the session's `copy`/`save`).

use chrono::{DateTime, SecondsFormat, Utc};

use crate::spec::{PromptSpecification, example_lines};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escape the five characters reserved by XML syntax.
///
/// Single pass, so already-escaped text is never double-escaped by this call
/// (an `&amp;` in the input becomes `&amp;amp;`, which is the correct literal
/// rendering of that input).
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `spec` into the `PromptSpecification` XML document.
///
/// Structure, in fixed order: XML declaration, root element with a
/// `generatedAt` attribute (ISO-8601, millisecond precision, `Z` suffix),
/// then `Task`, `Lines`, `Tone`, `Language`, `Examples` (only when
/// `include_examples`; one `Example` child per line, empty lines kept) and
/// `AdditionalNotes`. Top-level children are indented two spaces, `Example`
/// children four.
///
/// There is no failure mode: every field is embedded as escaped text,
/// including a non-numeric `lines` value.
pub fn serialize(spec: &PromptSpecification, generated_at: DateTime<Utc>) -> String {
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut sections: Vec<String> = Vec::with_capacity(9);
    sections.push(XML_DECLARATION.to_owned());
    sections.push(format!(
        r#"<PromptSpecification generatedAt="{timestamp}">"#
    ));
    sections.push(format!("  <Task>{}</Task>", escape_text(&spec.task)));
    sections.push(format!("  <Lines>{}</Lines>", escape_text(&spec.lines)));
    sections.push(format!("  <Tone>{}</Tone>", escape_text(&spec.tone)));
    sections.push(format!(
        "  <Language>{}</Language>",
        escape_text(&spec.language)
    ));
    if spec.include_examples {
        let mut block = String::from("  <Examples>\n");
        for line in example_lines(&spec.examples) {
            block.push_str("    <Example>");
            block.push_str(&escape_text(line));
            block.push_str("</Example>\n");
        }
        block.push_str("  </Examples>");
        sections.push(block);
    }
    sections.push(format!(
        "  <AdditionalNotes>{}</AdditionalNotes>",
        escape_text(&spec.additional_notes)
    ));
    sections.push("</PromptSpecification>".to_owned());

    sections.join("\n")
}
