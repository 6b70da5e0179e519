//! The `PromptSpecification` record and its closed field value sets.
//!
//! One in-memory record at a time: seven user-editable fields, no cross-field
//! constraints, discarded when the session ends. The only externalized form
//! is the XML string produced by [`crate::xml::serialize`].

/// Tones accepted for the `tone` field.
pub const TONES: [&str; 5] = ["neutral", "formal", "informal", "friendly", "technical"];

/// Languages accepted for the `language` field. "Other" is the escape hatch
/// for anything not on the list.
pub const LANGUAGES: [&str; 25] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Russian",
    "Japanese",
    "Korean",
    "Chinese (Simplified)",
    "Chinese (Traditional)",
    "Arabic",
    "Hindi",
    "Dutch",
    "Swedish",
    "Norwegian",
    "Danish",
    "Finnish",
    "Polish",
    "Turkish",
    "Hebrew",
    "Thai",
    "Vietnamese",
    "Indonesian",
    "Other",
];

pub const DEFAULT_LINES: &str = "5";
pub const DEFAULT_TONE: &str = "neutral";
pub const DEFAULT_LANGUAGE: &str = "English";

/// Returns true if `tone` is one of the five allowed values.
pub fn is_supported_tone(tone: &str) -> bool {
    TONES.contains(&tone)
}

/// Returns true if `language` is on the closed list (including "Other").
pub fn is_supported_language(language: &str) -> bool {
    LANGUAGES.contains(&language)
}

/// The transient record of user intent.
///
/// `lines` is kept as the string the user entered: the serializer embeds it
/// verbatim (escaped), so non-numeric or negative values pass through without
/// validation. `examples` is a newline-separated block, only serialized when
/// `include_examples` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpecification {
    pub task: String,
    pub lines: String,
    pub tone: String,
    pub language: String,
    pub additional_notes: String,
    pub include_examples: bool,
    pub examples: String,
}

impl Default for PromptSpecification {
    fn default() -> Self {
        PromptSpecification {
            task: String::new(),
            lines: DEFAULT_LINES.to_owned(),
            tone: DEFAULT_TONE.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            additional_notes: String::new(),
            include_examples: false,
            examples: String::new(),
        }
    }
}

/// Split an examples block into items, one per line.
///
/// Splits on `\n` and strips a trailing `\r` from each item so Windows and
/// Unix line endings behave identically. Empty lines are kept: a blank line
/// in the block is a deliberate empty item.
pub fn example_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_form_defaults() {
        let spec = PromptSpecification::default();
        assert_eq!(spec.lines, "5");
        assert_eq!(spec.tone, "neutral");
        assert_eq!(spec.language, "English");
        assert!(spec.task.is_empty());
        assert!(!spec.include_examples);
    }

    #[test]
    fn all_tones_supported() {
        for tone in TONES {
            assert!(is_supported_tone(tone), "{tone} should be supported");
        }
        assert!(!is_supported_tone("sarcastic"));
        assert!(!is_supported_tone("Neutral"), "tones are lowercase");
    }

    #[test]
    fn language_list_includes_other() {
        assert!(is_supported_language("Other"));
        assert!(is_supported_language("Chinese (Simplified)"));
        assert!(!is_supported_language("Klingon"));
        assert!(!is_supported_language("english"), "languages are cased");
    }

    #[test]
    fn example_lines_splits_unix() {
        let lines: Vec<&str> = example_lines("A\nB\nC").collect();
        assert_eq!(lines, vec!["A", "B", "C"]);
    }

    #[test]
    fn example_lines_splits_windows() {
        let lines: Vec<&str> = example_lines("A\r\nB\r\nC").collect();
        assert_eq!(lines, vec!["A", "B", "C"]);
    }

    #[test]
    fn example_lines_keeps_empty_lines() {
        let lines: Vec<&str> = example_lines("A\nB\n\nC").collect();
        assert_eq!(lines, vec!["A", "B", "", "C"]);
    }

    #[test]
    fn example_lines_empty_block_is_one_empty_item() {
        let lines: Vec<&str> = example_lines("").collect();
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn example_lines_trailing_newline_yields_trailing_empty_item() {
        let lines: Vec<&str> = example_lines("A\n").collect();
        assert_eq!(lines, vec!["A", ""]);
    }
}
