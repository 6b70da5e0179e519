//! Form state holder: the one mutable record of the editing session.
//!
//! Each field has its own setter and there is no derived state beyond a
//! revision counter, bumped on every change so callers know the previously
//! rendered preview is stale. A later edit simply supersedes an earlier one;
//! nothing here is shared across threads.

use chrono::Utc;

use crate::error::PromptError;
use crate::spec::{PromptSpecification, is_supported_language, is_supported_tone};
use crate::xml;

#[derive(Debug, Clone)]
pub struct FormState {
    spec: PromptSpecification,
    revision: u64,
}

impl FormState {
    pub fn new(spec: PromptSpecification) -> Self {
        FormState { spec, revision: 0 }
    }

    /// Current snapshot of the seven fields.
    pub fn snapshot(&self) -> &PromptSpecification {
        &self.spec
    }

    /// Monotonic change counter; starts at 0, bumped by every setter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_task(&mut self, task: impl Into<String>) {
        self.spec.task = task.into();
        self.revision += 1;
    }

    /// The value is stored as entered; the serializer embeds it verbatim,
    /// so there is nothing to validate here.
    pub fn set_lines(&mut self, lines: impl Into<String>) {
        self.spec.lines = lines.into();
        self.revision += 1;
    }

    /// Rejects tones outside the closed set; the stored value is unchanged
    /// on error.
    pub fn set_tone(&mut self, tone: &str) -> Result<(), PromptError> {
        if !is_supported_tone(tone) {
            return Err(PromptError::InvalidTone {
                value: tone.to_owned(),
            });
        }
        self.spec.tone = tone.to_owned();
        self.revision += 1;
        Ok(())
    }

    /// Rejects languages outside the closed list; the stored value is
    /// unchanged on error.
    pub fn set_language(&mut self, language: &str) -> Result<(), PromptError> {
        if !is_supported_language(language) {
            return Err(PromptError::InvalidLanguage {
                value: language.to_owned(),
            });
        }
        self.spec.language = language.to_owned();
        self.revision += 1;
        Ok(())
    }

    pub fn set_additional_notes(&mut self, notes: impl Into<String>) {
        self.spec.additional_notes = notes.into();
        self.revision += 1;
    }

    pub fn set_include_examples(&mut self, include: bool) {
        self.spec.include_examples = include;
        self.revision += 1;
    }

    /// Replace the whole example block (newline-separated lines).
    pub fn set_examples(&mut self, examples: impl Into<String>) {
        self.spec.examples = examples.into();
        self.revision += 1;
    }

    /// Append one example line to the block.
    pub fn push_example(&mut self, line: &str) {
        if !self.spec.examples.is_empty() {
            self.spec.examples.push('\n');
        }
        self.spec.examples.push_str(line);
        self.revision += 1;
    }

    pub fn clear_examples(&mut self) {
        self.spec.examples.clear();
        self.revision += 1;
    }

    /// Serialize the current snapshot with a fresh timestamp.
    pub fn render_now(&self) -> String {
        xml::serialize(&self.spec, Utc::now())
    }
}
