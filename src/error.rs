use std::path::PathBuf;

/// Domain errors surfaced to the user. Serialization itself has no failure
/// mode; everything here comes from configuration or the export boundary.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error(
        "Invalid tone '{value}' (expected one of: neutral, formal, informal, friendly, technical)"
    )]
    InvalidTone { value: String },

    #[error(
        "Invalid language '{value}'. Run `promptxml fields` for the supported list, \
         or use \"Other\"."
    )]
    InvalidLanguage { value: String },

    #[error("Examples file does not exist: {path}")]
    ExamplesFileNotFound { path: PathBuf },

    #[error("Failed to read examples file {path}: {detail}")]
    ExamplesFileRead { path: PathBuf, detail: String },

    #[error("Failed to parse environment variable '{var}': {detail}")]
    ConfigEnvParseError { var: String, detail: String },

    #[error("No clipboard command found on PATH (tried: {tried})")]
    ClipboardUnavailable { tried: String },

    #[error("Clipboard command '{cmd}' failed: {detail}")]
    ClipboardWriteFailed { cmd: String, detail: String },

    #[error("Failed to write {path}: {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },
}
