//! promptxml — build a `PromptSpecification` XML document from form-style
//! inputs and export it to stdout, a file, or the clipboard.
//!
//! The serializer in [`xml`] is the only real logic: a pure function of the
//! seven user-editable fields plus an injected timestamp. Everything else is
//! plumbing around it — resolving field values from CLI/env/config, holding
//! them during an interactive `edit` session, and performing the two export
//! side effects.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod session;
pub mod spec;
pub mod subprocess;
pub mod xml;
