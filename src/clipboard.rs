//! Copy-to-clipboard export action.
//!
//! The primary path resolves a platform clipboard command on PATH and pipes
//! the XML to its stdin. When that is unavailable or fails, the legacy
//! fallback emits an OSC 52 escape sequence on stderr, which most terminal
//! emulators translate into a clipboard write even over SSH.
//!
//! Failure here is never escalated: the caller gets a [`CopyStatus`] and the
//! detail lands in the log.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{debug, warn};

use crate::error::PromptError;
use crate::subprocess;

/// How long the clipboard command may hold the pipe before being killed.
const COPY_TIMEOUT: Duration = Duration::from_secs(5);

/// Transient status of the copy action, mirroring the button label cycle
/// `Copy` → `Copied!` / `Failed` → back to `Copy` on the next interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyStatus {
    #[default]
    Idle,
    Copied,
    Failed,
}

impl CopyStatus {
    pub fn label(self) -> &'static str {
        match self {
            CopyStatus::Idle => "Copy",
            CopyStatus::Copied => "Copied!",
            CopyStatus::Failed => "Failed",
        }
    }
}

/// A clipboard command candidate: program name plus fixed argv.
#[derive(Debug, Clone, Copy)]
struct ClipboardCmd {
    program: &'static str,
    args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[ClipboardCmd] = &[ClipboardCmd {
    program: "pbcopy",
    args: &[],
}];

#[cfg(windows)]
const CANDIDATES: &[ClipboardCmd] = &[ClipboardCmd {
    program: "clip",
    args: &[],
}];

#[cfg(all(unix, not(target_os = "macos")))]
const CANDIDATES: &[ClipboardCmd] = &[
    ClipboardCmd {
        program: "wl-copy",
        args: &[],
    },
    ClipboardCmd {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    ClipboardCmd {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
];

/// Resolve the first clipboard command candidate present on PATH.
pub fn resolve_clipboard_cmd() -> Result<(PathBuf, &'static [&'static str]), PromptError> {
    resolve_with(std::env::var_os("PATH"))
}

/// Testable inner implementation that accepts an explicit `PATH` value.
fn resolve_with(
    path_var: Option<OsString>,
) -> Result<(PathBuf, &'static [&'static str]), PromptError> {
    for candidate in CANDIDATES {
        if let Some(path) = find_on_path(candidate.program, path_var.as_ref()) {
            return Ok((path, candidate.args));
        }
    }
    Err(PromptError::ClipboardUnavailable {
        tried: CANDIDATES
            .iter()
            .map(|c| c.program)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Search each PATH directory for an executable named `program`.
fn find_on_path(program: &str, path_var: Option<&OsString>) -> Option<PathBuf> {
    let paths = path_var?;
    for dir in std::env::split_paths(paths) {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let with_exe = dir.join(format!("{program}.exe"));
            if is_executable(&with_exe) {
                return Some(with_exe);
            }
        }
    }
    None
}

/// Returns `true` when `path` exists and is a regular file (with an execute
/// bit set, on Unix).
fn is_executable(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Write `text` to the platform clipboard via the resolved command.
pub fn write_to_clipboard(text: &str) -> Result<(), PromptError> {
    let (path, args) = resolve_clipboard_cmd()?;
    let cmd = path.display().to_string();

    let result = subprocess::pipe_to_command(&path, args, text, Some(COPY_TIMEOUT)).map_err(
        |e| PromptError::ClipboardWriteFailed {
            cmd: cmd.clone(),
            detail: e.to_string(),
        },
    )?;

    if result.timed_out {
        return Err(PromptError::ClipboardWriteFailed {
            cmd,
            detail: format!("timed out after {}s", COPY_TIMEOUT.as_secs()),
        });
    }
    if !result.success() {
        return Err(PromptError::ClipboardWriteFailed {
            cmd,
            detail: format!(
                "exit code {:?}: {}",
                result.exit_code,
                result.stderr.trim()
            ),
        });
    }

    debug!(cmd, bytes = text.len(), "clipboard write ok");
    Ok(())
}

/// Legacy fallback: emit an OSC 52 sequence carrying the base64 payload.
///
/// Written to `out` (stderr in production) so it never corrupts piped
/// stdout. Terminals that ignore OSC 52 show nothing.
pub fn osc52_copy(text: &str, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "\x1b]52;c;{}\x07", BASE64.encode(text))?;
    out.flush()
}

/// Copy `text`, trying the platform command first and OSC 52 second.
///
/// Never returns an error: the outcome is the status, and the failure detail
/// goes to the log only.
pub fn copy_with_fallback(text: &str) -> CopyStatus {
    match write_to_clipboard(text) {
        Ok(()) => CopyStatus::Copied,
        Err(e) => {
            warn!(err = %e, "clipboard command unavailable or failed; trying OSC 52 fallback");
            match osc52_copy(text, &mut std::io::stderr()) {
                Ok(()) => CopyStatus::Copied,
                Err(e) => {
                    warn!(err = %e, "OSC 52 fallback failed");
                    CopyStatus::Failed
                }
            }
        }
    }
}
