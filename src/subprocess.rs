//! Subprocess helper for piping text into a child's stdin (exec-style,
//! no shell).
//!
//! Used by the clipboard writer: clipboard commands read the payload from
//! stdin and print nothing useful, so only stderr is captured (bounded) for
//! diagnostics.

use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Upper bound on bytes read from stderr to prevent unbounded memory use.
const MAX_STDERR_BYTES: u64 = 64 * 1024;

/// Polling interval while waiting for a child process with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Result of feeding input to a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeResult {
    pub stderr: String,
    /// `None` when the process was killed due to timeout or terminated by
    /// a signal.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl PipeResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Spawn `program` with `args`, write `input` to its stdin, close the pipe,
/// and wait for exit (killing the child when `timeout` elapses).
///
/// The input is written on a dedicated thread so a child that never reads
/// cannot deadlock us; stderr is read on another thread for the same reason.
pub fn pipe_to_command<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    input: &str,
    timeout: Option<Duration>,
) -> std::io::Result<PipeResult> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    // We set Stdio::piped() above, so take() always returns Some.
    let mut child_stdin = child.stdin.take().expect("stdin was piped");
    let child_stderr = child.stderr.take().expect("stderr was piped");

    let payload = input.to_owned();
    let writer_handle = std::thread::spawn(move || -> std::io::Result<()> {
        child_stdin.write_all(payload.as_bytes())?;
        // Dropping child_stdin closes the pipe and signals EOF.
        Ok(())
    });
    let stderr_handle = std::thread::spawn(move || read_bounded(child_stderr));

    let (timed_out, exit_code) = wait_with_timeout(&mut child, timeout)?;

    // A child that exited early (or was killed) breaks the pipe; that is not
    // an error in itself, the exit code tells the real story.
    match writer_handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(e),
        Err(e) => {
            return Err(std::io::Error::other(format!(
                "stdin writer thread panicked: {e:?}"
            )));
        }
    }

    let stderr = stderr_handle
        .join()
        .map_err(|e| std::io::Error::other(format!("stderr reader thread panicked: {e:?}")))??;

    Ok(PipeResult {
        stderr,
        exit_code,
        timed_out,
    })
}

/// Wait for the child to exit. If `timeout` is `Some`, poll with `try_wait`
/// and kill the child when the deadline is exceeded.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<(bool, Option<i32>)> {
    match timeout {
        None => {
            let status = child.wait()?;
            Ok((false, status.code()))
        }
        Some(duration) => {
            let deadline = Instant::now() + duration;
            loop {
                if let Some(status) = child.try_wait()? {
                    return Ok((false, status.code()));
                }
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((true, None));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

/// Read up to [`MAX_STDERR_BYTES`] from `reader` as (possibly lossy) UTF-8.
fn read_bounded(reader: impl Read) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.take(MAX_STDERR_BYTES).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
