//! Interactive form session for the `edit` subcommand.
//!
//! A line-oriented stand-in for the original form: one command per field,
//! and every successful mutation re-renders the XML preview so the visible
//! output always reflects the current snapshot. `copy` and `save` stamp
//! their own timestamp at the moment of export.
//!
//! Reader, writer and the clipboard action are injected so the whole loop is
//! testable without a terminal or a real clipboard.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use crate::clipboard::{self, CopyStatus};
use crate::export;
use crate::form::FormState;
use crate::spec::{LANGUAGES, PromptSpecification, TONES};

const HELP: &str = "\
Commands:
  task <text>        set the task description
  lines <value>      set the preferred line count (stored as entered)
  tone <tone>        set the tone (see `fields`)
  language <name>    set the language (see `fields`)
  notes <text>       set additional notes
  examples on|off    include or omit the Examples section
  examples clear     remove all example lines
  examples set <txt> replace the whole example block
  example <text>     append one example line
  show               print the current XML preview
  fields             list supported tones and languages
  copy               copy the XML to the clipboard
  save [path]        write the XML to a file (default: prompt.xml)
  help               show this help
  quit               leave the session";

enum Outcome {
    Continue,
    Rerender,
    Quit,
}

/// Run the interactive session over the given reader/writer pair.
pub fn run_session<R: BufRead, W: Write>(
    spec: PromptSpecification,
    input: R,
    out: W,
) -> anyhow::Result<()> {
    run_session_with(spec, input, out, clipboard::copy_with_fallback)
}

fn run_session_with<R: BufRead, W: Write>(
    spec: PromptSpecification,
    mut input: R,
    mut out: W,
    copy_fn: fn(&str) -> CopyStatus,
) -> anyhow::Result<()> {
    let mut state = FormState::new(spec);

    writeln!(out, "promptxml edit session. Type `help` for commands.")?;
    print_preview(&mut out, &state)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF ends the session like `quit`.
            break;
        }
        let command = line.trim_end_matches(['\n', '\r']);

        match apply_command(&mut state, command, &mut out, copy_fn)? {
            Outcome::Continue => {}
            Outcome::Rerender => print_preview(&mut out, &state)?,
            Outcome::Quit => break,
        }
    }

    info!(revision = state.revision(), "edit session ended");
    Ok(())
}

fn apply_command<W: Write>(
    state: &mut FormState,
    command: &str,
    out: &mut W,
    copy_fn: fn(&str) -> CopyStatus,
) -> anyhow::Result<Outcome> {
    let trimmed = command.trim_start();
    if trimmed.is_empty() {
        return Ok(Outcome::Continue);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r),
        None => (trimmed, ""),
    };

    match verb {
        "task" => {
            state.set_task(rest);
            Ok(Outcome::Rerender)
        }
        "lines" => {
            state.set_lines(rest);
            Ok(Outcome::Rerender)
        }
        "tone" => match state.set_tone(rest.trim()) {
            Ok(()) => Ok(Outcome::Rerender),
            Err(e) => {
                writeln!(out, "{e}")?;
                Ok(Outcome::Continue)
            }
        },
        "language" => match state.set_language(rest.trim()) {
            Ok(()) => Ok(Outcome::Rerender),
            Err(e) => {
                writeln!(out, "{e}")?;
                Ok(Outcome::Continue)
            }
        },
        "notes" => {
            state.set_additional_notes(rest);
            Ok(Outcome::Rerender)
        }
        "examples" => {
            let (sub, tail) = match rest.trim_start().split_once(char::is_whitespace) {
                Some((s, t)) => (s, t),
                None => (rest.trim(), ""),
            };
            match sub {
                "on" => {
                    state.set_include_examples(true);
                    Ok(Outcome::Rerender)
                }
                "off" => {
                    state.set_include_examples(false);
                    Ok(Outcome::Rerender)
                }
                "clear" => {
                    state.clear_examples();
                    Ok(Outcome::Rerender)
                }
                "set" => {
                    state.set_examples(tail);
                    Ok(Outcome::Rerender)
                }
                other => {
                    writeln!(out, "expected `examples on`, `examples off`, `examples clear` or `examples set <text>`, got `examples {other}`")?;
                    Ok(Outcome::Continue)
                }
            }
        }
        "example" => {
            state.push_example(rest);
            Ok(Outcome::Rerender)
        }
        "show" => Ok(Outcome::Rerender),
        "fields" => {
            print_fields(out)?;
            Ok(Outcome::Continue)
        }
        "copy" => {
            let status = copy_fn(&state.render_now());
            writeln!(out, "{}", status.label())?;
            Ok(Outcome::Continue)
        }
        "save" => {
            let path = if rest.trim().is_empty() {
                PathBuf::from(export::DEFAULT_FILENAME)
            } else {
                PathBuf::from(rest.trim())
            };
            match export::write_xml_file(&state.render_now(), &path) {
                Ok(()) => writeln!(out, "Saved {}", path.display())?,
                Err(e) => writeln!(out, "{e}")?,
            }
            Ok(Outcome::Continue)
        }
        "help" => {
            writeln!(out, "{HELP}")?;
            Ok(Outcome::Continue)
        }
        "quit" | "exit" => Ok(Outcome::Quit),
        other => {
            writeln!(out, "unknown command `{other}`; type `help`")?;
            Ok(Outcome::Continue)
        }
    }
}

fn print_preview<W: Write>(out: &mut W, state: &FormState) -> anyhow::Result<()> {
    writeln!(out, "{}", state.render_now())?;
    Ok(())
}

/// Print the closed tone and language sets (also used by `promptxml fields`).
pub fn print_fields<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Tones:")?;
    for tone in TONES {
        writeln!(out, "  {tone}")?;
    }
    writeln!(out, "\nLanguages:")?;
    for language in LANGUAGES {
        writeln!(out, "  {language}")?;
    }
    Ok(())
}
