use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::FieldArgs;
use crate::error::PromptError;
use crate::spec::{
    DEFAULT_LANGUAGE, DEFAULT_LINES, DEFAULT_TONE, PromptSpecification, is_supported_language,
    is_supported_tone,
};

// Precedence: CLI > env > file > defaults.

const ENV_PREFIX: &str = "PROMPTXML_";

/// Resolved field and export settings for one invocation.
///
/// Built from three layers with precedence CLI > env > file > defaults.
/// `lines` is carried as a string end to end: the serializer embeds whatever
/// the user entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub task: String,
    pub lines: String,
    pub tone: String,
    pub language: String,
    pub notes: String,
    pub include_examples: bool,
    /// Inline example lines, newline-separated. Ignored when
    /// `examples_file` is set.
    pub examples: String,
    pub examples_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub copy: bool,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// TOML-deserializable config file representation. All fields optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    task: Option<String>,
    /// An integer in TOML; stringified during the merge.
    lines: Option<i64>,
    tone: Option<String>,
    language: Option<String>,
    notes: Option<String>,
    include_examples: Option<bool>,
    examples: Option<Vec<String>>,
    examples_file: Option<PathBuf>,
    output: Option<PathBuf>,
    copy: Option<bool>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

/// Intermediate layer where every field is optional, used to merge sources.
#[derive(Debug, Default)]
struct ConfigLayer {
    task: Option<String>,
    lines: Option<String>,
    tone: Option<String>,
    language: Option<String>,
    notes: Option<String>,
    include_examples: Option<bool>,
    examples: Option<String>,
    examples_file: Option<PathBuf>,
    output: Option<PathBuf>,
    copy: Option<bool>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl PromptConfig {
    /// Load configuration with precedence: CLI > env > file > defaults.
    pub fn load(config_path: Option<&Path>, cli_args: &FieldArgs) -> anyhow::Result<Self> {
        Self::load_with_env(config_path, cli_args, real_env_var)
    }

    /// Validate the closed value sets and the examples file path.
    pub fn validate(&self) -> Result<(), PromptError> {
        if !is_supported_tone(&self.tone) {
            return Err(PromptError::InvalidTone {
                value: self.tone.clone(),
            });
        }
        if !is_supported_language(&self.language) {
            return Err(PromptError::InvalidLanguage {
                value: self.language.clone(),
            });
        }
        if let Some(path) = &self.examples_file {
            if !path.is_file() {
                return Err(PromptError::ExamplesFileNotFound { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Build the in-memory record this invocation edits or renders.
    ///
    /// Reads `examples_file` when set (a single trailing newline is treated
    /// as the file's terminator, not an empty final example).
    pub fn build_specification(&self) -> Result<PromptSpecification, PromptError> {
        let examples = match &self.examples_file {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| PromptError::ExamplesFileRead {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
                strip_final_newline(&raw).to_owned()
            }
            None => self.examples.clone(),
        };

        Ok(PromptSpecification {
            task: self.task.clone(),
            lines: self.lines.clone(),
            tone: self.tone.clone(),
            language: self.language.clone(),
            additional_notes: self.notes.clone(),
            include_examples: self.include_examples,
            examples,
        })
    }

    /// Internal constructor that accepts an env-var lookup function,
    /// enabling deterministic testing without process-global mutation.
    fn load_with_env(
        config_path: Option<&Path>,
        cli_args: &FieldArgs,
        env_fn: fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file_layer = match config_path {
            Some(path) => load_file_layer(path)?,
            None => ConfigLayer::default(),
        };
        let env_layer = load_env_layer(env_fn)?;
        let cli_layer = cli_layer_from(cli_args);

        let merged = merge_layers(file_layer, env_layer, cli_layer);

        Ok(PromptConfig {
            task: merged.task.unwrap_or_default(),
            lines: merged.lines.unwrap_or_else(|| DEFAULT_LINES.to_owned()),
            tone: merged.tone.unwrap_or_else(|| DEFAULT_TONE.to_owned()),
            language: merged
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            notes: merged.notes.unwrap_or_default(),
            include_examples: merged.include_examples.unwrap_or(false),
            examples: merged.examples.unwrap_or_default(),
            examples_file: merged.examples_file,
            output: merged.output,
            copy: merged.copy.unwrap_or(false),
            log_level: merged.log_level,
            log_file: merged.log_file,
        })
    }
}

fn strip_final_newline(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}

fn load_file_layer(path: &Path) -> anyhow::Result<ConfigLayer> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
    let fc: FileConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;
    Ok(ConfigLayer {
        task: fc.task,
        lines: fc.lines.map(|n| n.to_string()),
        tone: fc.tone,
        language: fc.language,
        notes: fc.notes,
        include_examples: fc.include_examples,
        examples: fc.examples.map(|lines| lines.join("\n")),
        examples_file: fc.examples_file,
        output: fc.output,
        copy: fc.copy,
        log_level: fc.log_level,
        log_file: fc.log_file,
    })
}

fn real_env_var(suffix: &str) -> Option<String> {
    let key = format!("{ENV_PREFIX}{suffix}");
    env::var(&key).ok().filter(|v| !v.is_empty())
}

fn load_env_layer(env_fn: fn(&str) -> Option<String>) -> Result<ConfigLayer, PromptError> {
    Ok(ConfigLayer {
        task: env_fn("TASK"),
        lines: env_fn("LINES"),
        tone: env_fn("TONE"),
        language: env_fn("LANGUAGE"),
        notes: env_fn("NOTES"),
        include_examples: parse_env_bool(env_fn, "INCLUDE_EXAMPLES")?,
        // PROMPTXML_EXAMPLES carries the raw newline-separated block.
        examples: env_fn("EXAMPLES"),
        examples_file: env_fn("EXAMPLES_FILE").map(PathBuf::from),
        output: env_fn("OUTPUT").map(PathBuf::from),
        copy: parse_env_bool(env_fn, "COPY")?,
        log_level: env_fn("LOG_LEVEL"),
        log_file: env_fn("LOG_FILE").map(PathBuf::from),
    })
}

fn parse_env_bool(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<bool>, PromptError> {
    match env_fn(suffix) {
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|e| PromptError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn cli_layer_from(args: &FieldArgs) -> ConfigLayer {
    ConfigLayer {
        task: args.task.clone(),
        lines: args.lines.clone(),
        tone: args.tone.clone(),
        language: args.language.clone(),
        notes: args.notes.clone(),
        include_examples: if args.include_examples {
            Some(true)
        } else {
            None
        },
        examples: if args.examples.is_empty() {
            None
        } else {
            Some(args.examples.join("\n"))
        },
        examples_file: args.examples_file.clone(),
        output: args.output.clone(),
        copy: if args.copy { Some(true) } else { None },
        log_level: args.log_level.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Merge three layers. For each field, pick CLI first, then env, then file.
fn merge_layers(file: ConfigLayer, env: ConfigLayer, cli: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
        task: cli.task.or(env.task).or(file.task),
        lines: cli.lines.or(env.lines).or(file.lines),
        tone: cli.tone.or(env.tone).or(file.tone),
        language: cli.language.or(env.language).or(file.language),
        notes: cli.notes.or(env.notes).or(file.notes),
        include_examples: cli
            .include_examples
            .or(env.include_examples)
            .or(file.include_examples),
        examples: cli.examples.or(env.examples).or(file.examples),
        examples_file: cli
            .examples_file
            .or(env.examples_file)
            .or(file.examples_file),
        output: cli.output.or(env.output).or(file.output),
        copy: cli.copy.or(env.copy).or(file.copy),
        log_level: cli.log_level.or(env.log_level).or(file.log_level),
        log_file: cli.log_file.or(env.log_file).or(file.log_file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_suffix: &str) -> Option<String> {
        None
    }

    fn empty_args() -> FieldArgs {
        FieldArgs {
            task: None,
            lines: None,
            tone: None,
            language: None,
            notes: None,
            include_examples: false,
            examples: Vec::new(),
            examples_file: None,
            config: None,
            output: None,
            copy: false,
            log_level: None,
            log_file: None,
        }
    }

    #[test]
    fn defaults_match_the_blank_form() {
        let cfg = PromptConfig::load_with_env(None, &empty_args(), no_env).unwrap();

        assert_eq!(cfg.task, "");
        assert_eq!(cfg.lines, "5");
        assert_eq!(cfg.tone, "neutral");
        assert_eq!(cfg.language, "English");
        assert_eq!(cfg.notes, "");
        assert!(!cfg.include_examples);
        assert_eq!(cfg.examples, "");
        assert_eq!(cfg.examples_file, None);
        assert_eq!(cfg.output, None);
        assert!(!cfg.copy);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("promptxml.toml");
        fs::write(
            &cfg_path,
            r#"
task = "Write a product blurb"
lines = 8
tone = "friendly"
language = "Dutch"
notes = "mention the warranty"
include_examples = true
examples = ["Great product!", "Would buy again."]
output = "blurb.xml"
copy = true
"#,
        )
        .unwrap();

        let cfg = PromptConfig::load_with_env(Some(&cfg_path), &empty_args(), no_env).unwrap();

        assert_eq!(cfg.task, "Write a product blurb");
        assert_eq!(cfg.lines, "8");
        assert_eq!(cfg.tone, "friendly");
        assert_eq!(cfg.language, "Dutch");
        assert_eq!(cfg.notes, "mention the warranty");
        assert!(cfg.include_examples);
        assert_eq!(cfg.examples, "Great product!\nWould buy again.");
        assert_eq!(cfg.output, Some(PathBuf::from("blurb.xml")));
        assert!(cfg.copy);
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("promptxml.toml");
        fs::write(
            &cfg_path,
            r#"
task = "from file"
tone = "formal"
"#,
        )
        .unwrap();

        let mut args = empty_args();
        args.task = Some("from cli".to_owned());
        let cfg = PromptConfig::load_with_env(Some(&cfg_path), &args, no_env).unwrap();

        assert_eq!(cfg.task, "from cli", "CLI wins");
        assert_eq!(cfg.tone, "formal", "file fallback");
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("promptxml.toml");
        fs::write(&cfg_path, "language = \"German\"\n").unwrap();

        fn fake_env(suffix: &str) -> Option<String> {
            if suffix == "LANGUAGE" {
                Some("Polish".to_owned())
            } else {
                None
            }
        }

        let cfg = PromptConfig::load_with_env(Some(&cfg_path), &empty_args(), fake_env).unwrap();
        assert_eq!(cfg.language, "Polish", "env wins over file");
    }

    #[test]
    fn cli_overrides_env() {
        fn fake_env(suffix: &str) -> Option<String> {
            if suffix == "TONE" {
                Some("technical".to_owned())
            } else {
                None
            }
        }

        let mut args = empty_args();
        args.tone = Some("informal".to_owned());
        let cfg = PromptConfig::load_with_env(None, &args, fake_env).unwrap();

        assert_eq!(cfg.tone, "informal", "CLI wins over env");
    }

    #[test]
    fn env_bool_parse_error_is_reported() {
        fn fake_env(suffix: &str) -> Option<String> {
            if suffix == "COPY" {
                Some("yes please".to_owned())
            } else {
                None
            }
        }

        let err = PromptConfig::load_with_env(None, &empty_args(), fake_env).unwrap_err();
        let msg = format!("{err}");
        assert!(
            msg.contains("PROMPTXML_COPY"),
            "should name the variable, got: {msg}"
        );
    }

    #[test]
    fn env_examples_block_passes_through() {
        fn fake_env(suffix: &str) -> Option<String> {
            match suffix {
                "EXAMPLES" => Some("one\ntwo".to_owned()),
                "INCLUDE_EXAMPLES" => Some("true".to_owned()),
                _ => None,
            }
        }

        let cfg = PromptConfig::load_with_env(None, &empty_args(), fake_env).unwrap();
        assert!(cfg.include_examples);
        assert_eq!(cfg.examples, "one\ntwo");
    }

    #[test]
    fn cli_example_flags_join_with_newlines() {
        let mut args = empty_args();
        args.examples = vec!["A".to_owned(), "B".to_owned()];
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();
        assert_eq!(cfg.examples, "A\nB");
    }

    #[test]
    fn invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("promptxml.toml");
        fs::write(&cfg_path, "not valid {{{{ toml").unwrap();

        let err = PromptConfig::load_with_env(Some(&cfg_path), &empty_args(), no_env).unwrap_err();
        assert!(
            format!("{err}").contains("failed to parse config file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn unknown_toml_key_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("promptxml.toml");
        fs::write(&cfg_path, "bogus_key = true\n").unwrap();

        let err = PromptConfig::load_with_env(Some(&cfg_path), &empty_args(), no_env).unwrap_err();
        assert!(
            format!("{err}").contains("failed to parse config file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn missing_config_file_returns_error() {
        let err = PromptConfig::load_with_env(
            Some(Path::new("/no/such/promptxml.toml")),
            &empty_args(),
            no_env,
        )
        .unwrap_err();
        assert!(
            format!("{err}").contains("failed to read config file"),
            "unexpected: {err}"
        );
    }

    // -- validate() --

    #[test]
    fn validate_accepts_defaults() {
        let cfg = PromptConfig::load_with_env(None, &empty_args(), no_env).unwrap();
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn validate_rejects_unknown_tone() {
        let mut args = empty_args();
        args.tone = Some("shouty".to_owned());
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let msg = format!("{}", cfg.validate().unwrap_err());
        assert!(msg.contains("Invalid tone 'shouty'"), "unexpected: {msg}");
    }

    #[test]
    fn validate_rejects_unknown_language() {
        let mut args = empty_args();
        args.language = Some("Latin".to_owned());
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let msg = format!("{}", cfg.validate().unwrap_err());
        assert!(msg.contains("Invalid language 'Latin'"), "unexpected: {msg}");
    }

    #[test]
    fn validate_accepts_other_language() {
        let mut args = empty_args();
        args.language = Some("Other".to_owned());
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();
        cfg.validate().expect("Other is always allowed");
    }

    #[test]
    fn validate_rejects_missing_examples_file() {
        let mut args = empty_args();
        args.examples_file = Some(PathBuf::from("/no/such/examples.txt"));
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let msg = format!("{}", cfg.validate().unwrap_err());
        assert!(
            msg.contains("Examples file does not exist"),
            "unexpected: {msg}"
        );
    }

    // -- build_specification() --

    #[test]
    fn build_specification_uses_inline_examples() {
        let mut args = empty_args();
        args.examples = vec!["A".to_owned(), "B".to_owned()];
        args.include_examples = true;
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let spec = cfg.build_specification().unwrap();
        assert_eq!(spec.examples, "A\nB");
        assert!(spec.include_examples);
    }

    #[test]
    fn build_specification_reads_examples_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lines.txt");
        fs::write(&file, "first\nsecond\n").unwrap();

        let mut args = empty_args();
        args.examples_file = Some(file);
        args.include_examples = true;
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let spec = cfg.build_specification().unwrap();
        assert_eq!(
            spec.examples, "first\nsecond",
            "the file terminator newline is not an empty example"
        );
    }

    #[test]
    fn build_specification_keeps_interior_blank_lines_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lines.txt");
        fs::write(&file, "A\n\nB\n").unwrap();

        let mut args = empty_args();
        args.examples_file = Some(file);
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let spec = cfg.build_specification().unwrap();
        assert_eq!(spec.examples, "A\n\nB");
    }

    #[test]
    fn build_specification_reports_unreadable_examples_file() {
        let mut args = empty_args();
        args.examples_file = Some(PathBuf::from("/no/such/examples.txt"));
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let msg = format!("{}", cfg.build_specification().unwrap_err());
        assert!(
            msg.contains("Failed to read examples file"),
            "unexpected: {msg}"
        );
    }

    #[test]
    fn build_specification_carries_all_seven_fields() {
        let mut args = empty_args();
        args.task = Some("Summarize".to_owned());
        args.lines = Some("-3".to_owned());
        args.tone = Some("technical".to_owned());
        args.language = Some("Finnish".to_owned());
        args.notes = Some("short".to_owned());
        let cfg = PromptConfig::load_with_env(None, &args, no_env).unwrap();

        let spec = cfg.build_specification().unwrap();
        assert_eq!(spec.task, "Summarize");
        assert_eq!(spec.lines, "-3", "negative lines passes through");
        assert_eq!(spec.tone, "technical");
        assert_eq!(spec.language, "Finnish");
        assert_eq!(spec.additional_notes, "short");
    }
}
