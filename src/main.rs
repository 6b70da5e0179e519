use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};

use promptxml::cli::{Cli, Commands, FieldArgs};
use promptxml::clipboard::{self, CopyStatus};
use promptxml::config::PromptConfig;
use promptxml::{export, session, xml};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Edit(args) => edit(args),
        Commands::Fields => session::print_fields(&mut std::io::stdout()),
    }
}

fn load_config(args: &FieldArgs) -> anyhow::Result<PromptConfig> {
    let config = PromptConfig::load(args.config.as_deref(), args)?;

    promptxml::logging::init(config.log_level.as_deref(), config.log_file.as_deref())?;

    config.validate()?;
    Ok(config)
}

fn render(args: FieldArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let spec = config.build_specification()?;

    if !spec.include_examples && !spec.examples.is_empty() {
        warn!("example lines provided but include_examples is off; Examples section omitted");
    }

    // One timestamp per invocation: stdout, file and clipboard all receive
    // identical bytes for this render.
    let document = xml::serialize(&spec, Utc::now());

    info!(
        tone = %spec.tone,
        language = %spec.language,
        task_len = spec.task.len(),
        include_examples = spec.include_examples,
        "rendered document"
    );

    if let Some(path) = &config.output {
        export::write_xml_file(&document, path)?;
    }

    if config.copy {
        match clipboard::copy_with_fallback(&document) {
            CopyStatus::Copied => info!("copied to clipboard"),
            status => warn!(status = status.label(), "clipboard copy did not succeed"),
        }
    }

    if config.output.is_none() {
        println!("{document}");
    }

    Ok(())
}

fn edit(args: FieldArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let spec = config.build_specification()?;

    let stdin = std::io::stdin();
    session::run_session(spec, stdin.lock(), std::io::stdout())
}
