use clap::Parser;
use digest_cli::cli::{Cli, parse_config_override, resolve_hours};
use digest_cli::delivery::{deliver, publish_note};
use digest_cli::output::{render_detailed_report, render_json};
use digest_core::config::{Config, ConfigOverrides, load_config_with_fallback, merge_overrides};
use digest_core::error::AppError;
use digest_core::notes::{NoteSink, NoopSink, sink_from_env};
use digest_core::report::{render_error_report, render_notes_report};
use std::io;
use time::OffsetDateTime;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let load = load_config_with_fallback();
    for warning in &load.warnings {
        warn!("configuration: {}", warning);
    }

    let mut overrides = ConfigOverrides::default();
    for raw in &cli.config_override {
        let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
        overrides.settings.push((parsed.key, parsed.value));
    }

    merge_overrides(&load.config, &overrides)
}

fn note_sink(cli: &Cli, config: &Config) -> Result<Box<dyn NoteSink>, AppError> {
    if cli.no_note {
        Ok(Box::new(NoopSink))
    } else {
        sink_from_env(&config.note_folder, &config.note_title)
    }
}

fn run(cli: Cli) -> i32 {
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return 1;
        }
    };

    let choice = resolve_hours(cli.hours.as_deref(), config.default_hours);
    if let Some(warning) = choice.warning.as_deref() {
        eprintln!("{warning}");
    }

    let run = match digest_core::digest_api::run_digest(&config, choice.hours) {
        Ok(run) => run,
        Err(err) => {
            print!(
                "{}",
                render_error_report(err.message(), OffsetDateTime::now_utc())
            );
            return 1;
        }
    };

    let notes_report = render_notes_report(&run);
    let rendered = if cli.json {
        render_json(&run).to_string()
    } else if cli.detailed {
        render_detailed_report(&run)
    } else {
        notes_report.clone()
    };

    deliver(
        &rendered,
        || {
            let sink = note_sink(&cli, &config)?;
            publish_note(sink.as_ref(), &config.note_title, &notes_report)
        },
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);
    std::process::exit(run(cli));
}
