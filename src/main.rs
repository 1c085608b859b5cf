mod debug_report;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use timings_report::{Error, Options, parse_verbose_with, read_text};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TIMINGS_LOG";

fn main() -> ExitCode {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "timings-report failed");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn run(config: &CliConfig) -> Result<(), Error> {
    let text = match &config.input {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|source| Error::ReadFile { path: path.clone(), source })?;
            read_text(file)?
        }
        None => read_text(io::stdin().lock())?,
    };

    let res = parse_verbose_with(&text, &config.options);
    tracing::info!(
        records = res.report.records.len(),
        skipped = res.details.skipped_lines.len(),
        elapsed = ?res.details.elapsed,
        "parsed report"
    );

    match config.format {
        Format::Summary => debug_report::print_report(&res.report, config.details.then_some(&res.details), config.color),
        Format::Json => println!("{}", serde_json::to_string_pretty(&res.report)?),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Summary,
    Json,
}

struct CliConfig {
    input: Option<PathBuf>,
    options: Options,
    format: Format,
    details: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<PathBuf> = None;
    let mut options = Options::default();
    let mut format = Format::Summary;
    let mut details = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("timings-report {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--details" => details = true,
            "--keep-unclosed" => options.keep_unclosed = true,
            "--format" | "-o" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                format = parse_format(&value)?;
            }
            _ if arg.starts_with("--format=") => {
                format = parse_format(arg.trim_start_matches("--format="))?;
            }
            "-" => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(CliConfig { input, options, format, details, color })
}

fn parse_format(value: &str) -> Result<Format, String> {
    match value {
        "summary" => Ok(Format::Summary),
        "json" => Ok(Format::Json),
        _ => Err(format!("error: invalid --format '{value}' (expected summary or json)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "timings-report {version}

Parse a server timings report and print a summary.

Usage:
  timings-report [OPTIONS] [FILE]

Reads FILE, or stdin when FILE is omitted or '-'.

Options:
  -o, --format <summary|json>  Output format. Default: summary
  --keep-unclosed              Keep a record left open at the end of the input.
  --details                    Print parse details (line counts, skipped lines).
  --color                      Force ANSI color output.
  --no-color                   Disable ANSI color output.
  -h, --help                   Show this help message.
  -V, --version                Print version information.

Environment:
  {log_env}                  Log filter (e.g. debug, trace). Default: warn

Exit codes:
  0  Success.
  1  Failed to read input or write output.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
