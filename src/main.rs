mod report;

use bouquet_factory::{Options, StockThreshold, StreamError, parse_input_stream_verbose};
use report::ReportSections;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let bytes = match read_input(&config.input) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let run = std::str::from_utf8(&bytes)
        .map_err(StreamError::from)
        .and_then(|contents| parse_input_stream_verbose(contents, &config.options));

    let run = match run {
        Ok(run) => run,
        Err(err) => {
            if config.json {
                eprintln!("{}", serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string()));
            } else {
                report::print_stream_error(&err, config.color);
            }
            std::process::exit(1);
        }
    };

    if config.json {
        let rendered = if config.sections.contains(ReportSections::TIMING) {
            serde_json::to_string_pretty(&run)
        } else {
            serde_json::to_string_pretty(&run.report)
        };
        match rendered {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to render JSON: {err}");
                std::process::exit(1);
            }
        }
    } else {
        report::print_report(&run.report, &run.metrics, config.sections, config.color);
    }
}

/// Log to stderr so stdout carries only the report. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).with_target(true).init();
}

enum Input {
    File(PathBuf),
    Stdin,
}

struct CliConfig {
    input: Input,
    options: Options,
    sections: ReportSections,
    json: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<Input> = None;
    let mut options = Options::default();
    let mut sections = ReportSections::default();
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("bouquet-factory {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--inventory" => sections |= ReportSections::INVENTORY,
            "--timing" => sections |= ReportSections::TIMING,
            "--at-least" => options.stock_threshold = StockThreshold::AtLeast,
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, &value)?;
            }
            _ if arg.starts_with("--input=") => {
                set_input(&mut input, arg.trim_start_matches("--input="))?;
            }
            "-" => set_input(&mut input, "-")?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_input(&mut input, &arg)?,
        }
    }

    Ok(CliConfig { input: input.unwrap_or(Input::Stdin), options, sections, json, color })
}

fn set_input(input: &mut Option<Input>, value: &str) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(if value == "-" { Input::Stdin } else { Input::File(PathBuf::from(value)) });
    Ok(())
}

fn read_input(input: &Input) -> Result<Vec<u8>, String> {
    match input {
        Input::File(path) => std::fs::read(path)
            .map_err(|err| format!("error: file {} does not exist or can't be read: {err}", path.display())),
        Input::Stdin => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
            Ok(buffer)
        }
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "bouquet-factory {version}

Parses bouquet orders and a flower inventory, then fulfils the orders in input order.

Usage:
  bouquet-factory [OPTIONS] --input <file>
  bouquet-factory [OPTIONS] <file>
  bouquet-factory [OPTIONS] < <file>

Input:
  <orders, one per line>        e.g. AL10a15b5c30
  <blank line>
  <inventory, one per line>     e.g. aL

Options:
  -i, --input <file>         File to read. '-' or no input reads stdin.
  --json                     Print the result as JSON.
  --inventory                Also print the remaining inventory.
  --timing                   Also print per-stage timings.
  --at-least                 Accept stock equal to the requested quantity
                             (default requires strictly more).
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter for stderr diagnostics (default: warn).

Exit codes:
  0  Success (some orders may still be unfulfilled).
  1  Input could not be read or the stream was rejected.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
