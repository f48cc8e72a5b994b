mod args;
mod json;
mod text;

use std::env;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use uniqlog_core::{CompactOptions, CompactOutcome, compact_stream};

use crate::args::{Command, Input, ParsedArgs, parse_args, print_help};
use crate::json::{JsonCompactStats, write_json_line};
use crate::text::format_compact_stats;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(Command::Run(parsed)) => parsed,
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            println!("uniqlog {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(2);
        }
    };

    for warning in &parsed.warnings {
        eprintln!("Warning: {warning}");
    }

    match run(&parsed) {
        Ok(exit_code) => std::process::exit(exit_code),
        // Downstream closed the pipe (e.g. `uniqlog app.log | head`).
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(parsed: &ParsedArgs) -> io::Result<i32> {
    let options = CompactOptions {
        color: parsed.color.enabled(io::stdout().is_terminal()),
        ..parsed.options.clone()
    };

    let mut exit_code = 0;
    for input in &parsed.inputs {
        let label = input.label();
        let Some(outcome) = compact_input(input, &options)? else {
            exit_code = 1;
            continue;
        };

        if let Some(err) = &outcome.read_error {
            eprintln!("Error: read {label}: {err}");
            exit_code = 1;
        }

        if parsed.stats {
            if parsed.json {
                write_json_line(&JsonCompactStats::new(&label, &outcome.stats))?;
            } else {
                eprint!("{}", format_compact_stats(&label, &outcome.stats));
            }
        }
    }

    Ok(exit_code)
}

/// `Ok(None)` when the input could not be opened; that input is skipped.
fn compact_input(input: &Input, options: &CompactOptions) -> io::Result<Option<CompactOutcome>> {
    let stdout = io::stdout().lock();
    match input {
        Input::Stdin => compact_stream(io::stdin().lock(), stdout, options).map(Some),
        Input::File(path) => match File::open(path) {
            Ok(file) => compact_stream(BufReader::new(file), stdout, options).map(Some),
            Err(err) => {
                eprintln!("Error: unable to open {}: {err}", path.display());
                Ok(None)
            }
        },
    }
}
