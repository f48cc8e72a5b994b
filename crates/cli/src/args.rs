use std::env;
use std::fmt::Display;
use std::path::PathBuf;

use uniqlog_core::{
    CompactOptions, DEFAULT_FIRST_SIMILARITY_THRESHOLD, DEFAULT_KEEP_SIMILARITY_THRESHOLD,
    MAX_LINES_TRACK,
};

const MAX_HISTORY: usize = 10_000;

const HELP_TEXT: &str = concat!(
    "uniqlog (collapse repeating blocks of similar log lines)\n",
    "\n",
    "Usage:\n",
    "  uniqlog [options] [<file> ...]\n",
    "\n",
    "Options:\n",
    "  -fst, --first-similarity-threshold <f>  Score needed to start a block: 0..1 (default: 0.9)\n",
    "  -kst, --keep-similarity-threshold <f>   Score needed to stay in a block: 0..1 (default: 0.49)\n",
    "  -d, --debug             Print the mismatching lines when a pattern breaks early\n",
    "  --history <n>           Lines tracked back: 2..10000 (default: 50)\n",
    "  --color <when>          auto, always or never (default: auto)\n",
    "  --stats                 Print per-input counters to stderr\n",
    "  --json                  Print stats as JSON lines (implies --stats)\n",
    "  -V, --version           Show version\n",
    "  -h, --help              Show help\n",
    "\n",
    "Notes:\n",
    "  - With no files, standard input is read; `-` reads it at that position\n",
    "  - Files are processed one after another with independent state\n",
    "  - Invalid numeric values fall back to their defaults with a warning\n",
    "  - --color auto enables colors when stdout is a terminal and NO_COLOR is unset\n",
    "\n",
    "Examples:\n",
    "  tail -f app.log | uniqlog\n",
    "  uniqlog -fst 0.8 -kst 0.5 app.log worker.log\n",
    "  uniqlog --color never --stats app.log > compact.log\n",
    "\n"
);

pub(crate) fn print_help() {
    print!("{HELP_TEXT}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" | "on" => Some(Self::Always),
            "never" | "off" => Some(Self::Never),
            _ => None,
        }
    }

    pub(crate) fn enabled(self, stdout_is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                stdout_is_terminal && env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub(crate) fn label(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) stats: bool,
    pub(crate) json: bool,
    pub(crate) color: ColorMode,
    pub(crate) inputs: Vec<Input>,
    pub(crate) options: CompactOptions,
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Help,
    Version,
    Run(ParsedArgs),
}

fn parse_f64(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("{name} must be a number (got {raw:?})"))
}

fn parse_threshold(name: &str, raw: &str) -> Result<f64, String> {
    let value = parse_f64(name, raw)?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("{name} must be 0..1 (got {raw})"));
    }
    Ok(value)
}

fn parse_history(name: &str, raw: &str) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("{name} must be an integer (got {raw:?})"))?;
    if !(2..=MAX_HISTORY).contains(&value) {
        return Err(format!("{name} must be 2..{MAX_HISTORY} (got {value})"));
    }
    Ok(value)
}

/// Configuration values are best-effort: a bad or missing value keeps the
/// default and leaves a warning behind.
fn value_or_default<T: Copy + Display>(
    name: &str,
    raw: Option<&String>,
    parse: fn(&str, &str) -> Result<T, String>,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    let parsed = match raw {
        Some(raw) => parse(name, raw),
        None => Err(format!("{name} requires a value")),
    };
    parsed.unwrap_or_else(|message| {
        warnings.push(format!("{message}; using default {default}"));
        default
    })
}

pub(crate) fn parse_args(argv: &[String]) -> Result<Command, String> {
    let mut inputs: Vec<Input> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut stats = false;
    let mut json = false;
    let mut debug = false;
    let mut color = ColorMode::Auto;
    let mut first_similarity_threshold: Option<f64> = None;
    let mut keep_similarity_threshold: Option<f64> = None;
    let mut history: Option<usize> = None;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            inputs.extend(argv[(i + 1)..].iter().map(|p| Input::File(PathBuf::from(p))));
            break;
        }
        if arg == "-" {
            inputs.push(Input::Stdin);
            i += 1;
            continue;
        }
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }
        if arg == "-V" || arg == "--version" {
            return Ok(Command::Version);
        }
        if arg == "-d" || arg == "--debug" {
            debug = true;
            i += 1;
            continue;
        }
        if arg == "--stats" {
            stats = true;
            i += 1;
            continue;
        }
        if arg == "--json" {
            json = true;
            stats = true;
            i += 1;
            continue;
        }
        if arg == "-fst" || arg == "--first-similarity-threshold" {
            first_similarity_threshold = Some(value_or_default(
                arg,
                argv.get(i + 1),
                parse_threshold,
                DEFAULT_FIRST_SIMILARITY_THRESHOLD,
                &mut warnings,
            ));
            i += 2;
            continue;
        }
        if arg == "-kst" || arg == "--keep-similarity-threshold" {
            keep_similarity_threshold = Some(value_or_default(
                arg,
                argv.get(i + 1),
                parse_threshold,
                DEFAULT_KEEP_SIMILARITY_THRESHOLD,
                &mut warnings,
            ));
            i += 2;
            continue;
        }
        if arg == "--history" {
            history = Some(value_or_default(
                arg,
                argv.get(i + 1),
                parse_history,
                MAX_LINES_TRACK,
                &mut warnings,
            ));
            i += 2;
            continue;
        }
        if let Some(raw) = arg.strip_prefix("--color=") {
            color = ColorMode::parse(raw)
                .ok_or_else(|| "--color must be one of: auto, always, never".to_string())?;
            i += 1;
            continue;
        }
        if arg == "--color" {
            let raw = argv.get(i + 1).ok_or("--color requires a value")?;
            color = ColorMode::parse(raw)
                .ok_or_else(|| "--color must be one of: auto, always, never".to_string())?;
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            return Err(format!("Unknown option: {arg}"));
        }
        inputs.push(Input::File(PathBuf::from(arg)));
        i += 1;
    }

    let mut options = CompactOptions {
        debug,
        ..CompactOptions::default()
    };
    if let Some(first_similarity_threshold) = first_similarity_threshold {
        options.first_similarity_threshold = first_similarity_threshold;
    }
    if let Some(keep_similarity_threshold) = keep_similarity_threshold {
        options.keep_similarity_threshold = keep_similarity_threshold;
    }
    if let Some(history) = history {
        options.history_capacity = history;
    }

    if inputs.is_empty() {
        inputs.push(Input::Stdin);
    }

    Ok(Command::Run(ParsedArgs {
        stats,
        json,
        color,
        inputs,
        options,
        warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(args: &[&str]) -> ParsedArgs {
        match parse_args(&argv(args)) {
            Ok(Command::Run(parsed)) => parsed,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn no_arguments_reads_stdin_with_defaults() {
        let parsed = run_args(&[]);
        assert_eq!(parsed.inputs, vec![Input::Stdin]);
        assert_eq!(parsed.options, CompactOptions::default());
        assert_eq!(parsed.color, ColorMode::Auto);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn short_flags_set_thresholds_and_debug() {
        let parsed = run_args(&["-fst", "0.8", "-kst", "0.3", "-d", "app.log"]);
        assert_eq!(parsed.options.first_similarity_threshold, 0.8);
        assert_eq!(parsed.options.keep_similarity_threshold, 0.3);
        assert!(parsed.options.debug);
        assert_eq!(parsed.inputs, vec![Input::File(PathBuf::from("app.log"))]);
    }

    #[test]
    fn malformed_threshold_falls_back_to_default() {
        let parsed = run_args(&["--first-similarity-threshold", "lots", "-kst", "1.5"]);
        assert_eq!(
            parsed.options.first_similarity_threshold,
            DEFAULT_FIRST_SIMILARITY_THRESHOLD
        );
        assert_eq!(
            parsed.options.keep_similarity_threshold,
            DEFAULT_KEEP_SIMILARITY_THRESHOLD
        );
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings[0].contains("must be a number"));
        assert!(parsed.warnings[1].contains("must be 0..1"));
        assert!(parsed.warnings[1].ends_with("using default 0.49"));
    }

    #[test]
    fn trailing_flag_without_value_warns() {
        let parsed = run_args(&["app.log", "-fst"]);
        assert_eq!(parsed.warnings, vec!["-fst requires a value; using default 0.9"]);
        assert_eq!(parsed.inputs, vec![Input::File(PathBuf::from("app.log"))]);
    }

    #[test]
    fn history_is_range_checked() {
        assert_eq!(run_args(&["--history", "200"]).options.history_capacity, 200);
        let parsed = run_args(&["--history", "1"]);
        assert_eq!(parsed.options.history_capacity, MAX_LINES_TRACK);
        assert!(parsed.warnings[0].contains("must be 2..10000"));
    }

    #[test]
    fn stdin_marker_and_double_dash_keep_order() {
        let parsed = run_args(&["a.log", "-", "--", "-odd.log", "b.log"]);
        assert_eq!(
            parsed.inputs,
            vec![
                Input::File(PathBuf::from("a.log")),
                Input::Stdin,
                Input::File(PathBuf::from("-odd.log")),
                Input::File(PathBuf::from("b.log")),
            ]
        );
    }

    #[test]
    fn json_implies_stats() {
        let parsed = run_args(&["--json"]);
        assert!(parsed.stats);
        assert!(parsed.json);
    }

    #[test]
    fn color_modes_parse() {
        assert_eq!(run_args(&["--color", "never"]).color, ColorMode::Never);
        assert_eq!(run_args(&["--color=always"]).color, ColorMode::Always);
        let err = parse_args(&argv(&["--color", "rainbow"])).unwrap_err();
        assert!(err.contains("auto, always, never"));
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
    }

    #[test]
    fn unknown_option_is_an_error() {
        let err = parse_args(&argv(&["--fast"])).unwrap_err();
        assert_eq!(err, "Unknown option: --fast");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert!(matches!(
            parse_args(&argv(&["--stats", "-h", "--bogus"])),
            Ok(Command::Help)
        ));
        assert!(matches!(parse_args(&argv(&["-V"])), Ok(Command::Version)));
    }
}
