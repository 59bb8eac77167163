//! `emoji-table` command line entry point.
//!
//! # Responsibility
//! - Map command line flags onto `PipelineConfig`.
//! - Initialize logging, run or check the pipeline, set the exit status.
//!
//! Exit status: `0` success, `1` fatal error, `2` stale or missing table
//! under `--check`.

use clap::Parser;
use emoji_table_core::{
    check, default_log_level, init_logging, run, CheckOutcome, GeneratorInfo, PipelineConfig,
    PipelineError, TableLayout,
};
use emoji_table_core::config::{
    DEFAULT_ALIAS_DATA_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_UNICODE_DATA_FILE,
};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_STALE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "emoji-table")]
#[command(version)]
#[command(about = "Merge Unicode and gemoji data into the emoji definition table")]
struct Args {
    /// Unicode emoji-test.txt
    #[arg(long, default_value = DEFAULT_UNICODE_DATA_FILE)]
    unicode_data: PathBuf,

    /// gemoji emoji.json alias dataset
    #[arg(long, default_value = DEFAULT_ALIAS_DATA_FILE)]
    alias_data: PathBuf,

    /// Table file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Data line layout: full (5 fields) or compact (4 fields, no version)
    #[arg(long, default_value = "full", value_parser = parse_layout)]
    layout: TableLayout,

    /// Release date written into the metadata line
    #[arg(long)]
    release_date: Option<String>,

    /// Release version written into the metadata line
    #[arg(long)]
    release_version: Option<String>,

    /// Only report whether the existing table is up to date
    #[arg(long)]
    check: bool,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long)]
    log_dir: Option<String>,
}

fn parse_layout(value: &str) -> Result<TableLayout, String> {
    value.parse()
}

impl Args {
    fn into_config(self) -> PipelineConfig {
        let defaults = GeneratorInfo::default();
        PipelineConfig {
            unicode_data: self.unicode_data,
            alias_data: self.alias_data,
            output: self.output,
            layout: self.layout,
            info: GeneratorInfo {
                date: self.release_date.unwrap_or(defaults.date),
                version: self.release_version.unwrap_or(defaults.version),
                description: defaults.description,
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, args.log_dir.as_deref()) {
        eprintln!("emoji-table: {err}");
        return ExitCode::from(EXIT_FAILURE);
    }

    ExitCode::from(execute(args))
}

/// Runs or checks the pipeline and returns the process exit status.
fn execute(args: Args) -> u8 {
    let check_only = args.check;
    let config = args.into_config();

    if check_only {
        return match check(&config) {
            Ok(CheckOutcome::UpToDate) => EXIT_OK,
            Ok(outcome) => {
                eprintln!(
                    "emoji-table: {} is {}",
                    config.output.display(),
                    match outcome {
                        CheckOutcome::Missing => "missing",
                        _ => "out of date",
                    }
                );
                EXIT_STALE
            }
            Err(err) => fail(&err),
        };
    }

    match run(&config) {
        Ok(report) => {
            println!(
                "{}: {} entries in {} groups ({} aliases kept, {} dropped)",
                config.output.display(),
                report.entries,
                report.groups,
                report.kept_aliases,
                report.dropped_aliases
            );
            EXIT_OK
        }
        Err(err) => fail(&err),
    }
}

fn fail(err: &PipelineError) -> u8 {
    error!("event=cli_exit module=cli status=error error={err}");
    eprintln!("emoji-table: {err}");
    EXIT_FAILURE
}

#[cfg(test)]
mod tests {
    use super::{execute, Args, EXIT_FAILURE, EXIT_OK, EXIT_STALE};
    use clap::Parser;
    use std::fs;
    use std::path::Path;

    const EMOJI_TEST: &str = "\
# group: Smileys & Emotion
# subgroup: face-smiling
1F600 ; fully-qualified # 😀 E1.0 grinning face
";
    const GEMOJI: &str = r#"[{"emoji": "😀", "description": "grinning face", "aliases": ["grinning"]}]"#;

    fn args_in(dir: &Path, extra: &[&str]) -> Args {
        let unicode_data = dir.join("emoji-test.txt");
        let alias_data = dir.join("emoji.json");
        fs::write(&unicode_data, EMOJI_TEST).unwrap();
        fs::write(&alias_data, GEMOJI).unwrap();

        let mut argv = vec![
            "emoji-table".to_string(),
            "--unicode-data".to_string(),
            unicode_data.display().to_string(),
            "--alias-data".to_string(),
            alias_data.display().to_string(),
            "--output".to_string(),
            dir.join("emoji-table.def").display().to_string(),
        ];
        argv.extend(extra.iter().map(|arg| arg.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn run_then_check_exits_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(execute(args_in(dir.path(), &[])), EXIT_OK);
        assert!(dir.path().join("emoji-table.def").exists());
        assert_eq!(execute(args_in(dir.path(), &["--check"])), EXIT_OK);
    }

    #[test]
    fn check_exits_stale_for_missing_or_edited_table() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(execute(args_in(dir.path(), &["--check"])), EXIT_STALE);

        assert_eq!(execute(args_in(dir.path(), &[])), EXIT_OK);
        fs::write(dir.path().join("emoji-table.def"), "edited by hand\n").unwrap();
        assert_eq!(execute(args_in(dir.path(), &["--check"])), EXIT_STALE);
    }

    #[test]
    fn layout_change_makes_table_stale() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(execute(args_in(dir.path(), &[])), EXIT_OK);
        assert_eq!(
            execute(args_in(dir.path(), &["--check", "--layout", "compact"])),
            EXIT_STALE
        );
    }

    #[test]
    fn fatal_errors_exit_failure_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_in(dir.path(), &[]);
        args.unicode_data = dir.path().join("absent.txt");
        assert_eq!(execute(args), EXIT_FAILURE);

        let mut args = args_in(dir.path(), &["--check"]);
        args.unicode_data = dir.path().join("absent.txt");
        assert_eq!(execute(args), EXIT_FAILURE);
        assert!(!dir.path().join("emoji-table.def").exists());
    }

    #[test]
    fn unknown_layout_is_rejected_by_parser() {
        let result = Args::try_parse_from(["emoji-table", "--layout", "wide"]);
        assert!(result.is_err());
    }
}
