use emoji_table_core::{check, run, CheckOutcome, PipelineConfig, PipelineError, TableLayout};
use std::fs;
use std::path::Path;

const EMOJI_TEST: &str = include_str!("fixtures/emoji-test-sample.txt");
const GEMOJI: &str = include_str!("fixtures/gemoji-sample.json");

fn config_in(dir: &Path, emoji_test: &str) -> PipelineConfig {
    let unicode_data = dir.join("emoji-test.txt");
    let alias_data = dir.join("emoji.json");
    fs::write(&unicode_data, emoji_test).unwrap();
    fs::write(&alias_data, GEMOJI).unwrap();
    PipelineConfig {
        unicode_data,
        alias_data,
        output: dir.join("out").join("emoji-table.def"),
        ..PipelineConfig::default()
    }
}

#[test]
fn run_writes_table_and_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let config = config_in(dir.path(), EMOJI_TEST);

    let report = run(&config).unwrap();
    assert_eq!(report.entries, 15);

    let written = fs::read_to_string(&config.output).unwrap();
    assert!(written.contains("\\ProvidesExplFile{emoji-table.def}\n"));
    assert!(written.contains("{keycap-hash} {hash} {Keycap:~\\#} {0.6}"));
    assert!(written.ends_with("%% End of file `emoji-table.def'.\n"));
}

#[test]
fn running_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let config = config_in(dir.path(), EMOJI_TEST);

    run(&config).unwrap();
    let first = fs::read(&config.output).unwrap();
    run(&config).unwrap();
    let second = fs::read(&config.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_input_leaves_previous_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let broken = format!("{EMOJI_TEST}1F6 ; fully-qualified # x E1.0 three digit code point\n");
    let config = config_in(dir.path(), &broken);
    fs::write(&config.output, "previous table\n").unwrap();

    let err = run(&config).unwrap_err();
    assert!(err.is_malformed_input());
    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "previous table\n"
    );
    let leftovers = fs::read_dir(dir.path().join("out")).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn entry_before_group_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let broken = format!("1F600 ; fully-qualified # 😀 E1.0 grinning face\n{EMOJI_TEST}");
    let config = config_in(dir.path(), &broken);

    let err = run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Source(_)));
    assert!(!config.output.exists());
}

#[test]
fn missing_input_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        unicode_data: dir.path().join("absent.txt"),
        alias_data: dir.path().join("absent.json"),
        output: dir.path().join("emoji-table.def"),
        ..PipelineConfig::default()
    };

    let err = run(&config).unwrap_err();
    match &err {
        PipelineError::Io { path, .. } => assert!(path.ends_with("absent.txt")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_malformed_input());
}

#[test]
fn check_detects_missing_current_and_stale_tables() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let config = config_in(dir.path(), EMOJI_TEST);

    assert_eq!(check(&config).unwrap(), CheckOutcome::Missing);

    run(&config).unwrap();
    assert_eq!(check(&config).unwrap(), CheckOutcome::UpToDate);

    let compact = PipelineConfig {
        layout: TableLayout::Compact,
        ..config.clone()
    };
    assert_eq!(check(&compact).unwrap(), CheckOutcome::Stale);
}

#[cfg(unix)]
fn output_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[cfg(unix)]
#[test]
fn run_keeps_permissions_of_replaced_table() {
    use std::os::unix::fs::PermissionsExt;

    for mode in [0o644, 0o640] {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        let config = config_in(dir.path(), EMOJI_TEST);
        fs::write(&config.output, "previous table\n").unwrap();
        fs::set_permissions(&config.output, fs::Permissions::from_mode(mode)).unwrap();

        run(&config).unwrap();
        assert_eq!(output_mode(&config.output), mode);
        assert_ne!(
            fs::read_to_string(&config.output).unwrap(),
            "previous table\n"
        );
    }
}

#[cfg(unix)]
#[test]
fn run_creates_world_readable_table() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let config = config_in(dir.path(), EMOJI_TEST);

    run(&config).unwrap();
    assert_eq!(output_mode(&config.output), 0o644);
}
