use std::path::PathBuf;

use creatorly_content::config::{
    load_config_flags, parse_flag_tokens, ConfigFlags, ReportFormat,
};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".creatorlyrc");
    let content = r#"
# comment
--report

--format text

--log-file=import.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.report);
    assert_eq!(flags.format, Some(ReportFormat::Text));
    assert_eq!(flags.log_file, Some(PathBuf::from("import.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".creatorlyrc");
    let content = "--report\n--format text\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "creatorly-content".to_string(),
        "--format".to_string(),
        "json".to_string(),
        "--strict".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.report, "file flags should remain enabled");
    assert!(effective.strict, "cli flags should be applied");
    assert_eq!(
        effective.format,
        Some(ReportFormat::Json),
        "cli should override format"
    );
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "creatorly-content".to_string(),
        "--format=json".to_string(),
        "--log-file=import.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.format, Some(ReportFormat::Json));
    assert_eq!(flags.log_file, Some(PathBuf::from("import.log")));
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        report: true,
        quiet: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        read_time: true,
        strict: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.report);
    assert!(merged.quiet);
    assert!(merged.read_time);
    assert!(merged.strict);
}
