//! Config loading and validation through the public surface.

mod common;

use spectool::config::loader::{load_config, ConfigError};
use spectool::config::schema::{HandlerSink, LogLevel};
use spectool::config::validation::{validate_config, ValidationError};
use spectool::config::ToolkitConfig;
use spectool::pipeline::expand;

#[test]
fn test_default_logging_tree_binds_two_handlers_to_root() {
    let config = ToolkitConfig::default();
    assert!(validate_config(&config).is_ok());

    let logging = &config.logging;
    assert_eq!(logging.root.handlers, vec!["console", "file"]);

    let console = logging.handler("console").unwrap();
    assert_eq!(console.level, LogLevel::Debug);
    assert!(matches!(console.sink, HandlerSink::Console { .. }));

    let file = logging.handler("file").unwrap();
    assert_eq!(file.level, LogLevel::Info);
    match &file.sink {
        HandlerSink::File {
            path,
            max_bytes,
            backup_count,
        } => {
            assert_eq!(path, "info.log");
            assert_eq!(*max_bytes, 10 * 1024 * 1024);
            assert_eq!(*backup_count, 10);
        }
        other => panic!("expected a file sink, got {other:?}"),
    }
}

#[test]
fn test_matrix_enumerates_declared_cross_product() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::load_from_str(
        dir.path(),
        r#"
        [pipeline.matrix]
        os = ["linux", "osx"]
        versions = ["3.5", "3.6", "3.7"]
        "#,
    );

    let cells: Vec<String> = expand(&config.pipeline.matrix)
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    assert_eq!(
        cells,
        vec![
            "linux/3.5",
            "linux/3.6",
            "linux/3.7",
            "osx/3.5",
            "osx/3.6",
            "osx/3.7",
        ]
    );
}

#[test]
fn test_validation_reports_every_dangling_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(
        dir.path(),
        r#"
        [logging.root]
        level = "info"
        handlers = ["console", "ghost"]

        [[logging.handlers]]
        name = "console"
        kind = "console"
        level = "debug"
        formatter = "missing"
        "#,
    );
    let errors = match load_config(&path).unwrap_err() {
        ConfigError::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other}"),
    };
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::UnknownHandler { handler, .. } if handler == "ghost")));
    assert!(errors.iter().any(
        |e| matches!(e, ValidationError::UnknownFormatter { formatter, .. } if formatter == "missing")
    ));
}

#[test]
fn test_unparseable_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "[logging\nbroken");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("failed to parse"));
}
