// tests/config_loading.rs

//! TOML config loading and validation.

use std::error::Error;
use std::io::Write as _;

use tempfile::NamedTempFile;

use predflow::config::{
    PipelineSpec, RawPipelineSpec, default_config_path, load_and_validate, load_from_path,
};
use predflow::errors::PipelineError;
use predflow_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn full_config_round_trips() -> TestResult {
    init_tracing();

    let file = write_config(
        r#"
symbols = ["BTC_PRICE", "ETH_PRICE"]
source_types = ["predict", "polymarket"]
intervals = ["1h", "1d"]
days_back = 7
max_concurrency = 2
"#,
    );

    let spec = load_and_validate(file.path())?;

    assert_eq!(spec.symbols, vec!["BTC_PRICE", "ETH_PRICE"]);
    assert_eq!(spec.source_types, vec!["predict", "polymarket"]);
    assert_eq!(spec.intervals, vec!["1h", "1d"]);
    assert_eq!(spec.days_back, 7);
    assert_eq!(spec.max_concurrency, 2);
    Ok(())
}

#[test]
fn missing_fields_fall_back_to_defaults() -> TestResult {
    init_tracing();

    let file = write_config(r#"symbols = ["SOL_PRICE"]"#);
    let spec = load_and_validate(file.path())?;

    assert_eq!(spec.symbols, vec!["SOL_PRICE"]);
    assert_eq!(spec.source_types, vec!["predict"]);
    assert_eq!(spec.intervals, vec!["1h"]);
    assert_eq!(spec.days_back, 30);
    assert_eq!(spec.max_concurrency, 3);
    Ok(())
}

#[test]
fn empty_file_yields_the_default_spec() -> TestResult {
    init_tracing();

    let file = write_config("");
    let spec = load_and_validate(file.path())?;

    let defaults = PipelineSpec::default();
    assert_eq!(spec.symbols, defaults.symbols);
    assert_eq!(spec.source_types, defaults.source_types);
    assert_eq!(spec.intervals, defaults.intervals);
    assert_eq!(spec.days_back, defaults.days_back);
    Ok(())
}

#[test]
fn zero_days_back_is_rejected() {
    init_tracing();

    let file = write_config("days_back = 0");
    let err = load_and_validate(file.path()).expect_err("days_back = 0 must fail");
    assert!(matches!(err, PipelineError::ConfigError(_)));
}

#[test]
fn empty_symbol_list_is_rejected() {
    init_tracing();

    let file = write_config("symbols = []");
    let err = load_and_validate(file.path()).expect_err("empty symbols must fail");
    assert!(matches!(err, PipelineError::ConfigError(_)));
}

#[test]
fn blank_interval_entry_is_rejected() {
    init_tracing();

    let file = write_config(r#"intervals = ["1h", "  "]"#);
    let err = load_and_validate(file.path()).expect_err("blank interval must fail");
    assert!(matches!(err, PipelineError::ConfigError(_)));
}

#[test]
fn zero_concurrency_is_rejected() {
    init_tracing();

    let file = write_config("max_concurrency = 0");
    let err = load_and_validate(file.path()).expect_err("zero concurrency must fail");
    assert!(matches!(err, PipelineError::ConfigError(_)));
}

#[test]
fn unparsable_toml_is_a_toml_error() {
    init_tracing();

    let file = write_config("symbols = [unterminated");
    let err = load_from_path(file.path()).expect_err("bad TOML must fail");
    assert!(matches!(err, PipelineError::TomlError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    init_tracing();

    let err = load_from_path("/nonexistent/Predflow.toml").expect_err("missing file must fail");
    assert!(matches!(err, PipelineError::IoError(_)));
}

#[test]
fn default_path_points_at_predflow_toml() {
    init_tracing();

    assert_eq!(default_config_path().to_string_lossy(), "Predflow.toml");
}

#[test]
fn raw_spec_default_passes_validation() {
    init_tracing();

    let spec = PipelineSpec::try_from(RawPipelineSpec::default()).expect("defaults must validate");
    assert_eq!(spec.symbols, vec!["BTC_PRICE"]);
}
