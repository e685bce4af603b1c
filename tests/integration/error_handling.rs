// tests/integration/error_handling.rs

use std::io::Write;

use dagsynth::config::{load_and_validate, load_or_default};
use dagsynth::dag::{CurvePoints, NodeCountCurve};
use dagsynth::errors::DagSynthError;
use tempfile::NamedTempFile;

#[test]
fn negative_custom_rate_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[generate]
count = 10
custom_wf_rate = -0.5
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(DagSynthError::ConfigError(msg)) => {
            assert!(msg.contains("custom_wf_rate"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_max_layer_is_rejected_before_curve_fitting() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[generate]\nmax_layer = 0\n").unwrap();

    match load_and_validate(file.path()) {
        Err(DagSynthError::ConfigError(msg)) => assert!(msg.contains("max_layer")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[generate\ncount = 1\n").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(DagSynthError::TomlError(_))
    ));
}

#[test]
fn unknown_output_kind_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[generate]\noutputs = [\"xml\"]\n").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(DagSynthError::TomlError(_))
    ));
}

#[test]
fn missing_config_file_means_defaults() {
    let raw = load_or_default("/definitely/not/here/Dagsynth.toml").unwrap();
    assert_eq!(raw.generate.count, 5);
    assert_eq!(raw.replay.batch_size, 1000);
}

#[test]
fn degenerate_curve_is_a_singular_system() {
    for max_layer in [0, -3] {
        match NodeCountCurve::fit(CurvePoints::from_layer_node(max_layer, 10)) {
            Err(DagSynthError::SingularSystem { max_layer: got }) => assert_eq!(got, max_layer),
            other => panic!("Expected SingularSystem, got: {:?}", other),
        }
    }
}
