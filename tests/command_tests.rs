use hermes_profile::aggregator::ConvertOptions;
use hermes_profile::commands::{execute_convert, validate_args, validate_profile_file, ConvertArgs};
use hermes_profile::flamegraph::FlamegraphConfig;
use hermes_profile::output::read_profile;
use hermes_profile::parser::StackRef;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hermes_profile.json"))
}

#[test]
fn test_validate_args_valid() {
    let args = ConvertArgs {
        input: fixture_path(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_input() {
    let args = ConvertArgs::default();

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_missing_input() {
    let args = ConvertArgs {
        input: PathBuf::from("/nonexistent/hermes.json"),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_output_overwrites_input() {
    let args = ConvertArgs {
        input: fixture_path(),
        output_json: fixture_path(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_blank_thread_name() {
    let args = ConvertArgs {
        input: fixture_path(),
        options: ConvertOptions::new().with_thread_name("  "),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_top_out_of_range() {
    for top_functions in [0, 2000] {
        let args = ConvertArgs {
            input: fixture_path(),
            top_functions,
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }
}

#[test]
fn test_execute_convert_fixture() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output_json = temp_dir.path().join("profile.json");
    let output_svg = temp_dir.path().join("flamegraph.svg");

    let args = ConvertArgs {
        input: fixture_path(),
        output_json: output_json.clone(),
        output_svg: Some(output_svg.clone()),
        flamegraph_config: Some(FlamegraphConfig::new().with_width(800)),
        ..Default::default()
    };

    let summary = execute_convert(args).unwrap().unwrap();

    assert_eq!(summary.sample_count, 5);
    assert_eq!(summary.frame_count, 6);
    assert_eq!(summary.unknown_stack_samples, 1);
    assert_eq!(summary.duration_ns, 1_659_000);
    assert!(output_svg.exists());

    let document = read_profile(&output_json).unwrap();
    let profile = &document.profile;
    assert!(profile.is_valid());
    // Leaves 4, 5, 3 in first-seen order; frame ids 1..5 map to 0..4
    assert_eq!(profile.stacks, vec![vec![3, 2, 1, 0], vec![4, 2, 1, 0], vec![2, 1, 0]]);
    assert_eq!(profile.samples[4].stack_id, StackRef::Unknown);

    validate_profile_file(&output_json).unwrap();
}

#[test]
fn test_execute_convert_without_samples_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("empty.json");
    std::fs::write(&input, r#"{ "samples": [], "stackFrames": {} }"#).unwrap();
    let output_json = temp_dir.path().join("profile.json");

    let args = ConvertArgs {
        input,
        output_json: output_json.clone(),
        ..Default::default()
    };

    assert!(execute_convert(args).unwrap().is_none());
    assert!(!output_json.exists());
}

#[test]
fn test_validate_profile_file_rejects_broken_profile() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{
            "version": "1.0.0",
            "platform": "javascript",
            "generated_at": "2024-01-01T00:00:00Z",
            "profile": {
                "samples": [{ "stack_id": 3, "thread_id": "1", "elapsed_since_start_ns": "0" }],
                "stacks": [[0]],
                "frames": [{ "function": "main" }],
                "thread_metadata": { "1": { "name": "JavaScriptThread", "priority": 1 } }
            }
        }"#,
    )
    .unwrap();

    assert!(validate_profile_file(&path).is_err());
}
