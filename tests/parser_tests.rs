use hermes_profile::parser::{
    parse_frame_name, parse_hermes_profile, read_hermes_profile, FrameId, FunctionName, ThreadId,
    Timestamp,
};
use hermes_profile::utils::error::ParseError;
use serde_json::json;
use std::path::Path;

fn fixture_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hermes_profile.json"))
}

#[test]
fn test_read_fixture() {
    let profile = read_hermes_profile(fixture_path()).unwrap();

    assert_eq!(profile.samples.len(), 5);
    assert_eq!(profile.stack_frames.len(), 6);
    assert_eq!(profile.samples[0].thread_id, ThreadId::new("8147"));
    assert_eq!(profile.samples[0].timestamp, Timestamp::from_micros(7_402_436_402));

    let render = &profile.stack_frames[&FrameId(4)];
    assert_eq!(render.parent_id, Some(FrameId(3)));
    assert_eq!(render.line.as_deref(), Some("1311"));
    assert_eq!(render.category.as_deref(), Some("JavaScript"));
}

#[test]
fn test_registry_iterates_in_id_order() {
    let profile = parse_hermes_profile(&json!({
        "samples": [],
        "stackFrames": {
            "10": { "name": "ten" },
            "2": { "name": "two" },
            "33": { "name": "thirty_three" }
        }
    }))
    .unwrap();

    let ids: Vec<FrameId> = profile.stack_frames.keys().copied().collect();
    assert_eq!(ids, vec![FrameId(2), FrameId(10), FrameId(33)]);
}

#[test]
fn test_non_object_input_is_invalid() {
    let result = parse_hermes_profile(&json!([1, 2, 3]));
    assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
}

#[test]
fn test_samples_must_be_array() {
    let result = parse_hermes_profile(&json!({ "samples": {} }));
    assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
}

#[test]
fn test_bad_timestamp_is_rejected() {
    let result = parse_hermes_profile(&json!({
        "samples": [{ "ts": "soon", "tid": 1, "sf": 1 }]
    }));
    assert!(matches!(result, Err(ParseError::JsonError(_))));
}

#[test]
fn test_missing_file() {
    let result = read_hermes_profile("/nonexistent/hermes.json");
    assert!(matches!(result, Err(ParseError::ReadFailed(_))));
}

#[test]
fn test_frame_name_parsing() {
    let parsed = parse_frame_name("App(http://localhost:8081/index.bundle:1200:26)");
    assert_eq!(parsed.function, FunctionName::Named("App".to_string()));
    assert_eq!(parsed.file.as_deref(), Some("http://localhost:8081/index.bundle"));

    let root = parse_frame_name("[root]");
    assert_eq!(root.function, FunctionName::Anonymous);
    assert_eq!(root.file, None);
}
