use serde::{Deserialize, Serialize};
use simple_test_case::test_case;
use utoipa::{PartialSchema, ToSchema};

use semver_range::{Range, Version, range, version};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Manifest {
    version: Version,
    requires: Range,
}

#[test]
fn manifest_roundtrip() {
    let manifest = Manifest {
        version: version!("1.2.3-rc.1+build.007"),
        requires: range!(">=1.0.0 <2.0.0 || 3.x"),
    };
    let serialized = serde_json::to_string(&manifest).expect("must serialize");
    assert_eq!(
        serialized,
        r#"{"version":"1.2.3-rc.1+build.007","requires":">=1.0.0 <2.0.0 || >=3.0.0 <4.0.0"}"#
    );

    let deserialized = serde_json::from_str::<Manifest>(&serialized).expect("must deserialize");
    assert_eq!(deserialized, manifest);
    assert_eq!(deserialized.version.metadata.to_string(), "build.007");
}

#[test_case(r#""1.2""#; "partial")]
#[test_case(r#""01.2.3""#; "leading_zero")]
#[test_case(r#""""#; "empty")]
#[test_case("123"; "number")]
#[test]
fn version_rejects_invalid(input: &str) {
    assert!(serde_json::from_str::<Version>(input).is_err());
}

#[test_case(r#""1.2.3 ||""#; "dangling_or")]
#[test_case(r#"">>1.2.3""#; "bad_comparator")]
#[test]
fn range_rejects_invalid(input: &str) {
    assert!(serde_json::from_str::<Range>(input).is_err());
}

#[test]
fn plain_text() {
    let version = serde_plain::from_str::<Version>("1.0.0-alpha").expect("parse plain");
    assert_eq!(version, version!("1.0.0-alpha"));
    assert_eq!(serde_plain::to_string(&version).expect("print plain"), "1.0.0-alpha");

    let range = serde_plain::from_str::<Range>("!1.2.3").expect("parse plain");
    assert_eq!(serde_plain::to_string(&range).expect("print plain"), "!=1.2.3");
}

#[test]
fn schema() {
    assert_eq!(Version::name(), "Version");
    assert_eq!(Range::name(), "Range");

    let schema = serde_json::to_value(Version::schema()).expect("serialize schema");
    assert_eq!(schema["type"], "string");
    assert_eq!(schema["examples"][0], "1.0.0");

    let schema = serde_json::to_value(Range::schema()).expect("serialize schema");
    assert_eq!(schema["type"], "string");
    assert!(schema["description"].as_str().is_some_and(|d| d.contains("||")));
}
