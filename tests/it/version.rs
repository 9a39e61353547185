use std::cmp::Ordering;

use assert_matches::assert_matches;
use itertools::Itertools;
use proptest::prelude::*;
use simple_test_case::test_case;

use semver_range::{Component, Identifier, Identifiers, Reason, Version, version};

#[test]
fn spec_version() {
    assert_eq!(Version::spec_version(), version!("2.0.0"));
}

#[test]
fn parse_all_fields() {
    let input = "1.2.3-alpha.0+build.012.code.42";
    let version = Version::parse(input).expect("parse version");
    assert_eq!(version.to_string(), input);
    assert_eq!(version.major, 1);
    assert_eq!(version.minor, 2);
    assert_eq!(version.patch, 3);
    assert_eq!(version.pre_release.to_string(), "alpha.0");
    assert_eq!(version.metadata.to_string(), "build.012.code.42");
    assert_eq!(version.metadata.get("build"), Identifier::text("012").ok().as_ref());
}

#[test_case("0.0.0"; "zero")]
#[test_case("1.0.0-alpha"; "alpha")]
#[test_case("1.0.0-alpha.1"; "alpha_1")]
#[test_case("1.0.0-0.3.7"; "numeric_prerelease")]
#[test_case("1.0.0-x.7.z.92"; "mixed_prerelease")]
#[test_case("1.0.0-x-y-z.--"; "hyphens")]
#[test_case("1.0.0-alpha+001"; "metadata_leading_zero")]
#[test_case("1.0.0+20130313144700"; "metadata_timestamp")]
#[test_case("1.0.0-beta+exp.sha.5114f85"; "prerelease_and_metadata")]
#[test_case("1.0.0+21AF26D3----117B344092BD"; "metadata_hyphens")]
#[test_case("1.2.3+build-7"; "hyphen_in_metadata")]
#[test_case("18446744073709551615.18446744073709551615.18446744073709551615"; "max")]
#[test]
fn roundtrip(input: &str) {
    let version = Version::parse(input).expect("parse version");
    assert_eq!(version.to_string(), input);
}

#[test_case("", Reason::Empty, ""; "empty")]
#[test_case("1", Reason::MissingComponents, "1"; "major_only")]
#[test_case("1.0", Reason::MissingComponents, "1.0"; "missing_patch")]
#[test_case("a.2.3-alpha.0+build.012", Reason::NotNumeric(Component::Major), "a"; "major_not_numeric")]
#[test_case("01.2.3-alpha.0+build.012", Reason::LeadingZero(Component::Major), "01"; "major_leading_zero")]
#[test_case("18446744073709551616.2.3", Reason::Overflow(Component::Major), "18446744073709551616"; "major_overflow")]
#[test_case("1.b.3-alpha.0+build.012", Reason::NotNumeric(Component::Minor), "b"; "minor_not_numeric")]
#[test_case("1.02.3-alpha.0+build.012", Reason::LeadingZero(Component::Minor), "02"; "minor_leading_zero")]
#[test_case("1.18446744073709551616.3", Reason::Overflow(Component::Minor), "18446744073709551616"; "minor_overflow")]
#[test_case("1.2.c-alpha.0+build.012", Reason::NotNumeric(Component::Patch), "c"; "patch_not_numeric")]
#[test_case("1.2.03-alpha.0+build.012", Reason::LeadingZero(Component::Patch), "03"; "patch_leading_zero")]
#[test_case("1.2.18446744073709551616-alpha.0", Reason::Overflow(Component::Patch), "18446744073709551616"; "patch_overflow")]
#[test_case("1.2.3-alpha.01+build.012", Reason::IdentifierLeadingZero, "01"; "prerelease_leading_zero")]
#[test_case("1.2.3-alpha.1+build..012", Reason::EmptyIdentifier, ""; "metadata_empty_identifier")]
#[test_case("1.2.3-", Reason::EmptyIdentifier, ""; "dangling_hyphen")]
#[test_case("1.2.3+", Reason::EmptyIdentifier, ""; "dangling_plus")]
#[test_case("1.2.3-a_b", Reason::IdentifierCharacter, "a_b"; "prerelease_character")]
#[test_case("1.2.3.4", Reason::NotNumeric(Component::Patch), "3.4"; "four_components")]
#[test_case("v1.2.3", Reason::NotNumeric(Component::Major), "v1"; "v_prefix")]
#[test_case(" 1.2.3", Reason::NotNumeric(Component::Major), " 1"; "leading_space")]
#[test_case("1.2.3 ", Reason::NotNumeric(Component::Patch), "3 "; "trailing_space")]
#[test]
fn invalid(input: &str, reason: Reason, fragment: &str) {
    let err = Version::parse(input).expect_err("must fail");
    assert_eq!(err.reason(), reason);
    assert_eq!(err.fragment(), fragment);
    assert_eq!(err.input(), input);
}

#[test]
fn set_is_atomic() {
    let mut version = version!("1.2.3-rc.1");
    let err = version.set("1.2.3-01").expect_err("must fail");
    assert_eq!(err.reason(), Reason::IdentifierLeadingZero);
    assert_eq!(version, version!("1.2.3-rc.1"));

    version.set("4.5.6+meta").expect("set version");
    assert_eq!(version.to_string(), "4.5.6+meta");
}

#[test_case("1.2.3-alpha.0", "1.2.3-alpha.0", Ordering::Equal; "equal")]
#[test_case("1.2.3-alpha.0+build.001", "1.2.3-alpha.0+build.002", Ordering::Equal; "metadata_ignored")]
#[test_case("1.2.3", "1.2.3-alpha.0", Ordering::Greater; "release_above_prerelease")]
#[test_case("1.2.4", "1.2.3", Ordering::Greater; "patch")]
#[test_case("1.3.0", "1.2.3", Ordering::Greater; "minor")]
#[test_case("2.0.0", "1.2.3", Ordering::Greater; "major")]
#[test_case("1.2.3-alpha.9", "1.2.3-alpha.0", Ordering::Greater; "numeric_identifier")]
#[test_case("1.2.3-beta.0", "1.2.3-alpha.0", Ordering::Greater; "text_identifier")]
#[test_case("1.2.3-a.b", "1.2.3-a.b.c", Ordering::Less; "longer_prerelease")]
#[test_case("1.10.0", "1.9.0", Ordering::Greater; "numeric_not_lexical")]
#[test]
fn compare(a: &str, b: &str, expected: Ordering) {
    let (a, b) = (version!(a), version!(b));
    assert_eq!(a.cmp(&b), expected);
    assert_eq!(b.cmp(&a), expected.reverse());
    assert_eq!(a == b, expected == Ordering::Equal);
}

#[test]
fn precedence_chain() {
    let ordered = [
        "1.0.0-alpha",
        "1.0.0-alpha.1",
        "1.0.0-alpha.beta",
        "1.0.0-beta",
        "1.0.0-beta.2",
        "1.0.0-beta.11",
        "1.0.0-rc.1",
        "1.0.0",
        "2.0.0",
        "2.1.0",
        "2.1.1",
    ];
    for (lower, higher) in ordered.iter().map(Version::must_parse).tuple_windows() {
        assert!(lower < higher, "{lower} < {higher}");
    }
}

#[test]
fn equal_versions_hash_equally() {
    use std::collections::HashSet;

    let versions = ["1.0.0+a", "1.0.0+b", "1.0.0"]
        .into_iter()
        .map(Version::must_parse)
        .collect::<HashSet<_>>();
    assert_eq!(versions.len(), 1);
}

#[test]
fn increment() {
    let version = version!("1.2.3-alpha.0+build.012");

    assert_eq!(version.increment_major().map(|v| v.to_string()).as_deref(), Some("2.0.0"));
    assert_eq!(version.increment_minor().map(|v| v.to_string()).as_deref(), Some("1.3.0"));
    assert_eq!(version.increment_patch().map(|v| v.to_string()).as_deref(), Some("1.2.4"));

    assert_eq!(version.to_string(), "1.2.3-alpha.0+build.012");
}

#[test]
fn increment_overflow() {
    let max = Version::new(u64::MAX, u64::MAX, u64::MAX);
    assert_eq!(max.increment_major(), None);
    assert_eq!(max.increment_minor(), None);
    assert_eq!(max.increment_patch(), None);
}

#[test_case("2.0.0", false; "major_different")]
#[test_case("1.1.0", true; "minor_lower")]
#[test_case("1.2.2", true; "patch_lower")]
#[test_case("1.2.3", true; "same")]
#[test_case("1.2.4", true; "patch_higher")]
#[test_case("1.3.0", false; "minor_higher")]
#[test]
fn compatible_under(candidate: &str, expected: bool) {
    let target = version!("1.2.3-alpha.1+build.012");
    assert_eq!(version!(candidate).compatible_under(&target), expected);
}

#[test]
fn builder() {
    let version = Version::builder()
        .major(1)
        .minor(4)
        .pre_release(Identifiers::parse_prerelease("rc.2").expect("parse pre-release"))
        .build();
    assert_eq!(version.to_string(), "1.4.0-rc.2");
    assert!(version.is_prerelease());
    assert!(!Version::builder().major(1).build().is_prerelease());
}

#[test]
fn must_parse_panics() {
    let result = std::panic::catch_unwind(|| Version::must_parse("1.0"));
    assert!(result.is_err());
}

#[test]
fn from_str() {
    let version = "1.2.3".parse::<Version>().expect("parse version");
    assert_eq!(version, Version::new(1, 2, 3));
    assert_matches!(Version::try_from(String::from("1.2")), Err(_));
    assert_matches!(Version::try_from(&String::from("1.2.3")), Ok(v) if v.patch == 3);
}

#[test]
fn semver_interop() {
    let ours = version!("1.2.3-rc.1+build.5");
    let theirs = semver::Version::try_from(&ours).expect("convert to semver");
    assert_eq!(theirs, semver::Version::parse("1.2.3-rc.1+build.5").expect("parse semver"));

    let back = Version::try_from(theirs).expect("convert from semver");
    assert_eq!(back.to_string(), "1.2.3-rc.1+build.5");
}

fn arb_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<u64>().prop_map(|n| n.to_string()),
        "[0-9A-Za-z-]{0,6}[A-Za-z-][0-9A-Za-z-]{0,6}",
    ]
}

fn arb_version() -> impl Strategy<Value = String> {
    (
        any::<u64>(),
        0u64..20,
        0u64..20,
        prop::collection::vec(arb_identifier(), 0..4),
        prop::collection::vec("[0-9A-Za-z-]{1,8}", 0..3),
    )
        .prop_map(|(major, minor, patch, pre, meta)| {
            let mut version = format!("{major}.{minor}.{patch}");
            if !pre.is_empty() {
                version.push('-');
                version.push_str(&pre.join("."));
            }
            if !meta.is_empty() {
                version.push('+');
                version.push_str(&meta.join("."));
            }
            version
        })
}

proptest! {
    #[test]
    fn prop_roundtrip(input in arb_version()) {
        let version = Version::parse(&input).expect("parse version");
        prop_assert_eq!(version.to_string(), input);
    }

    #[test]
    fn prop_total_order(a in arb_version(), b in arb_version(), c in arb_version()) {
        let (a, b, c) = (version!(a), version!(b), version!(c));

        prop_assert_eq!(a.cmp(&a), Ordering::Equal);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }

        let relations = [a < b, a == b, a > b];
        prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
        prop_assert_eq!(a <= b, a < b || a == b);
        prop_assert_eq!(a >= b, a > b || a == b);
        prop_assert_eq!(a != b, !(a == b));
    }
}
