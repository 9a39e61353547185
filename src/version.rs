use std::{borrow::Cow, str::FromStr};

use bon::Builder;
use derivative::Derivative;
use documented::Documented;
use duplicate::duplicate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{
    Component, Identifiers, Reason, ValidationError, error,
    identifier::{has_leading_zero, is_numeric},
};

/// A Semantic Versioning 2.0.0 version, like `1.2.3-rc.1+build.5`.
///
/// Parsing is strict: all three numeric components are required,
/// they may not have leading zeroes, and each must fit in a `u64`.
/// No `v` prefix or surrounding whitespace is accepted.
///
/// Versions are ordered by precedence: major, minor, and patch numerically,
/// then by pre-release (a release sorts above all of its pre-releases).
/// Build metadata is carried along and printed, but ignored for both
/// equality and ordering, so `1.0.0+a == 1.0.0+b`.
///
/// The default version is `0.0.0`.
#[derive(Derivative, Documented, Builder, Clone, Debug, Default)]
#[derivative(Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version {
    /// Incremented for incompatible API changes.
    pub major: u64,

    /// Incremented for backwards compatible functionality.
    #[builder(default)]
    pub minor: u64,

    /// Incremented for backwards compatible bug fixes.
    #[builder(default)]
    pub patch: u64,

    /// The identifiers after the `-`, if any.
    #[builder(default)]
    pub pre_release: Identifiers,

    /// The identifiers after the `+`, if any.
    #[builder(default)]
    #[derivative(
        PartialEq = "ignore",
        PartialOrd = "ignore",
        Ord = "ignore",
        Hash = "ignore"
    )]
    pub metadata: Identifiers,
}

impl Version {
    /// Create a release version from its numeric components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: Identifiers::new(),
            metadata: Identifiers::new(),
        }
    }

    /// The latest version of the Semantic Versioning specification fully supported by this library.
    pub const fn spec_version() -> Self {
        Self::new(2, 0, 0)
    }

    /// Parse a version string.
    ///
    /// ```
    /// # use semver_range::Version;
    /// let version = Version::parse("1.2.3-alpha.1+build.007").unwrap();
    /// assert_eq!(version.patch, 3);
    /// assert_eq!(version.pre_release.to_string(), "alpha.1");
    /// assert_eq!(version.metadata.to_string(), "build.007");
    ///
    /// assert!(Version::parse("1.2").is_err());
    /// assert!(Version::parse("01.2.3").is_err());
    /// ```
    pub fn parse(input: impl AsRef<str>) -> Result<Self, ValidationError> {
        let input = input.as_ref();
        if input.is_empty() {
            error::fatal!(input => input, Reason::Empty);
        }

        let mut parts = input.splitn(3, '.');
        let (Some(major), Some(minor), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            error::fatal!(input => input, Reason::MissingComponents);
        };

        let major = parse_component(input, major, Component::Major)?;
        let minor = parse_component(input, minor, Component::Minor)?;

        let (rest, metadata) = match rest.split_once('+') {
            Some((rest, metadata)) => (
                rest,
                Identifiers::parse_metadata(metadata).map_err(|err| err.within(input, metadata))?,
            ),
            None => (rest, Identifiers::new()),
        };

        let (patch, pre_release) = match rest.split_once('-') {
            Some((patch, pre)) => (
                patch,
                Identifiers::parse_prerelease(pre).map_err(|err| err.within(input, pre))?,
            ),
            None => (rest, Identifiers::new()),
        };

        let patch = parse_component(input, patch, Component::Patch)?;
        Ok(Self {
            major,
            minor,
            patch,
            pre_release,
            metadata,
        })
    }

    /// Parse a version string, panicking if it is not valid.
    ///
    /// Intended for literals known to be valid; prefer [`Version::parse`] for anything else.
    #[track_caller]
    pub fn must_parse(input: impl AsRef<str>) -> Self {
        match Self::parse(input) {
            Ok(version) => version,
            Err(err) => panic!("invalid version: {err}"),
        }
    }

    /// Replace this version with the parsed value of `input`.
    ///
    /// On failure the version is left unchanged.
    pub fn set(&mut self, input: impl AsRef<str>) -> Result<(), ValidationError> {
        *self = Self::parse(input)?;
        Ok(())
    }

    /// Report whether this version has a pre-release.
    pub fn is_prerelease(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// The next major version, e.g. `1.2.3-rc.1` becomes `2.0.0`.
    ///
    /// Returns `None` if the major version is already `u64::MAX`.
    pub fn increment_major(&self) -> Option<Self> {
        Some(Self::new(self.major.checked_add(1)?, 0, 0))
    }

    /// The next minor version, e.g. `1.2.3-rc.1` becomes `1.3.0`.
    ///
    /// Returns `None` if the minor version is already `u64::MAX`.
    pub fn increment_minor(&self) -> Option<Self> {
        Some(Self::new(self.major, self.minor.checked_add(1)?, 0))
    }

    /// The next patch version, e.g. `1.2.3-rc.1` becomes `1.2.4`.
    ///
    /// Returns `None` if the patch version is already `u64::MAX`.
    pub fn increment_patch(&self) -> Option<Self> {
        Some(Self::new(self.major, self.minor, self.patch.checked_add(1)?))
    }

    /// Report whether this version can be used by something built against `other`:
    /// the major versions are equal and this minor version is not newer.
    ///
    /// ```
    /// # use semver_range::Version;
    /// let lib = Version::new(1, 2, 0);
    /// assert!(lib.compatible_under(&Version::new(1, 4, 0)));
    /// assert!(!lib.compatible_under(&Version::new(1, 1, 9)));
    /// assert!(!lib.compatible_under(&Version::new(2, 2, 0)));
    /// ```
    pub fn compatible_under(&self, other: &Version) -> bool {
        self.major == other.major && self.minor <= other.minor
    }
}

/// Parse a single numeric component of a version found inside `input`.
pub(crate) fn parse_component(
    input: &str,
    part: &str,
    component: Component,
) -> Result<u64, ValidationError> {
    if !is_numeric(part) {
        error::fatal!(input => part, Reason::NotNumeric(component));
    }
    if has_leading_zero(part) {
        error::fatal!(input => part, Reason::LeadingZero(component));
    }
    part.parse()
        .map_err(|_| error::invalid!(input => part, Reason::Overflow(component)))
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "-{}", self.pre_release)?;
        }
        if !self.metadata.is_empty() {
            write!(f, "+{}", self.metadata)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

duplicate! {
    [
        ty;
        [ &str ];
        [ &String ];
        [ String ];
    ]
    impl TryFrom<ty> for Version {
        type Error = ValidationError;

        fn try_from(value: ty) -> Result<Self, Self::Error> {
            Self::parse(value)
        }
    }
}

impl From<&Version> for Version {
    fn from(value: &Version) -> Self {
        value.clone()
    }
}

impl TryFrom<&semver::Version> for Version {
    type Error = ValidationError;

    fn try_from(value: &semver::Version) -> Result<Self, Self::Error> {
        Self::parse(value.to_string())
    }
}

impl TryFrom<semver::Version> for Version {
    type Error = ValidationError;

    fn try_from(value: semver::Version) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl TryFrom<&Version> for semver::Version {
    type Error = semver::Error;

    fn try_from(value: &Version) -> Result<Self, Self::Error> {
        semver::Version::parse(&value.to_string())
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Version {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("1.0.0"),
                json!("1.0.0-alpha.1"),
                json!("1.0.0-rc.10+build.007"),
            ])
            .min_length(Some(5))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Version {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Version")
    }
}

/// Create a [`Version`] from its components, or from a literal known to be valid.
///
/// ```
/// # use semver_range::Version;
/// let version = semver_range::version!(1, 2, 3);
/// assert_eq!(version, Version::new(1, 2, 3));
///
/// let version = semver_range::version!("1.2.3-rc.1");
/// assert!(version.is_prerelease());
/// ```
///
/// Panics if the literal is not a valid version.
#[macro_export]
macro_rules! version {
    ($major:expr, $minor:expr, $patch:expr) => {
        $crate::Version::new($major, $minor, $patch)
    };
    ($input:expr) => {
        $crate::Version::must_parse($input)
    };
}
