use std::{
    borrow::Cow,
    ops::{BitAnd, BitOr},
    str::FromStr,
};

use documented::Documented;
use duplicate::duplicate;
use nom::{
    Finish, IResult, Parser,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{multispace0, multispace1},
    combinator::eof,
    multi::separated_list1,
    sequence::{delimited, separated_pair, terminated},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::trace;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{Constraint, Constraints, Op, Reason, ValidationError, Version, error};

mod wildcard;

/// A set of version constraints, parsed from an expression like `>=1.2.0 <2.0.0 || 3.x`.
///
/// ## Grammar
///
/// - Terms separated by whitespace must all match.
/// - Groups of terms separated by `||` are alternatives; any one of them may match.
/// - Each term is an optional comparator followed by a version.
///   The comparators are `=`, `==`, `!=`, `!`, `<`, `<=`, `>`, and `>=`;
///   no comparator means `=`. Whitespace is allowed between comparator and version.
/// - The version may end in a wildcard (`1.x`, `1.2.x`, or `*` in place of `x`),
///   which expands into a bounded interval. A lone `x` or `*` matches everything.
///
/// Comparisons follow [`Version`] precedence, so build metadata is ignored
/// and pre-releases sort below their release.
///
/// ```
/// # use semver_range::{Range, Version};
/// let range = Range::parse(">1.2.2 <1.2.4 || >=2.0.0 <3.0.0").unwrap();
/// assert!(range.matches(&Version::new(1, 2, 3)));
/// assert!(range.matches(&Version::new(2, 9, 9)));
/// assert!(!range.matches(&Version::new(1, 2, 4)));
/// assert!(!range.matches(&Version::new(3, 0, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Documented)]
pub struct Range(Vec<Constraints>);

impl Range {
    /// Parse a range expression.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, ValidationError> {
        parse_expression(input.as_ref())
    }

    /// Parse a range expression, panicking if it is not valid.
    ///
    /// Intended for literals known to be valid; prefer [`Range::parse`] for anything else.
    #[track_caller]
    pub fn must_parse(input: impl AsRef<str>) -> Self {
        match Self::parse(input) {
            Ok(range) => range,
            Err(err) => panic!("invalid range: {err}"),
        }
    }

    /// A range matching every version.
    pub fn any() -> Self {
        Self(vec![Constraints::default()])
    }

    /// Evaluate whether `version` satisfies the range.
    pub fn matches(&self, version: &Version) -> bool {
        self.0.iter().any(|group| group.all_match(version))
    }

    /// The alternative groups of the range; a version matches if it matches every
    /// constraint in at least one group.
    pub fn groups(&self) -> impl Iterator<Item = &Constraints> {
        self.0.iter()
    }

    /// Combine two ranges into one that matches versions matched by both.
    ///
    /// The result holds every pairing of a group from `self` with a group from `other`,
    /// so its group count is the product of the two inputs' counts and grows
    /// multiplicatively across chained calls.
    ///
    /// ```
    /// # use semver_range::{Range, Version, range};
    /// let range = range!("1.x || 3.x").and(range!(">=1.5.0"));
    /// assert!(!range.matches(&Version::new(1, 4, 0)));
    /// assert!(range.matches(&Version::new(1, 5, 0)));
    /// assert!(range.matches(&Version::new(3, 0, 0)));
    /// ```
    pub fn and(self, other: Range) -> Self {
        let groups = self
            .0
            .iter()
            .flat_map(|left| other.0.iter().map(|right| left.clone().and(right.clone())))
            .collect();
        Self(groups)
    }

    /// Combine two ranges into one that matches versions matched by either.
    pub fn or(mut self, other: Range) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Convert the range into a reusable predicate function.
    ///
    /// ```
    /// # use semver_range::{Version, range};
    /// let is_supported = range!(">=1.0.0 <2.0.0").into_predicate();
    /// let versions = [Version::new(0, 9, 0), Version::new(1, 1, 0)];
    /// let supported = versions.iter().filter(|v| is_supported(v)).count();
    /// assert_eq!(supported, 1);
    /// ```
    pub fn into_predicate(self) -> impl Fn(&Version) -> bool + Send + Sync + 'static {
        move |version| self.matches(version)
    }
}

#[tracing::instrument]
fn parse_expression(input: &str) -> Result<Range, ValidationError> {
    fn comparator(input: &str) -> IResult<&str, &str> {
        take_while(|c: char| matches!(c, '<' | '>' | '=' | '!')).parse(input)
    }

    fn operand(input: &str) -> IResult<&str, &str> {
        take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '*'))
            .parse(input)
    }

    fn term(input: &str) -> IResult<&str, (&str, &str)> {
        separated_pair(comparator, multispace0, operand).parse(input)
    }

    fn group(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
        separated_list1(multispace1, term).parse(input)
    }

    fn expression(input: &str) -> IResult<&str, Vec<Vec<(&str, &str)>>> {
        terminated(
            separated_list1(delimited(multispace0, tag("||"), multispace0), group),
            eof,
        )
        .parse(input)
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        error::fatal!(input => input, Reason::Empty);
    }

    let groups = match expression.parse_complete(trimmed).finish() {
        Ok((_, groups)) => groups,
        Err(err) => {
            let token = err.input.split_whitespace().next().unwrap_or(trimmed);
            error::fatal!(input => token, Reason::Syntax);
        }
    };
    trace!(?groups, "tokenized range");

    groups
        .into_iter()
        .map(|terms| {
            terms
                .into_iter()
                .map(|(symbol, operand)| {
                    let Some(op) = Op::from_symbol(symbol) else {
                        error::fatal!(input => symbol, Reason::Comparator);
                    };
                    wildcard::expand(op, operand).map_err(|err| err.within(input, operand))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|terms| terms.into_iter().flatten().collect::<Constraints>())
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Range)
}

impl BitAnd for Range {
    type Output = Range;

    fn bitand(self, rhs: Range) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Range {
    type Output = Range;

    fn bitor(self, rhs: Range) -> Self::Output {
        self.or(rhs)
    }
}

impl From<Constraint> for Range {
    fn from(constraint: Constraint) -> Self {
        Self(vec![Constraints::from(constraint)])
    }
}

impl From<Constraints> for Range {
    fn from(constraints: Constraints) -> Self {
        Self(vec![constraints])
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut groups = self.groups();
        if let Some(first) = groups.next() {
            write!(f, "{first}")?;
        }
        for group in groups {
            write!(f, " || {group}")?;
        }
        Ok(())
    }
}

impl FromStr for Range {
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
    impl TryFrom<ty> for Range {
        type Error = ValidationError;

        fn try_from(value: ty) -> Result<Self, Self::Error> {
            Self::parse(value)
        }
    }
}

impl Serialize for Range {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Range {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!(">=1.0.0 <2.0.0"),
                json!("1.2.x || >=2.0.0"),
                json!("!=1.2.3"),
            ])
            .min_length(Some(1))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Range {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Range")
    }
}

/// Create a [`Range`] from an expression known to be valid.
///
/// ```
/// # use semver_range::Version;
/// let range = semver_range::range!("1.x || >=2.0.x <2.2.x");
/// assert!(range.matches(&Version::new(2, 1, 8)));
/// assert!(!range.matches(&Version::new(2, 2, 0)));
/// ```
///
/// Panics if the expression is not valid.
#[macro_export]
macro_rules! range {
    ($input:expr) => {
        $crate::Range::must_parse($input)
    };
}
