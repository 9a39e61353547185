//! # Version Constraints
//!
//! A [`Constraint`] pairs a comparison operator with a [`Version`];
//! a [`Constraints`] collection combines several of them.
//!
//! Every constraint reduces to a single three-way comparison between the
//! candidate version and the constraint's version, followed by a check of the
//! resulting [`Ordering`] that depends only on the operator ([`Op::apply`]).
//! This keeps evaluation consistent with [`Version`]'s precedence rules:
//! build metadata never affects whether a constraint matches.

use std::cmp::Ordering;

use documented::Documented;
use enum_assoc::Assoc;
use serde::Deserialize;

use crate::Version;

/// A comparison operator in a range expression.
///
/// Each operator has a canonical symbol used when rendering constraints;
/// [`Op::from_symbol`] also accepts the alternate spellings `""` and `"=="` for
/// [`Op::Equal`] and `"!"` for [`Op::NotEqual`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Assoc)]
#[func(const fn token(&self) -> &'static str)]
pub enum Op {
    /// Matches versions of equal precedence.
    #[serde(rename = "=", alias = "", alias = "==")]
    #[assoc(token = "=")]
    Equal,

    /// Matches versions of different precedence.
    #[serde(rename = "!=", alias = "!")]
    #[assoc(token = "!=")]
    NotEqual,

    /// Matches versions of lower precedence.
    #[serde(rename = "<")]
    #[assoc(token = "<")]
    Less,

    /// Matches versions of lower or equal precedence.
    #[serde(rename = "<=")]
    #[assoc(token = "<=")]
    LessOrEqual,

    /// Matches versions of higher precedence.
    #[serde(rename = ">")]
    #[assoc(token = ">")]
    Greater,

    /// Matches versions of higher or equal precedence.
    #[serde(rename = ">=")]
    #[assoc(token = ">=")]
    GreaterOrEqual,
}

impl Op {
    /// The canonical spelling of the operator.
    pub const fn symbol(&self) -> &'static str {
        self.token()
    }

    /// Look up the operator for a comparator spelling.
    ///
    /// ```
    /// # use semver_range::Op;
    /// assert_eq!(Op::from_symbol(""), Some(Op::Equal));
    /// assert_eq!(Op::from_symbol("!"), Some(Op::NotEqual));
    /// assert_eq!(Op::from_symbol(">="), Some(Op::GreaterOrEqual));
    /// assert_eq!(Op::from_symbol(">>"), None);
    /// ```
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        serde_plain::from_str(symbol).ok()
    }

    /// Report whether the result of comparing a candidate against a constraint's version
    /// satisfies this operator.
    pub fn apply(self, ordering: Ordering) -> bool {
        match self {
            Op::Equal => ordering.is_eq(),
            Op::NotEqual => ordering.is_ne(),
            Op::Less => ordering.is_lt(),
            Op::LessOrEqual => ordering.is_le(),
            Op::Greater => ordering.is_gt(),
            Op::GreaterOrEqual => ordering.is_ge(),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single version constraint: an operator and the version it compares against.
///
/// ```
/// # use semver_range::{Constraint, Version, constraint, version};
/// let constraint = constraint!(GreaterOrEqual => version!(1, 2, 0));
/// assert!(constraint.matches(&Version::new(1, 2, 0)));
/// assert!(constraint.matches(&Version::new(1, 3, 0)));
/// assert!(!constraint.matches(&version!("1.2.0-rc.1")));
/// assert_eq!(constraint.to_string(), ">=1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Documented, Assoc)]
#[func(const fn operand(&self) -> &Version)]
#[func(const fn operator(&self) -> Op)]
pub enum Constraint {
    /// Equal precedence (`=`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::Equal)]
    Equal(Version),

    /// Different precedence (`!=`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::NotEqual)]
    NotEqual(Version),

    /// Lower precedence (`<`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::Less)]
    Less(Version),

    /// Lower or equal precedence (`<=`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::LessOrEqual)]
    LessOrEqual(Version),

    /// Higher precedence (`>`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::Greater)]
    Greater(Version),

    /// Higher or equal precedence (`>=`).
    #[assoc(operand = &_0)]
    #[assoc(operator = Op::GreaterOrEqual)]
    GreaterOrEqual(Version),
}

impl Constraint {
    /// The version this constraint compares against.
    pub const fn version(&self) -> &Version {
        self.operand()
    }

    /// The comparison operator.
    pub const fn op(&self) -> Op {
        self.operator()
    }

    /// Create a constraint from an operator and a version.
    pub fn new(op: Op, version: impl Into<Version>) -> Self {
        let version = version.into();
        match op {
            Op::Equal => Constraint::Equal(version),
            Op::NotEqual => Constraint::NotEqual(version),
            Op::Less => Constraint::Less(version),
            Op::LessOrEqual => Constraint::LessOrEqual(version),
            Op::Greater => Constraint::Greater(version),
            Op::GreaterOrEqual => Constraint::GreaterOrEqual(version),
        }
    }

    /// Evaluate whether `version` satisfies this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        self.op().apply(version.cmp(self.version()))
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.op(), self.version())
    }
}

impl From<&Constraint> for Constraint {
    fn from(c: &Constraint) -> Self {
        c.clone()
    }
}

impl AsRef<Version> for Constraint {
    fn as_ref(&self) -> &Version {
        self.version()
    }
}

/// A collection of constraints, evaluated together.
///
/// In a range expression a collection is one space-separated group,
/// where every constraint must match ([`Constraints::all_match`]).
/// An empty collection places no restriction on the version, and renders as `*`.
///
/// ```
/// # use semver_range::{Version, constraints, version};
/// let group = constraints!(
///     { GreaterOrEqual => version!(1, 0, 0) },
///     { Less => version!(2, 0, 0) },
/// );
/// assert!(group.all_match(&Version::new(1, 5, 0)));
/// assert!(!group.all_match(&Version::new(2, 0, 0)));
/// assert!(group.any_match(&Version::new(2, 0, 0)));
/// assert_eq!(group.to_string(), ">=1.0.0 <2.0.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Documented)]
pub struct Constraints(Vec<Constraint>);

impl Constraints {
    /// Iterate over constraints in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.0.iter()
    }

    /// Unpack into an iterator of constraints.
    #[allow(clippy::should_implement_trait)]
    pub fn into_iter(self) -> impl Iterator<Item = Constraint> {
        self.0.into_iter()
    }

    /// The number of constraints in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether the set has no constraints.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluate whether `version` satisfies every constraint in the set.
    ///
    /// An empty set matches every version.
    pub fn all_match(&self, version: &Version) -> bool {
        self.iter().all(|constraint| constraint.matches(version))
    }

    /// Evaluate whether `version` satisfies at least one constraint in the set.
    ///
    /// An empty set matches no version.
    pub fn any_match(&self, version: &Version) -> bool {
        self.iter().any(|constraint| constraint.matches(version))
    }

    /// Combine two sets into one whose constraints must all match.
    pub fn and(mut self, other: Constraints) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl std::fmt::Display for Constraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut constraints = self.iter();
        match constraints.next() {
            Some(first) => write!(f, "{first}")?,
            None => return f.write_str("*"),
        }
        for constraint in constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

impl<I, T> From<I> for Constraints
where
    I: IntoIterator<Item = T>,
    T: Into<Constraint>,
{
    fn from(constraints: I) -> Self {
        Self(constraints.into_iter().map(Into::into).collect())
    }
}

impl From<Constraint> for Constraints {
    fn from(constraint: Constraint) -> Self {
        Self(vec![constraint])
    }
}

impl From<&Constraint> for Constraints {
    fn from(constraint: &Constraint) -> Self {
        Self(vec![constraint.clone()])
    }
}

impl FromIterator<Constraint> for Constraints {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Construct a [`Constraint`], guaranteed to be valid at compile time.
///
/// ```
/// # use semver_range::{Constraint, Version};
/// let constraint = semver_range::constraint!(Less => semver_range::version!(2, 0, 0));
/// assert_eq!(constraint, Constraint::Less(Version::new(2, 0, 0)));
/// ```
#[macro_export]
macro_rules! constraint {
    ($variant:ident => $($tail:tt)*) => {
        $crate::Constraint::$variant($($tail)*)
    };
}

/// Construct [`Constraints`], guaranteed to be valid at compile time.
///
/// ```
/// # use semver_range::{Constraint, Constraints, Version};
/// let constraints = semver_range::constraints!(
///     { GreaterOrEqual => semver_range::version!(1, 0, 0) },
///     { Less => semver_range::version!(2, 0, 0) },
/// );
/// let expected = Constraints::from(vec![
///     Constraint::GreaterOrEqual(Version::new(1, 0, 0)),
///     Constraint::Less(Version::new(2, 0, 0)),
/// ]);
/// assert_eq!(constraints, expected);
/// ```
#[macro_export]
macro_rules! constraints {
    ($({ $variant:ident => $($version:tt)* }),* $(,)?) => {
        $crate::Constraints::from(vec![
            $(
                $crate::Constraint::$variant($($version)*)
            ),*
        ])
    };
}
