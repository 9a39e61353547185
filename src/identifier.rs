use std::cmp::Ordering;

use compact_str::{CompactString, ToCompactString};
use derive_more::{Deref, Display};
use lazy_regex::regex_is_match;

use crate::{Reason, ValidationError, error};

/// A single dot-separated token of a pre-release or build metadata field.
///
/// ## Ordering
///
/// - Numeric identifiers always sort below text identifiers, regardless of value.
/// - Two numeric identifiers compare numerically.
/// - Two text identifiers compare lexically in ASCII order.
///
/// ```
/// # use semver_range::Identifier;
/// let number = Identifier::parse_prerelease("999999").unwrap();
/// let text = Identifier::parse_prerelease("aa").unwrap();
/// assert!(number < text);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum Identifier {
    /// An identifier made only of ASCII digits, without leading zeroes.
    #[display("{_0}")]
    Numeric(u64),

    /// An identifier made of ASCII alphanumerics and hyphens.
    ///
    /// Digit-only build metadata with leading zeroes is kept here verbatim,
    /// since reading it as a number would lose the zeroes.
    #[display("{_0}")]
    Text(Text),
}

/// The value of a text [`Identifier`].
///
/// Only produced by the parsing constructors and [`Identifier::text`],
/// so it always holds a non-empty run of ASCII alphanumerics and hyphens.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub struct Text(CompactString);

impl Text {
    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Identifier {
    /// Parse a pre-release identifier.
    ///
    /// Numeric pre-release identifiers must not have leading zeroes.
    pub fn parse_prerelease(token: &str) -> Result<Self, ValidationError> {
        Self::parse(token, true)
    }

    /// Parse a build metadata identifier.
    ///
    /// Digit-only identifiers with leading zeroes are accepted and stored as text.
    pub fn parse_metadata(token: &str) -> Result<Self, ValidationError> {
        Self::parse(token, false)
    }

    /// Create a text identifier, even if the value consists only of digits.
    pub fn text(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            error::fatal!(value => value, Reason::EmptyIdentifier);
        }
        if !is_identifier(value) {
            error::fatal!(value => value, Reason::IdentifierCharacter);
        }
        Ok(Self::Text(Text(value.to_compact_string())))
    }

    fn parse(token: &str, strict: bool) -> Result<Self, ValidationError> {
        if token.is_empty() {
            error::fatal!(token => token, Reason::EmptyIdentifier);
        }

        if is_numeric(token) {
            if has_leading_zero(token) {
                if strict {
                    error::fatal!(token => token, Reason::IdentifierLeadingZero);
                }
                return Ok(Self::Text(Text(token.to_compact_string())));
            }
            return token
                .parse()
                .map(Self::Numeric)
                .map_err(|_| error::invalid!(token => token, Reason::IdentifierOverflow));
        }

        if is_identifier(token) {
            Ok(Self::Text(Text(token.to_compact_string())))
        } else {
            Err(error::invalid!(token => token, Reason::IdentifierCharacter))
        }
    }

    /// Report whether the identifier is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    /// The numeric value of the identifier, if it is numeric.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// The text value of the identifier, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Text(text) => Some(text.as_str()),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Numeric(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An ordered list of [`Identifier`], used for both the pre-release and build metadata fields.
///
/// ## Ordering
///
/// Sequences are compared according to SemVer pre-release precedence:
/// - An empty sequence sorts _above_ any non-empty sequence,
///   because a release has higher precedence than any of its pre-releases.
/// - Otherwise identifiers are compared left to right until a difference is found.
/// - If all shared identifiers are equal, the longer sequence sorts higher.
///
/// ## Key/value view
///
/// The sequence can also be treated as alternating key/value pairs,
/// like `build.12.sha.abcd`: a key is a text identifier at an even index
/// and its value is the identifier that follows it.
/// A key in the final position has no value and is treated as absent.
///
/// ```
/// # use semver_range::{Identifier, Identifiers};
/// let mut pre = Identifiers::parse_prerelease("rc.1.pass").unwrap();
/// assert_eq!(pre.get("rc"), Some(&Identifier::Numeric(1)));
/// assert_eq!(pre.increment("rc"), Some(2));
/// assert!(!pre.contains("pass"));
/// assert_eq!(pre.to_string(), "rc.2.pass");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deref)]
pub struct Identifiers(Vec<Identifier>);

impl Identifiers {
    /// Create an empty sequence.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a dot-separated pre-release field, e.g. `alpha.1`.
    pub fn parse_prerelease(input: &str) -> Result<Self, ValidationError> {
        Self::parse(input, Identifier::parse_prerelease)
    }

    /// Parse a dot-separated build metadata field, e.g. `build.007`.
    pub fn parse_metadata(input: &str) -> Result<Self, ValidationError> {
        Self::parse(input, Identifier::parse_metadata)
    }

    fn parse(
        input: &str,
        parse: impl Fn(&str) -> Result<Identifier, ValidationError>,
    ) -> Result<Self, ValidationError> {
        input
            .split('.')
            .map(|token| parse(token).map_err(|err| err.within(input, token)))
            .collect()
    }

    /// The value following `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Identifier> {
        self.pairs()
            .find_map(|(k, value)| is_key(k, key).then_some(value))
    }

    /// Report whether `key` is present with a following value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Increment the numeric value following `key`, returning the updated value.
    ///
    /// Returns `None` and leaves the sequence untouched if no key has a numeric value,
    /// or if that value is already `u64::MAX`.
    pub fn increment(&mut self, key: &str) -> Option<u64> {
        let value = self.0.chunks_exact_mut(2).find_map(|pair| match pair {
            [k, Identifier::Numeric(n)] if is_key(k, key) => Some(n),
            _ => None,
        })?;
        *value = value.checked_add(1)?;
        Some(*value)
    }

    /// Replace the value following `key`.
    ///
    /// Returns whether the key was found; absent keys are never appended.
    pub fn set(&mut self, key: &str, value: Identifier) -> bool {
        let slot = self.0.chunks_exact_mut(2).find_map(|pair| match pair {
            [k, v] if is_key(k, key) => Some(v),
            _ => None,
        });
        match slot {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Replace the value following `key` with a text identifier.
    ///
    /// Fails if `value` is not a valid identifier;
    /// otherwise returns whether the key was found.
    pub fn set_text(&mut self, key: &str, value: &str) -> Result<bool, ValidationError> {
        Ok(self.set(key, Identifier::text(value)?))
    }

    /// Replace the value following `key` with a numeric identifier.
    ///
    /// Returns whether the key was found.
    pub fn set_number(&mut self, key: &str, value: u64) -> bool {
        self.set(key, Identifier::Numeric(value))
    }

    fn pairs(&self) -> impl Iterator<Item = (&Identifier, &Identifier)> {
        self.0.chunks_exact(2).filter_map(|pair| match pair {
            [key, value] => Some((key, value)),
            _ => None,
        })
    }
}

impl std::fmt::Display for Identifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut identifiers = self.0.iter();
        if let Some(first) = identifiers.next() {
            write!(f, "{first}")?;
        }
        for identifier in identifiers {
            write!(f, ".{identifier}")?;
        }
        Ok(())
    }
}

impl Ord for Identifiers {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_empty(), other.0.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.iter().cmp(other.0.iter()),
        }
    }
}

impl PartialOrd for Identifiers {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Vec<Identifier>> for Identifiers {
    fn from(identifiers: Vec<Identifier>) -> Self {
        Self(identifiers)
    }
}

impl FromIterator<Identifier> for Identifiers {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Identifiers {
    type Item = &'a Identifier;
    type IntoIter = std::slice::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn is_key(identifier: &Identifier, key: &str) -> bool {
    matches!(identifier, Identifier::Text(text) if text.as_str() == key)
}

fn is_identifier(token: &str) -> bool {
    regex_is_match!(r"^[0-9A-Za-z-]+$", token)
}

pub(crate) fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn has_leading_zero(token: &str) -> bool {
    token.len() > 1 && token.starts_with('0')
}
