use derive_more::Display;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// The error reported by every parser in this library.
///
/// Parsing is all-or-nothing: when this error is returned no partial value was produced.
/// The error retains the complete input and the span of the offending fragment,
/// so it can be rendered as a [`miette`] diagnostic pointing at the bad token.
///
/// When a version fails to parse as part of a larger range expression,
/// the error is reported against the range expression as a whole.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{reason}: {fragment:?}")]
pub struct ValidationError {
    /// The input originally provided.
    #[source_code]
    input: String,

    /// The part of the input that failed validation.
    fragment: String,

    /// The location of `fragment` inside `input`.
    #[label("here")]
    span: SourceSpan,

    /// Why validation failed.
    reason: Reason,
}

impl ValidationError {
    pub(crate) fn new(input: &str, fragment: &str, reason: Reason) -> Self {
        let (start, end) = span(input, fragment);
        Self {
            input: input.into(),
            fragment: fragment.into(),
            span: (start, end - start).into(),
            reason,
        }
    }

    /// Report this error against `outer`, of which the failed input `inner` is a part.
    pub(crate) fn within(self, outer: &str, inner: &str) -> Self {
        let (offset, _) = span(outer, inner);
        Self {
            input: outer.into(),
            span: (offset + self.span.offset(), self.span.len()).into(),
            ..self
        }
    }

    /// Why validation failed.
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// The offending part of the input.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The complete input that was being validated.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The location of [`ValidationError::fragment`] inside [`ValidationError::input`].
    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

/// The cause of a [`ValidationError`].
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Reason {
    /// The input was empty.
    #[error("input was empty")]
    Empty,

    /// The version did not have all of `major.minor.patch`.
    #[error("no major.minor.patch elements found")]
    MissingComponents,

    /// A version number contained something other than ASCII digits.
    #[error("invalid character found in {0} number")]
    NotNumeric(Component),

    /// A version number had a leading zero.
    #[error("{0} number must not contain leading zeroes")]
    LeadingZero(Component),

    /// A version number does not fit in 64 bits.
    #[error("{0} number is larger than 2^64-1")]
    Overflow(Component),

    /// A pre-release or build metadata identifier was empty.
    #[error("identifier is empty")]
    EmptyIdentifier,

    /// A numeric pre-release identifier had a leading zero.
    #[error("numeric pre-release identifier must not contain leading zeroes")]
    IdentifierLeadingZero,

    /// A numeric identifier does not fit in 64 bits.
    #[error("numeric identifier is larger than 2^64-1")]
    IdentifierOverflow,

    /// An identifier contained something other than ASCII alphanumerics and hyphens.
    #[error("invalid character found in identifier")]
    IdentifierCharacter,

    /// The range expression could not be split into terms.
    #[error("malformed range expression")]
    Syntax,

    /// The comparator in front of a range term is not recognized.
    #[error("unknown comparator")]
    Comparator,

    /// A wildcard appeared somewhere other than the final component.
    #[error("wildcard must be the final version component")]
    Wildcard,

    /// The upper bound implied by a wildcard does not fit in 64 bits.
    #[error("wildcard upper bound is larger than 2^64-1")]
    WildcardOverflow,

    /// A byte source was not valid UTF-8.
    #[error("source is not valid UTF-8")]
    Utf8,

    /// A scalar source of an unsupported type was provided.
    #[error("cannot convert source to a version string")]
    UnsupportedSource,
}

/// Names the numeric components of a version in error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Component {
    /// The major version.
    #[display("major")]
    Major,

    /// The minor version.
    #[display("minor")]
    Minor,

    /// The patch version.
    #[display("patch")]
    Patch,
}

/// Return the span of `substr` inside `text`.
///
/// Fragments handed to this function are almost always subslices of `text`,
/// in which case their exact position is reported.
pub(crate) fn span(text: &str, substr: &str) -> (usize, usize) {
    let base = text.as_ptr() as usize;
    let start = substr.as_ptr() as usize;
    if start >= base && start + substr.len() <= base + text.len() {
        let offset = start - base;
        return (offset, offset + substr.len());
    }

    text.find(substr)
        .map(|start| (start, substr.len() + start))
        .unwrap_or((0, text.len()))
}

/// Construct and return a new [`ValidationError`].
///
/// Provide the input, along with the part of it that failed, and the reason.
///
/// ```ignore
/// error::invalid!(input => fragment, Reason::Empty);
/// ```
macro_rules! invalid {
    ($input:expr => $fragment:expr, $reason:expr) => {
        $crate::error::ValidationError::new($input, $fragment, $reason)
    };
}
pub(crate) use invalid;

/// Shorthand for constructing a [`ValidationError`] and returning it.
macro_rules! fatal {
    ($input:expr => $fragment:expr, $reason:expr) => {
        return Err($crate::error::invalid!($input => $fragment, $reason))
    };
}
pub(crate) use fatal;
