//! Reading and writing versions as database scalar values.
//!
//! Database drivers hand column values over in a handful of shapes;
//! versions are stored as text and may arrive either as a string or as raw bytes.

use derive_more::From;

use crate::{Reason, ValidationError, Version, error};

/// A scalar value as read from a database column.
#[derive(Debug, Clone, Copy, PartialEq, From)]
pub enum Scalar<'a> {
    /// A text column.
    Text(&'a str),

    /// A binary column.
    Bytes(&'a [u8]),

    /// An integer column.
    Integer(i64),

    /// A floating point column.
    Float(f64),

    /// A boolean column.
    Bool(bool),

    /// A missing value.
    #[from(skip)]
    Null,
}

impl Scalar<'_> {
    /// The name of the kind of value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Bytes(_) => "bytes",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
            Scalar::Null => "null",
        }
    }
}

impl Version {
    /// Replace this version with one read from a database column.
    ///
    /// Text and UTF-8 bytes are parsed as with [`Version::set`];
    /// any other kind of value is rejected.
    /// On failure the version is left unchanged.
    ///
    /// ```
    /// # use semver_range::{Version, sql::Scalar};
    /// let mut version = Version::default();
    /// version.scan(Scalar::Bytes(b"1.2.3-alpha.0+build.012")).unwrap();
    /// assert_eq!(version.value(), "1.2.3-alpha.0+build.012");
    ///
    /// assert!(version.scan(Scalar::Integer(7)).is_err());
    /// assert_eq!(version.value(), "1.2.3-alpha.0+build.012");
    /// ```
    pub fn scan(&mut self, source: Scalar<'_>) -> Result<(), ValidationError> {
        match source {
            Scalar::Text(text) => self.set(text),
            Scalar::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => self.set(text),
                Err(_) => {
                    let lossy = String::from_utf8_lossy(bytes);
                    error::fatal!(&lossy => &lossy, Reason::Utf8);
                }
            },
            other => {
                let kind = other.kind();
                error::fatal!(kind => kind, Reason::UnsupportedSource);
            }
        }
    }

    /// The value to write into a database column.
    pub fn value(&self) -> String {
        self.to_string()
    }
}
