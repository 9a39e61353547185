#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod constraint;
mod error;
mod identifier;
mod range;
pub mod sql;
mod version;

pub use constraint::*;
pub use error::{Component, Reason, ValidationError};
pub use identifier::*;
pub use range::*;
pub use version::*;

/// `semver` is re-exported for convenience when converting to and from [`semver::Version`].
pub use semver;
