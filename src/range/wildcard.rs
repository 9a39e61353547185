//! Expansion of wildcard operands like `1.x` and `1.2.*` into plain constraints.

use tracing::debug;

use crate::{
    Component, Constraint, Op, Reason, ValidationError, Version, error, version::parse_component,
};

/// The operand of a single range term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Operand<'a> {
    /// `x` or `*`: every version.
    Any,

    /// `1.x` or `1.2.x`: every version sharing the concrete prefix.
    Partial(Wildcard),

    /// Anything else, which must then be a full version.
    Exact(&'a str),
}

impl<'a> Operand<'a> {
    pub(super) fn classify(operand: &'a str) -> Result<Self, ValidationError> {
        let parts = operand.splitn(3, '.').collect::<Vec<_>>();
        if let Some((_, prefix)) = parts.split_last() {
            if let Some(misplaced) = prefix.iter().find(|part| is_wildcard(part)) {
                error::fatal!(operand => misplaced, Reason::Wildcard);
            }
        }

        Ok(match parts.as_slice() {
            [last] if is_wildcard(last) => Self::Any,
            [major, last] if is_wildcard(last) => Self::Partial(Wildcard {
                major: parse_component(operand, major, Component::Major)?,
                minor: None,
            }),
            [major, minor, last] if is_wildcard(last) => Self::Partial(Wildcard {
                major: parse_component(operand, major, Component::Major)?,
                minor: Some(parse_component(operand, minor, Component::Minor)?),
            }),
            _ => Self::Exact(operand),
        })
    }
}

/// The concrete prefix of a wildcard operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Wildcard {
    major: u64,
    minor: Option<u64>,
}

impl Wildcard {
    /// The lowest release covered by the wildcard.
    fn floor(self) -> Version {
        Version::new(self.major, self.minor.unwrap_or(0), 0)
    }

    /// The lowest release above the wildcard.
    fn ceiling(self) -> Option<Version> {
        Some(match self.minor {
            None => Version::new(self.major.checked_add(1)?, 0, 0),
            Some(minor) => Version::new(self.major, minor.checked_add(1)?, 0),
        })
    }
}

/// Turn a comparator and its operand into the constraints it stands for.
///
/// Errors are reported against `operand`.
pub(super) fn expand(op: Op, operand: &str) -> Result<Vec<Constraint>, ValidationError> {
    let wildcard = match Operand::classify(operand)? {
        Operand::Any => return Ok(Vec::new()),
        Operand::Exact(version) => return Ok(vec![Constraint::new(op, Version::parse(version)?)]),
        Operand::Partial(wildcard) => wildcard,
    };

    let floor = wildcard.floor();
    let Some(ceiling) = wildcard.ceiling() else {
        error::fatal!(operand => operand, Reason::WildcardOverflow);
    };

    let expanded = match op {
        Op::Equal => vec![Constraint::GreaterOrEqual(floor), Constraint::Less(ceiling)],
        Op::NotEqual => vec![Constraint::Less(floor), Constraint::GreaterOrEqual(ceiling)],
        Op::GreaterOrEqual => vec![Constraint::GreaterOrEqual(floor)],
        Op::Greater => vec![Constraint::GreaterOrEqual(ceiling)],
        Op::LessOrEqual => vec![Constraint::Less(ceiling)],
        Op::Less => vec![Constraint::Less(floor)],
    };
    debug!(%op, operand, ?expanded, "expanded wildcard");
    Ok(expanded)
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "*")
}
