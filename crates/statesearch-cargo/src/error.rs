use thiserror::Error;

use crate::domain::Kind;

/// A problem description that is well formed but does not describe a valid cargo world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown object {0}")]
    UnknownObject(String),
    #[error("object {0} is declared more than once")]
    DuplicateObject(String),
    #[error("{name} is a {actual}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: Kind,
        actual: Kind,
    },
    #[error("plane {0} has no initial location")]
    UnplacedPlane(String),
    #[error("plane {0} is placed more than once")]
    PlanePlacedTwice(String),
    #[error("cargo {0} has no initial location")]
    UnplacedCargo(String),
    #[error("cargo {0} is placed more than once")]
    CargoPlacedTwice(String),
    #[error("a cargo world needs at least one airport")]
    NoAirports,
}

/// Failure to read a problem from its text form.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read problem file")]
    Io(#[from] std::io::Error),
    #[error("missing {0} section")]
    MissingSection(&'static str),
    #[error("malformed fact {0:?}")]
    MalformedFact(String),
    #[error("malformed instance size {0:?}, expected planes,airports,cargoes")]
    MalformedSize(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
