use std::fmt::{Display, Formatter};
use std::sync::Arc;

use ahash::AHashMap;
use statesearch_core::{ActionCatalog, GroundAction, Literal};
use statesearch_graphplan::{GraphConfig, Heuristic, StripsProblem, StripsState};

use crate::error::DomainError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Plane,
    Airport,
    Cargo,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Kind::Plane => "plane",
            Kind::Airport => "airport",
            Kind::Cargo => "cargo",
        })
    }
}

/// A ground fluent of the cargo world.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fact {
    /// A plane or a cargo standing at an airport.
    At { object: String, airport: String },
    /// A cargo loaded in a plane.
    In { cargo: String, plane: String },
}

impl Fact {
    pub fn at(object: impl Into<String>, airport: impl Into<String>) -> Self {
        Fact::At {
            object: object.into(),
            airport: airport.into(),
        }
    }

    pub fn inside(cargo: impl Into<String>, plane: impl Into<String>) -> Self {
        Fact::In {
            cargo: cargo.into(),
            plane: plane.into(),
        }
    }

    /// The object whose location the fact describes.
    pub fn subject(&self) -> &str {
        match self {
            Fact::At { object, .. } => object,
            Fact::In { cargo, .. } => cargo,
        }
    }

    pub fn literal(&self) -> Literal {
        Literal::positive(self.to_string())
    }
}

impl Display for Fact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Fact::At { object, airport } => write!(f, "At({object},{airport})"),
            Fact::In { cargo, plane } => write!(f, "In({cargo},{plane})"),
        }
    }
}

/// An air-cargo instance: the objects, where they start and where the cargo must end up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CargoProblem {
    planes: Vec<String>,
    airports: Vec<String>,
    cargoes: Vec<String>,
    initial: Vec<Fact>,
    goal: Vec<Fact>,
}

impl CargoProblem {
    /// Checks that every fact names declared objects of the right kind, that every plane
    /// starts at exactly one airport and every cargo at exactly one airport or plane.
    pub fn new(
        planes: Vec<String>,
        airports: Vec<String>,
        cargoes: Vec<String>,
        initial: Vec<Fact>,
        goal: Vec<Fact>,
    ) -> Result<Self, DomainError> {
        if airports.is_empty() {
            return Err(DomainError::NoAirports);
        }

        let mut kinds = AHashMap::new();
        for (names, kind) in [
            (&planes, Kind::Plane),
            (&airports, Kind::Airport),
            (&cargoes, Kind::Cargo),
        ] {
            for name in names {
                if kinds.insert(name.as_str(), kind).is_some() {
                    return Err(DomainError::DuplicateObject(name.clone()));
                }
            }
        }

        let check = |name: &str, expected: &[Kind]| -> Result<(), DomainError> {
            match kinds.get(name) {
                None => Err(DomainError::UnknownObject(name.to_owned())),
                Some(actual) if !expected.contains(actual) => Err(DomainError::WrongKind {
                    name: name.to_owned(),
                    expected: expected[0],
                    actual: *actual,
                }),
                Some(_) => Ok(()),
            }
        };
        for fact in initial.iter().chain(&goal) {
            match fact {
                Fact::At { object, airport } => {
                    check(object, &[Kind::Cargo, Kind::Plane])?;
                    check(airport, &[Kind::Airport])?;
                }
                Fact::In { cargo, plane } => {
                    check(cargo, &[Kind::Cargo])?;
                    check(plane, &[Kind::Plane])?;
                }
            }
        }

        let mut placements: AHashMap<&str, usize> = AHashMap::new();
        for fact in &initial {
            *placements.entry(fact.subject()).or_default() += 1;
        }
        for plane in &planes {
            match placements.get(plane.as_str()) {
                None => return Err(DomainError::UnplacedPlane(plane.clone())),
                Some(&n) if n > 1 => return Err(DomainError::PlanePlacedTwice(plane.clone())),
                Some(_) => {}
            }
        }
        for cargo in &cargoes {
            match placements.get(cargo.as_str()) {
                None => return Err(DomainError::UnplacedCargo(cargo.clone())),
                Some(&n) if n > 1 => return Err(DomainError::CargoPlacedTwice(cargo.clone())),
                Some(_) => {}
            }
        }

        Ok(CargoProblem {
            planes,
            airports,
            cargoes,
            initial,
            goal,
        })
    }

    pub fn planes(&self) -> &[String] {
        &self.planes
    }

    pub fn airports(&self) -> &[String] {
        &self.airports
    }

    pub fn cargoes(&self) -> &[String] {
        &self.cargoes
    }

    pub fn initial(&self) -> &[Fact] {
        &self.initial
    }

    pub fn goal(&self) -> &[Fact] {
        &self.goal
    }

    /// Every fluent of the world, as positive literals.
    pub fn atoms(&self) -> Vec<Literal> {
        let mut atoms = vec![];
        for airport in &self.airports {
            for object in self.planes.iter().chain(&self.cargoes) {
                atoms.push(Fact::at(object, airport).literal());
            }
        }
        for cargo in &self.cargoes {
            for plane in &self.planes {
                atoms.push(Fact::inside(cargo, plane).literal());
            }
        }
        atoms
    }

    /// Grounds Load, Unload and Fly over all objects. Every action costs 1.
    pub fn catalog(&self) -> ActionCatalog {
        let mut actions = vec![];
        for cargo in &self.cargoes {
            for plane in &self.planes {
                for airport in &self.airports {
                    let cargo_at = Fact::at(cargo, airport).literal();
                    let plane_at = Fact::at(plane, airport).literal();
                    let loaded = Fact::inside(cargo, plane).literal();
                    actions.push(GroundAction::new(
                        format!("Load({cargo},{plane},{airport})"),
                        [cargo_at.clone(), plane_at.clone()],
                        [loaded.clone()],
                        [cargo_at.clone()],
                        1.0,
                    ));
                    actions.push(GroundAction::new(
                        format!("Unload({cargo},{plane},{airport})"),
                        [loaded.clone(), plane_at],
                        [cargo_at],
                        [loaded],
                        1.0,
                    ));
                }
            }
        }
        for plane in &self.planes {
            for from in &self.airports {
                for to in self.airports.iter().filter(|&to| to != from) {
                    let departure = Fact::at(plane, from).literal();
                    actions.push(GroundAction::new(
                        format!("Fly({plane},{from},{to})"),
                        [departure.clone()],
                        [Fact::at(plane, to).literal()],
                        [departure],
                        1.0,
                    ));
                }
            }
        }

        let mut catalog = ActionCatalog::new();
        for action in actions {
            // names are unique because declared objects are
            if let Err(err) = catalog.push(action) {
                unreachable!("{err}");
            }
        }
        catalog
    }

    /// The search state for this instance, with `heuristic` guiding informed strategies.
    pub fn to_strips(
        &self,
        heuristic: Heuristic,
        graph_config: GraphConfig,
    ) -> (Arc<StripsProblem>, StripsState) {
        let (problem, initial) = StripsProblem::new(
            self.catalog(),
            self.atoms(),
            self.initial.iter().map(Fact::literal),
            self.goal.iter().map(Fact::literal),
            heuristic,
            graph_config,
        );
        tracing::debug!(
            atoms = problem.atoms().len(),
            actions = problem.catalog().len(),
            goals = problem.goals().len(),
            "grounded cargo problem"
        );
        (problem, initial)
    }
}
