use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::domain::{CargoProblem, Fact};
use crate::error::{DomainError, ParseError};

/// Object counts of a generated instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceSize {
    pub planes: usize,
    pub airports: usize,
    pub cargoes: usize,
}

impl FromStr for InstanceSize {
    type Err = ParseError;

    /// Parses `planes,airports,cargoes`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::MalformedSize(s.to_owned());
        let counts: Vec<usize> = s
            .split(',')
            .map(|n| n.trim().parse().map_err(|_| malformed()))
            .collect::<Result<_, _>>()?;
        match counts.as_slice() {
            &[planes, airports, cargoes] => Ok(InstanceSize {
                planes,
                airports,
                cargoes,
            }),
            _ => Err(malformed()),
        }
    }
}

impl Display for InstanceSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.planes, self.airports, self.cargoes)
    }
}

/// Generates an instance with objects `P1..`, `A1..` and `C1..`. Planes and cargoes start at
/// uniformly chosen airports; each cargo must end at a different airport than it starts at
/// whenever there is more than one.
pub fn generate(size: InstanceSize, seed: u64) -> Result<CargoProblem, DomainError> {
    if size.airports == 0 {
        return Err(DomainError::NoAirports);
    }
    let mut rng = Pcg64::seed_from_u64(seed);

    let named = |prefix: &str, n: usize| -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    };
    let planes = named("P", size.planes);
    let airports = named("A", size.airports);
    let cargoes = named("C", size.cargoes);

    let mut initial = vec![];
    let mut goal = vec![];
    for plane in &planes {
        let airport = &airports[rng.gen_range(0..airports.len())];
        initial.push(Fact::at(plane, airport));
    }
    for cargo in &cargoes {
        let start = rng.gen_range(0..airports.len());
        let mut end = rng.gen_range(0..airports.len());
        if airports.len() > 1 {
            while end == start {
                end = rng.gen_range(0..airports.len());
            }
        }
        initial.push(Fact::at(cargo, &airports[start]));
        goal.push(Fact::at(cargo, &airports[end]));
    }

    tracing::debug!(%size, seed, "generated cargo problem");
    CargoProblem::new(planes, airports, cargoes, initial, goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_parse() {
        assert_eq!(
            "2, 3,4".parse::<InstanceSize>().unwrap(),
            InstanceSize {
                planes: 2,
                airports: 3,
                cargoes: 4
            }
        );
        assert!(matches!(
            "2,3".parse::<InstanceSize>(),
            Err(ParseError::MalformedSize(_))
        ));
        assert!(matches!(
            "2,x,1".parse::<InstanceSize>(),
            Err(ParseError::MalformedSize(_))
        ));
    }

    #[test]
    fn same_seed_same_instance() {
        let size = InstanceSize {
            planes: 2,
            airports: 4,
            cargoes: 3,
        };
        assert_eq!(generate(size, 7).unwrap(), generate(size, 7).unwrap());
    }

    #[test]
    fn cargo_must_move() {
        let size = InstanceSize {
            planes: 1,
            airports: 2,
            cargoes: 5,
        };
        for seed in 0..20 {
            let problem = generate(size, seed).unwrap();
            assert_eq!(problem.initial().len(), 6);
            for goal in problem.goal() {
                assert!(!problem.initial().contains(goal));
            }
        }
    }

    #[test]
    fn needs_an_airport() {
        let size = InstanceSize {
            planes: 1,
            airports: 0,
            cargoes: 1,
        };
        assert_eq!(generate(size, 0), Err(DomainError::NoAirports));
    }
}
