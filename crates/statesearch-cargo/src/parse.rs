use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use crate::domain::{CargoProblem, Fact};
use crate::error::ParseError;

const PLANES: &str = "PLANES:";
const AIRPORTS: &str = "AIRPORTS:";
const CARGOES: &str = "CARGOES:";
const INITIAL_STATE: &str = "INITIAL_STATE:";
const GOAL_STATE: &str = "GOAL_STATE:";

impl CargoProblem {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

/// Reads the line-oriented problem format:
///
/// ```text
/// PLANES: P1 P2
/// AIRPORTS: SFO JFK
/// CARGOES: C1 C2
/// INITIAL_STATE: AT(C1,SFO) AT(C2,JFK) AT(P1,SFO) AT(P2,JFK)
/// GOAL_STATE: AT(C1,JFK) AT(C2,SFO)
/// ```
///
/// Lines starting with anything else are ignored. A repeated section replaces the earlier one.
impl FromStr for CargoProblem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut planes = None;
        let mut airports = None;
        let mut cargoes = None;
        let mut initial = None;
        let mut goal = None;

        for line in s.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix(PLANES) {
                planes = Some(objects(rest));
            } else if let Some(rest) = line.strip_prefix(AIRPORTS) {
                airports = Some(objects(rest));
            } else if let Some(rest) = line.strip_prefix(CARGOES) {
                cargoes = Some(objects(rest));
            } else if let Some(rest) = line.strip_prefix(INITIAL_STATE) {
                initial = Some(facts(rest)?);
            } else if let Some(rest) = line.strip_prefix(GOAL_STATE) {
                goal = Some(facts(rest)?);
            }
        }

        let problem = CargoProblem::new(
            planes.ok_or(ParseError::MissingSection(PLANES))?,
            airports.ok_or(ParseError::MissingSection(AIRPORTS))?,
            cargoes.ok_or(ParseError::MissingSection(CARGOES))?,
            initial.ok_or(ParseError::MissingSection(INITIAL_STATE))?,
            goal.ok_or(ParseError::MissingSection(GOAL_STATE))?,
        )?;
        tracing::debug!(
            planes = problem.planes().len(),
            airports = problem.airports().len(),
            cargoes = problem.cargoes().len(),
            "parsed cargo problem"
        );
        Ok(problem)
    }
}

fn objects(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

fn facts(line: &str) -> Result<Vec<Fact>, ParseError> {
    line.split_inclusive(')')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(fact)
        .collect()
}

fn fact(text: &str) -> Result<Fact, ParseError> {
    let malformed = || ParseError::MalformedFact(text.to_owned());
    let (predicate, args) = text.split_once('(').ok_or_else(malformed)?;
    let args = args.strip_suffix(')').ok_or_else(malformed)?;
    let (first, second) = args.split_once(',').ok_or_else(malformed)?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() || second.contains(',') {
        return Err(malformed());
    }
    match predicate.trim().to_ascii_uppercase().as_str() {
        "AT" => Ok(Fact::at(first, second)),
        "IN" => Ok(Fact::inside(first, second)),
        _ => Err(malformed()),
    }
}

/// Writes the problem back in the format [`FromStr`] reads.
impl Display for CargoProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{PLANES} {}", self.planes().join(" "))?;
        writeln!(f, "{AIRPORTS} {}", self.airports().join(" "))?;
        writeln!(f, "{CARGOES} {}", self.cargoes().join(" "))?;
        write!(f, "{INITIAL_STATE}")?;
        for fact in self.initial() {
            write!(f, " {}", FactText(fact))?;
        }
        writeln!(f)?;
        write!(f, "{GOAL_STATE}")?;
        for fact in self.goal() {
            write!(f, " {}", FactText(fact))?;
        }
        writeln!(f)
    }
}

struct FactText<'a>(&'a Fact);

impl Display for FactText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Fact::At { object, airport } => write!(f, "AT({object},{airport})"),
            Fact::In { cargo, plane } => write!(f, "IN({cargo},{plane})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    const TWO_CARGOES: &str = "\
PLANES: P1 P2
AIRPORTS: SFO JFK
CARGOES: C1 C2
INITIAL_STATE: AT(C1,SFO) AT(C2, JFK) at(P1,SFO) AT(P2,JFK)
GOAL_STATE: AT(C1,JFK) AT(C2,SFO)
";

    #[test]
    fn parses_sections_and_facts() {
        let problem: CargoProblem = TWO_CARGOES.parse().unwrap();
        assert_eq!(problem.planes(), ["P1", "P2"]);
        assert_eq!(problem.airports(), ["SFO", "JFK"]);
        assert_eq!(problem.cargoes(), ["C1", "C2"]);
        assert_eq!(
            problem.initial(),
            [
                Fact::at("C1", "SFO"),
                Fact::at("C2", "JFK"),
                Fact::at("P1", "SFO"),
                Fact::at("P2", "JFK"),
            ]
        );
        assert_eq!(problem.goal(), [Fact::at("C1", "JFK"), Fact::at("C2", "SFO")]);
    }

    #[test]
    fn display_is_read_back_unchanged() {
        let problem: CargoProblem = TWO_CARGOES.parse().unwrap();
        let reparsed: CargoProblem = problem.to_string().parse().unwrap();
        assert_eq!(reparsed, problem);
    }

    #[test]
    fn loaded_cargo_is_accepted() {
        let text = TWO_CARGOES.replace("AT(C2, JFK)", "IN(C2,P2)");
        let problem: CargoProblem = text.parse().unwrap();
        assert!(problem.initial().contains(&Fact::inside("C2", "P2")));
    }

    #[test]
    fn missing_sections_are_reported() {
        let text = TWO_CARGOES.replace("GOAL_STATE:", "# GOAL_STATE:");
        assert!(matches!(
            text.parse::<CargoProblem>(),
            Err(ParseError::MissingSection("GOAL_STATE:"))
        ));
    }

    #[test]
    fn malformed_facts_are_reported() {
        for bad in ["AT(C1)", "ON(C1,SFO)", "AT(C1,SFO,JFK)", "AT C1"] {
            let text = TWO_CARGOES.replace("AT(C1,JFK)", bad);
            assert!(
                matches!(text.parse::<CargoProblem>(), Err(ParseError::MalformedFact(_))),
                "{bad} was accepted"
            );
        }
    }

    #[test]
    fn domain_errors_pass_through() {
        let text = TWO_CARGOES.replace("AT(C1,JFK)", "AT(C3,JFK)");
        assert!(matches!(
            text.parse::<CargoProblem>(),
            Err(ParseError::Domain(DomainError::UnknownObject(name))) if name == "C3"
        ));
    }
}
