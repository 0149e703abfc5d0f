use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Prefix marking a negated literal.
pub const NEGATION_MARKER: char = '!';

/// A ground literal identified by its canonical name.
///
/// Polarity is carried by the name itself: `!p` is the negation of `p`. Repeated markers are
/// collapsed on construction, so `!!p` and `p` are the same literal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Literal {
    name: Arc<str>,
}

impl Literal {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        let atom = name.trim_start_matches(NEGATION_MARKER);
        let markers = name.len() - atom.len();
        if markers % 2 == 0 {
            Literal { name: atom.into() }
        } else {
            Literal {
                name: format!("{NEGATION_MARKER}{atom}").into(),
            }
        }
    }

    /// The positive literal for `atom`.
    pub fn positive(atom: impl AsRef<str>) -> Self {
        Literal::new(atom).atom()
    }

    /// The negative literal for `atom`.
    pub fn negative(atom: impl AsRef<str>) -> Self {
        Literal::positive(atom).negate()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_negative(&self) -> bool {
        self.name.starts_with(NEGATION_MARKER)
    }

    pub fn is_positive(&self) -> bool {
        !self.is_negative()
    }

    /// Name of the underlying atom, without the negation marker.
    pub fn atom_name(&self) -> &str {
        self.name.strip_prefix(NEGATION_MARKER).unwrap_or(&self.name)
    }

    /// The positive form of this literal.
    pub fn atom(&self) -> Literal {
        if self.is_negative() {
            Literal {
                name: self.atom_name().into(),
            }
        } else {
            self.clone()
        }
    }

    pub fn negate(&self) -> Literal {
        if self.is_negative() {
            self.atom()
        } else {
            Literal {
                name: format!("{NEGATION_MARKER}{}", self.name).into(),
            }
        }
    }

    pub fn is_opposite_of(&self, other: &Literal) -> bool {
        self.is_negative() != other.is_negative() && self.atom_name() == other.atom_name()
    }
}

impl std::ops::Not for &Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        self.negate()
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        self.negate()
    }
}

impl From<&str> for Literal {
    fn from(name: &str) -> Self {
        Literal::new(name)
    }
}

impl From<String> for Literal {
    fn from(name: String) -> Self {
        Literal::new(name)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_toggles_prefix() {
        let p = Literal::new("At(C1,SFO)");
        let not_p = p.negate();
        assert_eq!(not_p.name(), "!At(C1,SFO)");
        assert_eq!(not_p.negate(), p);
        assert!(p.is_opposite_of(&not_p));
        assert!(not_p.is_opposite_of(&p));
        assert!(!p.is_opposite_of(&p));
    }

    #[test]
    fn repeated_markers_are_canonicalised() {
        assert_eq!(Literal::new("!!p"), Literal::new("p"));
        assert_eq!(Literal::new("!!!p"), Literal::new("!p"));
        assert_eq!(Literal::negative("!p"), Literal::new("!p"));
        assert_eq!(Literal::positive("!p"), Literal::new("p"));
    }

    #[test]
    fn atoms_share_names_across_polarity() {
        let not_p = Literal::new("!p");
        assert_eq!(not_p.atom_name(), "p");
        assert_eq!(not_p.atom(), Literal::new("p"));
        assert!(!(!&not_p).is_negative());
    }
}
