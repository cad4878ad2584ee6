use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid profile identifier: '{0}'")]
pub struct ParseIdentifierError(String);

/// Hazard classification of a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Toxicity {
    Safe,
    Caution,
    Warning,
    Dangerous,
    Lethal,
}

impl Toxicity {
    /// Dangerous and lethal kinds never take part in a bond.
    #[must_use]
    pub fn is_high(&self) -> bool {
        matches!(self, Toxicity::Dangerous | Toxicity::Lethal)
    }
}

/// Broad family a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    ReactiveLight,
    AlkalineEarth,
    Transition,
    PostTransition,
    Metalloid,
    Structural,
    Halogen,
    Inert,
}

impl Family {
    #[must_use]
    pub fn is_metal_like(&self) -> bool {
        matches!(
            self,
            Family::ReactiveLight
                | Family::AlkalineEarth
                | Family::Transition
                | Family::PostTransition
        )
    }

    /// The only family that may react with `Inert` profiles.
    #[must_use]
    pub fn reacts_with_inert(&self) -> bool {
        matches!(self, Family::Halogen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BondKind {
    Ionic,
    Covalent,
    Metallic,
    Hydrogen,
    VanDerWaals,
    Coordinate,
    Pi,
}

impl BondKind {
    /// Multiplier applied to the summed radii to get the bond length.
    #[must_use]
    pub fn length_factor(&self) -> f64 {
        match self {
            BondKind::Ionic => 1.0,
            BondKind::Covalent => 0.9,
            BondKind::Metallic => 1.1,
            BondKind::Hydrogen => 1.6,
            BondKind::VanDerWaals => 1.8,
            BondKind::Coordinate => 0.95,
            BondKind::Pi => 0.85,
        }
    }
}

/// Static descriptor of a component kind.
///
/// Profiles are created once when the catalog is built and never change
/// afterwards. Numeric properties borrow their scale from the periodic
/// table: `electronegativity` on the Pauling scale, `radius` in picometres,
/// `mass` in daltons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub symbol: String,
    pub number: u8,
    pub electronegativity: f64,
    pub radius: f64,
    pub mass: f64,
    /// Intrinsic stability in [0, 10].
    pub stability: f64,
    /// Reactivity index in [0, 10].
    pub reactivity: f64,
    /// Bio-compatibility in [0, 1].
    pub bio_compatibility: f64,
    pub toxicity: Toxicity,
    pub family: Family,
    pub preferred_bonds: Vec<BondKind>,
    /// Maximum number of simultaneous relationships one instance may hold.
    pub bond_capacity: u8,
    /// Kind of software component this profile stands for.
    pub role: String,
}

/// How a caller names a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    /// Full name, matched case-insensitively ("carbon").
    Name(String),
    /// Chemical-style symbol, matched exactly ("C").
    Symbol(String),
    /// Numeric id ("6").
    Number(u8),
}

impl Identifier {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self::Symbol(symbol.into())
    }
}

impl From<u8> for Identifier {
    fn from(number: u8) -> Self {
        Self::Number(number)
    }
}

impl FromStr for Identifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseIdentifierError(s.to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return s
                .parse::<u8>()
                .map(Identifier::Number)
                .map_err(|_| ParseIdentifierError(s.to_string()));
        }
        let mut chars = s.chars();
        let first = chars.next().unwrap_or_default();
        let rest: Vec<char> = chars.collect();
        let symbol_like = first.is_ascii_uppercase()
            && rest.len() <= 1
            && rest.iter().all(|c| c.is_ascii_lowercase());
        if symbol_like {
            Ok(Identifier::Symbol(s.to_string()))
        } else {
            Ok(Identifier::Name(s.to_string()))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Name(name) => write!(f, "{name}"),
            Identifier::Symbol(symbol) => write!(f, "{symbol}"),
            Identifier::Number(number) => write!(f, "#{number}"),
        }
    }
}
