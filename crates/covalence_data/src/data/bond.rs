use super::environment::Environment;
use super::profile::BondKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a relationship.
///
/// Handles are generational: once a bond is broken its handle never resolves
/// again, even if the underlying slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BondId(pub u64);

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bond-{:x}", self.0)
    }
}

/// Lifecycle of a relationship. `Broken` is terminal; broken bonds only exist
/// in the history buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BondState {
    Forming,
    Stable,
    Strained,
    Breaking,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressKind {
    Mechanical,
    Thermal,
    Chemical,
    Radiation,
}

/// A weighted, stateful edge between two component instances.
///
/// The engine only stores the component ids; it never owns the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: BondId,
    pub component_a: String,
    pub component_b: String,
    /// Profile symbols of the two endpoints.
    pub symbol_a: String,
    pub symbol_b: String,
    pub kind: BondKind,
    /// In [0, 10].
    pub strength: f64,
    pub length: f64,
    pub formation_energy: f64,
    pub state: BondState,
    /// In [0, 1].
    pub stress: f64,
    /// Last computed stability in [0, 10].
    pub stability: f64,
    pub environment: Environment,
    pub activation_count: u32,
    pub failure_count: u32,
    pub last_stress: Option<StressKind>,
    /// Symbol of the catalyst profile, if one was used.
    pub catalyst: Option<String>,
    pub catalyzed: bool,
}

