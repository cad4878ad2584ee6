use super::bond::BondId;
use super::profile::Profile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u64);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster-{:x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Geometry {
    Linear,
    Bent,
    TrigonalPlanar,
    Tetrahedral,
    TrigonalBipyramidal,
    Octahedral,
    PentagonalBipyramidal,
    Complex,
}

impl Geometry {
    /// Classifies a cluster by member count and number of formed edges.
    #[must_use]
    pub fn classify(members: usize, edges: usize) -> Self {
        match members {
            0..=2 => Geometry::Linear,
            3 if edges == 2 => Geometry::Bent,
            3 => Geometry::TrigonalPlanar,
            4 => Geometry::Tetrahedral,
            5 => Geometry::TrigonalBipyramidal,
            6 => Geometry::Octahedral,
            7 => Geometry::PentagonalBipyramidal,
            _ => Geometry::Complex,
        }
    }

    #[must_use]
    pub fn stability_factor(&self) -> f64 {
        match self {
            Geometry::Linear => 1.0,
            Geometry::Bent => 0.95,
            Geometry::TrigonalPlanar => 1.05,
            Geometry::Tetrahedral => 1.1,
            Geometry::TrigonalBipyramidal => 1.0,
            Geometry::Octahedral => 1.05,
            Geometry::PentagonalBipyramidal => 0.95,
            Geometry::Complex => 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterState {
    Stable,
    Reactive,
    Unstable,
}

impl ClusterState {
    #[must_use]
    pub fn from_stability(stability: f64) -> Self {
        if stability >= 6.0 {
            ClusterState::Stable
        } else if stability >= 3.0 {
            ClusterState::Reactive
        } else {
            ClusterState::Unstable
        }
    }
}

/// Primary role a cluster plays in the composed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterFunction {
    Catalytic,
    Transport,
    Signaling,
    Structural,
    Storage,
}

/// A connected group of components and the relationships between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub components: Vec<String>,
    pub profiles: Vec<Profile>,
    pub bonds: Vec<BondId>,
    /// Member index pairs, parallel to `bonds`.
    pub edges: Vec<(usize, usize)>,
    pub formula: String,
    pub weight: f64,
    pub geometry: Geometry,
    pub state: ClusterState,
    pub function: ClusterFunction,
    pub stability: f64,
    pub reactivity: f64,
    pub polarity: f64,
    pub catalytic_sites: Vec<usize>,
    /// Connected pieces of the formed edge set; 1 for a fully joined cluster.
    pub fragments: usize,
    pub template: Option<String>,
    pub catalyst: Option<String>,
    pub affinity_cache: HashMap<ClusterId, f64>,
}

impl Cluster {
    #[must_use]
    pub fn size(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn contains(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_classification() {
        assert_eq!(Geometry::classify(2, 1), Geometry::Linear);
        assert_eq!(Geometry::classify(3, 2), Geometry::Bent);
        assert_eq!(Geometry::classify(3, 3), Geometry::TrigonalPlanar);
        assert_eq!(Geometry::classify(4, 3), Geometry::Tetrahedral);
        assert_eq!(Geometry::classify(5, 4), Geometry::TrigonalBipyramidal);
        assert_eq!(Geometry::classify(6, 5), Geometry::Octahedral);
        assert_eq!(Geometry::classify(7, 6), Geometry::PentagonalBipyramidal);
        assert_eq!(Geometry::classify(12, 11), Geometry::Complex);
    }

    #[test]
    fn test_state_thresholds() {
        assert_eq!(ClusterState::from_stability(6.0), ClusterState::Stable);
        assert_eq!(ClusterState::from_stability(5.99), ClusterState::Reactive);
        assert_eq!(ClusterState::from_stability(2.0), ClusterState::Unstable);
    }
}
