use super::bond::{BondId, BondState};
use super::cluster::{ClusterFunction, ClusterState, Geometry};
use super::environment::Environment;
use super::profile::BondKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate view over the relationship engine.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BondStatistics {
    /// Bonds currently held in the active map.
    pub active: usize,
    /// Broken bonds retained in the history buffer.
    pub archived: usize,
    pub total_formed: u64,
    pub total_broken: u64,
    pub total_refused: u64,
    pub avg_strength: f64,
    pub avg_stability: f64,
    pub avg_stress: f64,
    pub catalyzed: usize,
    pub by_kind: BTreeMap<BondKind, usize>,
    pub by_state: BTreeMap<BondState, usize>,
    pub environment: Environment,
}

/// Aggregate view over the cluster engine.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClusterStatistics {
    pub active: usize,
    pub member_components: usize,
    pub total_assembled: u64,
    pub total_dissociated: u64,
    pub avg_size: f64,
    pub avg_stability: f64,
    pub avg_reactivity: f64,
    pub avg_polarity: f64,
    pub by_geometry: BTreeMap<Geometry, usize>,
    pub by_function: BTreeMap<ClusterFunction, usize>,
    pub by_state: BTreeMap<ClusterState, usize>,
    pub catalytic_sites: usize,
    pub reactions_succeeded: u64,
    pub reactions_failed: u64,
    /// Succeeded / attempted, 0 when no reaction was attempted.
    pub reaction_success_rate: f64,
}

/// Outcome of one maintenance sweep.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MaintenanceReport {
    pub healed: usize,
    pub purged: Vec<BondId>,
    pub spontaneous_breaks: Vec<BondId>,
}

impl MaintenanceReport {
    #[must_use]
    pub fn removed(&self) -> usize {
        self.purged.len() + self.spontaneous_breaks.len()
    }
}
