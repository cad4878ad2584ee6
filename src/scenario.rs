//! Scripted workloads that drive the engines the way an application would.
//!
//! The [`Orchestrator`] stands in for the application layer: it mints opaque
//! component ids (random uuids the engines never interpret) and issues bond
//! and cluster requests against a shared [`Lab`].

use covalence_core::lab::LabSnapshot;
use covalence_core::{DynamicsReport, Lab, Topology};
use covalence_data::{BondId, Cluster, Environment, Identifier, MaintenanceReport, StressKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use uuid::Uuid;

const STRESS_KINDS: [StressKind; 4] = [
    StressKind::Mechanical,
    StressKind::Thermal,
    StressKind::Chemical,
    StressKind::Radiation,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Water clusters and an affinity search among them
    Water,
    /// Pairs of C-O clusters merged by an iron catalyst
    Reaction,
    /// Bonds under random stress, heating, and maintenance sweeps
    Stress,
    /// Cluster dynamics across a rising temperature ramp
    Dynamics,
    /// Every scenario above, in order
    All,
}

impl Scenario {
    fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![
                Scenario::Water,
                Scenario::Reaction,
                Scenario::Stress,
                Scenario::Dynamics,
            ],
            other => vec![other],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub rounds: usize,
    pub clusters_assembled: usize,
    pub reactions_attempted: usize,
    pub reaction_products: usize,
    pub bonds_survived: usize,
    pub best_affinity: Option<f64>,
    pub maintenance: Vec<MaintenanceReport>,
    pub dynamics: Vec<DynamicsReport>,
}

impl ScenarioReport {
    fn new(scenario: Scenario, rounds: usize) -> Self {
        Self {
            scenario,
            rounds,
            clusters_assembled: 0,
            reactions_attempted: 0,
            reaction_products: 0,
            bonds_survived: 0,
            best_affinity: None,
            maintenance: Vec::new(),
            dynamics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reports: Vec<ScenarioReport>,
    pub snapshot: LabSnapshot,
}

pub struct Orchestrator {
    lab: Lab,
    rng: ChaCha8Rng,
}

fn symbols(list: &[&str]) -> Vec<Identifier> {
    list.iter().map(|s| Identifier::symbol(*s)).collect()
}

fn new_ids(n: usize) -> Vec<String> {
    (0..n).map(|_| Uuid::new_v4().to_string()).collect()
}

impl Orchestrator {
    pub fn new(lab: Lab) -> Self {
        let rng = match lab.config().seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(2);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        };
        Self { lab, rng }
    }

    #[must_use]
    pub fn lab(&self) -> &Lab {
        &self.lab
    }

    /// Assembles fresh component instances of the given profile symbols.
    pub fn assemble(&self, members: &[&str], topology: &Topology) -> anyhow::Result<Option<Cluster>> {
        let ids = new_ids(members.len());
        Ok(self.lab.clusters.assemble(&ids, &symbols(members), topology)?)
    }

    pub fn run(&mut self, scenario: Scenario, rounds: usize) -> anyhow::Result<RunSummary> {
        let mut reports = Vec::new();
        for scenario in scenario.expand() {
            tracing::info!(?scenario, rounds, "Running scenario");
            let report = match scenario {
                Scenario::Water => self.water(rounds)?,
                Scenario::Reaction => self.reaction(rounds)?,
                Scenario::Stress => self.stress(rounds),
                Scenario::Dynamics => self.dynamics(rounds)?,
                Scenario::All => continue,
            };
            reports.push(report);
        }
        Ok(RunSummary {
            reports,
            snapshot: self.lab.snapshot(),
        })
    }

    fn water(&mut self, rounds: usize) -> anyhow::Result<ScenarioReport> {
        let mut report = ScenarioReport::new(Scenario::Water, rounds);
        let water = Topology::template("water");
        let mut first = None;
        for _ in 0..rounds {
            if let Some(cluster) = self.assemble(&["O", "H", "H"], &water)? {
                report.clusters_assembled += 1;
                first.get_or_insert(cluster.id);
            }
        }
        if let Some(id) = first {
            report.best_affinity = self
                .lab
                .clusters
                .find_compatible(id)
                .first()
                .map(|(_, affinity)| *affinity);
        }
        Ok(report)
    }

    fn reaction(&mut self, rounds: usize) -> anyhow::Result<ScenarioReport> {
        let mut report = ScenarioReport::new(Scenario::Reaction, rounds);
        let iron = Identifier::symbol("Fe");
        for _ in 0..rounds {
            let a = self.assemble(&["C", "O"], &Topology::Chain)?;
            let b = self.assemble(&["C", "O"], &Topology::Chain)?;
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            report.clusters_assembled += 2;
            report.reactions_attempted += 1;
            let catalyst = Uuid::new_v4().to_string();
            if self
                .lab
                .clusters
                .catalyze_reaction(&[a.id, b.id], &catalyst, &iron, None)
                .is_some()
            {
                report.reaction_products += 1;
            }
        }
        Ok(report)
    }

    fn stress(&mut self, rounds: usize) -> ScenarioReport {
        let mut report = ScenarioReport::new(Scenario::Stress, rounds);
        let bonds = &self.lab.bonds;
        let (carbon, oxygen) = (Identifier::symbol("C"), Identifier::symbol("O"));

        let ids: Vec<BondId> = (0..rounds)
            .filter_map(|_| {
                let pair = new_ids(2);
                bonds
                    .form_bond(&pair[0], &carbon, &pair[1], &oxygen, None)
                    .map(|b| b.id)
            })
            .collect();

        for round in 0..rounds {
            for id in &ids {
                let amount = self.rng.gen_range(0.0..0.3);
                let kind = STRESS_KINDS[self.rng.gen_range(0..STRESS_KINDS.len())];
                bonds.apply_stress(*id, amount, kind);
            }
            let temperature = Environment::STANDARD_TEMPERATURE + round as f64 * 25.0;
            bonds.update_environment(Some(temperature), None, None);
            report.maintenance.push(bonds.maintain());
        }
        report.bonds_survived = ids.iter().filter(|id| bonds.get_bond(**id).is_some()).count();
        bonds.update_environment(Some(Environment::STANDARD_TEMPERATURE), None, None);
        report
    }

    fn dynamics(&mut self, rounds: usize) -> anyhow::Result<ScenarioReport> {
        let mut report = ScenarioReport::new(Scenario::Dynamics, rounds);
        let water = Topology::template("water");
        for _ in 0..rounds {
            if self.assemble(&["H", "C", "C", "H"], &Topology::Chain)?.is_some() {
                report.clusters_assembled += 1;
            }
            if self.assemble(&["O", "H", "H"], &water)?.is_some() {
                report.clusters_assembled += 1;
            }
        }
        for round in 0..rounds {
            let temperature = Environment::STANDARD_TEMPERATURE + round as f64 * 150.0;
            report
                .dynamics
                .push(self.lab.clusters.simulate_dynamics(5, temperature));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covalence_core::EngineConfig;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Lab::new(EngineConfig {
                seed: Some(5),
                ..Default::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_all_expands_in_order() {
        assert_eq!(Scenario::All.expand().len(), 4);
        assert_eq!(Scenario::Water.expand(), vec![Scenario::Water]);
    }

    #[test]
    fn test_water_scenario() {
        let mut orchestrator = orchestrator();
        let summary = orchestrator.run(Scenario::Water, 3).unwrap();
        assert_eq!(summary.reports[0].clusters_assembled, 3);
        assert!(summary.reports[0].best_affinity.is_some());
        assert_eq!(summary.snapshot.clusters.active, 3);
    }

    #[test]
    fn test_reaction_scenario() {
        let mut orchestrator = orchestrator();
        let summary = orchestrator.run(Scenario::Reaction, 2).unwrap();
        let report = &summary.reports[0];
        assert_eq!(report.reactions_attempted, 2);
        assert_eq!(report.reaction_products, 2);
        assert_eq!(summary.snapshot.clusters.reactions_succeeded, 2);
        assert_eq!(summary.snapshot.clusters.active, 2);
    }
}
