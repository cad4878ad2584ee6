use covalence_core::EngineConfig;
use covalence_lib::{Lab, Orchestrator, Scenario};

fn orchestrator(seed: u64) -> Orchestrator {
    Orchestrator::new(
        Lab::new(EngineConfig {
            seed: Some(seed),
            ..Default::default()
        })
        .expect("default config is valid"),
    )
}

#[test]
fn test_full_run_produces_every_report() {
    let mut orchestrator = orchestrator(11);
    let summary = orchestrator.run(Scenario::All, 4).unwrap();
    assert_eq!(summary.reports.len(), 4);
    assert_eq!(summary.reports[2].maintenance.len(), 4);
    assert_eq!(summary.reports[3].dynamics.len(), 4);
    assert!(summary.snapshot.bonds.total_formed > 0);
    assert!(summary.snapshot.counters.contains_key("clusters_assembled"));

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"scenario\":\"water\""));
}

#[test]
fn test_stress_restores_environment() {
    let mut orchestrator = orchestrator(2);
    orchestrator.run(Scenario::Stress, 6).unwrap();
    assert_eq!(
        orchestrator.lab().bonds.environment().temperature,
        298.15
    );
}

#[test]
fn test_ids_are_opaque_uuids() {
    let orchestrator = orchestrator(1);
    let cluster = orchestrator
        .assemble(&["C", "O"], &covalence_core::Topology::Chain)
        .unwrap()
        .unwrap();
    for id in &cluster.components {
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}

#[test]
fn test_zero_rounds_is_a_no_op() {
    let mut orchestrator = orchestrator(1);
    let summary = orchestrator.run(Scenario::All, 0).unwrap();
    assert_eq!(summary.snapshot.bonds.total_formed, 0);
    assert_eq!(summary.snapshot.clusters.active, 0);
}
