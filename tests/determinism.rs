mod common;

use common::{sym, types, LabBuilder};
use covalence_core::Topology;
use covalence_data::StressKind;

fn stress_outcomes(seed: u64) -> Vec<bool> {
    let lab = LabBuilder::new().with_seed(seed).build();
    (0..40)
        .map(|i| {
            let bond = lab
                .bonds
                .form_bond(&format!("a{i}"), &sym("C"), &format!("b{i}"), &sym("C"), None)
                .unwrap();
            // 8.8 * 0.25 = 2.2 sits inside the breakpoint band.
            lab.bonds.apply_stress(bond.id, 0.75, StressKind::Radiation)
        })
        .collect()
}

#[test]
fn test_same_seed_same_breaks() {
    assert_eq!(stress_outcomes(7), stress_outcomes(7));
}

#[test]
fn test_breakpoint_is_randomized() {
    let outcomes = stress_outcomes(7);
    assert!(outcomes.iter().any(|s| *s));
    assert!(outcomes.iter().any(|s| !*s));
}

#[test]
fn test_without_jitter_breakpoint_is_fixed() {
    let lab = LabBuilder::new()
        .with_config(|c| c.bonds.breakpoint_jitter = 0.0)
        .build();
    for i in 0..10 {
        let bond = lab
            .bonds
            .form_bond(&format!("a{i}"), &sym("C"), &format!("b{i}"), &sym("C"), None)
            .unwrap();
        assert!(lab.bonds.apply_stress(bond.id, 0.75, StressKind::Thermal));
    }
}

#[test]
fn test_dynamics_reproducible() {
    let run = |seed: u64| {
        let lab = LabBuilder::new().with_seed(seed).build();
        for i in 0..5 {
            let ids = [format!("o{i}"), format!("ha{i}"), format!("hb{i}")];
            lab.clusters
                .assemble(&ids, &types(&["O", "H", "H"]), &Topology::template("water"))
                .unwrap();
        }
        let report = lab.clusters.simulate_dynamics(10, 900.0);
        (report, lab.clusters.get_statistics())
    };
    let (first, first_stats) = run(3);
    let (second, second_stats) = run(3);
    assert_eq!(first, second);
    assert_eq!(first_stats, second_stats);
}
