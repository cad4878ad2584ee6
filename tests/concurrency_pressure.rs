mod common;

use common::{sym, types, LabBuilder};
use covalence_core::Topology;
use covalence_data::StressKind;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_parallel_bond_traffic_keeps_indices_consistent() {
    let lab = Arc::new(LabBuilder::new().build());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let lab = lab.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let a = format!("t{t}-a{i}");
                    let b = format!("t{t}-b{i}");
                    if let Some(bond) = lab.bonds.form_bond(&a, &sym("C"), &b, &sym("O"), None) {
                        lab.bonds.apply_stress(bond.id, 0.1, StressKind::Mechanical);
                        if i % 2 == 0 {
                            lab.bonds.break_bond(bond.id, true);
                        }
                    }
                    if i % 50 == 0 {
                        lab.bonds.maintain();
                        lab.bonds.get_statistics();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let active = lab.bonds.active_bonds();
    let mut seen = HashSet::new();
    for bond in &active {
        assert!(seen.insert(bond.id), "duplicate bond handle");
        assert_eq!(lab.bonds.get_bonds_for_component(&bond.component_a).len(), 1);
        assert_eq!(lab.bonds.get_bonds_for_component(&bond.component_b).len(), 1);
    }
    let stats = lab.bonds.get_statistics();
    assert_eq!(stats.total_formed, 1600);
    assert_eq!(stats.active as u64, stats.total_formed - stats.total_broken);
}

#[test]
fn test_racing_assemblies_never_share_members() {
    let lab = Arc::new(LabBuilder::new().build());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let lab = lab.clone();
            thread::spawn(move || {
                let mut won = Vec::new();
                for i in 0..25 {
                    // Neighbouring threads fight over the shared middle member.
                    let ids = [format!("left-{t}-{i}"), format!("shared-{}", i), format!("right-{t}-{i}")];
                    if let Ok(Some(cluster)) =
                        lab.clusters
                            .assemble(&ids, &types(&["C", "C", "C"]), &Topology::Chain)
                    {
                        won.push(cluster.id);
                    }
                }
                won
            })
        })
        .collect();
    let mut total = 0;
    for handle in handles {
        total += handle.join().expect("worker panicked").len();
    }

    assert_eq!(total, 25);
    let mut owners = HashSet::new();
    for cluster in lab.clusters.clusters() {
        for member in &cluster.components {
            assert!(owners.insert(member.clone()), "{member} is in two clusters");
            assert_eq!(lab.clusters.cluster_of(member), Some(cluster.id));
        }
    }
}

#[test]
fn test_dynamics_alongside_assembly() {
    let lab = Arc::new(LabBuilder::new().build());
    let builder = {
        let lab = lab.clone();
        thread::spawn(move || {
            for i in 0..50 {
                let ids = [format!("o{i}"), format!("ha{i}"), format!("hb{i}")];
                let _ = lab.clusters.assemble(
                    &ids,
                    &types(&["O", "H", "H"]),
                    &Topology::template("water"),
                );
            }
        })
    };
    let simulator = {
        let lab = lab.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                lab.clusters.simulate_dynamics(2, 600.0);
            }
        })
    };
    builder.join().expect("builder panicked");
    simulator.join().expect("simulator panicked");

    for cluster in lab.clusters.clusters() {
        assert!((0.0..=10.0).contains(&cluster.stability));
        for bond in &cluster.bonds {
            assert!(lab.bonds.get_bond(*bond).is_some());
        }
    }
}
