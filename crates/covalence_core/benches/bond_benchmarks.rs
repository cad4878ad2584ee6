use covalence_core::catalog::ProfileCatalog;
use covalence_core::config::BondConfig;
use covalence_core::relationship::RelationshipEngine;
use covalence_data::{Environment, Identifier, StressKind};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn engine() -> RelationshipEngine {
    RelationshipEngine::with_seed(Arc::new(ProfileCatalog::standard()), BondConfig::default(), 42)
}

fn bench_find_compatible(c: &mut Criterion) {
    let catalog = ProfileCatalog::standard();
    let carbon = catalog.by_symbol("C").cloned();

    c.bench_function("catalog_find_compatible_carbon", |b| {
        b.iter(|| {
            let carbon = carbon.as_ref().map(|p| catalog.find_compatible(p).len());
            black_box(carbon)
        })
    });
}

fn bench_form_and_break(c: &mut Criterion) {
    let engine = engine();
    let carbon = Identifier::symbol("C");
    let oxygen = Identifier::symbol("O");

    c.bench_function("bond_form_break_pair", |b| {
        b.iter(|| {
            if let Some(bond) = engine.form_bond("svc-a", &carbon, "svc-b", &oxygen, None) {
                black_box(engine.break_bond(bond.id, true));
            }
        })
    });
}

fn bench_environment_update(c: &mut Criterion) {
    let engine = engine();
    let carbon = Identifier::symbol("C");
    for i in 0..500 {
        engine.form_bond(&format!("a{i}"), &carbon, &format!("b{i}"), &carbon, None);
    }

    c.bench_function("environment_update_500_bonds", |b| {
        let mut hot = false;
        b.iter(|| {
            hot = !hot;
            let t = if hot { 373.15 } else { Environment::STANDARD_TEMPERATURE };
            black_box(engine.update_environment(Some(t), None, None))
        })
    });
}

fn bench_stress_and_maintain(c: &mut Criterion) {
    let engine = engine();
    let carbon = Identifier::symbol("C");
    let ids: Vec<_> = (0..200)
        .filter_map(|i| {
            engine
                .form_bond(&format!("a{i}"), &carbon, &format!("b{i}"), &carbon, None)
                .map(|b| b.id)
        })
        .collect();

    c.bench_function("stress_then_maintain_200_bonds", |b| {
        b.iter(|| {
            for id in &ids {
                engine.apply_stress(*id, 0.01, StressKind::Mechanical);
            }
            black_box(engine.maintain())
        })
    });
}

criterion_group!(
    benches,
    bench_find_compatible,
    bench_form_and_break,
    bench_environment_update,
    bench_stress_and_maintain
);
criterion_main!(benches);
