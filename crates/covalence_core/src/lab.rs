//! Explicit wiring of the catalog and both engines.
//!
//! Applications build one [`Lab`] at startup and hand out clones of its
//! `Arc`s. Nothing in this crate keeps global engine instances.

use crate::catalog::ProfileCatalog;
use crate::cluster::ClusterAssemblyEngine;
use crate::config::EngineConfig;
use crate::metrics::Metrics;
use crate::relationship::RelationshipEngine;
use covalence_data::{BondStatistics, ClusterStatistics};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Point-in-time view of everything a monitor polls.
#[derive(Debug, Clone, Serialize)]
pub struct LabSnapshot {
    pub fingerprint: String,
    pub bonds: BondStatistics,
    pub clusters: ClusterStatistics,
    pub counters: BTreeMap<String, u64>,
    pub uptime_ms: u128,
}

pub struct Lab {
    pub catalog: Arc<ProfileCatalog>,
    pub bonds: Arc<RelationshipEngine>,
    pub clusters: Arc<ClusterAssemblyEngine>,
    pub metrics: Arc<Metrics>,
    config: EngineConfig,
}

fn rng_for(seed: Option<u64>, stream: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(stream);
            rng
        }
        None => ChaCha8Rng::from_entropy(),
    }
}

impl Lab {
    /// Validates `config` and builds the standard catalog and both engines.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        Self::with_catalog(config, ProfileCatalog::standard())
    }

    pub fn with_catalog(config: EngineConfig, catalog: ProfileCatalog) -> anyhow::Result<Self> {
        config.validate()?;
        let catalog = Arc::new(catalog);
        let metrics = Arc::new(Metrics::new());

        let bonds = Arc::new(
            RelationshipEngine::new(catalog.clone(), config.bonds.clone(), rng_for(config.seed, 0))
                .with_environment(config.environment.to_environment())
                .with_metrics(metrics.clone()),
        );
        let clusters = Arc::new(
            ClusterAssemblyEngine::new(
                catalog.clone(),
                bonds.clone(),
                config.clusters.clone(),
                rng_for(config.seed, 1),
            )
            .with_metrics(metrics.clone()),
        );

        tracing::info!(
            profiles = catalog.len(),
            seed = ?config.seed,
            fingerprint = %config.fingerprint(),
            "Lab initialized"
        );

        Ok(Self {
            catalog,
            bonds,
            clusters,
            metrics,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> LabSnapshot {
        LabSnapshot {
            fingerprint: self.config.fingerprint(),
            bonds: self.bonds.get_statistics(),
            clusters: self.clusters.get_statistics(),
            counters: self.metrics.snapshot(),
            uptime_ms: self.metrics.elapsed().as_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::metrics;
    use covalence_data::Identifier;

    #[test]
    fn test_lab_applies_initial_environment() {
        let lab = Lab::new(EngineConfig {
            environment: EnvironmentConfig {
                temperature: 310.0,
                ..Default::default()
            },
            seed: Some(3),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(lab.bonds.environment().temperature, 310.0);
    }

    #[test]
    fn test_lab_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.clusters.affinity_threshold = 2.0;
        assert!(Lab::new(config).is_err());
    }

    #[test]
    fn test_engines_share_metrics() {
        let lab = Lab::new(EngineConfig {
            seed: Some(9),
            ..Default::default()
        })
        .unwrap();
        let c = Identifier::symbol("C");
        lab.bonds.form_bond("x", &c, "y", &c, None).unwrap();
        let snapshot = lab.snapshot();
        assert_eq!(snapshot.counters.get(metrics::BONDS_FORMED), Some(&1));
        assert_eq!(snapshot.bonds.active, 1);
    }
}
