//! Configuration management for engine parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Every section has defaults, so a file only needs to name the values
//! it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = 42
//!
//! [bonds]
//! history_capacity = 500
//! refuse_break_above = 5.0
//!
//! [clusters]
//! policy = "best_effort"
//!
//! [environment]
//! temperature = 310.0
//! ```

use covalence_data::Environment;
use serde::{Deserialize, Serialize};

/// Relationship engine tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BondConfig {
    /// Capacity of the broken-bond ring buffer.
    pub history_capacity: usize,
    /// Unforced breaks are refused above this stability.
    pub refuse_break_above: f64,
    /// Centre of the randomized stress breakpoint.
    pub base_breakpoint: f64,
    /// Half-width of the randomized stress breakpoint.
    pub breakpoint_jitter: f64,
    /// Stress removed by one `strengthen_bond` call.
    pub strengthen_heal: f64,
    /// Stress removed from each low-stress bond per maintenance sweep.
    pub maintenance_heal: f64,
    /// Bonds below this stress are healed during maintenance.
    pub maintenance_heal_below: f64,
    /// Per-sweep chance that a nearly unbound bond breaks on its own.
    pub spontaneous_break_chance: f64,
    /// Bonds below this stability are candidates for spontaneous breaks.
    pub spontaneous_break_below: f64,
    pub catalyst_strength_boost: f64,
    pub catalyst_energy_factor: f64,
}

impl Default for BondConfig {
    fn default() -> Self {
        Self {
            history_capacity: 1000,
            refuse_break_above: 5.0,
            base_breakpoint: 2.0,
            breakpoint_jitter: 0.5,
            strengthen_heal: 0.1,
            maintenance_heal: 0.05,
            maintenance_heal_below: 0.3,
            spontaneous_break_chance: 0.1,
            spontaneous_break_below: 1.0,
            catalyst_strength_boost: 1.2,
            catalyst_energy_factor: 0.7,
        }
    }
}

/// What `assemble` does when only some of the requested edges form.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyPolicy {
    /// Any failed edge rolls back the whole cluster.
    #[default]
    AllOrNothing,
    /// Keep whatever formed; fail only when no edge formed.
    BestEffort,
}

/// Cluster engine tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub policy: AssemblyPolicy,
    /// Unforced dissociation is refused above this stability.
    pub refuse_dissociate_above: f64,
    /// Minimum affinity reported by `find_compatible`.
    pub affinity_threshold: f64,
    /// Below this stability a cluster becomes a dissociation candidate.
    pub dissociation_threshold: f64,
    /// Stability swing that counts as a state transition during dynamics.
    pub transition_delta: f64,
    /// Thermal jitter amplitude at standard temperature.
    pub thermal_noise: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            policy: AssemblyPolicy::AllOrNothing,
            refuse_dissociate_above: 7.0,
            affinity_threshold: 0.3,
            dissociation_threshold: 1.5,
            transition_delta: 1.5,
            thermal_noise: 0.05,
        }
    }
}

/// Starting ambient conditions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub temperature: f64,
    pub pressure: f64,
    pub acidity: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            temperature: env.temperature,
            pressure: env.pressure,
            acidity: env.acidity,
        }
    }
}

impl EnvironmentConfig {
    #[must_use]
    pub fn to_environment(&self) -> Environment {
        Environment::new(self.temperature, self.pressure, self.acidity)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub bonds: BondConfig,
    pub clusters: ClusterConfig,
    pub environment: EnvironmentConfig,
    /// Fixed seed for the engines' random sources; entropy when absent.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let b = &self.bonds;
        anyhow::ensure!(b.history_capacity > 0, "History capacity must be positive");
        anyhow::ensure!(
            (0.0..=10.0).contains(&b.refuse_break_above),
            "Break refusal threshold must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            b.base_breakpoint >= 0.0 && b.base_breakpoint <= 10.0,
            "Base breakpoint must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            (0.0..=10.0).contains(&b.breakpoint_jitter),
            "Breakpoint jitter must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&b.strengthen_heal),
            "Strengthen heal must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&b.maintenance_heal),
            "Maintenance heal must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&b.spontaneous_break_chance),
            "Spontaneous break chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            b.catalyst_strength_boost >= 1.0,
            "Catalyst strength boost must be at least 1.0"
        );
        anyhow::ensure!(
            b.catalyst_energy_factor > 0.0 && b.catalyst_energy_factor <= 1.0,
            "Catalyst energy factor must be in (0.0, 1.0]"
        );

        let c = &self.clusters;
        anyhow::ensure!(
            (0.0..=10.0).contains(&c.refuse_dissociate_above),
            "Dissociation refusal threshold must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&c.affinity_threshold),
            "Affinity threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=10.0).contains(&c.dissociation_threshold),
            "Dissociation threshold must be in [0.0, 10.0]"
        );
        anyhow::ensure!(
            c.transition_delta > 0.0,
            "Transition delta must be positive"
        );
        anyhow::ensure!(
            (0.0..=10.0).contains(&c.thermal_noise),
            "Thermal noise must be in [0.0, 10.0]"
        );

        let e = &self.environment;
        let (t_lo, t_hi) = Environment::TEMPERATURE_RANGE;
        anyhow::ensure!(
            e.temperature >= t_lo && e.temperature <= t_hi,
            "Temperature must be in [{t_lo}, {t_hi}]"
        );
        let (p_lo, p_hi) = Environment::PRESSURE_RANGE;
        anyhow::ensure!(
            e.pressure >= p_lo && e.pressure <= p_hi,
            "Pressure must be in [{p_lo}, {p_hi}]"
        );
        let (a_lo, a_hi) = Environment::ACIDITY_RANGE;
        anyhow::ensure!(
            e.acidity >= a_lo && e.acidity <= a_hi,
            "Acidity must be in [{a_lo}, {a_hi}]"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of every parameter that influences engine behavior.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.bonds).as_bytes());
        hasher.update(format!("{:?}", self.clusters).as_bytes());
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hasher.update(format!("{:?}", self.seed).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clusters.policy, AssemblyPolicy::AllOrNothing);
    }

    #[test]
    fn test_zero_history_capacity() {
        let config = EngineConfig {
            bonds: BondConfig {
                history_capacity: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_break_chance() {
        let config = EngineConfig {
            bonds: BondConfig {
                spontaneous_break_chance: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_acidity() {
        let config = EngineConfig {
            environment: EnvironmentConfig {
                acidity: 15.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            seed = 7

            [clusters]
            policy = "best_effort"

            [environment]
            temperature = 310.0
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.clusters.policy, AssemblyPolicy::BestEffort);
        assert_eq!(config.clusters.refuse_dissociate_above, 7.0);
        assert_eq!(config.environment.temperature, 310.0);
        assert_eq!(config.bonds, BondConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        assert!(EngineConfig::from_toml("[bonds]\nhistory_capacity = 0\n").is_err());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = EngineConfig::default();
        let config2 = EngineConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let seeded = EngineConfig {
            seed: Some(1),
            ..Default::default()
        };
        assert_ne!(config1.fingerprint(), seeded.fingerprint());
    }
}
