pub mod macros;

use covalence_core::config::{AssemblyPolicy, EngineConfig};
use covalence_core::Lab;
use covalence_data::Identifier;

#[allow(dead_code)]
pub struct LabBuilder {
    config: EngineConfig,
}

#[allow(dead_code)]
impl LabBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                seed: Some(42),
                ..Default::default()
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut EngineConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_policy(mut self, policy: AssemblyPolicy) -> Self {
        self.config.clusters.policy = policy;
        self
    }

    /// Disables thermal jitter so dynamics outcomes depend only on bonds.
    pub fn quiet(mut self) -> Self {
        self.config.clusters.thermal_noise = 0.0;
        self
    }

    pub fn build(self) -> Lab {
        Lab::new(self.config).expect("Failed to create lab in test builder")
    }
}

#[allow(dead_code)]
pub fn sym(symbol: &str) -> Identifier {
    Identifier::symbol(symbol)
}

#[allow(dead_code)]
pub fn types(symbols: &[&str]) -> Vec<Identifier> {
    symbols.iter().map(|s| Identifier::symbol(*s)).collect()
}
