//! # Covalence Core
//!
//! Engines that compose software components the way chemistry composes atoms.
//!
//! - [`catalog::ProfileCatalog`]: the fixed table of component profiles and
//!   the pairwise compatibility, strength, and bond-kind rules
//! - [`relationship::RelationshipEngine`]: stateful bonds between component
//!   instances, their stress and environment response, and maintenance
//! - [`cluster::ClusterAssemblyEngine`]: clusters built from many bonds, with
//!   derived geometry, stability, polarity, and reactivity
//!
//! ## Example
//!
//! ```
//! use covalence_core::catalog::ProfileCatalog;
//! use covalence_core::config::BondConfig;
//! use covalence_core::relationship::RelationshipEngine;
//! use covalence_data::{BondKind, Identifier};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ProfileCatalog::standard());
//! let engine = RelationshipEngine::with_seed(catalog, BondConfig::default(), 42);
//!
//! let bond = engine
//!     .form_bond("api", &Identifier::symbol("C"), "db", &Identifier::symbol("O"), None)
//!     .expect("carbon and oxygen are compatible");
//! assert_eq!(bond.kind, BondKind::Covalent);
//! assert!(engine.break_bond(bond.id, true));
//! ```

/// Fixed registry of component profiles
pub mod catalog;
/// Cluster assembly, reactions, and dynamics
pub mod cluster;
/// Configuration management for engine parameters
pub mod config;
/// Error types
pub mod error;
/// Explicit construction of the engines
pub mod lab;
/// Event counters and logging setup
pub mod metrics;
/// Bond lifecycle and environment coupling
pub mod relationship;
/// Edge templates and validation
pub mod topology;

pub use catalog::{Compatibility, ProfileCatalog};
pub use cluster::{ClusterAssemblyEngine, DynamicsEvent, DynamicsReport};
pub use config::{AssemblyPolicy, BondConfig, ClusterConfig, EngineConfig, EnvironmentConfig};
pub use error::{CoreError, Result};
pub use lab::{Lab, LabSnapshot};
pub use relationship::{compute_stability, RelationshipEngine, StabilityFactors};
pub use topology::Topology;
