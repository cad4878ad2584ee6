//! Plain data records shared by the covalence engines.
//!
//! Nothing in this crate holds a lock or performs I/O. The engines in
//! `covalence_core` own every mutable instance of these types and hand out
//! clones as read-only snapshots.

pub mod data;

pub use data::bond::{BondId, BondState, Relationship, StressKind};
pub use data::cluster::{Cluster, ClusterFunction, ClusterId, ClusterState, Geometry};
pub use data::environment::Environment;
pub use data::profile::{BondKind, Family, Identifier, ParseIdentifierError, Profile, Toxicity};
pub use data::stats::{BondStatistics, ClusterStatistics, MaintenanceReport};
