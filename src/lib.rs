//! # Covalence
//!
//! Application layer over `covalence_core`: configuration loading and a
//! scripted driver that exercises the engines with opaque component ids.

pub mod config;
pub mod scenario;

pub use covalence_core::{Lab, LabSnapshot};
pub use scenario::{Orchestrator, RunSummary, Scenario, ScenarioReport};
