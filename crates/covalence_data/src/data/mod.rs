//! Core data structures for the covalence graph.

pub mod bond;
pub mod cluster;
pub mod environment;
pub mod profile;
pub mod stats;
