//! Edge layouts used to wire cluster members together.
//!
//! A topology turns a member count into a list of member index pairs. Named
//! templates cover the common shapes; callers can also supply their own edge
//! list, which is validated here before any bond is formed.

use crate::error::{CoreError, Result};
use petgraph::graph::UnGraph;
use std::collections::HashSet;

/// Names accepted by [`Topology::Template`].
pub const TEMPLATES: &[&str] = &[
    "chain",
    "ring",
    "star",
    "complete",
    "water",
    "hub4",
    "hub6",
];

/// How the members of a cluster are connected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Topology {
    /// Consecutive members bonded in order.
    #[default]
    Chain,
    /// A named layout from [`TEMPLATES`].
    Template(String),
    /// Explicit member index pairs.
    Edges(Vec<(usize, usize)>),
}

impl Topology {
    pub fn template(name: impl Into<String>) -> Self {
        Self::Template(name.into())
    }

    /// Template name recorded on the resulting cluster.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Topology::Chain => Some("chain".to_string()),
            Topology::Template(name) => Some(name.clone()),
            Topology::Edges(_) => None,
        }
    }

    /// Expands the topology for `members` members and validates the result.
    pub fn edges(&self, members: usize) -> Result<Vec<(usize, usize)>> {
        let edges = match self {
            Topology::Chain => chain(members),
            Topology::Template(name) => template_edges(name, members)?,
            Topology::Edges(edges) => edges.clone(),
        };
        validate_edges(&edges, members)?;
        Ok(edges)
    }
}

fn chain(n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i - 1, i)).collect()
}

fn star(n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (0, i)).collect()
}

fn fixed_arity(name: &str, n: usize, expected: usize) -> Result<()> {
    if n == expected {
        Ok(())
    } else {
        Err(CoreError::invalid_input(format!(
            "template '{name}' needs {expected} members, got {n}"
        )))
    }
}

fn template_edges(name: &str, n: usize) -> Result<Vec<(usize, usize)>> {
    match name {
        "chain" => Ok(chain(n)),
        "ring" => {
            let mut edges = chain(n);
            if n >= 3 {
                edges.push((n - 1, 0));
            }
            Ok(edges)
        }
        "star" => Ok(star(n)),
        "complete" => Ok((0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect()),
        "water" => {
            fixed_arity(name, n, 3)?;
            Ok(star(n))
        }
        "hub4" => {
            fixed_arity(name, n, 5)?;
            Ok(star(n))
        }
        "hub6" => {
            fixed_arity(name, n, 7)?;
            Ok(star(n))
        }
        other => Err(CoreError::unknown_template(other)),
    }
}

/// Rejects self-loops, out-of-range indices and repeated pairs.
pub fn validate_edges(edges: &[(usize, usize)], members: usize) -> Result<()> {
    let mut seen = HashSet::new();
    for &(a, b) in edges {
        if a >= members || b >= members {
            return Err(CoreError::invalid_input(format!(
                "edge ({a}, {b}) out of range for {members} members"
            )));
        }
        if a == b {
            return Err(CoreError::invalid_input(format!("self-loop on member {a}")));
        }
        if !seen.insert((a.min(b), a.max(b))) {
            return Err(CoreError::invalid_input(format!(
                "duplicate edge ({a}, {b})"
            )));
        }
    }
    Ok(())
}

/// Number of connected pieces formed by `edges` over `members` nodes.
#[must_use]
pub fn count_fragments(members: usize, edges: &[(usize, usize)]) -> usize {
    let mut graph = UnGraph::<(), ()>::with_capacity(members, edges.len());
    let nodes: Vec<_> = (0..members).map(|_| graph.add_node(())).collect();
    for &(a, b) in edges {
        graph.add_edge(nodes[a], nodes[b], ());
    }
    petgraph::algo::connected_components(&graph)
}
