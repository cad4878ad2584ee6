//! Aggregate properties derived from a cluster's members and bonds.

use crate::catalog::ProfileCatalog;
use covalence_data::{
    ClusterFunction, ClusterState, Family, Geometry, Profile, Relationship,
};
use std::collections::BTreeMap;

/// Members beyond this count make a cluster progressively less stable.
pub const SIZE_PENALTY_START: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Properties {
    pub formula: String,
    pub weight: f64,
    pub geometry: Geometry,
    pub stability: f64,
    pub polarity: f64,
    pub reactivity: f64,
    pub catalytic_sites: Vec<usize>,
    pub state: ClusterState,
    pub function: ClusterFunction,
}

impl Properties {
    /// Derives every aggregate from resolved member profiles and the bonds
    /// that formed. `edges[i]` are the member indices joined by `bonds[i]`.
    #[must_use]
    pub fn derive(profiles: &[Profile], bonds: &[Relationship], edges: &[(usize, usize)]) -> Self {
        let n = profiles.len();
        let geometry = Geometry::classify(n, bonds.len());
        let stabilities: Vec<f64> = bonds.iter().map(|b| b.stability).collect();
        let stability = cluster_stability(&stabilities, geometry, n);
        let polarity = polarity(profiles, bonds, edges);
        let reactivity = reactivity(profiles, polarity, stability);
        let catalytic_sites = catalytic_sites(profiles);
        let function = classify_function(!catalytic_sites.is_empty(), reactivity, polarity, stability);
        Self {
            formula: formula(profiles),
            weight: profiles.iter().map(|p| p.mass).sum(),
            geometry,
            stability,
            polarity,
            reactivity,
            catalytic_sites,
            state: ClusterState::from_stability(stability),
            function,
        }
    }
}

/// Symbols in alphabetical order, each followed by its count when above one.
#[must_use]
pub fn formula(profiles: &[Profile]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in profiles {
        *counts.entry(p.symbol.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(symbol, count)| {
            if count == 1 {
                symbol.to_string()
            } else {
                format!("{symbol}{count}")
            }
        })
        .collect()
}

#[must_use]
pub fn size_penalty(members: usize) -> f64 {
    if members > SIZE_PENALTY_START {
        (1.0 - 0.05 * (members - SIZE_PENALTY_START) as f64).max(0.5)
    } else {
        1.0
    }
}

/// Mean bond stability scaled by geometry and size, in [0, 10].
#[must_use]
pub fn cluster_stability(bond_stabilities: &[f64], geometry: Geometry, members: usize) -> f64 {
    if bond_stabilities.is_empty() {
        return 0.0;
    }
    let mean = bond_stabilities.iter().sum::<f64>() / bond_stabilities.len() as f64;
    (mean * geometry.stability_factor() * size_penalty(members)).clamp(0.0, 10.0)
}

/// Property difference across each bond, weighted by inverse bond length.
#[must_use]
pub fn polarity(profiles: &[Profile], bonds: &[Relationship], edges: &[(usize, usize)]) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (bond, &(a, b)) in bonds.iter().zip(edges) {
        let (Some(pa), Some(pb)) = (profiles.get(a), profiles.get(b)) else {
            continue;
        };
        let weight = if bond.length > 0.0 { 1.0 / bond.length } else { 1.0 };
        weighted += ProfileCatalog::property_difference(pa, pb) * weight;
        total += weight;
    }
    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

#[must_use]
pub fn reactivity(profiles: &[Profile], polarity: f64, stability: f64) -> f64 {
    let n = profiles.len() as f64;
    let avg_member = if profiles.is_empty() {
        0.0
    } else {
        profiles.iter().map(|p| p.reactivity).sum::<f64>() / n
    };
    (5.0 + 1.5 * polarity + 0.3 * (10.0 - stability) + 0.1 * n + avg_member / 20.0)
        .clamp(0.0, 10.0)
}

/// Members able to host a reaction: transition metals, strongly attracting
/// profiles, and high-valence profiles.
#[must_use]
pub fn catalytic_sites(profiles: &[Profile]) -> Vec<usize> {
    profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.family == Family::Transition || p.electronegativity >= 3.0 || p.bond_capacity >= 4
        })
        .map(|(i, _)| i)
        .collect()
}

#[must_use]
pub fn classify_function(
    has_sites: bool,
    reactivity: f64,
    polarity: f64,
    stability: f64,
) -> ClusterFunction {
    if has_sites && reactivity > 6.0 {
        ClusterFunction::Catalytic
    } else if polarity > 1.2 {
        ClusterFunction::Transport
    } else if reactivity > 7.0 {
        ClusterFunction::Signaling
    } else if stability >= 6.0 {
        ClusterFunction::Structural
    } else {
        ClusterFunction::Storage
    }
}

/// Binding affinity between two member sets in [0, 1].
///
/// Blends polarity complementarity, relative size, and the mean catalog
/// strength over every compatible cross pair.
#[must_use]
pub fn affinity(
    catalog: &ProfileCatalog,
    a: (&[Profile], f64),
    b: (&[Profile], f64),
) -> f64 {
    let (members_a, pol_a) = a;
    let (members_b, pol_b) = b;
    if members_a.is_empty() || members_b.is_empty() {
        return 0.0;
    }
    let complementarity = 1.0 - (pol_a - pol_b).abs() / (pol_a + pol_b + 1.0);
    let (small, large) = if members_a.len() <= members_b.len() {
        (members_a.len(), members_b.len())
    } else {
        (members_b.len(), members_a.len())
    };
    let size_ratio = small as f64 / large as f64;

    let mut strength = 0.0;
    let mut pairs = 0usize;
    for pa in members_a {
        for pb in members_b {
            if catalog.is_compatible(pa, pb) {
                strength += catalog.bond_strength(pa, pb);
                pairs += 1;
            }
        }
    }
    let avg_strength = if pairs > 0 { strength / pairs as f64 } else { 0.0 };

    (0.4 * complementarity + 0.3 * size_ratio + 0.3 * avg_strength / 10.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(symbols: &[&str]) -> Vec<Profile> {
        let catalog = ProfileCatalog::standard();
        symbols
            .iter()
            .map(|s| catalog.by_symbol(s).unwrap().clone())
            .collect()
    }

    #[test]
    fn test_formula() {
        assert_eq!(formula(&members(&["O", "H", "H"])), "H2O");
        assert_eq!(formula(&members(&["H", "C", "H", "H", "H"])), "CH4");
        assert_eq!(formula(&members(&["Na", "Cl"])), "ClNa");
        assert_eq!(formula(&[]), "");
    }

    #[test]
    fn test_size_penalty() {
        assert_eq!(size_penalty(4), 1.0);
        assert!((size_penalty(6) - 0.9).abs() < 1e-12);
        assert_eq!(size_penalty(40), 0.5);
    }

    #[test]
    fn test_cluster_stability() {
        let s = cluster_stability(&[6.0, 8.0], Geometry::Bent, 3);
        assert!((s - 7.0 * 0.95).abs() < 1e-12);
        assert_eq!(cluster_stability(&[], Geometry::Linear, 2), 0.0);
        assert_eq!(cluster_stability(&[10.0], Geometry::Tetrahedral, 4), 10.0);
    }

    #[test]
    fn test_catalytic_sites() {
        // Fe: transition. O: electronegativity 3.44. C: capacity 4. H: none.
        assert_eq!(catalytic_sites(&members(&["Fe", "O", "C", "H"])), vec![0, 1, 2]);
    }

    #[test]
    fn test_function_precedence() {
        assert_eq!(classify_function(true, 6.5, 2.0, 8.0), ClusterFunction::Catalytic);
        assert_eq!(classify_function(false, 6.5, 2.0, 8.0), ClusterFunction::Transport);
        assert_eq!(classify_function(false, 7.5, 0.2, 8.0), ClusterFunction::Signaling);
        assert_eq!(classify_function(false, 5.0, 0.2, 6.0), ClusterFunction::Structural);
        assert_eq!(classify_function(false, 5.0, 0.2, 5.0), ClusterFunction::Storage);
    }

    #[test]
    fn test_reactivity_bounds() {
        let r = reactivity(&members(&["H", "H"]), 0.0, 10.0);
        assert!((r - (5.0 + 0.2 + 7.0 / 20.0)).abs() < 1e-12);
        assert_eq!(reactivity(&members(&["F", "F"]), 5.0, 0.0), 10.0);
    }

    #[test]
    fn test_affinity_identical_sets() {
        let catalog = ProfileCatalog::standard();
        let water = members(&["O", "H", "H"]);
        let a = affinity(&catalog, (&water, 1.24), (&water, 1.24));
        assert!(a > 0.7 && a <= 1.0);
        assert_eq!(affinity(&catalog, (&water, 1.0), (&[], 0.0)), 0.0);
    }
}
