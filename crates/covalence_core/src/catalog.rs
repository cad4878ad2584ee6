//! Fixed registry of component profiles.
//!
//! The catalog is built once at startup and shared read-only (usually behind
//! an `Arc`) by both engines. Lookups never fail loudly: an unknown
//! identifier yields `None`.

use covalence_data::{BondKind, Family, Identifier, Profile, Toxicity};
use std::collections::HashMap;
use std::fmt;

/// Largest electronegativity gap two profiles may bridge.
pub const MAX_PROPERTY_DIFFERENCE: f64 = 3.5;
/// Largest radius ratio (max / min) two profiles may bridge.
pub const MAX_SIZE_RATIO: f64 = 3.0;
/// Above this difference bonds behave ionically.
pub const IONIC_THRESHOLD: f64 = 1.7;
/// Below this difference bonds are nonpolar.
pub const POLAR_THRESHOLD: f64 = 0.3;
/// Minimum difference for a hydrogen bridge.
pub const HYDROGEN_BRIDGE_THRESHOLD: f64 = 0.9;
/// Symbol of the bridging profile.
pub const BRIDGING_SYMBOL: &str = "H";

/// Outcome of a compatibility check. Every refusal names its cause.
#[derive(Debug, Clone, PartialEq)]
pub enum Compatibility {
    Compatible,
    HighToxicity { symbol: String, toxicity: Toxicity },
    Inert { symbol: String },
    PropertyGap(f64),
    SizeMismatch(f64),
}

impl Compatibility {
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Compatible => write!(f, "compatible"),
            Compatibility::HighToxicity { symbol, toxicity } => {
                write!(f, "{symbol} is too toxic ({toxicity:?})")
            }
            Compatibility::Inert { symbol } => write!(f, "{symbol} is inert"),
            Compatibility::PropertyGap(d) => {
                write!(f, "property difference {d:.2} exceeds {MAX_PROPERTY_DIFFERENCE}")
            }
            Compatibility::SizeMismatch(r) => {
                write!(f, "size ratio {r:.2} exceeds {MAX_SIZE_RATIO}")
            }
        }
    }
}

pub struct ProfileCatalog {
    profiles: Vec<Profile>,
    by_name: HashMap<String, usize>,
    by_symbol: HashMap<String, usize>,
    by_number: HashMap<u8, usize>,
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ProfileCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileCatalog")
            .field("profiles", &self.profiles.len())
            .finish()
    }
}

impl ProfileCatalog {
    /// The built-in catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_profiles(standard_profiles())
    }

    /// Builds a catalog from arbitrary profiles. Later duplicates of a name,
    /// symbol or number shadow earlier ones.
    #[must_use]
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_symbol = HashMap::new();
        let mut by_number = HashMap::new();
        for (idx, p) in profiles.iter().enumerate() {
            by_name.insert(p.name.to_lowercase(), idx);
            by_symbol.insert(p.symbol.clone(), idx);
            by_number.insert(p.number, idx);
        }
        Self {
            profiles,
            by_name,
            by_symbol,
            by_number,
        }
    }

    #[must_use]
    pub fn get_profile(&self, id: &Identifier) -> Option<&Profile> {
        match id {
            Identifier::Name(name) => self.by_name(name),
            Identifier::Symbol(symbol) => self.by_symbol(symbol),
            Identifier::Number(number) => self.by_number(*number),
        }
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Profile> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.profiles[idx])
    }

    #[must_use]
    pub fn by_symbol(&self, symbol: &str) -> Option<&Profile> {
        self.by_symbol.get(symbol).map(|&idx| &self.profiles[idx])
    }

    #[must_use]
    pub fn by_number(&self, number: u8) -> Option<&Profile> {
        self.by_number.get(&number).map(|&idx| &self.profiles[idx])
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn by_family(&self, family: Family) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().filter(move |p| p.family == family)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    #[must_use]
    pub fn property_difference(a: &Profile, b: &Profile) -> f64 {
        (a.electronegativity - b.electronegativity).abs()
    }

    /// Larger radius over smaller radius.
    #[must_use]
    pub fn size_ratio(a: &Profile, b: &Profile) -> f64 {
        let lo = a.radius.min(b.radius);
        let hi = a.radius.max(b.radius);
        if lo <= 0.0 {
            f64::INFINITY
        } else {
            hi / lo
        }
    }

    /// Checks the pairing rules in order: toxicity, inertness, property gap,
    /// size ratio.
    #[must_use]
    pub fn check_compatibility(&self, a: &Profile, b: &Profile) -> Compatibility {
        for p in [a, b] {
            if p.toxicity.is_high() {
                return Compatibility::HighToxicity {
                    symbol: p.symbol.clone(),
                    toxicity: p.toxicity,
                };
            }
        }

        for (p, other) in [(a, b), (b, a)] {
            if p.family == Family::Inert && !other.family.reacts_with_inert() {
                return Compatibility::Inert {
                    symbol: p.symbol.clone(),
                };
            }
        }

        let d = Self::property_difference(a, b);
        if d > MAX_PROPERTY_DIFFERENCE {
            return Compatibility::PropertyGap(d);
        }

        let ratio = Self::size_ratio(a, b);
        if ratio > MAX_SIZE_RATIO {
            return Compatibility::SizeMismatch(ratio);
        }

        Compatibility::Compatible
    }

    #[must_use]
    pub fn is_compatible(&self, a: &Profile, b: &Profile) -> bool {
        self.check_compatibility(a, b).is_compatible()
    }

    /// Predicted strength of a bond between `a` and `b`, in [0, 10].
    #[must_use]
    pub fn bond_strength(&self, a: &Profile, b: &Profile) -> f64 {
        let d = Self::property_difference(a, b);
        let base = if d > IONIC_THRESHOLD {
            8.0 - (d - IONIC_THRESHOLD) * 2.0
        } else if d > POLAR_THRESHOLD {
            7.0 + d * 0.5
        } else {
            6.0 + (1.0 - d) * 2.0
        };
        let size_factor = 1.0 / (1.0 + (a.radius - b.radius).abs() / 100.0);
        let stability_bonus = (a.stability + b.stability) / 20.0;
        (base * size_factor + stability_bonus).clamp(0.0, 10.0)
    }

    #[must_use]
    pub fn bond_kind(&self, a: &Profile, b: &Profile) -> BondKind {
        let d = Self::property_difference(a, b);
        if a.family.is_metal_like() && b.family.is_metal_like() {
            BondKind::Metallic
        } else if (a.symbol == BRIDGING_SYMBOL || b.symbol == BRIDGING_SYMBOL)
            && d > HYDROGEN_BRIDGE_THRESHOLD
        {
            BondKind::Hydrogen
        } else if d > IONIC_THRESHOLD {
            BondKind::Ionic
        } else if d < IONIC_THRESHOLD {
            BondKind::Covalent
        } else {
            BondKind::VanDerWaals
        }
    }

    /// Every profile `profile` may bond with, strongest first.
    #[must_use]
    pub fn find_compatible(&self, profile: &Profile) -> Vec<(&Profile, f64)> {
        let mut found: Vec<(&Profile, f64)> = self
            .profiles
            .iter()
            .filter(|other| self.is_compatible(profile, other))
            .map(|other| (other, self.bond_strength(profile, other)))
            .collect();
        found.sort_by(|a, b| b.1.total_cmp(&a.1));
        found
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    name: &str,
    symbol: &str,
    number: u8,
    electronegativity: f64,
    radius: f64,
    mass: f64,
    stability: f64,
    reactivity: f64,
    bio_compatibility: f64,
    toxicity: Toxicity,
    family: Family,
    preferred_bonds: &[BondKind],
    bond_capacity: u8,
    role: &str,
) -> Profile {
    Profile {
        name: name.to_string(),
        symbol: symbol.to_string(),
        number,
        electronegativity,
        radius,
        mass,
        stability,
        reactivity,
        bio_compatibility,
        toxicity,
        family,
        preferred_bonds: preferred_bonds.to_vec(),
        bond_capacity,
        role: role.to_string(),
    }
}

#[rustfmt::skip]
fn standard_profiles() -> Vec<Profile> {
    use BondKind::*;
    use Family::*;
    use Toxicity::*;

    vec![
        profile("Hydrogen", "H", 1, 2.20, 37.0, 1.008, 6.0, 7.0, 1.0, Safe, Structural, &[Covalent, Hydrogen], 1, "lightweight helper"),
        profile("Helium", "He", 2, 0.0, 32.0, 4.0026, 10.0, 0.0, 1.0, Safe, Inert, &[], 0, "isolated sandbox"),
        profile("Lithium", "Li", 3, 0.98, 134.0, 6.94, 3.0, 8.5, 0.6, Caution, ReactiveLight, &[Ionic, Metallic], 1, "hot cache"),
        profile("Beryllium", "Be", 4, 1.57, 90.0, 9.0122, 5.0, 5.0, 0.1, Dangerous, AlkalineEarth, &[Covalent, Metallic], 2, "brittle legacy driver"),
        profile("Boron", "B", 5, 2.04, 82.0, 10.81, 6.5, 4.5, 0.7, Safe, Metalloid, &[Covalent, Coordinate], 3, "bridge adapter"),
        profile("Carbon", "C", 6, 2.55, 77.0, 12.011, 8.0, 5.0, 1.0, Safe, Structural, &[Covalent, Pi], 4, "core service backbone"),
        profile("Nitrogen", "N", 7, 3.04, 75.0, 14.007, 7.5, 4.0, 0.9, Safe, Structural, &[Covalent, Hydrogen, Coordinate], 3, "message broker"),
        profile("Oxygen", "O", 8, 3.44, 73.0, 15.999, 7.0, 7.5, 1.0, Safe, Structural, &[Covalent, Hydrogen, Pi], 2, "data store"),
        profile("Fluorine", "F", 9, 3.98, 71.0, 18.998, 3.0, 9.5, 0.3, Warning, Halogen, &[Ionic, Covalent], 1, "strict validator"),
        profile("Neon", "Ne", 10, 0.0, 69.0, 20.18, 10.0, 0.0, 1.0, Safe, Inert, &[], 0, "static asset"),
        profile("Sodium", "Na", 11, 0.93, 154.0, 22.99, 2.5, 9.0, 0.8, Caution, ReactiveLight, &[Ionic, Metallic], 1, "event emitter"),
        profile("Magnesium", "Mg", 12, 1.31, 130.0, 24.305, 5.0, 6.5, 0.9, Safe, AlkalineEarth, &[Ionic, Metallic], 2, "load balancer"),
        profile("Aluminium", "Al", 13, 1.61, 118.0, 26.982, 6.0, 5.5, 0.6, Safe, PostTransition, &[Ionic, Metallic, Covalent], 3, "lightweight container"),
        profile("Silicon", "Si", 14, 1.90, 111.0, 28.085, 7.0, 4.0, 0.8, Safe, Metalloid, &[Covalent], 4, "hardware abstraction layer"),
        profile("Phosphorus", "P", 15, 2.19, 106.0, 30.974, 5.5, 7.0, 0.7, Caution, Structural, &[Covalent], 3, "job scheduler"),
        profile("Sulfur", "S", 16, 2.58, 102.0, 32.06, 6.0, 6.0, 0.8, Safe, Structural, &[Covalent], 2, "persistent connector"),
        profile("Chlorine", "Cl", 17, 3.16, 99.0, 35.45, 4.0, 8.5, 0.4, Caution, Halogen, &[Ionic, Covalent], 1, "security filter"),
        profile("Argon", "Ar", 18, 0.0, 97.0, 39.948, 10.0, 0.0, 1.0, Safe, Inert, &[], 0, "archival storage"),
        profile("Potassium", "K", 19, 0.82, 196.0, 39.098, 2.0, 9.5, 0.8, Safe, ReactiveLight, &[Ionic, Metallic], 1, "signal dispatcher"),
        profile("Calcium", "Ca", 20, 1.00, 174.0, 40.078, 4.5, 7.0, 0.9, Safe, AlkalineEarth, &[Ionic, Metallic], 2, "structural framework"),
        profile("Titanium", "Ti", 22, 1.54, 136.0, 47.867, 8.5, 3.5, 0.9, Safe, Transition, &[Metallic, Coordinate], 4, "hardened runtime"),
        profile("Iron", "Fe", 26, 1.83, 125.0, 55.845, 7.0, 5.0, 0.8, Safe, Transition, &[Metallic, Coordinate, Ionic], 6, "compute engine"),
        profile("Nickel", "Ni", 28, 1.91, 121.0, 58.693, 7.0, 4.5, 0.5, Warning, Transition, &[Metallic, Coordinate], 6, "protocol codec"),
        profile("Copper", "Cu", 29, 1.90, 128.0, 63.546, 7.5, 4.0, 0.7, Caution, Transition, &[Metallic, Coordinate], 4, "network transport"),
        profile("Zinc", "Zn", 30, 1.65, 131.0, 65.38, 6.5, 5.0, 0.8, Safe, Transition, &[Metallic, Coordinate], 4, "plugin host"),
        profile("Arsenic", "As", 33, 2.18, 119.0, 74.922, 5.0, 6.0, 0.0, Lethal, Metalloid, &[Covalent], 3, "malicious payload"),
        profile("Bromine", "Br", 35, 2.96, 114.0, 79.904, 4.0, 8.0, 0.3, Warning, Halogen, &[Ionic, Covalent], 1, "transform stage"),
        profile("Silver", "Ag", 47, 1.93, 144.0, 107.87, 8.0, 3.0, 0.7, Safe, Transition, &[Metallic], 2, "indexing service"),
        profile("Iodine", "I", 53, 2.66, 133.0, 126.9, 5.0, 6.5, 0.6, Caution, Halogen, &[Ionic, Covalent], 1, "heavy adapter"),
        profile("Xenon", "Xe", 54, 2.60, 130.0, 131.29, 9.0, 1.0, 1.0, Safe, Inert, &[Covalent], 2, "rarely used integration"),
        profile("Gold", "Au", 79, 2.54, 144.0, 196.97, 9.5, 1.5, 1.0, Safe, Transition, &[Metallic, Coordinate], 3, "stable API contract"),
        profile("Mercury", "Hg", 80, 2.00, 149.0, 200.59, 4.0, 5.0, 0.0, Dangerous, Transition, &[Metallic], 2, "legacy monolith"),
        profile("Lead", "Pb", 82, 2.33, 147.0, 207.2, 6.0, 3.0, 0.0, Dangerous, PostTransition, &[Metallic, Covalent], 4, "deprecated dependency"),
    ]
}
