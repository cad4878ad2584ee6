//! Relationship engine: the set of active bonds between component instances.
//!
//! Bonds are stored as components in a private `hecs::World` used purely as a
//! generational arena. A [`BondId`] carries the entity bits, so a handle to a
//! broken bond can never resolve to a newer bond that reused its slot. The
//! per-component index only holds handles.
//!
//! All state sits behind one mutex. Public methods lock once and delegate to
//! [`BondLedger`], whose methods call each other freely without relocking.

use crate::catalog::ProfileCatalog;
use crate::config::BondConfig;
use crate::metrics::{self, Metrics};
use covalence_data::{
    BondId, BondKind, BondState, BondStatistics, Environment, Identifier, MaintenanceReport,
    Profile, Relationship, StressKind,
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Stability below which a bond counts as strained.
pub const STRAIN_THRESHOLD: f64 = 4.0;

/// Every multiplicative term of the stability formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityFactors {
    pub base: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub acidity: f64,
    pub stress: f64,
}

impl StabilityFactors {
    #[must_use]
    pub fn new(strength: f64, stress: f64, env: &Environment) -> Self {
        Self {
            base: strength / 10.0,
            temperature: (1.0 - (env.temperature - Environment::STANDARD_TEMPERATURE) / 1000.0)
                .clamp(0.1, 1.0),
            pressure: (1.0 + (env.pressure - Environment::STANDARD_PRESSURE) * 0.1)
                .clamp(0.5, 1.5),
            acidity: (1.0 - (env.acidity - Environment::NEUTRAL_ACIDITY).abs() / 14.0).max(0.3),
            stress: (1.0 - stress).max(0.1),
        }
    }

    /// Combined stability in [0, 10].
    #[must_use]
    pub fn stability(&self) -> f64 {
        (self.base * self.temperature * self.pressure * self.acidity * self.stress * 10.0)
            .clamp(0.0, 10.0)
    }
}

#[must_use]
pub fn compute_stability(strength: f64, stress: f64, env: &Environment) -> f64 {
    StabilityFactors::new(strength, stress, env).stability()
}

fn to_id(entity: hecs::Entity) -> BondId {
    BondId(entity.to_bits().get())
}

fn to_entity(id: BondId) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(id.0)
}

fn refresh(bond: &mut Relationship) {
    bond.stability = compute_stability(bond.strength, bond.stress, &bond.environment);
}

/// Moves a live bond between `Stable` and `Strained` after its stability
/// changed. Bonds already on their way out keep their state.
fn settle(bond: &mut Relationship) {
    if matches!(bond.state, BondState::Breaking | BondState::Broken) {
        return;
    }
    bond.state = if bond.stability < STRAIN_THRESHOLD {
        BondState::Strained
    } else {
        BondState::Stable
    };
}

/// Caps a jitter amplitude to [0, 10]. Non-finite amplitudes disable jitter.
pub(crate) fn bounded_jitter(amplitude: f64) -> f64 {
    if amplitude.is_finite() {
        amplitude.clamp(0.0, 10.0)
    } else {
        0.0
    }
}

/// Probability usable by `gen_bool`; NaN counts as never.
fn bounded_chance(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Mutable state owned by the engine.
pub struct BondLedger {
    world: hecs::World,
    by_component: HashMap<String, Vec<BondId>>,
    history: VecDeque<Relationship>,
    environment: Environment,
    rng: Box<dyn RngCore + Send>,
    total_formed: u64,
    total_broken: u64,
    total_refused: u64,
}

impl BondLedger {
    fn new(environment: Environment, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            world: hecs::World::new(),
            by_component: HashMap::new(),
            history: VecDeque::new(),
            environment,
            rng,
            total_formed: 0,
            total_broken: 0,
            total_refused: 0,
        }
    }

    fn bond(&mut self, id: BondId) -> Option<&mut Relationship> {
        let entity = to_entity(id)?;
        self.world.query_one_mut::<&mut Relationship>(entity).ok()
    }

    fn degree(&self, component: &str) -> usize {
        self.by_component.get(component).map_or(0, Vec::len)
    }

    fn snapshot(&mut self) -> Vec<Relationship> {
        let mut bonds: Vec<Relationship> = self
            .world
            .query_mut::<&Relationship>()
            .into_iter()
            .map(|(_, b)| b.clone())
            .collect();
        bonds.sort_by_key(|b| b.id);
        bonds
    }

    fn insert(&mut self, bond: Relationship) -> Option<Relationship> {
        let entity = self.world.spawn((bond,));
        let id = to_id(entity);
        let stored = {
            let bond = self.world.query_one_mut::<&mut Relationship>(entity).ok()?;
            bond.id = id;
            bond.clone()
        };
        for component in [&stored.component_a, &stored.component_b] {
            self.by_component
                .entry(component.clone())
                .or_default()
                .push(id);
        }
        self.total_formed += 1;
        Some(stored)
    }

    fn unindex(&mut self, component: &str, id: BondId) {
        if let Some(ids) = self.by_component.get_mut(component) {
            ids.retain(|b| *b != id);
            if ids.is_empty() {
                self.by_component.remove(component);
            }
        }
    }

    fn archive(&mut self, bond: Relationship, capacity: usize) {
        self.history.push_back(bond);
        while self.history.len() > capacity {
            self.history.pop_front();
        }
    }

    /// Removes a bond from the arena and both endpoint indices in one step.
    fn break_bond(&mut self, id: BondId, force: bool, config: &BondConfig) -> bool {
        let Some(entity) = to_entity(id) else {
            return false;
        };
        let Ok(bond) = self.world.query_one_mut::<&mut Relationship>(entity) else {
            return false;
        };
        refresh(bond);
        if !force && bond.stability > config.refuse_break_above {
            tracing::debug!(
                bond = %id,
                stability = bond.stability,
                "Refused to break stable bond"
            );
            return false;
        }
        let mut bond = bond.clone();
        if self.world.despawn(entity).is_err() {
            return false;
        }
        self.unindex(&bond.component_a, id);
        self.unindex(&bond.component_b, id);
        bond.state = BondState::Broken;
        tracing::debug!(
            bond = %id,
            a = %bond.component_a,
            b = %bond.component_b,
            forced = force,
            "Bond broken"
        );
        self.archive(bond, config.history_capacity);
        self.total_broken += 1;
        true
    }

    fn breakpoint(&mut self, config: &BondConfig) -> f64 {
        let jitter = bounded_jitter(config.breakpoint_jitter);
        if jitter > 0.0 {
            config.base_breakpoint + self.rng.gen_range(-jitter..=jitter)
        } else {
            config.base_breakpoint
        }
    }
}

/// Owns every active relationship and the shared environment.
pub struct RelationshipEngine {
    catalog: Arc<ProfileCatalog>,
    config: BondConfig,
    metrics: Arc<Metrics>,
    ledger: Mutex<BondLedger>,
}

impl RelationshipEngine {
    pub fn new<R>(catalog: Arc<ProfileCatalog>, config: BondConfig, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            catalog,
            config,
            metrics: Arc::new(Metrics::new()),
            ledger: Mutex::new(BondLedger::new(Environment::default(), Box::new(rng))),
        }
    }

    /// Engine with a reproducible random source.
    pub fn with_seed(catalog: Arc<ProfileCatalog>, config: BondConfig, seed: u64) -> Self {
        Self::new(catalog, config, ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_environment(self, environment: Environment) -> Self {
        self.lock().environment = environment.clamped();
        self
    }

    fn lock(&self) -> MutexGuard<'_, BondLedger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<ProfileCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &BondConfig {
        &self.config
    }

    fn refuse(&self, ledger: &mut BondLedger) -> Option<Relationship> {
        ledger.total_refused += 1;
        self.metrics.increment_counter(metrics::BONDS_REFUSED);
        None
    }

    /// Forms a bond between two component instances.
    ///
    /// Returns `None` without touching any state when either type is unknown,
    /// the profiles are incompatible, the ids are equal, or either instance is
    /// already at its profile's bond capacity. An unresolvable catalyst is
    /// ignored.
    pub fn form_bond(
        &self,
        id_a: &str,
        type_a: &Identifier,
        id_b: &str,
        type_b: &Identifier,
        catalyst: Option<&Identifier>,
    ) -> Option<Relationship> {
        let mut ledger = self.lock();

        let (Some(a), Some(b)) = (
            self.catalog.get_profile(type_a),
            self.catalog.get_profile(type_b),
        ) else {
            tracing::warn!(%type_a, %type_b, "Cannot bond unknown profile");
            return self.refuse(&mut ledger);
        };

        if id_a == id_b {
            tracing::debug!(component = id_a, "Refused self bond");
            return self.refuse(&mut ledger);
        }

        let compatibility = self.catalog.check_compatibility(a, b);
        if !compatibility.is_compatible() {
            tracing::debug!(
                a = id_a,
                b = id_b,
                reason = %compatibility,
                "Incompatible profiles"
            );
            return self.refuse(&mut ledger);
        }

        for (component, profile) in [(id_a, a), (id_b, b)] {
            if ledger.degree(component) >= usize::from(profile.bond_capacity) {
                tracing::debug!(
                    component,
                    capacity = profile.bond_capacity,
                    "Bond capacity reached"
                );
                return self.refuse(&mut ledger);
            }
        }

        let catalyst = catalyst.and_then(|c| {
            let found = self.catalog.get_profile(c);
            if found.is_none() {
                tracing::warn!(catalyst = %c, "Ignoring unknown catalyst");
            }
            found
        });

        let environment = ledger.environment;
        let bond = self.draft(id_a, a, id_b, b, catalyst, environment);
        let bond = ledger.insert(bond)?;
        drop(ledger);

        self.metrics.increment_counter(metrics::BONDS_FORMED);
        tracing::debug!(
            bond = %bond.id,
            a = id_a,
            b = id_b,
            kind = ?bond.kind,
            strength = bond.strength,
            stability = bond.stability,
            "Bond formed"
        );
        Some(bond)
    }

    fn draft(
        &self,
        id_a: &str,
        a: &Profile,
        id_b: &str,
        b: &Profile,
        catalyst: Option<&Profile>,
        environment: Environment,
    ) -> Relationship {
        let d = ProfileCatalog::property_difference(a, b);
        let kind = self.catalog.bond_kind(a, b);
        let mut strength = self.catalog.bond_strength(a, b);
        let mut formation_energy = strength * 45.0 + d * 20.0;
        if catalyst.is_some() {
            strength = (strength * self.config.catalyst_strength_boost).min(10.0);
            formation_energy *= self.config.catalyst_energy_factor;
        }
        let mut bond = Relationship {
            id: BondId(0),
            component_a: id_a.to_string(),
            component_b: id_b.to_string(),
            symbol_a: a.symbol.clone(),
            symbol_b: b.symbol.clone(),
            kind,
            strength,
            length: bond_length(a, b, kind),
            formation_energy,
            state: BondState::Forming,
            stress: 0.0,
            stability: 0.0,
            environment,
            activation_count: 0,
            failure_count: 0,
            last_stress: None,
            catalyst: catalyst.map(|c| c.symbol.clone()),
            catalyzed: catalyst.is_some(),
        };
        refresh(&mut bond);
        bond.state = BondState::Stable;
        bond
    }

    /// Breaks a bond. Without `force`, bonds above the refusal threshold
    /// survive and `false` is returned.
    pub fn break_bond(&self, id: BondId, force: bool) -> bool {
        let broken = self.lock().break_bond(id, force, &self.config);
        if broken {
            self.metrics.increment_counter(metrics::BONDS_BROKEN);
        }
        broken
    }

    /// Multiplies strength by `factor` (capped at 10) and heals some stress.
    /// Stability is recomputed from the new strength and stress, so it scales
    /// with the same factor until it reaches the cap.
    pub fn strengthen_bond(&self, id: BondId, factor: f64) -> bool {
        if !factor.is_finite() || factor < 0.0 {
            return false;
        }
        let mut ledger = self.lock();
        let Some(bond) = ledger.bond(id) else {
            return false;
        };
        bond.strength = (bond.strength * factor).clamp(0.0, 10.0);
        bond.stress = (bond.stress - self.config.strengthen_heal).max(0.0);
        refresh(bond);
        bond.activation_count += 1;
        settle(bond);
        tracing::debug!(bond = %id, strength = bond.strength, "Bond strengthened");
        true
    }

    /// Adds stress to a bond. Returns whether the bond survived.
    ///
    /// Stability is recomputed and compared with a breakpoint drawn around
    /// `base_breakpoint`; a bond below it is moved to `Breaking` and then
    /// broken immediately.
    pub fn apply_stress(&self, id: BondId, amount: f64, kind: StressKind) -> bool {
        let amount = if amount.is_nan() { 0.0 } else { amount.max(0.0) };
        let mut ledger = self.lock();
        let breakpoint = ledger.breakpoint(&self.config);
        let Some(bond) = ledger.bond(id) else {
            return false;
        };
        bond.stress = (bond.stress + amount).min(1.0);
        bond.last_stress = Some(kind);
        refresh(bond);

        if bond.stability < breakpoint {
            bond.state = BondState::Breaking;
            bond.failure_count += 1;
            tracing::debug!(
                bond = %id,
                stability = bond.stability,
                breakpoint,
                ?kind,
                "Bond failed under stress"
            );
            let broken = ledger.break_bond(id, true, &self.config);
            drop(ledger);
            if broken {
                self.metrics.increment_counter(metrics::BONDS_BROKEN);
            }
            return false;
        }

        settle(bond);
        if bond.state == BondState::Strained {
            bond.failure_count += 1;
            self.metrics.increment_counter(metrics::BONDS_STRAINED);
        }
        true
    }

    /// Lowers stress on a bond and re-evaluates its state.
    pub fn heal_bond(&self, id: BondId, amount: f64) -> bool {
        let amount = if amount.is_nan() { 0.0 } else { amount.max(0.0) };
        let mut ledger = self.lock();
        let Some(bond) = ledger.bond(id) else {
            return false;
        };
        bond.stress = (bond.stress - amount).max(0.0);
        refresh(bond);
        settle(bond);
        true
    }

    /// Applies catalytic acceleration to an existing bond.
    pub fn catalyze_bond(&self, id: BondId, catalyst: &Identifier) -> bool {
        let Some(profile) = self.catalog.get_profile(catalyst) else {
            return false;
        };
        let mut ledger = self.lock();
        let Some(bond) = ledger.bond(id) else {
            return false;
        };
        bond.strength = (bond.strength * self.config.catalyst_strength_boost).min(10.0);
        bond.formation_energy *= self.config.catalyst_energy_factor;
        bond.catalyzed = true;
        bond.catalyst = Some(profile.symbol.clone());
        refresh(bond);
        settle(bond);
        true
    }

    /// Clamps the given parameters, stores them, and rewrites them into every
    /// active bond. Returns the resulting environment.
    pub fn update_environment(
        &self,
        temperature: Option<f64>,
        pressure: Option<f64>,
        acidity: Option<f64>,
    ) -> Environment {
        let mut ledger = self.lock();
        let mut env = ledger.environment;
        if let Some(t) = temperature {
            env.temperature = t;
        }
        if let Some(p) = pressure {
            env.pressure = p;
        }
        if let Some(a) = acidity {
            env.acidity = a;
        }
        let env = env.clamped();
        ledger.environment = env;
        for (_, bond) in ledger.world.query_mut::<&mut Relationship>() {
            bond.environment = env;
            refresh(bond);
            settle(bond);
        }
        tracing::debug!(
            temperature = env.temperature,
            pressure = env.pressure,
            acidity = env.acidity,
            "Environment updated"
        );
        env
    }

    /// Periodic sweep: heals lightly stressed bonds, purges bonds stuck in
    /// `Breaking`, and lets nearly unbound bonds fall apart at random.
    pub fn maintain(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();
        let mut ledger = self.lock();
        let cfg = &self.config;

        for (_, bond) in ledger.world.query_mut::<&mut Relationship>() {
            if bond.stress > 0.0 && bond.stress < cfg.maintenance_heal_below {
                bond.stress = (bond.stress - cfg.maintenance_heal).max(0.0);
                refresh(bond);
                settle(bond);
                report.healed += 1;
            }
        }

        let doomed: Vec<BondId> = ledger
            .snapshot()
            .into_iter()
            .filter(|b| matches!(b.state, BondState::Breaking | BondState::Broken))
            .map(|b| b.id)
            .collect();
        for id in doomed {
            if ledger.break_bond(id, true, cfg) {
                report.purged.push(id);
            }
        }

        let weak: Vec<BondId> = ledger
            .snapshot()
            .into_iter()
            .filter(|b| b.stability < cfg.spontaneous_break_below)
            .map(|b| b.id)
            .collect();
        let chance = bounded_chance(cfg.spontaneous_break_chance);
        for id in weak {
            if ledger.rng.gen_bool(chance)
                && ledger.break_bond(id, true, cfg)
            {
                report.spontaneous_breaks.push(id);
            }
        }
        drop(ledger);

        self.metrics
            .add(metrics::BONDS_BROKEN, report.removed() as u64);
        self.metrics.add(
            metrics::SPONTANEOUS_BREAKS,
            report.spontaneous_breaks.len() as u64,
        );
        if report.removed() > 0 {
            tracing::debug!(
                healed = report.healed,
                purged = report.purged.len(),
                spontaneous = report.spontaneous_breaks.len(),
                "Maintenance sweep"
            );
        }
        report
    }

    #[must_use]
    pub fn get_bond(&self, id: BondId) -> Option<Relationship> {
        self.lock().bond(id).map(|b| b.clone())
    }

    #[must_use]
    pub fn get_bonds_for_component(&self, component: &str) -> Vec<Relationship> {
        let mut ledger = self.lock();
        let ids = ledger.by_component.get(component).cloned().unwrap_or_default();
        ids.into_iter()
            .filter_map(|id| ledger.bond(id).map(|b| b.clone()))
            .collect()
    }

    /// Number of active bonds held by one component instance.
    #[must_use]
    pub fn degree(&self, component: &str) -> usize {
        self.lock().degree(component)
    }

    /// Snapshot of every active bond, ordered by handle.
    #[must_use]
    pub fn active_bonds(&self) -> Vec<Relationship> {
        self.lock().snapshot()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().world.len() as usize
    }

    /// Broken bonds, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Relationship> {
        self.lock().history.iter().cloned().collect()
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.lock().environment
    }

    #[must_use]
    pub fn get_statistics(&self) -> BondStatistics {
        let mut ledger = self.lock();
        let bonds = ledger.snapshot();
        let mut stats = BondStatistics {
            active: bonds.len(),
            archived: ledger.history.len(),
            total_formed: ledger.total_formed,
            total_broken: ledger.total_broken,
            total_refused: ledger.total_refused,
            environment: ledger.environment,
            ..Default::default()
        };
        drop(ledger);

        if bonds.is_empty() {
            return stats;
        }
        let n = bonds.len() as f64;
        for b in &bonds {
            stats.avg_strength += b.strength;
            stats.avg_stability += b.stability;
            stats.avg_stress += b.stress;
            if b.catalyzed {
                stats.catalyzed += 1;
            }
            *stats.by_kind.entry(b.kind).or_insert(0) += 1;
            *stats.by_state.entry(b.state).or_insert(0) += 1;
        }
        stats.avg_strength /= n;
        stats.avg_stability /= n;
        stats.avg_stress /= n;
        stats
    }
}

/// Summed radii scaled by how tightly each bond kind pulls its endpoints.
#[must_use]
pub fn bond_length(a: &Profile, b: &Profile, kind: BondKind) -> f64 {
    (a.radius + b.radius) * kind.length_factor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RelationshipEngine {
        RelationshipEngine::with_seed(
            Arc::new(ProfileCatalog::standard()),
            BondConfig::default(),
            42,
        )
    }

    fn sym(s: &str) -> Identifier {
        Identifier::symbol(s)
    }

    #[test]
    fn test_standard_stability_is_strength() {
        let env = Environment::default();
        let factors = StabilityFactors::new(7.5, 0.0, &env);
        assert_eq!(factors.temperature, 1.0);
        assert_eq!(factors.pressure, 1.0);
        assert_eq!(factors.acidity, 1.0);
        assert!((factors.stability() - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_factor_floors() {
        let env = Environment::new(5000.0, 0.0, 0.0);
        let factors = StabilityFactors::new(10.0, 1.0, &env);
        assert_eq!(factors.temperature, 0.1);
        assert_eq!(factors.pressure, 0.9);
        assert_eq!(factors.acidity, 0.5);
        assert_eq!(factors.stress, 0.1);
    }

    #[test]
    fn test_bounded_draw_parameters() {
        assert_eq!(bounded_jitter(f64::MAX), 10.0);
        assert_eq!(bounded_jitter(f64::INFINITY), 0.0);
        assert_eq!(bounded_jitter(-1.0), 0.0);
        assert_eq!(bounded_chance(2.0), 1.0);
        assert_eq!(bounded_chance(f64::NAN), 0.0);
    }

    #[test]
    fn test_unvalidated_config_cannot_break_sampling() {
        let engine = RelationshipEngine::with_seed(
            Arc::new(ProfileCatalog::standard()),
            BondConfig {
                spontaneous_break_chance: 2.0,
                breakpoint_jitter: f64::INFINITY,
                ..Default::default()
            },
            42,
        );
        let bond = engine.form_bond("a", &sym("C"), "b", &sym("C"), None).unwrap();
        assert!(engine.apply_stress(bond.id, 0.1, StressKind::Mechanical));

        engine.update_environment(Some(5000.0), None, None);
        let report = engine.maintain();
        assert_eq!(report.spontaneous_breaks, vec![bond.id]);
    }

    #[test]
    fn test_strengthen_keeps_stability_current() {
        let engine = engine();
        let bond = engine.form_bond("a", &sym("C"), "b", &sym("C"), None).unwrap();
        assert!(engine.apply_stress(bond.id, 0.3, StressKind::Thermal));
        assert!(engine.strengthen_bond(bond.id, 1.05));

        let current = engine.get_bond(bond.id).unwrap();
        let expected = compute_stability(current.strength, current.stress, &current.environment);
        assert!((current.stability - expected).abs() < 1e-12);
        assert!((engine.get_statistics().avg_stability - expected).abs() < 1e-12);
    }

    #[test]
    fn test_form_bond_indexes_both_endpoints() {
        let engine = engine();
        let bond = engine
            .form_bond("svc-a", &sym("C"), "svc-b", &sym("O"), None)
            .expect("C-O should bond");
        assert_eq!(bond.state, BondState::Stable);
        assert_eq!(bond.kind, BondKind::Covalent);
        assert_eq!(engine.get_bonds_for_component("svc-a").len(), 1);
        assert_eq!(engine.get_bonds_for_component("svc-b").len(), 1);
        assert_eq!(engine.get_bond(bond.id), Some(bond));
    }

    #[test]
    fn test_unknown_or_incompatible_is_none() {
        let engine = engine();
        assert!(engine
            .form_bond("a", &sym("Zz"), "b", &sym("O"), None)
            .is_none());
        assert!(engine
            .form_bond("a", &sym("Ne"), "b", &sym("O"), None)
            .is_none());
        assert!(engine.form_bond("a", &sym("C"), "a", &sym("O"), None).is_none());
        assert_eq!(engine.active_count(), 0);
        assert_eq!(engine.get_statistics().total_refused, 3);
    }

    #[test]
    fn test_capacity_enforced() {
        let engine = engine();
        assert!(engine.form_bond("h", &sym("H"), "c1", &sym("C"), None).is_some());
        assert!(engine.form_bond("h", &sym("H"), "c2", &sym("C"), None).is_none());
    }

    #[test]
    fn test_catalyst_boosts_strength() {
        let engine = engine();
        let plain = engine
            .form_bond("a1", &sym("C"), "b1", &sym("N"), None)
            .unwrap();
        let boosted = engine
            .form_bond("a2", &sym("C"), "b2", &sym("N"), Some(&sym("Fe")))
            .unwrap();
        assert!(boosted.catalyzed);
        assert_eq!(boosted.catalyst.as_deref(), Some("Fe"));
        assert!((boosted.strength - (plain.strength * 1.2).min(10.0)).abs() < 1e-9);
        assert!(boosted.formation_energy < plain.formation_energy);
    }

    #[test]
    fn test_unforced_break_refused_when_stable() {
        let engine = engine();
        let bond = engine
            .form_bond("a", &sym("C"), "b", &sym("C"), None)
            .unwrap();
        assert!(bond.stability > 5.0);
        assert!(!engine.break_bond(bond.id, false));
        assert!(engine.break_bond(bond.id, true));
        assert!(!engine.break_bond(bond.id, true));
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].state, BondState::Broken);
    }

    #[test]
    fn test_history_is_bounded() {
        let engine = RelationshipEngine::with_seed(
            Arc::new(ProfileCatalog::standard()),
            BondConfig {
                history_capacity: 2,
                ..Default::default()
            },
            1,
        );
        for i in 0..4 {
            let bond = engine
                .form_bond(&format!("a{i}"), &sym("C"), &format!("b{i}"), &sym("C"), None)
                .unwrap();
            assert!(engine.break_bond(bond.id, true));
        }
        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].component_a, "a2");
        assert_eq!(history[1].component_a, "a3");
    }

    #[test]
    fn test_heal_lowers_stress() {
        let engine = engine();
        let bond = engine
            .form_bond("a", &sym("C"), "b", &sym("C"), None)
            .unwrap();
        assert!(engine.apply_stress(bond.id, 0.2, StressKind::Thermal));
        assert!(engine.heal_bond(bond.id, 0.5));
        assert_eq!(engine.get_bond(bond.id).unwrap().stress, 0.0);
    }

    #[test]
    fn test_maintenance_heals_low_stress() {
        let engine = engine();
        let bond = engine
            .form_bond("a", &sym("C"), "b", &sym("C"), None)
            .unwrap();
        engine.apply_stress(bond.id, 0.2, StressKind::Mechanical);
        let report = engine.maintain();
        assert_eq!(report.healed, 1);
        let stress = engine.get_bond(bond.id).unwrap().stress;
        assert!((stress - 0.15).abs() < 1e-9);
    }
}
