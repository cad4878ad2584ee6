//! Cluster assembly: groups of component instances joined by bonds.
//!
//! The engine owns the active clusters and the component membership map. It
//! never stores bonds itself; every edge is formed, catalyzed, and broken
//! through the shared [`RelationshipEngine`]. Those calls are made while
//! holding only this engine's lock, so a cluster operation is not atomic with
//! respect to unrelated bond traffic.

pub mod dynamics;
pub mod properties;

pub use dynamics::{DynamicsEvent, DynamicsReport};
pub use properties::Properties;

use crate::catalog::ProfileCatalog;
use crate::config::{AssemblyPolicy, ClusterConfig};
use crate::error::{CoreError, Result};
use crate::metrics::{self, Metrics};
use crate::relationship::{bounded_jitter, compute_stability, RelationshipEngine};
use crate::topology::{count_fragments, Topology};
use covalence_data::{
    Cluster, ClusterId, ClusterState, ClusterStatistics, Environment, Identifier, Relationship,
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

fn to_id(entity: hecs::Entity) -> ClusterId {
    ClusterId(entity.to_bits().get())
}

fn to_entity(id: ClusterId) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(id.0)
}

fn apply(cluster: &mut Cluster, props: Properties) {
    cluster.formula = props.formula;
    cluster.weight = props.weight;
    cluster.geometry = props.geometry;
    cluster.stability = props.stability;
    cluster.polarity = props.polarity;
    cluster.reactivity = props.reactivity;
    cluster.catalytic_sites = props.catalytic_sites;
    cluster.state = props.state;
    cluster.function = props.function;
}

pub struct ClusterLedger {
    world: hecs::World,
    membership: HashMap<String, ClusterId>,
    /// Clusters flagged for dissociation by the previous dynamics step.
    pending: HashSet<ClusterId>,
    rng: Box<dyn RngCore + Send>,
    total_assembled: u64,
    total_dissociated: u64,
    reactions_succeeded: u64,
    reactions_failed: u64,
}

impl ClusterLedger {
    fn new(rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            world: hecs::World::new(),
            membership: HashMap::new(),
            pending: HashSet::new(),
            rng,
            total_assembled: 0,
            total_dissociated: 0,
            reactions_succeeded: 0,
            reactions_failed: 0,
        }
    }

    fn cluster(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        let entity = to_entity(id)?;
        self.world.query_one_mut::<&mut Cluster>(entity).ok()
    }

    fn ids(&mut self) -> Vec<ClusterId> {
        let mut ids: Vec<ClusterId> = self
            .world
            .query_mut::<&Cluster>()
            .into_iter()
            .map(|(entity, _)| to_id(entity))
            .collect();
        ids.sort();
        ids
    }

    fn snapshot(&mut self) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = self
            .world
            .query_mut::<&Cluster>()
            .into_iter()
            .map(|(_, c)| c.clone())
            .collect();
        clusters.sort_by_key(|c| c.id);
        clusters
    }

    fn insert(&mut self, cluster: Cluster) -> Option<Cluster> {
        let entity = self.world.spawn((cluster,));
        let id = to_id(entity);
        let cluster = {
            let cluster = self.world.query_one_mut::<&mut Cluster>(entity).ok()?;
            cluster.id = id;
            cluster.clone()
        };
        for component in &cluster.components {
            self.membership.insert(component.clone(), id);
        }
        self.total_assembled += 1;
        Some(cluster)
    }

    /// Drops a cluster, its memberships, any pending flag, and every cached
    /// affinity pointing at it.
    fn remove(&mut self, id: ClusterId) -> Option<Cluster> {
        let entity = to_entity(id)?;
        let cluster = self.world.remove_one::<Cluster>(entity).ok()?;
        // Entity is empty now; failure here only means it is already gone.
        let _ = self.world.despawn(entity);
        for component in &cluster.components {
            if self.membership.get(component) == Some(&id) {
                self.membership.remove(component);
            }
        }
        self.pending.remove(&id);
        self.forget_affinity(id);
        self.total_dissociated += 1;
        Some(cluster)
    }

    /// Drops every cached affinity involving `id`, on either side.
    fn forget_affinity(&mut self, id: ClusterId) {
        for (_, cluster) in self.world.query_mut::<&mut Cluster>() {
            if cluster.id == id {
                cluster.affinity_cache.clear();
            } else {
                cluster.affinity_cache.remove(&id);
            }
        }
    }
}

/// Builds and tears down clusters on top of a shared relationship engine.
pub struct ClusterAssemblyEngine {
    catalog: Arc<ProfileCatalog>,
    bonds: Arc<RelationshipEngine>,
    config: ClusterConfig,
    metrics: Arc<Metrics>,
    ledger: Mutex<ClusterLedger>,
}

impl ClusterAssemblyEngine {
    pub fn new<R>(
        catalog: Arc<ProfileCatalog>,
        bonds: Arc<RelationshipEngine>,
        config: ClusterConfig,
        rng: R,
    ) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            catalog,
            bonds,
            config,
            metrics: Arc::new(Metrics::new()),
            ledger: Mutex::new(ClusterLedger::new(Box::new(rng))),
        }
    }

    pub fn with_seed(
        catalog: Arc<ProfileCatalog>,
        bonds: Arc<RelationshipEngine>,
        config: ClusterConfig,
        seed: u64,
    ) -> Self {
        Self::new(catalog, bonds, config, ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ClusterLedger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[must_use]
    pub fn bonds(&self) -> &Arc<RelationshipEngine> {
        &self.bonds
    }

    #[must_use]
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Assembles a new cluster from parallel id and type slices.
    ///
    /// Malformed input (length mismatch, fewer than two members, repeated
    /// ids, bad topology) is an error. Domain refusals return `Ok(None)`:
    /// an unknown type, a member that already belongs to another cluster, or
    /// edges that fail to bond under the configured [`AssemblyPolicy`].
    pub fn assemble<S: AsRef<str>>(
        &self,
        ids: &[S],
        types: &[Identifier],
        topology: &Topology,
    ) -> Result<Option<Cluster>> {
        let ids: Vec<String> = ids.iter().map(|s| s.as_ref().to_string()).collect();
        let mut ledger = self.lock();
        self.assemble_in(&mut ledger, &ids, types, topology)
    }

    fn refuse(&self) -> Result<Option<Cluster>> {
        self.metrics.increment_counter(metrics::CLUSTERS_REFUSED);
        Ok(None)
    }

    fn assemble_in(
        &self,
        ledger: &mut ClusterLedger,
        ids: &[String],
        types: &[Identifier],
        topology: &Topology,
    ) -> Result<Option<Cluster>> {
        if ids.len() != types.len() {
            return Err(CoreError::invalid_input(format!(
                "{} component ids but {} types",
                ids.len(),
                types.len()
            )));
        }
        if ids.len() < 2 {
            return Err(CoreError::invalid_input(
                "a cluster needs at least two members",
            ));
        }
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(CoreError::invalid_input(format!(
                "component '{dup}' listed twice"
            )));
        }
        let edges = topology.edges(ids.len())?;

        let mut profiles = Vec::with_capacity(types.len());
        for ty in types {
            match self.catalog.get_profile(ty) {
                Some(p) => profiles.push(p.clone()),
                None => {
                    tracing::warn!(profile = %ty, "Cannot assemble unknown profile");
                    return self.refuse();
                }
            }
        }

        if let Some((component, owner)) = ids
            .iter()
            .find_map(|id| ledger.membership.get(id).map(|owner| (id, *owner)))
        {
            tracing::debug!(component = %component, owner = %owner, "Component already clustered");
            return self.refuse();
        }

        let mut formed: Vec<Relationship> = Vec::with_capacity(edges.len());
        let mut formed_edges = Vec::with_capacity(edges.len());
        let mut failed = 0usize;
        for &(a, b) in &edges {
            match self
                .bonds
                .form_bond(&ids[a], &types[a], &ids[b], &types[b], None)
            {
                Some(bond) => {
                    formed.push(bond);
                    formed_edges.push((a, b));
                }
                None => failed += 1,
            }
        }

        let rollback = match self.config.policy {
            AssemblyPolicy::AllOrNothing => failed > 0 || formed.is_empty(),
            AssemblyPolicy::BestEffort => formed.is_empty(),
        };
        if rollback {
            for bond in &formed {
                self.bonds.break_bond(bond.id, true);
            }
            tracing::debug!(
                requested = edges.len(),
                failed,
                policy = ?self.config.policy,
                "Cluster assembly rolled back"
            );
            return self.refuse();
        }
        if failed > 0 {
            tracing::debug!(
                requested = edges.len(),
                failed,
                "Cluster assembled with a partial edge set"
            );
        }

        let props = Properties::derive(&profiles, &formed, &formed_edges);
        let mut cluster = Cluster {
            id: ClusterId(0),
            components: ids.to_vec(),
            profiles,
            bonds: formed.iter().map(|b| b.id).collect(),
            fragments: count_fragments(ids.len(), &formed_edges),
            edges: formed_edges,
            formula: String::new(),
            weight: 0.0,
            geometry: props.geometry,
            state: props.state,
            function: props.function,
            stability: 0.0,
            reactivity: 0.0,
            polarity: 0.0,
            catalytic_sites: Vec::new(),
            template: topology.label(),
            catalyst: None,
            affinity_cache: HashMap::new(),
        };
        apply(&mut cluster, props);

        let Some(cluster) = ledger.insert(cluster) else {
            return self.refuse();
        };
        self.metrics.increment_counter(metrics::CLUSTERS_ASSEMBLED);
        tracing::debug!(
            cluster = %cluster.id,
            formula = %cluster.formula,
            geometry = ?cluster.geometry,
            stability = cluster.stability,
            "Cluster assembled"
        );
        Ok(Some(cluster))
    }

    /// Recomputes aggregates from the live bonds. Bonds broken elsewhere are
    /// dropped from the cluster.
    fn refresh(&self, cluster: &mut Cluster) {
        let mut bonds = Vec::with_capacity(cluster.bonds.len());
        let mut edges = Vec::with_capacity(cluster.edges.len());
        for (id, edge) in cluster.bonds.iter().zip(&cluster.edges) {
            if let Some(bond) = self.bonds.get_bond(*id) {
                bonds.push(bond);
                edges.push(*edge);
            }
        }
        let props = Properties::derive(&cluster.profiles, &bonds, &edges);
        cluster.bonds = bonds.iter().map(|b| b.id).collect();
        cluster.fragments = count_fragments(cluster.size(), &edges);
        cluster.edges = edges;
        apply(cluster, props);
    }

    /// Refreshes a held cluster. A polarity change invalidates the cached
    /// affinities on both sides of every pair it belongs to.
    fn refresh_in<'a>(
        &self,
        ledger: &'a mut ClusterLedger,
        id: ClusterId,
    ) -> Option<&'a mut Cluster> {
        let cluster = ledger.cluster(id)?;
        let polarity = cluster.polarity;
        self.refresh(cluster);
        if cluster.polarity != polarity {
            ledger.forget_affinity(id);
        }
        ledger.cluster(id)
    }

    /// Re-derives a cluster's properties under the current environment.
    pub fn refresh_cluster(&self, id: ClusterId) -> Option<Cluster> {
        let mut ledger = self.lock();
        self.refresh_in(&mut ledger, id).cloned()
    }

    /// Breaks every member bond and frees the members. Without `force`, a
    /// cluster whose current stability exceeds the refusal threshold stays.
    pub fn dissociate(&self, id: ClusterId, force: bool) -> bool {
        let mut ledger = self.lock();
        self.dissociate_in(&mut ledger, id, force)
    }

    fn dissociate_in(&self, ledger: &mut ClusterLedger, id: ClusterId, force: bool) -> bool {
        let Some(cluster) = self.refresh_in(ledger, id) else {
            return false;
        };
        if !force && cluster.stability > self.config.refuse_dissociate_above {
            tracing::debug!(
                cluster = %id,
                stability = cluster.stability,
                "Refused to dissociate stable cluster"
            );
            return false;
        }
        let Some(cluster) = ledger.remove(id) else {
            return false;
        };
        for bond in &cluster.bonds {
            self.bonds.break_bond(*bond, true);
        }
        self.metrics.increment_counter(metrics::CLUSTERS_DISSOCIATED);
        tracing::debug!(
            cluster = %id,
            members = cluster.size(),
            forced = force,
            "Cluster dissociated"
        );
        true
    }

    /// Dissolves the reactants and reassembles their combined members as one
    /// cluster, then catalyzes every new bond.
    ///
    /// Fails without side effects when the catalyst is unknown, any reactant
    /// is missing, or the catalyst instance is itself a reactant member. Once
    /// the reactants are dissolved a failed reassembly leaves them dissolved.
    pub fn catalyze_reaction(
        &self,
        reactants: &[ClusterId],
        catalyst_id: &str,
        catalyst_type: &Identifier,
        target: Option<&Topology>,
    ) -> Option<Cluster> {
        let mut ledger = self.lock();
        let product = self.react_in(&mut ledger, reactants, catalyst_id, catalyst_type, target);
        match &product {
            Some(cluster) => {
                ledger.reactions_succeeded += 1;
                self.metrics.increment_counter(metrics::REACTIONS_SUCCEEDED);
                tracing::debug!(
                    cluster = %cluster.id,
                    formula = %cluster.formula,
                    catalyst = catalyst_id,
                    "Reaction succeeded"
                );
            }
            None => {
                ledger.reactions_failed += 1;
                self.metrics.increment_counter(metrics::REACTIONS_FAILED);
                tracing::debug!(catalyst = catalyst_id, "Reaction failed");
            }
        }
        product
    }

    fn react_in(
        &self,
        ledger: &mut ClusterLedger,
        reactants: &[ClusterId],
        catalyst_id: &str,
        catalyst_type: &Identifier,
        target: Option<&Topology>,
    ) -> Option<Cluster> {
        let Some(catalyst) = self.catalog.get_profile(catalyst_type) else {
            tracing::warn!(catalyst = %catalyst_type, "Unknown reaction catalyst");
            return None;
        };

        let mut unique: Vec<ClusterId> = Vec::with_capacity(reactants.len());
        for id in reactants {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return None;
        }

        let mut ids = Vec::new();
        let mut types = Vec::new();
        for id in &unique {
            let cluster = ledger.cluster(*id)?;
            if cluster.contains(catalyst_id) {
                tracing::debug!(catalyst = catalyst_id, "Catalyst is a reactant member");
                return None;
            }
            for (component, profile) in cluster.components.iter().zip(&cluster.profiles) {
                ids.push(component.clone());
                types.push(Identifier::symbol(profile.symbol.clone()));
            }
        }
        for id in &unique {
            self.dissociate_in(ledger, *id, true);
        }

        let topology = target.cloned().unwrap_or_default();
        let product = match self.assemble_in(ledger, &ids, &types, &topology) {
            Ok(Some(cluster)) => cluster,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Reaction product could not be assembled");
                return None;
            }
        };

        for bond in &product.bonds {
            self.bonds.catalyze_bond(*bond, catalyst_type);
        }
        let cluster = self.refresh_in(ledger, product.id)?;
        cluster.catalyst = Some(catalyst.symbol.clone());
        Some(cluster.clone())
    }

    /// Other clusters whose binding affinity with `id` is above the
    /// threshold, best first with ties in handle order. Affinities are cached on the queried cluster.
    pub fn find_compatible(&self, id: ClusterId) -> Vec<(ClusterId, f64)> {
        let mut ledger = self.lock();
        let clusters = ledger.snapshot();
        let Some(target) = clusters.iter().find(|c| c.id == id) else {
            return Vec::new();
        };

        let mut matches = Vec::new();
        let mut fresh = Vec::new();
        for other in clusters.iter().filter(|c| c.id != id) {
            let affinity = match target.affinity_cache.get(&other.id) {
                Some(cached) => *cached,
                None => {
                    let computed = properties::affinity(
                        &self.catalog,
                        (&target.profiles, target.polarity),
                        (&other.profiles, other.polarity),
                    );
                    fresh.push((other.id, computed));
                    computed
                }
            };
            if affinity > self.config.affinity_threshold {
                matches.push((other.id, affinity));
            }
        }
        if let Some(cluster) = ledger.cluster(id) {
            cluster.affinity_cache.extend(fresh);
        }

        matches.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        matches
    }

    fn stability_under(&self, cluster: &Cluster, env: &Environment) -> f64 {
        let stabilities: Vec<f64> = cluster
            .bonds
            .iter()
            .filter_map(|id| self.bonds.get_bond(*id))
            .map(|b| compute_stability(b.strength, b.stress, env))
            .collect();
        properties::cluster_stability(&stabilities, cluster.geometry, cluster.size())
    }

    /// Advances every live cluster through `steps` thermal steps at
    /// `temperature`.
    ///
    /// A cluster that drops below the dissociation threshold is flagged. If it
    /// is still below the threshold at its next step, in this call or a later
    /// one, it is dissociated; otherwise the flag is cleared. The shared
    /// environment is not modified.
    pub fn simulate_dynamics(&self, steps: usize, temperature: f64) -> DynamicsReport {
        let env = self.bonds.environment().with_temperature(temperature).clamped();
        let mut report = DynamicsReport {
            steps,
            temperature: env.temperature,
            ..Default::default()
        };
        let amplitude = bounded_jitter(
            self.config.thermal_noise * env.temperature / Environment::STANDARD_TEMPERATURE,
        );
        let threshold = self.config.dissociation_threshold;

        let mut ledger = self.lock();
        for step in 0..steps {
            for id in ledger.ids() {
                let jitter = if amplitude > 0.0 {
                    ledger.rng.gen_range(-amplitude..=amplitude)
                } else {
                    0.0
                };
                let Some(cluster) = ledger.cluster(id) else {
                    continue;
                };
                let previous = cluster.stability;
                let from = cluster.state;
                let stability = (self.stability_under(cluster, &env) + jitter).clamp(0.0, 10.0);
                cluster.stability = stability;
                cluster.state = ClusterState::from_stability(stability);
                cluster.reactivity =
                    properties::reactivity(&cluster.profiles, cluster.polarity, stability);
                cluster.function = properties::classify_function(
                    !cluster.catalytic_sites.is_empty(),
                    cluster.reactivity,
                    cluster.polarity,
                    stability,
                );
                let to = cluster.state;

                let delta = stability - previous;
                if delta.abs() > self.config.transition_delta {
                    tracing::debug!(cluster = %id, ?from, ?to, delta, "Cluster transition");
                    report.events.push(DynamicsEvent::Transition {
                        step,
                        cluster: id,
                        from,
                        to,
                        delta,
                    });
                }

                if ledger.pending.contains(&id) {
                    if stability < threshold {
                        if self.dissociate_in(&mut ledger, id, true) {
                            report.events.push(DynamicsEvent::Dissociated {
                                step,
                                cluster: id,
                                stability,
                            });
                            report.dissociated.push(id);
                        }
                    } else {
                        ledger.pending.remove(&id);
                        report.events.push(DynamicsEvent::Recovered {
                            step,
                            cluster: id,
                            stability,
                        });
                    }
                } else if stability < threshold {
                    ledger.pending.insert(id);
                    tracing::debug!(cluster = %id, stability, "Dissociation candidate");
                    report.events.push(DynamicsEvent::Candidate {
                        step,
                        cluster: id,
                        stability,
                    });
                }
            }
        }
        report
    }

    #[must_use]
    pub fn get_cluster(&self, id: ClusterId) -> Option<Cluster> {
        self.lock().cluster(id).map(|c| c.clone())
    }

    /// Cluster currently owning `component`.
    #[must_use]
    pub fn cluster_of(&self, component: &str) -> Option<ClusterId> {
        self.lock().membership.get(component).copied()
    }

    /// Snapshot of every active cluster, ordered by handle.
    #[must_use]
    pub fn clusters(&self) -> Vec<Cluster> {
        self.lock().snapshot()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().world.len() as usize
    }

    #[must_use]
    pub fn is_pending_dissociation(&self, id: ClusterId) -> bool {
        self.lock().pending.contains(&id)
    }

    #[must_use]
    pub fn get_statistics(&self) -> ClusterStatistics {
        let mut ledger = self.lock();
        let clusters = ledger.snapshot();
        let attempted = ledger.reactions_succeeded + ledger.reactions_failed;
        let mut stats = ClusterStatistics {
            active: clusters.len(),
            member_components: ledger.membership.len(),
            total_assembled: ledger.total_assembled,
            total_dissociated: ledger.total_dissociated,
            reactions_succeeded: ledger.reactions_succeeded,
            reactions_failed: ledger.reactions_failed,
            reaction_success_rate: if attempted > 0 {
                ledger.reactions_succeeded as f64 / attempted as f64
            } else {
                0.0
            },
            ..Default::default()
        };
        drop(ledger);

        if clusters.is_empty() {
            return stats;
        }
        let n = clusters.len() as f64;
        for c in &clusters {
            stats.avg_size += c.size() as f64;
            stats.avg_stability += c.stability;
            stats.avg_reactivity += c.reactivity;
            stats.avg_polarity += c.polarity;
            stats.catalytic_sites += c.catalytic_sites.len();
            *stats.by_geometry.entry(c.geometry).or_insert(0) += 1;
            *stats.by_function.entry(c.function).or_insert(0) += 1;
            *stats.by_state.entry(c.state).or_insert(0) += 1;
        }
        stats.avg_size /= n;
        stats.avg_stability /= n;
        stats.avg_reactivity /= n;
        stats.avg_polarity /= n;
        stats
    }
}
