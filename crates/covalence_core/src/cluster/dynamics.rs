use covalence_data::{ClusterId, ClusterState};
use serde::Serialize;

/// Something notable that happened to one cluster during a dynamics step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DynamicsEvent {
    /// Stability swung by more than the transition delta.
    Transition {
        step: usize,
        cluster: ClusterId,
        from: ClusterState,
        to: ClusterState,
        delta: f64,
    },
    /// Fell below the dissociation threshold; dissociates on the next step
    /// unless it recovers first.
    Candidate {
        step: usize,
        cluster: ClusterId,
        stability: f64,
    },
    /// A flagged cluster climbed back above the threshold.
    Recovered {
        step: usize,
        cluster: ClusterId,
        stability: f64,
    },
    /// A flagged cluster was still too weak and fell apart.
    Dissociated {
        step: usize,
        cluster: ClusterId,
        stability: f64,
    },
}

impl DynamicsEvent {
    #[must_use]
    pub fn cluster(&self) -> ClusterId {
        match self {
            DynamicsEvent::Transition { cluster, .. }
            | DynamicsEvent::Candidate { cluster, .. }
            | DynamicsEvent::Recovered { cluster, .. }
            | DynamicsEvent::Dissociated { cluster, .. } => *cluster,
        }
    }
}

/// Log of one `simulate_dynamics` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DynamicsReport {
    pub steps: usize,
    pub temperature: f64,
    pub events: Vec<DynamicsEvent>,
    pub dissociated: Vec<ClusterId>,
}

impl DynamicsReport {
    pub fn transitions(&self) -> impl Iterator<Item = &DynamicsEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, DynamicsEvent::Transition { .. }))
    }

    pub fn candidates(&self) -> impl Iterator<Item = &DynamicsEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, DynamicsEvent::Candidate { .. }))
    }
}
