use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::model::incident::{Incident, Severity};

/// Random additions stop once this many incidents are open.
pub const MAX_OPEN_INCIDENTS: usize = 20;
/// Resolved incidents kept for display, newest first.
pub const MAX_RESOLVED_KEPT: usize = 20;

const INCIDENT_POOL: [(&str, Severity); 5] = [
    ("API Timeout - User Service", Severity::Warning),
    ("Database Connection Slow", Severity::Warning),
    ("Image Upload Failed", Severity::Normal),
    ("Email Service Down", Severity::Critical),
    ("CDN Cache Issue", Severity::Normal),
];
const REPORTED: [&str; 3] = ["Just now", "1 min ago", "30 sec ago"];

#[derive(Debug, Clone, PartialEq)]
pub enum Fluctuation {
    Added(Incident),
    Resolved(Incident),
    Unchanged,
}

/// Error and bug tracker, newest first.
#[derive(Debug, Clone)]
pub struct IncidentTracker {
    incidents: Vec<Incident>,
}

impl Default for IncidentTracker {
    fn default() -> Self {
        Self::seeded()
    }
}

impl IncidentTracker {
    pub fn seeded() -> Self {
        let seed = [
            ("1", "Payment Gateway Error", "5 minutes ago", Severity::Critical),
            ("2", "Slow Page Load - Homepage", "15 minutes ago", Severity::Warning),
            ("3", "Mobile Responsive Issue", "1 hour ago", Severity::Normal),
            ("4", "Cart Calculation Bug", "2 hours ago", Severity::Warning),
        ];
        Self {
            incidents: seed
                .iter()
                .map(|(id, title, reported, severity)| Incident {
                    id: id.to_string(),
                    title: title.to_string(),
                    severity: *severity,
                    reported: reported.to_string(),
                    resolved: false,
                })
                .collect(),
        }
    }

    pub fn open(&self) -> Vec<&Incident> {
        self.incidents.iter().filter(|i| !i.resolved).collect()
    }

    pub fn open_count(&self) -> usize {
        self.incidents.iter().filter(|i| !i.resolved).count()
    }

    pub fn all(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn add_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Incident {
        let (title, severity) = INCIDENT_POOL
            .choose(rng)
            .copied()
            .unwrap_or(INCIDENT_POOL[0]);
        let incident = Incident {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            severity,
            reported: REPORTED.choose(rng).copied().unwrap_or("Just now").to_string(),
            resolved: false,
        };
        self.incidents.insert(0, incident.clone());
        self.prune_resolved();
        incident
    }

    pub fn resolve(&mut self, id: &str) -> Option<Incident> {
        let incident = self
            .incidents
            .iter_mut()
            .find(|i| i.id == id && !i.resolved)?;
        incident.resolved = true;
        let resolved = incident.clone();
        self.prune_resolved();
        Some(resolved)
    }

    fn prune_resolved(&mut self) {
        let mut kept = 0;
        self.incidents.retain(|i| {
            if !i.resolved {
                return true;
            }
            kept += 1;
            kept <= MAX_RESOLVED_KEPT
        });
    }

    /// Coin flip: add an incident while below the cap, otherwise let the
    /// oldest open one clear, keeping at least one open.
    pub fn fluctuate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Fluctuation {
        let open = self.open_count();
        if rng.gen_bool(0.5) && open < MAX_OPEN_INCIDENTS {
            return Fluctuation::Added(self.add_random(rng));
        }
        if open > 1 {
            let oldest = self
                .incidents
                .iter()
                .rev()
                .find(|i| !i.resolved)
                .map(|i| i.id.clone());
            if let Some(resolved) = oldest.and_then(|id| self.resolve(&id)) {
                return Fluctuation::Resolved(resolved);
            }
        }
        Fluctuation::Unchanged
    }
}
