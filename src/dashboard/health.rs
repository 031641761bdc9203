use rand::Rng;
use serde::Serialize;

/// Per-check failure probability for each simulated service.
const SERVICES: [(&str, f64); 4] = [
    ("server", 0.10),
    ("database", 0.05),
    ("payment", 0.15),
    ("email", 0.20),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthReport {
    pub failed: Vec<&'static str>,
    /// Whether this check should surface an alert toast.
    pub alert: bool,
}

impl HealthReport {
    pub fn alert_message(&self) -> Option<String> {
        self.alert.then(|| {
            format!(
                "System Alert: {} service(s) experiencing issues",
                self.failed.join(", ")
            )
        })
    }
}

pub fn check_services<R: Rng + ?Sized>(rng: &mut R) -> HealthReport {
    let failed: Vec<&'static str> = SERVICES
        .iter()
        .filter(|(_, p)| rng.gen_bool(*p))
        .map(|(name, _)| *name)
        .collect();
    let alert = !failed.is_empty() && rng.gen_bool(0.3);
    HealthReport { failed, alert }
}
