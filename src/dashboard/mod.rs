//! Simulated back-office panels: seller onboarding, the error tracker and
//! service health. Nothing here is backed by a real data source.

pub mod health;
pub mod incidents;
pub mod sellers;

pub use health::{check_services, HealthReport};
pub use incidents::IncidentTracker;
pub use sellers::ApplicationQueue;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutiveRole {
    Cto,
    Coo,
    Cofounder,
    Marketing,
}

impl ExecutiveRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cto" => Some(Self::Cto),
            "coo" => Some(Self::Coo),
            "cofounder" => Some(Self::Cofounder),
            "marketing" => Some(Self::Marketing),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Cto => "CTO Dashboard",
            Self::Coo => "COO Dashboard",
            Self::Cofounder => "Co-founder Dashboard",
            Self::Marketing => "Marketing Manager Dashboard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executive_roles_parse_case_insensitively() {
        assert_eq!(ExecutiveRole::parse("CTO"), Some(ExecutiveRole::Cto));
        assert_eq!(
            ExecutiveRole::parse(" cofounder "),
            Some(ExecutiveRole::Cofounder)
        );
        assert_eq!(ExecutiveRole::parse("cfo"), None);
        assert_eq!(
            ExecutiveRole::Marketing.title(),
            "Marketing Manager Dashboard"
        );
    }
}
