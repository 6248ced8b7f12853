use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an AI system sits in its operational timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleStage {
    Planning,
    Development,
    Testing,
    Deployment,
    Monitoring,
    Retired,
}

impl LifecycleStage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Planning,
            Self::Development,
            Self::Testing,
            Self::Deployment,
            Self::Monitoring,
            Self::Retired,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Development => "Development",
            Self::Testing => "Testing",
            Self::Deployment => "Deployment",
            Self::Monitoring => "Monitoring",
            Self::Retired => "Retired",
        }
    }

    /// Retired systems are frozen; every other stage may record new risks.
    pub const fn can_create_risk_assessment(self) -> bool {
        !matches!(self, Self::Retired)
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Planning => Some(Self::Development),
            Self::Development => Some(Self::Testing),
            Self::Testing => Some(Self::Deployment),
            Self::Deployment => Some(Self::Monitoring),
            Self::Monitoring => Some(Self::Retired),
            Self::Retired => None,
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle stage '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for LifecycleStage {
    type Err = UnknownStage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownStage(value.to_string()))
    }
}
