use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regulatory frameworks the questionnaires and task blueprints are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regulation {
    #[serde(alias = "eu")]
    EuAiAct,
    #[serde(alias = "uk")]
    UkAiFramework,
    Mas,
}

impl Regulation {
    pub const fn ordered() -> [Self; 3] {
        [Self::EuAiAct, Self::UkAiFramework, Self::Mas]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EuAiAct => "EU AI Act",
            Self::UkAiFramework => "UK AI Regulation Framework",
            Self::Mas => "MAS FEAT Principles",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::EuAiAct => "eu",
            Self::UkAiFramework => "uk",
            Self::Mas => "mas",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown regulation '{0}' (expected eu, uk or mas)")]
pub struct UnknownRegulation(pub String);

impl FromStr for Regulation {
    type Err = UnknownRegulation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "eu" | "eu_ai_act" | "euaiact" => Ok(Self::EuAiAct),
            "uk" | "uk_ai_act" | "uk_ai_framework" => Ok(Self::UkAiFramework),
            "mas" | "mas_feat" | "singapore" => Ok(Self::Mas),
            _ => Err(UnknownRegulation(value.to_string())),
        }
    }
}
