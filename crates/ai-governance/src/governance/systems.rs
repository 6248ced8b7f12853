use std::fmt;

use serde::{Deserialize, Serialize};

use super::lifecycle::LifecycleStage;
use super::regulation::Regulation;
use super::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub String);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An AI system under governance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSystem {
    pub id: SystemId,
    pub name: String,
    pub regulation: Regulation,
    pub lifecycle_stage: LifecycleStage,
}

/// Lookup of registered systems, backed by the hosted database in production.
pub trait SystemDirectory: Send + Sync {
    fn fetch_system(&self, id: &SystemId) -> Result<Option<AiSystem>, RepositoryError>;
}
