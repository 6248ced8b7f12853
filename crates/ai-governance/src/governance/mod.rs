pub mod assessment;
pub mod extract;
pub mod identity;
pub mod lifecycle;
pub mod regulation;
pub mod repository;
pub mod risk;
pub mod systems;
pub mod tasks;

pub use lifecycle::LifecycleStage;
pub use regulation::Regulation;
pub use repository::RepositoryError;
pub use systems::{AiSystem, SystemDirectory, SystemId};
