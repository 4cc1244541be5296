pub mod classifier;
pub mod encoder;
pub mod engine;
pub mod recommendations;
pub mod sessions;
pub mod similarity;
pub mod soulprint;
pub mod synthetic;

pub use engine::{ArchetypeEngine, EngineSettings, ModelReport};
pub use sessions::SessionManager;
