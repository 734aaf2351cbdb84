pub mod env;
pub mod error;
pub mod settings;

pub use settings::engine::{EngineSettings, EngineSettingsBuilder};
