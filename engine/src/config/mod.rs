// Engine configuration
pub mod settings;

pub use settings::{AnalysisSettings, DataSettings, EngineSettings};
