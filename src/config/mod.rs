pub mod settings;

pub use settings::{HubSpotSettings, ServerSettings, Settings};
