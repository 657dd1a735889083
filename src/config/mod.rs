pub mod settings;

pub use settings::{PathSettings, Settings};
