mod component;
mod config;
mod error;
mod loader;
mod projection;
mod render;
pub mod scale;
mod scene;
mod simulation;
mod state;
mod topology;
mod transition;
mod types;

pub use component::AirportMapCanvas;
pub use config::MapConfig;
pub use types::Mode;
