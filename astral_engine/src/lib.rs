#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const ASTRAL_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEV_MODE: bool = cfg!(feature = "dev-mode");

// Core modules
pub mod command;
pub mod data_paths;
pub mod entity_search;
pub mod loader;
pub mod nlp;
pub mod repl;
pub mod spinners;
pub mod style;
pub mod view;
pub mod world;

// Re-exports for convenience
pub use command::{CommandIntent, ParsedIntent};
pub use loader::{load_world, load_world_from};
pub use nlp::{CommandParser, WorldSnapshot};
pub use repl::{dispatch, run_repl};
pub use view::{View, ViewItem};
pub use world::{AstralWorld, Location, WorldModel};
