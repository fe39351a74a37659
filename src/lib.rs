pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{cache::MemorySessionCache, catalog::StaticCatalog, gemini::GeminiItemSource};
pub use core::{
    engine::BingoEngine,
    generator::{generate_card, generate_cards},
    pool::build_pool,
};
pub use domain::model::{
    CardLayout, CardPool, Cell, GenerationRequest, Topic, TopicSource, FREE_SPACE,
};
pub use utils::error::{BingoError, Result};
