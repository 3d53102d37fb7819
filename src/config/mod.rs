/// Database connection and table creation
pub mod database;

/// Application settings and seed data loaded from config.toml and the environment
pub mod settings;

pub use settings::{AiConfig, AppConfig, SeedCustomer, ServerConfig, load_app_configuration};
