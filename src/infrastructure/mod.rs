pub mod discord_bot;
pub mod http;
pub mod repositories;
pub mod settings;
