pub mod boost;
pub mod guild_config;
pub mod role_delta;
pub mod snapshot;
