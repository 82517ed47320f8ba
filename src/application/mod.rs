pub mod commands;
pub mod services;
