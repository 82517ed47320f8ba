pub mod config_repository;
pub mod json_config_repository;
