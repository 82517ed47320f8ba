pub mod config_repository;
