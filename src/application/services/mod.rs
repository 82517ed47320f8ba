pub mod boost_service;
pub mod config_service;
pub mod notification_service;
pub mod role_reconciler;
