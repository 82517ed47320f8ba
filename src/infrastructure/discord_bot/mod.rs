pub mod bot;
pub mod platform;
pub mod session;
