pub mod entities;
pub mod platform;
pub mod repositories;
pub mod value_objects;
