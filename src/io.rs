pub mod config;
pub mod error;
pub mod obj_loader;
