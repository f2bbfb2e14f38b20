#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod permissions;
mod utils;

pub use config::{EngineConfig, Messages};
pub use permissions::PermissionSet;
