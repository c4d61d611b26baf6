pub mod common;
pub mod config;
pub mod emit;
pub mod export;
pub mod generate_commands;
pub mod secrets;
pub mod validate;
