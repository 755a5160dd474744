//! Internal layer exports for shell configuration and the command dispatch engine.

pub mod config;
pub mod shell;
