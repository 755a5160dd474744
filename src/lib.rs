//! cmdshell: an interactive shell that resolves `Library.Command arg...` lines
//! against a registry of typed command handlers.

pub mod cli;
pub mod command;
pub mod internal;
pub mod utils;
