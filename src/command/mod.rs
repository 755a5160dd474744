//! Built-in command libraries and the registry that exposes them to the shell.
//!
//! Each library module exports a `library()` function returning a
//! [`LibraryBuilder`](crate::internal::shell::LibraryBuilder); [`registry`]
//! registers all of them.

use std::sync::Arc;

use crate::internal::shell::{CommandRegistry, ShellResult};

pub mod default_commands;
pub mod users;

/// Build the registry of every built-in library, with a fresh sample user store.
pub fn registry() -> ShellResult<CommandRegistry> {
    registry_with_users(Arc::new(users::UserStore::sample()))
}

/// Build the registry of every built-in library around an existing user store.
pub fn registry_with_users(store: Arc<users::UserStore>) -> ShellResult<CommandRegistry> {
    CommandRegistry::builder()
        .library(default_commands::library())
        .library(users::library(store))
        .build()
}
