//! Command resolution and dispatch engine.
//!
//! An input line such as `Users.Create John "van Lennon"` goes through:
//!
//! - **Parser**: splits the line into library, command and raw arguments
//! - **Registry**: looks up the command's signature and handler
//! - **Coerce**: converts each raw argument into the declared parameter kind
//! - **Dispatcher**: checks arity, binds defaults, and calls the handler
//!
//! The [`repl`] module drives the dispatcher from a console.

pub mod args;
pub mod coerce;
pub mod dispatcher;
pub mod error;
pub mod kind;
pub mod parser;
pub mod registry;
pub mod repl;

pub use args::Args;
pub use coerce::coerce;
pub use dispatcher::Dispatcher;
pub use error::{ShellError, ShellResult};
pub use kind::{FromValue, ParamKind, Value};
pub use parser::{DEFAULT_LIBRARY, ParsedInvocation};
pub use registry::{
    CommandHandler, CommandRegistry, CommandRegistryBuilder, CommandSignature, LibraryBuilder,
    Param, RegisteredCommand,
};
pub use repl::{DEFAULT_PROMPT, Repl};
