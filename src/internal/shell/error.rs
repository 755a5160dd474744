//! Error types for command resolution and dispatch.

use thiserror::Error;

use super::kind::ParamKind;

/// Errors that can occur while resolving, binding or invoking a command.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Library or command name not present in the registry.
    #[error("Unrecognized command '{library}.{command}'. Please type a valid command.")]
    UnrecognizedCommand { library: String, command: String },

    /// Fewer arguments than required parameters.
    #[error(
        "Missing required argument. {required} required, {optional} optional, {provided} provided."
    )]
    MissingArguments {
        required: usize,
        optional: usize,
        provided: usize,
    },

    /// More arguments than declared parameters.
    #[error("Too many arguments. At most {max} accepted, {provided} provided.")]
    TooManyArguments { max: usize, provided: usize },

    /// An argument string could not be converted to its parameter's kind.
    #[error(
        "The value '{value}' passed for argument '{argument}' (position {position}) cannot be parsed to type {kind}."
    )]
    Coercion {
        argument: String,
        position: usize,
        kind: ParamKind,
        value: String,
    },

    /// The declared parameter kind has no coercion rule.
    #[error("Parameter '{argument}' has unsupported type {kind}")]
    UnsupportedKind { argument: String, kind: ParamKind },

    /// A registration that violates the signature rules.
    #[error("Invalid signature for '{command}': {reason}")]
    InvalidSignature { command: String, reason: String },

    /// A parameter slot left without a value after binding.
    #[error("No value bound for parameter '{0}'")]
    Unbound(String),

    /// A handler read an argument with the wrong type or position.
    #[error("Argument {position} is not a {expected}")]
    ArgumentType { position: usize, expected: ParamKind },

    /// The invoked operation itself failed.
    #[error(transparent)]
    Operation(anyhow::Error),

    /// Invalid command-line usage of the shell binary itself.
    #[error("{0}")]
    Usage(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error on the console streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Whether the error was caused by user input rather than a registry or
    /// environment fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ShellError::UnrecognizedCommand { .. }
                | ShellError::MissingArguments { .. }
                | ShellError::TooManyArguments { .. }
                | ShellError::Coercion { .. }
                | ShellError::Operation(_)
        )
    }
}

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;
