//! Dispatcher: resolve → check arity → coerce → invoke.

use std::sync::Arc;

use super::{
    args::Args,
    coerce::coerce,
    error::{ShellError, ShellResult},
    kind::Value,
    parser::{DEFAULT_LIBRARY, ParsedInvocation},
    registry::CommandRegistry,
};

/// Routes parsed input lines to registered command handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    default_library: String,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            default_library: DEFAULT_LIBRARY.to_string(),
        }
    }

    /// Use `library` for unqualified commands in [`Dispatcher::execute_line`].
    pub fn with_default_library(mut self, library: impl Into<String>) -> Self {
        self.default_library = library.into();
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn default_library(&self) -> &str {
        &self.default_library
    }

    /// Tokenize and execute one input line.
    pub fn execute_line(&self, line: &str) -> ShellResult<String> {
        let invocation = ParsedInvocation::parse_with_default(line, &self.default_library);
        self.execute(&invocation)
    }

    /// Execute a parsed invocation and return the command's text output.
    ///
    /// Handler failures come back as [`ShellError::Operation`] carrying the
    /// handler's own error unchanged.
    pub fn execute(&self, invocation: &ParsedInvocation) -> ShellResult<String> {
        let command = self
            .registry
            .get(&invocation.library, &invocation.command)
            .ok_or_else(|| ShellError::UnrecognizedCommand {
                library: invocation.library.clone(),
                command: invocation.command.clone(),
            })?;
        let signature = command.signature();
        tracing::debug!(command = %signature.qualified_name(), "resolved command");

        let required = signature.required_count();
        let optional = signature.optional_count();
        let provided = invocation.arguments.len();
        if provided < required {
            return Err(ShellError::MissingArguments {
                required,
                optional,
                provided,
            });
        }
        if provided > required + optional {
            return Err(ShellError::TooManyArguments {
                max: required + optional,
                provided,
            });
        }

        let mut slots: Vec<Option<Value>> = signature
            .params()
            .iter()
            .map(|param| param.default().cloned())
            .collect();
        for (position, (param, raw)) in signature
            .params()
            .iter()
            .zip(&invocation.arguments)
            .enumerate()
        {
            slots[position] = Some(coerce(param, position, raw)?);
        }

        let values = slots
            .into_iter()
            .zip(signature.params())
            .map(|(slot, param)| slot.ok_or_else(|| ShellError::Unbound(param.name().to_string())))
            .collect::<ShellResult<Vec<_>>>()?;
        tracing::debug!(
            command = %signature.qualified_name(),
            provided,
            bound = values.len(),
            "arguments bound"
        );

        command.handler().call(&Args::new(values)).map_err(|err| {
            tracing::warn!(command = %signature.qualified_name(), error = %err, "command failed");
            ShellError::Operation(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::bail;

    use super::*;
    use crate::internal::shell::{
        kind::ParamKind,
        registry::{CommandSignature, LibraryBuilder, Param},
    };

    fn create_user(args: &Args) -> anyhow::Result<String> {
        Ok(format!("{}|{}", args.str(0)?, args.str(1)?))
    }

    fn do_something(args: &Args) -> anyhow::Result<String> {
        Ok(format!("{}:{}", args.get::<i32>(0)?, args.str(1)?))
    }

    fn fail(_: &Args) -> anyhow::Result<String> {
        bail!("record is locked")
    }

    fn dispatcher() -> Dispatcher {
        let registry = CommandRegistry::builder()
            .library(LibraryBuilder::new("Users").command(
                CommandSignature::new("Create")
                    .param(Param::required("firstName", ParamKind::String))
                    .param(Param::required("lastName", ParamKind::String)),
                create_user,
            ))
            .library(
                LibraryBuilder::new(DEFAULT_LIBRARY)
                    .command(
                        CommandSignature::new("DoSomething")
                            .param(Param::required("id", ParamKind::Int32))
                            .param(Param::required("data", ParamKind::String)),
                        do_something,
                    )
                    .command(
                        CommandSignature::new("Optional")
                            .param(Param::required("id", ParamKind::Int32))
                            .param(Param::optional("data", ParamKind::String, "No Data provided")),
                        do_something,
                    )
                    .command(CommandSignature::new("Fail"), fail)
                    .command(
                        CommandSignature::new("Opaque")
                            .param(Param::required("users", ParamKind::Opaque("Vec<User>"))),
                        fail,
                    ),
            )
            .build()
            .unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_qualified_command_with_two_strings() {
        let result = dispatcher().execute_line("Users.Create John Lennon").unwrap();
        assert_eq!(result, "John|Lennon");
    }

    #[test]
    fn test_default_library_with_quoted_argument() {
        let result = dispatcher()
            .execute_line(r#"DoSomething 5 "hello world""#)
            .unwrap();
        assert_eq!(result, "5:hello world");
    }

    #[test]
    fn test_unknown_library() {
        let err = dispatcher().execute_line("Foo.Bar").unwrap_err();
        assert!(matches!(
            &err,
            ShellError::UnrecognizedCommand { library, command }
                if library == "Foo" && command == "Bar"
        ));
        assert!(err.to_string().contains("'Foo.Bar'"));
    }

    #[test]
    fn test_resolution_fails_before_coercion() {
        let err = dispatcher().execute_line("Foo.Bar abc").unwrap_err();
        assert!(matches!(err, ShellError::UnrecognizedCommand { .. }));

        // `abc` would fail the int32 `id` of DefaultCommands.DoSomething
        let err = dispatcher().execute_line("Foo.DoSomething abc data").unwrap_err();
        assert!(matches!(
            &err,
            ShellError::UnrecognizedCommand { library, command }
                if library == "Foo" && command == "DoSomething"
        ));
    }

    #[test]
    fn test_handler_reading_wrong_kind_is_operation_failure() {
        let registry = CommandRegistry::builder()
            .library(LibraryBuilder::new("Lib").command(
                CommandSignature::new("Wide").param(Param::required("n", ParamKind::Int32)),
                |args: &Args| -> anyhow::Result<String> { Ok(args.get::<i64>(0)?.to_string()) },
            ))
            .build()
            .unwrap();
        let err = Dispatcher::new(Arc::new(registry))
            .execute_line("Lib.Wide 4")
            .unwrap_err();

        let ShellError::Operation(inner) = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(matches!(
            inner.downcast_ref::<ShellError>(),
            Some(ShellError::ArgumentType {
                position: 0,
                expected: ParamKind::Int64
            })
        ));
        assert_eq!(err.to_string(), "Argument 0 is not a int64");
    }

    #[test]
    fn test_unknown_command_in_known_library() {
        let err = dispatcher().execute_line("Users.Delete 1").unwrap_err();
        assert!(matches!(err, ShellError::UnrecognizedCommand { .. }));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = dispatcher().execute_line("Users.Create John").unwrap_err();
        assert!(matches!(
            err,
            ShellError::MissingArguments {
                required: 2,
                optional: 0,
                provided: 1
            }
        ));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = dispatcher()
            .execute_line("Users.Create John Winston Lennon")
            .unwrap_err();
        assert!(matches!(
            err,
            ShellError::TooManyArguments {
                max: 2,
                provided: 3
            }
        ));
    }

    #[test]
    fn test_coercion_failure_names_parameter() {
        let err = dispatcher().execute_line("DoSomething abc data").unwrap_err();
        match err {
            ShellError::Coercion {
                argument, kind, ..
            } => {
                assert_eq!(argument, "id");
                assert_eq!(kind, ParamKind::Int32);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_optional_parameter_keeps_default() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.execute_line("Optional 3").unwrap(),
            "3:No Data provided"
        );
        assert_eq!(
            dispatcher.execute_line("Optional 3 given").unwrap(),
            "3:given"
        );
    }

    #[test]
    fn test_operation_failure_is_transparent() {
        let err = dispatcher().execute_line("Fail").unwrap_err();
        assert!(matches!(err, ShellError::Operation(_)));
        assert_eq!(err.to_string(), "record is locked");
    }

    #[test]
    fn test_opaque_parameter_is_unsupported() {
        let err = dispatcher().execute_line("Opaque x").unwrap_err();
        assert!(matches!(err, ShellError::UnsupportedKind { .. }));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_handler_runs_once_and_not_on_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = CommandRegistry::builder()
            .library(LibraryBuilder::new("Lib").command(
                CommandSignature::new("Count").param(Param::required("n", ParamKind::Byte)),
                move |args: &Args| -> anyhow::Result<String> {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(args.get::<u8>(0)?.to_string())
                },
            ))
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));

        assert_eq!(dispatcher.execute_line("Lib.Count 9").unwrap(), "9");
        assert!(dispatcher.execute_line("Lib.Count 300").is_err());
        assert!(dispatcher.execute_line("Lib.Count").is_err());
        assert!(dispatcher.execute_line("Other.Count 1").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_default_library() {
        let dispatcher = dispatcher().with_default_library("Users");
        assert_eq!(dispatcher.default_library(), "Users");
        assert_eq!(dispatcher.execute_line("Create A B").unwrap(), "A|B");
    }
}
