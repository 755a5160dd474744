//! Command registry: library → command → signature + handler.
//!
//! The registry is assembled once through [`CommandRegistryBuilder`] and is
//! read-only afterwards, so it can be shared behind an `Arc` without locking.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::{
    args::Args,
    error::{ShellError, ShellResult},
    kind::{ParamKind, Value},
};

/// Handler trait that every registered command implements.
///
/// Closures of the shape `Fn(&Args) -> anyhow::Result<String>` implement it
/// through the blanket impl below.
pub trait CommandHandler: Send + Sync {
    /// Run the command with fully bound arguments and return its text output.
    fn call(&self, args: &Args) -> anyhow::Result<String>;
}

impl<F> CommandHandler for F
where
    F: Fn(&Args) -> anyhow::Result<String> + Send + Sync,
{
    fn call(&self, args: &Args) -> anyhow::Result<String> {
        self(args)
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)?;
        match &self.default {
            Some(Value::String(s)) => write!(f, " = \"{s}\""),
            Some(value) => write!(f, " = {value}"),
            None => Ok(()),
        }
    }
}

/// Ordered parameter metadata for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSignature {
    library: String,
    name: String,
    params: Vec<Param>,
}

impl CommandSignature {
    /// Start a signature; the owning library is assigned on registration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            library: String::new(),
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter; declaration order is binding order.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.is_optional()).count()
    }

    pub fn optional_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_optional()).count()
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.library, self.name)
    }

    fn validate(&self) -> ShellResult<()> {
        let invalid = |reason: String| ShellError::InvalidSignature {
            command: self.qualified_name(),
            reason,
        };

        for (label, value) in [("library", &self.library), ("command", &self.name)] {
            if !is_valid_identifier(value) {
                return Err(invalid(format!("{label} name '{value}' is not invocable")));
            }
        }

        let mut seen = HashSet::new();
        let mut optional_seen = false;
        for param in &self.params {
            if !seen.insert(param.name.as_str()) {
                return Err(invalid(format!("duplicate parameter '{}'", param.name)));
            }
            match &param.default {
                Some(default) => {
                    optional_seen = true;
                    if default.kind() != param.kind {
                        return Err(invalid(format!(
                            "default for '{}' is {}, expected {}",
                            param.name,
                            default.kind(),
                            param.kind
                        )));
                    }
                }
                None if optional_seen => {
                    return Err(invalid(format!(
                        "required parameter '{}' follows an optional parameter",
                        param.name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for CommandSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.library, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && !name.contains('.') && !name.contains('"') && !name.contains(char::is_whitespace)
}

/// A signature paired with the handler that implements it.
#[derive(Clone)]
pub struct RegisteredCommand {
    signature: CommandSignature,
    handler: Arc<dyn CommandHandler>,
}

impl RegisteredCommand {
    pub fn signature(&self) -> &CommandSignature {
        &self.signature
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Immutable library → command lookup table.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    libraries: BTreeMap<String, BTreeMap<String, RegisteredCommand>>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::new()
    }

    pub fn has_library(&self, library: &str) -> bool {
        self.libraries.contains_key(library)
    }

    pub fn has_command(&self, library: &str, command: &str) -> bool {
        self.get(library, command).is_some()
    }

    pub fn get(&self, library: &str, command: &str) -> Option<&RegisteredCommand> {
        self.libraries.get(library)?.get(command)
    }

    pub fn signature_of(&self, library: &str, command: &str) -> Option<&CommandSignature> {
        self.get(library, command).map(RegisteredCommand::signature)
    }

    /// Registered library names in sorted order.
    pub fn libraries(&self) -> impl Iterator<Item = &str> + '_ {
        self.libraries.keys().map(String::as_str)
    }

    /// Every signature, grouped by library, sorted by name.
    pub fn signatures(&self) -> impl Iterator<Item = &CommandSignature> + '_ {
        self.libraries
            .values()
            .flat_map(|commands| commands.values().map(RegisteredCommand::signature))
    }

    pub fn len(&self) -> usize {
        self.libraries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects the commands of one library.
pub struct LibraryBuilder {
    name: String,
    commands: Vec<RegisteredCommand>,
}

impl LibraryBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Register a command implemented by `handler`.
    pub fn command<H>(mut self, mut signature: CommandSignature, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        signature.library = self.name.clone();
        self.commands.push(RegisteredCommand {
            signature,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for constructing a [`CommandRegistry`] from library builders.
#[derive(Default)]
pub struct CommandRegistryBuilder {
    libraries: Vec<LibraryBuilder>,
}

impl CommandRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(mut self, library: LibraryBuilder) -> Self {
        self.libraries.push(library);
        self
    }

    /// Validate every signature and freeze the registry.
    pub fn build(self) -> ShellResult<CommandRegistry> {
        let mut libraries: BTreeMap<String, BTreeMap<String, RegisteredCommand>> = BTreeMap::new();

        for library in self.libraries {
            if libraries.contains_key(&library.name) {
                return Err(ShellError::InvalidSignature {
                    command: library.name.clone(),
                    reason: "library registered twice".to_string(),
                });
            }
            let mut commands = BTreeMap::new();
            for command in library.commands {
                command.signature.validate()?;
                let name = command.signature.name.clone();
                if commands.contains_key(&name) {
                    return Err(ShellError::InvalidSignature {
                        command: command.signature.qualified_name(),
                        reason: "command registered twice".to_string(),
                    });
                }
                tracing::debug!(command = %command.signature, "registered command");
                commands.insert(name, command);
            }
            libraries.insert(library.name, commands);
        }

        let registry = CommandRegistry { libraries };
        tracing::debug!(
            libraries = registry.libraries.len(),
            commands = registry.len(),
            "command registry built"
        );
        Ok(registry)
    }
}
