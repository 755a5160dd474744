//! CLI entry for cmdshell: parses flags, resolves configuration, builds the command registry and runs the shell.
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::{
    command,
    internal::{
        config::ShellConfig,
        shell::{Dispatcher, Repl, ShellError},
    },
};

// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    about = "cmdshell: resolve and run `Library.Command arg...` lines interactively",
    version
)]
struct Cli {
    #[arg(long, help = "Read configuration from this file instead of discovering one")]
    config: Option<PathBuf>,

    #[arg(long, help = "Prompt written before each input line")]
    prompt: Option<String>,

    #[arg(long, help = "Library used for commands without a `Library.` prefix")]
    default_library: Option<String>,

    #[arg(long, help = "Do not color error messages")]
    no_color: bool,

    #[arg(
        short,
        long,
        value_name = "LINE",
        help = "Run a single command line and exit instead of starting the shell"
    )]
    exec: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration; flags override file values.
    fn resolve_config(&self) -> Result<ShellConfig, ShellError> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::load_file(path)?,
            None => ShellConfig::discover(&std::env::current_dir()?),
        };
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(library) = &self.default_library {
            config.default_library = library.clone();
        }
        if self.no_color {
            config.color = false;
        }
        Ok(config)
    }
}

fn init_logging(config: &ShellConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The main function is the entry point of the cmdshell application.
/// It parses the command-line arguments and runs the shell or a single line.
/// - `args`: parse from command line if it's `None`, otherwise parse from the given args
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> Result<(), ShellError> {
    parse_async(args).await
}

/// `async` version of the [parse] function
pub async fn parse_async(args: Option<&[&str]>) -> Result<(), ShellError> {
    let cli = match args {
        Some(args) => Cli::try_parse_from(args).map_err(|e| ShellError::Usage(e.to_string()))?,
        None => Cli::parse(),
    };
    let config = cli.resolve_config()?;
    init_logging(&config);
    tracing::debug!(?config, "starting shell");

    let registry = Arc::new(command::registry()?);
    let dispatcher = Dispatcher::new(registry).with_default_library(config.default_library.clone());

    if let Some(line) = cli.exec {
        let output = dispatcher.execute_line(&line)?;
        if !output.is_empty() {
            println!("{output}");
        }
        return Ok(());
    }

    let mut repl = Repl::new(
        dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .with_prompt(config.prompt)
    .with_color(config.color);
    repl.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "prompt = \"file> \"\ndefault_library = \"Users\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "cmdshell",
            "--config",
            path.to_str().unwrap(),
            "--prompt",
            "flag> ",
            "--no-color",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.prompt, "flag> ");
        assert_eq!(config.default_library, "Users");
        assert!(!config.color);
    }

    #[test]
    fn test_default_library_flag_overrides_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "default_library = \"DefaultCommands\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "cmdshell",
            "--config",
            path.to_str().unwrap(),
            "--default-library",
            "Users",
        ])
        .unwrap();
        assert_eq!(cli.resolve_config().unwrap().default_library, "Users");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli::try_parse_from(["cmdshell", "--config", "/nonexistent/cmdshell.toml"])
            .unwrap();
        assert!(matches!(cli.resolve_config(), Err(ShellError::Config(_))));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let result = parse(Some(&["cmdshell", "--bogus"]));
        assert!(matches!(result, Err(ShellError::Usage(_))));
    }

    #[test]
    fn test_exec_unrecognized_command_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        let path = path.to_str().unwrap();

        let result = parse(Some(&["cmdshell", "--config", path, "--exec", "Foo.Bar"]));
        assert!(matches!(
            result,
            Err(ShellError::UnrecognizedCommand { .. })
        ));
        assert!(parse(Some(&["cmdshell", "--config", path, "-e", "Users.Get"])).is_ok());
    }
}
