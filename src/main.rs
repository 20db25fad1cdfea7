//! gpgkeys - a crypto-shell for GnuPG
//!
//! An interactive shell for managing GnuPG keys and keyrings, with
//! completion of commands, options, filenames, key ids and keyservers.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! gpgkeys
//!
//! # Run a single command
//! gpgkeys list --secret
//! ```

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use gpgkeys::cli::CliInterface;
use gpgkeys::config::LoggingConfig;
use gpgkeys::error::Result;
use gpgkeys::executor::{ExecutionContext, ExecutionResult, apply_umask};
use gpgkeys::parser::Quoting;
use gpgkeys::repl::completion::GnupgCandidateProvider;
use gpgkeys::repl::{ReadOutcome, ReplEngine};
use gpgkeys::utils::fs::ensure_dir_exists;

/// Environment variable holding a `tracing` filter directive
const LOG_ENV: &str = "GPGKEYS_LOG";

/// Application entry point
#[tokio::main]
async fn main() {
    match run().await {
        Ok(rc) => std::process::exit(rc),
        Err(e) => {
            eprintln!("gpgkeys: {e}");
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle the print-and-exit flags
/// 4. Run a single command or the interactive shell
///
/// # Returns
/// * `Result<i32>` - Exit status
async fn run() -> Result<i32> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli.config().logging)?;

    if cli.handle_flags()? {
        return Ok(0);
    }

    if let Some(mask) = cli.config().umask() {
        apply_umask(mask);
    }

    let context = ExecutionContext::new(cli.config().gnupg.clone())
        .with_syntax(cli.config().syntax())
        .with_verbose(cli.is_verbose());

    match cli.command_line() {
        Some(line) => {
            let context = context.with_interactive(false);
            Ok(execute_interruptible(&context, &line).await.rc)
        }
        None => run_interactive_mode(&cli, context.with_interactive(true)).await,
    }
}

/// Run application in interactive REPL mode
async fn run_interactive_mode(cli: &CliInterface, context: ExecutionContext) -> Result<i32> {
    let config = cli.config();
    let mut quoting = Quoting::new(config.syntax(), config.completion.quote_policy);
    if let Some(home) = dirs::home_dir() {
        quoting = quoting.with_home(home.to_string_lossy());
    }
    let provider = Arc::new(GnupgCandidateProvider::new(&config.gnupg));
    let mut repl = ReplEngine::new(config, quoting, provider)?;

    cli.print_banner();
    run_repl_loop(&mut repl, &context).await
}

/// Main REPL loop
///
/// Returns the return code of the last command.
async fn run_repl_loop(repl: &mut ReplEngine, context: &ExecutionContext) -> Result<i32> {
    let mut rc = 0;
    loop {
        // Reset cancellation token for each command
        let mut context = context.clone();
        context.reset_cancel_token();

        let line = match repl.read_line()? {
            ReadOutcome::Line(line) if line.trim().is_empty() => continue,
            ReadOutcome::Line(line) => line,
            ReadOutcome::Eof => "EOF".to_string(),
            ReadOutcome::Interrupted => {
                println!();
                return Ok(1);
            }
        };

        let result = execute_interruptible(&context, &line).await;
        rc = result.rc;
        if result.quit {
            break;
        }
    }
    debug!("Leaving the shell with rc {rc}");
    Ok(rc)
}

/// Execute a command line while Ctrl+C cancels the context's token
async fn execute_interruptible(context: &ExecutionContext, line: &str) -> ExecutionResult {
    let cancel_token = context.get_cancel_token();

    let ctrl_c_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => cancel_token.cancel(),
            Err(err) => eprintln!("gpgkeys: failed to listen for Ctrl+C: {err}"),
        }
    });

    let result = context.execute(line).await;

    // Stop listening before the line editor takes the terminal back
    ctrl_c_handle.abort();
    result
}

/// Initialize logging from the configuration
///
/// The `GPGKEYS_LOG` filter overrides the configured level. Output goes to
/// the configured log file if there is one, else to stderr.
fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    let level = LevelFilter::from_level(config.level.to_tracing_level());
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let (writer, ansi) = match &config.file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                ensure_dir_exists(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    if config.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
    Ok(())
}
