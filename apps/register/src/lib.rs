//! # Driwich Register
//!
//! Line-oriented register front end for Driwich POS.
//!
//! ## Module Organization
//! ```text
//! driwich_register/
//! ├── lib.rs          ◄─── You are here (startup & main loop)
//! ├── config.rs       ◄─── DRIWICH_* environment overrides
//! ├── commands.rs     ◄─── Command parsing and execution
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Register Startup                                  │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,driwich=debug, overridden with RUST_LOG             │
//! │                                                                         │
//! │  2. Read Configuration ───────────────────────────────────────────────► │
//! │     • DRIWICH_* variables on top of the default settings                │
//! │                                                                         │
//! │  3. Build AppContext ─────────────────────────────────────────────────► │
//! │     • Empty catalog, cart and history                                   │
//! │     • Uuid ids, system clock                                            │
//! │                                                                         │
//! │  4. Pick Printer ─────────────────────────────────────────────────────► │
//! │     • Network (raw TCP) or simulated                                    │
//! │                                                                         │
//! │  5. Read commands from stdin until `quit` or EOF                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use driwich_core::{AppContext, PrintOutcome, ReceiptPrinter, ReceiptRequest};
use driwich_printer::{NetworkReceiptPrinter, SimulatedPrinter};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, Register, Reply};
use config::RegisterConfig;
use error::ApiError;

/// The printer chosen at start-up.
#[derive(Debug, Clone)]
pub enum RegisterPrinter {
    Network(NetworkReceiptPrinter),
    Simulated(SimulatedPrinter),
}

impl RegisterPrinter {
    pub fn from_config(config: &RegisterConfig) -> Self {
        if config.simulate_printer {
            RegisterPrinter::Simulated(SimulatedPrinter)
        } else {
            RegisterPrinter::Network(NetworkReceiptPrinter::new())
        }
    }
}

impl ReceiptPrinter for RegisterPrinter {
    async fn print(&self, request: &ReceiptRequest) -> PrintOutcome {
        match self {
            RegisterPrinter::Network(printer) => printer.print(request).await,
            RegisterPrinter::Simulated(printer) => printer.print(request).await,
        }
    }
}

/// Builds the context with start-up overrides applied.
pub fn build_context(config: &RegisterConfig) -> AppContext {
    let mut ctx = AppContext::new();
    if let Err(e) = ctx.try_update_settings(config.settings.clone()) {
        warn!(error = %e, "start-up overrides rejected, using defaults");
    }
    ctx
}

/// Runs the register until `quit` or end of input.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    let config = RegisterConfig::from_env();
    let printer = RegisterPrinter::from_config(&config);
    info!(?printer, "Starting Driwich register");

    let mut register = Register::new(build_context(&config), printer);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Driwich POS register. Type 'help' for commands.\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(Some(command)) => register.execute(command).await,
            Ok(None) => Ok(Reply::Text(String::new())),
            Err(e) => Err(e),
        };

        let output = match reply {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) if text.is_empty() => String::new(),
            Ok(Reply::Text(text)) => format!("{}\n", text),
            Err(e) => format!("error: {}\n", e.message),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    info!(
        orders = register.context().orders().len(),
        "Register closed"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=driwich_core=trace` - Trace the core only
/// - Default: `info,driwich=debug`
///
/// Logs go to stderr so they never mix with command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,driwich=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_PRINTER_SIMULATE, ENV_SHOP_NAME, ENV_TAX_RATE};

    #[test]
    fn test_build_context_applies_overrides() {
        let config = RegisterConfig::from_lookup(|key| match key {
            ENV_SHOP_NAME => Some("Kebab Hut".to_string()),
            ENV_TAX_RATE => Some("5".to_string()),
            _ => None,
        });
        let ctx = build_context(&config);
        assert_eq!(ctx.settings().shop_name, "Kebab Hut");
        assert_eq!(ctx.settings().tax_rate.bps(), 500);
        assert_eq!(ctx.settings().currency, "USD");
    }

    #[test]
    fn test_printer_choice() {
        let simulated = RegisterConfig::from_lookup(|key| {
            (key == ENV_PRINTER_SIMULATE).then(|| "1".to_string())
        });
        assert!(matches!(
            RegisterPrinter::from_config(&simulated),
            RegisterPrinter::Simulated(_)
        ));
        assert!(matches!(
            RegisterPrinter::from_config(&RegisterConfig::default()),
            RegisterPrinter::Network(_)
        ));
    }
}
