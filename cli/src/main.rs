//! portctl CLI - Find and stop the process behind a TCP port
//!
//! A command-line tool for asking who owns a port, listing listeners,
//! checking whether a port is free, killing its owner safely, and
//! explaining the native commands used for each.

mod commands;
mod logging;
mod prompt;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use portctl_core::Platform;

#[derive(Parser)]
#[command(name = "portctl")]
#[command(author, version, about = "Find, explain and stop the process behind a TCP port")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which process is listening on a port
    Who {
        /// Port number to inspect
        port: u16,
    },

    /// List all listening TCP ports
    #[command(alias = "ls")]
    List {
        /// Sort the listing (default: order reported by the OS tool)
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,

        /// Filter by process name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Exit 0 if nothing listens on the port, 1 if it is occupied
    Free {
        /// Port number to check
        port: u16,
    },

    /// Stop the process listening on a port
    Kill {
        /// Port number whose owner should be stopped
        port: u16,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,

        /// Send SIGKILL if the process outlives the grace period
        #[arg(short, long)]
        force: bool,

        /// Seconds to wait after SIGTERM (overrides the config file)
        #[arg(short, long)]
        grace: Option<f64>,
    },

    /// Explain the native commands behind each operation
    Explain {
        /// Operation to explain (who, list, kill, free); all when omitted
        operation: Option<String>,

        /// Platform to explain for (default: this machine)
        #[arg(short, long)]
        platform: Option<Platform>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortKey {
    Port,
    Pid,
    Name,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Who { port } => commands::who::run(port, cli.json).await,
        Commands::List { sort, name } => commands::list::run(sort, name, cli.json).await,
        Commands::Free { port } => commands::free::run(port, cli.json).await,
        Commands::Kill {
            port,
            yes,
            force,
            grace,
        } => commands::kill::run(port, yes, force, grace, cli.json).await,
        Commands::Explain {
            operation,
            platform,
        } => commands::explain::run(operation, platform, cli.json),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}
