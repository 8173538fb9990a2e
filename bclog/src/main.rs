use bclog_core::cli;
use bclog_core::cli::config::ConfigCmd;
use bclog_core::cli::run::RunArgs;
use bclog_core::logging::init_logging;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bclog",
    version,
    about = "bclog: interactive syslog viewer for BigCommerce development boxes",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tail a log source and open the interactive session (default)
    Run(RunArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Config { cmd }) => {
            let _guard = init_logging(None);
            cli::config::run(cmd)
        }
        Some(Command::Run(args)) => run(args),
        None => run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("bclog: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let _guard = init_logging(args.log_file.as_deref());
    tracing::debug!(?args, "starting");
    cli::run::run(args)
}
