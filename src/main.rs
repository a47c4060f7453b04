use clap::Parser;
use dstokens::cli::{Cli, Commands};
use dstokens::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => {
            dstokens::cli::build::run(args, &printer)?;
        }
        Commands::Compile(args) => dstokens::cli::compile::run(args, &printer)?,
        Commands::Validate(args) => dstokens::cli::validate::run(args, &printer)?,
    }

    Ok(())
}

/// Logs go to stderr; RUST_LOG wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "dstokens=debug" } else { "dstokens=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
