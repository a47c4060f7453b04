pub mod build;
pub mod compile;
pub mod validate;

use clap::{Parser, Subcommand};

/// dstokens - Design token to CSS custom property compiler
#[derive(Parser, Debug)]
#[command(name = "dstokens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile every theme listed in dstokens.yaml
    Build(build::BuildArgs),

    /// Compile a single token file and print its CSS
    Compile(compile::CompileArgs),

    /// Check themes without writing output
    Validate(validate::ValidateArgs),
}
