pub mod board;
pub mod init;
pub mod shell;

use anyhow::Result;
use board::BoardCommand;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Open an interactive session with background snapshots")]
    Shell,
    #[command(flatten)]
    Board(BoardCommand),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Shell => shell::cmd().await,
            Commands::Board(command) => board::cmd(command),
        }
    }
}
