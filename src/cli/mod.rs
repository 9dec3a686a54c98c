use clap::Parser;
use error_stack::Result;
use yatube::server::StartServerError;

mod server;

/// Command line options for Yatube.
#[derive(Debug, Parser)]
#[command(about = "Utility suite for the Yatube server", version, author, long_about)]
pub struct Cli {
  #[clap(subcommand)]
  pub subcommand: Subcommand,
}

impl Cli {
  pub fn run(self) -> Result<(), StartServerError> {
    match self.subcommand {
      Subcommand::Server(args) => self::server::run(&args),
    }
  }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
  Server(self::server::ServerCommand),
}
