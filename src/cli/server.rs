use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use yatube::{config::Server as Config, server::StartServerError};

/// Expose the Yatube HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
  #[clap(long)]
  pub host: Option<IpAddr>,
  #[clap(long)]
  pub port: Option<u16>,
  #[clap(long)]
  pub workers: Option<NonZeroUsize>,
}

pub fn run(args: &ServerCommand) -> Result<(), StartServerError> {
  let mut config = Config::load().change_context(StartServerError)?;
  args.override_config(&mut config);

  yatube::logging::init(&config.logging).change_context(StartServerError)?;

  let mut runtime = tokio::runtime::Builder::new_multi_thread();
  if let Some(workers) = config.workers {
    runtime.worker_threads(workers.get());
  }

  runtime
    .enable_all()
    .build()
    .change_context(StartServerError)
    .attach_printable("could not build tokio runtime")?
    .block_on(yatube::server::run(config))
}

impl ServerCommand {
  fn override_config(&self, config: &mut Config) {
    // override server configurations if set by the cli
    if let Some(host) = self.host {
      config.host = host;
    }

    if let Some(port) = self.port {
      config.port = port;
    }

    if let Some(workers) = self.workers {
      config.workers = Some(workers);
    }
  }
}
