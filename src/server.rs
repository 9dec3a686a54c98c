use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::{
  config,
  http::{controllers, util::QuieterRootSpanBuilder},
  App,
};

#[derive(Debug, Error)]
#[error("Failed to start the HTTP server")]
pub struct StartServerError;

/// Serves every route until the process is told to stop. The feed
/// cache is created here and dropped with the server.
pub async fn run(config: config::Server) -> Result<(), StartServerError> {
  let workers = config.workers;
  let (host, port) = (config.host, config.port);

  let app = App::new(config).await.change_context(StartServerError)?;
  let mut server = HttpServer::new(move || {
    actix_web::App::new()
      .app_data(web::Data::new(app.clone()))
      .app_data(controllers::form_config(&app))
      .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
      .configure(controllers::configure)
      .default_service(web::to(controllers::not_found))
  });

  if let Some(workers) = workers {
    server = server.workers(workers.get());
  }

  let server = server
    .bind((host, port))
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {host}:{port}"))?;

  tracing::info!("listening on http://{host}:{port}");
  server.run().await.change_context(StartServerError)
}
