use thiserror::Error;

mod auth;
mod database;
mod feed;
mod logging;
mod server;

pub use auth::Auth;
pub use database::Database;
pub use feed::Feed;
pub use logging::{Logging, LoggingStyle};
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
