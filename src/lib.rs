pub mod app;
pub mod cache;
pub mod config;
pub mod database;
pub mod feed;
pub mod http;
pub mod logging;
pub mod schema;
pub mod server;
pub mod types;
pub mod util;

pub use app::App;

pub(crate) mod internal;

#[allow(clippy::unwrap_used)]
#[cfg(test)]
pub(crate) mod test_utils;
