pub mod actor;
pub mod controllers;
pub mod error;
pub mod jwt;
pub mod util;

pub use actor::{Actor, LoggedIn};
pub use error::{Error, Result};
pub use jwt::Jwt;
