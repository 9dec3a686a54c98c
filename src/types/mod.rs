pub mod error;
pub mod form;
pub mod id;
pub mod view;

pub use error::Error;
