#![forbid(unsafe_code)]

mod cli;
pub mod client;
pub mod error;
pub mod format;
pub mod validate;

pub use cli::{Command, NewUser, dispatch, run};
pub use error::{Error, Result};
