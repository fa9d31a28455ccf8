pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod plan;
pub mod runner;

pub use error::{Error, Result};
