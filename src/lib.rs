pub mod analyzer;
pub mod chat;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod lockfile;
pub mod render;

pub use error::{HeraldError, Result};

#[cfg(test)]
pub mod test_helpers;
