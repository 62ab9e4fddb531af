pub mod boundary;
pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod guard;
pub mod manifest;
pub mod profile;
pub mod publish;
pub mod template;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
