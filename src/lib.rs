pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod scm;
pub mod ui;
pub mod warning;

pub use error::{NpmPublishError, Result};
pub use resolver::{NpmInfo, Resolver};
