//! # dbmsg CLI
//!
//! Command-line host for database-backed message bundles: resolve codes,
//! write and import records, and list what a store holds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;

pub use app::App;
pub use cli::{Cli, Command};
