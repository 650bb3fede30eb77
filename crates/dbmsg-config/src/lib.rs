//! # dbmsg Config
//!
//! Type-safe configuration for the database-backed message source.
//!
//! This crate provides the YAML schema, defaults, validation and loading
//! with environment variable overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::*;
pub use schema::*;
pub use validation::*;
