//! # dbmsg Common
//!
//! Shared types, error handling and logging setup for the dbmsg workspace.
//!
//! This crate provides the foundational pieces used by every other crate:
//! the [`DbMsgError`] taxonomy, the [`CacheDuration`] policy type and
//! `tracing` subscriber initialisation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{DbMsgError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
