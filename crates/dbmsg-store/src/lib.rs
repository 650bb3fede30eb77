//! # dbmsg Store
//!
//! Embedded storage for bundle records backed by sled.
//!
//! Records are stored as JSON under keys of the form
//! `base_name \0 language \0 country \0 variant \0 key`, so one fallback level
//! is a single prefix scan.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod sled_store;

pub use sled_store::SledBundleStore;
