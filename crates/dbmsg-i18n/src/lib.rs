//! # dbmsg I18n
//!
//! Localized message bundles loaded from a database instead of property files.
//!
//! This crate provides:
//!
//! - [`Locale`] parsing and the resource-bundle fallback chain
//! - [`BundleRecord`] rows and [`BundleName`] composed names
//! - the [`ContentLoaderStrategy`] contract every backing store implements
//! - [`BundleCache`], which decides per fallback level whether a loaded bundle
//!   is still fresh and reloads it from the store when it is not
//! - [`MessageResolver`], a `get_message(code, locale, args)` facade
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dbmsg_i18n::{BundleRecord, Locale, MemoryBundleStore, MessageSourceBuilder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryBundleStore::new());
//! store.upsert(BundleRecord::new("app", "greeting", "Hello {0}").with_locale(&"en".parse::<Locale>()?));
//!
//! let messages = MessageSourceBuilder::new()
//!     .basenames(["app"])
//!     .loader(Arc::clone(&store))
//!     .build()?;
//!
//! let locale: Locale = "en_US".parse()?;
//! assert_eq!(messages.get_message("greeting", &locale, &["Ada"], None)?, "Hello Ada");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod cache;
pub mod clock;
pub mod format;
pub mod locale;
pub mod memory;
pub mod record;
pub mod resolver;
pub mod strategy;

pub use builder::MessageSourceBuilder;
pub use cache::{BundleCache, CachePolicy, CacheStats, CacheStatsSnapshot, CachedBundle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use dbmsg_common::{CacheDuration, DbMsgError, Result};
pub use format::fill_positional;
pub use locale::Locale;
pub use memory::MemoryBundleStore;
pub use record::{compare_keys, BundleName, BundleRecord};
pub use resolver::MessageResolver;
pub use strategy::ContentLoaderStrategy;
