//! Common type definitions shared by the configuration layer and the cache.

use crate::error::DbMsgError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How long a loaded bundle may be served before the store is consulted again.
///
/// Mirrors the classic resource-bundle cache millis convention: `0` means
/// "never cache" (every resolve revalidates), any negative value means
/// "cache forever", and a positive value is a TTL in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheDuration {
    /// Revalidate on every access.
    Never,
    /// Never revalidate once loaded.
    #[default]
    Forever,
    /// Revalidate once the bundle is at least this old.
    Ttl(Duration),
}

impl CacheDuration {
    /// Build from the millisecond convention (`0`, negative, positive).
    pub fn from_millis(millis: i64) -> Self {
        match millis {
            0 => Self::Never,
            m if m < 0 => Self::Forever,
            m => Self::Ttl(Duration::from_millis(m.unsigned_abs())),
        }
    }

    /// The millisecond form of this duration (`-1` for forever).
    pub fn as_millis(&self) -> i64 {
        match self {
            Self::Never => 0,
            Self::Forever => -1,
            Self::Ttl(ttl) => i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Whether a bundle loaded at `loaded_at` must be revalidated at `now`.
    ///
    /// Both timestamps are epoch milliseconds. A clock that moved backwards
    /// never expires a bundle early.
    pub fn is_expired(&self, loaded_at: i64, now: i64) -> bool {
        match self {
            Self::Never => true,
            Self::Forever => false,
            Self::Ttl(_) => now.saturating_sub(loaded_at) >= self.as_millis(),
        }
    }
}

impl fmt::Display for CacheDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "0"),
            Self::Forever => write!(f, "-1"),
            Self::Ttl(ttl) => write!(f, "{}ms", ttl.as_millis()),
        }
    }
}

impl FromStr for CacheDuration {
    type Err = DbMsgError;

    /// Parses `"500"`, `"500ms"`, `"10s"`, `"5m"`, `"1h"`, `"0"` or `"-1"`.
    /// A bare number is milliseconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, factor) = if let Some(rest) = trimmed.strip_suffix("ms") {
            (rest, 1)
        } else if let Some(rest) = trimmed.strip_suffix('s') {
            (rest, 1_000)
        } else if let Some(rest) = trimmed.strip_suffix('m') {
            (rest, 60_000)
        } else if let Some(rest) = trimmed.strip_suffix('h') {
            (rest, 3_600_000)
        } else {
            (trimmed, 1)
        };

        let value: i64 = digits.trim().parse().map_err(|e| {
            DbMsgError::config_with_source(format!("Invalid cache duration '{s}'"), e)
        })?;

        Ok(Self::from_millis(value.saturating_mul(factor)))
    }
}

impl Serialize for CacheDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CacheDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(millis) => Ok(Self::from_millis(millis)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_convention() {
        assert_eq!(CacheDuration::from_millis(0), CacheDuration::Never);
        assert_eq!(CacheDuration::from_millis(-1), CacheDuration::Forever);
        assert_eq!(CacheDuration::from_millis(-1000), CacheDuration::Forever);
        assert_eq!(
            CacheDuration::from_millis(500),
            CacheDuration::Ttl(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_expiry() {
        let ttl = CacheDuration::from_millis(500);
        assert!(!ttl.is_expired(0, 100));
        assert!(!ttl.is_expired(0, 499));
        assert!(ttl.is_expired(0, 500));
        assert!(ttl.is_expired(0, 600));
        assert!(!ttl.is_expired(1_000, 900));

        assert!(CacheDuration::Never.is_expired(10, 10));
        assert!(!CacheDuration::Forever.is_expired(0, i64::MAX));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("500".parse::<CacheDuration>().unwrap().as_millis(), 500);
        assert_eq!("500ms".parse::<CacheDuration>().unwrap().as_millis(), 500);
        assert_eq!("10s".parse::<CacheDuration>().unwrap().as_millis(), 10_000);
        assert_eq!("5m".parse::<CacheDuration>().unwrap().as_millis(), 300_000);
        assert_eq!("1h".parse::<CacheDuration>().unwrap().as_millis(), 3_600_000);
        assert_eq!("0".parse::<CacheDuration>().unwrap(), CacheDuration::Never);
        assert_eq!("-1".parse::<CacheDuration>().unwrap(), CacheDuration::Forever);
        assert_eq!("-1s".parse::<CacheDuration>().unwrap(), CacheDuration::Forever);
        assert!("soon".parse::<CacheDuration>().is_err());
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_number: CacheDuration = serde_json::from_str("250").unwrap();
        assert_eq!(from_number.as_millis(), 250);

        let from_text: CacheDuration = serde_json::from_str("\"2s\"").unwrap();
        assert_eq!(from_text.as_millis(), 2_000);

        let serialized = serde_json::to_string(&from_text).unwrap();
        assert_eq!(serialized, "\"2000ms\"");
    }
}
