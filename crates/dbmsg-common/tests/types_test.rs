//! Property tests for the cache duration policy and shared helpers.

use dbmsg_common::{comma_delimited_list, CacheDuration};
use proptest::prelude::*;

proptest! {
    #[test]
    fn ttl_expiry_is_monotonic_in_time(
        ttl in 1i64..100_000,
        loaded_at in 0i64..1_000_000,
        elapsed in 0i64..200_000,
        extra in 0i64..200_000,
    ) {
        let policy = CacheDuration::from_millis(ttl);
        let now = loaded_at + elapsed;
        if policy.is_expired(loaded_at, now) {
            prop_assert!(policy.is_expired(loaded_at, now + extra));
        }
        prop_assert_eq!(policy.is_expired(loaded_at, now), elapsed >= ttl);
    }

    #[test]
    fn forever_never_expires(loaded_at in any::<i64>(), now in any::<i64>()) {
        prop_assert!(!CacheDuration::from_millis(-1).is_expired(loaded_at, now));
    }

    #[test]
    fn basename_lists_never_contain_blank_items(input in "[a-z ,]{0,40}") {
        for item in comma_delimited_list(&input) {
            prop_assert!(!item.is_empty());
            prop_assert_eq!(item.trim(), item.as_str());
        }
    }
}

#[test]
fn test_yaml_duration_forms() {
    let forever: CacheDuration = serde_yaml::from_str("-1").unwrap();
    assert_eq!(forever, CacheDuration::Forever);

    let never: CacheDuration = serde_yaml::from_str("0").unwrap();
    assert_eq!(never, CacheDuration::Never);

    let ttl: CacheDuration = serde_yaml::from_str("30s").unwrap();
    assert_eq!(ttl.as_millis(), 30_000);
}
